// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Background task processing.
//!
//! This module implements the task pattern used to offload blocking store
//! and network work from the main UI thread. A dedicated worker loop
//! translates [`AppTask`] requests into database and catalog operations and
//! broadcasts the results back to the application via [`AppEvent`]s.

mod handlers;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};
use tracing::warn;

use crate::{
    catalog::{self, CatalogClient, TokenProvider},
    config::AppConfig,
    events::AppEvent,
    model::Track,
};

#[derive(Debug)]
pub(crate) enum AppTask {
    Search(String),
    SaveTrack(Track),
    LoadSavedTracks,
}

/// Spawns a background thread to process application tasks.
///
/// The database connection and HTTP clients are created up front so that a
/// broken store or TLS setup is reported before the UI starts.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the HTTP client
/// cannot be built.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut conn = crate::db::init_db(&config.database_file)
        .with_context(|| format!("Failed to initialise database {}", config.database_file))?;

    let http = catalog::http_client().context("Failed to build HTTP client")?;
    let catalog = CatalogClient::new(config, http.clone());
    let tokens = TokenProvider::new(config, http);

    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let mut ctx = TaskContext {
                event_tx: &event_tx,
                conn: &mut conn,
                catalog: &catalog,
                tokens: &tokens,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                warn!("task failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }
    });

    Ok(())
}

struct TaskContext<'a> {
    event_tx: &'a Sender<AppEvent>,
    conn: &'a mut Connection,
    catalog: &'a CatalogClient,
    tokens: &'a TokenProvider,
}

fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::Search(query) => handlers::search(ctx, &query),
        AppTask::SaveTrack(track) => handlers::save_track(ctx, track),
        AppTask::LoadSavedTracks => handlers::load_saved_tracks(ctx),
    }
}
