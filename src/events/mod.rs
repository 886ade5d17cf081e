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

//! Application events and the main event loop.
//!
//! Every input to the UI thread arrives as an [`AppEvent`] on a single
//! channel: key presses and ticks from the input threads, results from the
//! task worker, and playback snapshots from the player worker. The loop
//! applies each event to the [`App`] state and redraws.

mod handlers;
mod key_handlers;

use handlers::*;
use key_handlers::process_key_event;

use std::{io::Stdout, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::debug;

use crate::{
    App, MainView,
    model::Track,
    player::{PlaybackObserver, PlaybackSnapshot},
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,

    ExitApplication,

    SetMainView(MainView),

    SubmitSearch(String),
    SearchResultsReady(Vec<Track>),

    SavedTracksReady(Vec<Track>),
    TrackSaved(Track),

    PlaybackChanged(PlaybackSnapshot),

    Info(String),
    Error(String),
}

/// The UI thread observes playback through its own event channel.
impl PlaybackObserver for Sender<AppEvent> {
    fn on_playback_changed(&self, snapshot: &PlaybackSnapshot) {
        // The receiver only goes away when the application is exiting.
        let _ = self.send(AppEvent::PlaybackChanged(snapshot.clone()));
    }
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            debug!("exit requested");
            break;
        }

        process_event(app, event)?;

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}

fn process_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => process_key_event(app, key)?,
        AppEvent::Tick => handle_tick(app),
        AppEvent::SetMainView(view) => handle_set_main_view(app, view),
        AppEvent::SubmitSearch(query) => handle_submit_search(app, query)?,
        AppEvent::SearchResultsReady(tracks) => handle_search_results_ready(app, tracks),
        AppEvent::SavedTracksReady(tracks) => handle_saved_tracks_ready(app, tracks),
        AppEvent::TrackSaved(track) => handle_track_saved(app, track),
        AppEvent::PlaybackChanged(snapshot) => handle_playback_changed(app, snapshot),
        AppEvent::Info(message) => handle_info(app, message),
        AppEvent::Error(message) => handle_error(app, message),
        AppEvent::ExitApplication => {}
    }

    Ok(())
}
