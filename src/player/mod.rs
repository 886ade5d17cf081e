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

//! Audio playback control and state management.
//!
//! This module provides the high-level [`AudioPlayer`] interface used by the
//! UI to control preview playback. It manages a background worker thread
//! that owns the playback [`Coordinator`](coordinator::Coordinator), so
//! loading audio and sampling progress never block the main application
//! thread.

mod commands;
mod coordinator;
mod mpv;
mod primitive;
#[cfg(test)]
mod testing;

use std::{
    sync::mpsc::{self, Sender},
    thread::JoinHandle,
    time::Duration,
};

use anyhow::{Context, Result};
use tracing::warn;

use crate::{
    events::AppEvent,
    model::Track,
    player::{commands::PlayerCommand, mpv::MpvEngine},
};

pub(crate) use coordinator::{PlaybackObserver, PlaybackSnapshot};

/// A handle to the playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: Sender<PlayerCommand>,
    worker: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Spawns the player worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (playback
    ///   snapshots and errors) back to the main event loop.
    /// * `poll_interval` - How often progress is sampled while playing.
    pub(crate) fn new(event_tx: Sender<AppEvent>, poll_interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<PlayerCommand>();

        let engine = MpvEngine::new(command_tx.clone());
        let worker = commands::spawn_player_worker(engine, command_rx, event_tx, poll_interval);

        Self {
            command_tx,
            worker: Some(worker),
        }
    }

    /// Pauses `track` if it is playing, resumes it if it is paused, and
    /// starts it otherwise.
    pub(crate) fn toggle(&self, track: &Track) -> Result<()> {
        self.command_tx
            .send(PlayerCommand::Toggle(track.clone()))
            .context("Player worker is not running")?;
        Ok(())
    }

    /// Stop playback.
    pub(crate) fn stop(&self) -> Result<()> {
        self.command_tx
            .send(PlayerCommand::Stop)
            .context("Player worker is not running")?;
        Ok(())
    }

    /// Stops playback and waits for the worker to release the audio engine.
    pub(crate) fn shutdown(&mut self) {
        let _ = self.command_tx.send(PlayerCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("player worker panicked");
            }
        }
    }
}
