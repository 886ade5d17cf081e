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

//! Player worker thread.
//!
//! The worker owns the [`Coordinator`] outright. It blocks on the command
//! channel, waking early whenever the progress poll is due, so every
//! operation, engine signal and progress sample is applied strictly one at a
//! time.
//!
//! # Architecture
//!
//! The worker uses a dual-channel communication pattern:
//! 1. **Command Channel**: receives [`PlayerCommand`]s from the UI (toggle,
//!    stop) and engine signals from session threads.
//! 2. **Event Channel**: the coordinator publishes
//!    [`AppEvent::PlaybackChanged`] snapshots, and recovered playback errors
//!    are reported as [`AppEvent::Error`] for the status line.

use std::{
    sync::mpsc::{Receiver, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    error::PlaybackError,
    events::AppEvent,
    model::Track,
    player::{
        coordinator::{Coordinator, PlaybackObserver},
        primitive::{PlaybackEngine, PrimitiveSignal, SessionId},
    },
};

#[derive(Debug)]
pub(crate) enum PlayerCommand {
    Toggle(Track),
    Stop,
    Signal(SessionId, PrimitiveSignal),
    Shutdown,
}

/// Spawns the player worker thread.
///
/// The coordinator is built on the worker thread itself, so neither it nor
/// the primitives it opens ever cross threads.
///
/// # Arguments
///
/// * `engine` - The audio engine the coordinator opens sessions with.
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to publish playback state and errors.
/// * `poll_interval` - How often progress is sampled while playing.
pub(crate) fn spawn_player_worker<E>(
    engine: E,
    command_rx: Receiver<PlayerCommand>,
    event_tx: Sender<AppEvent>,
    poll_interval: Duration,
) -> JoinHandle<()>
where
    E: PlaybackEngine + Send + 'static,
{
    thread::spawn(move || {
        let observer = event_tx.clone();
        let mut coordinator = Coordinator::new(engine, observer, poll_interval);

        player_worker(&mut coordinator, &command_rx, &event_tx);

        coordinator.shutdown();
        info!("player worker stopped");
    })
}

/// The primary execution loop for the player.
///
/// Runs until a [`PlayerCommand::Shutdown`] arrives or every sender has gone.
fn player_worker<E, O>(
    coordinator: &mut Coordinator<E, O>,
    command_rx: &Receiver<PlayerCommand>,
    event_tx: &Sender<AppEvent>,
) where
    E: PlaybackEngine,
    O: PlaybackObserver,
{
    loop {
        let command = match coordinator.poll_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match command_rx.recv_timeout(timeout) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }
            None => match command_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => return,
            },
        };

        if let Some(command) = command {
            if matches!(command, PlayerCommand::Shutdown) {
                debug!("player shutdown requested");
                return;
            }

            if let Err(e) = process_command(coordinator, command) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
            debug!(state = ?coordinator.state(), "player command processed");
        }

        coordinator.poll_tick(Instant::now());
    }
}

fn process_command<E, O>(
    coordinator: &mut Coordinator<E, O>,
    command: PlayerCommand,
) -> Result<(), PlaybackError>
where
    E: PlaybackEngine,
    O: PlaybackObserver,
{
    match command {
        PlayerCommand::Toggle(track) => coordinator.toggle(&track),
        PlayerCommand::Stop => {
            coordinator.stop();
            Ok(())
        }
        PlayerCommand::Signal(session, signal) => coordinator.on_signal(session, signal),
        PlayerCommand::Shutdown => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{coordinator::PlaybackSnapshot, testing::FakeEngine};
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(5);

    fn next_snapshot(
        event_rx: &Receiver<AppEvent>,
        accept: impl Fn(&PlaybackSnapshot) -> bool,
    ) -> PlaybackSnapshot {
        let deadline = Instant::now() + WAIT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match event_rx.recv_timeout(remaining) {
                Ok(AppEvent::PlaybackChanged(snapshot)) if accept(&snapshot) => return snapshot,
                Ok(_) => continue,
                Err(e) => panic!("no matching snapshot: {e}"),
            }
        }
    }

    #[test]
    fn worker_polls_progress_until_paused() {
        let engine = FakeEngine::default();
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = spawn_player_worker(
            engine.clone(),
            command_rx,
            event_tx,
            Duration::from_millis(5),
        );

        let track = Track::new("a", "A", "Artist", "https://preview/a");
        engine.set_clock(4_000, 8_000);
        command_tx.send(PlayerCommand::Toggle(track.clone())).unwrap();
        command_tx
            .send(PlayerCommand::Signal(SessionId(1), PrimitiveSignal::Ready))
            .unwrap();

        let playing = next_snapshot(&event_rx, |s| s.progress_of("a") == 0.5);
        assert!(playing.is_playing("a"));

        command_tx.send(PlayerCommand::Toggle(track)).unwrap();
        let paused = next_snapshot(&event_rx, |s| s.playing_id.is_none());
        assert_eq!(paused.progress_of("a"), 0.5);

        command_tx.send(PlayerCommand::Shutdown).unwrap();
        worker.join().unwrap();

        assert_eq!(engine.count("release"), 1);
    }

    #[test]
    fn playback_errors_reach_the_status_line() {
        let engine = FakeEngine::default();
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = spawn_player_worker(engine, command_rx, event_tx, Duration::from_millis(5));

        command_tx
            .send(PlayerCommand::Toggle(Track::new("x", "X", "Artist", "")))
            .unwrap();
        drop(command_tx);

        let message = loop {
            match event_rx.recv_timeout(WAIT) {
                Ok(AppEvent::Error(message)) => break message,
                Ok(_) => continue,
                Err(e) => panic!("no error reported: {e}"),
            }
        };
        assert_eq!(message, PlaybackError::NoPlayableSource.to_string());

        worker.join().unwrap();
    }
}
