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

//! MPV-backed playback engine.
//!
//! Each session gets its own `libmpv` context running on a dedicated thread.
//! The thread alternates between draining commands from its
//! [`MpvPrimitive`] handle and waiting briefly for MPV events, much like the
//! player worker it reports to.
//!
//! # Architecture
//!
//! The session thread communicates over two paths:
//! 1. **Command Channel**: receives [`SessionCommand`]s from the
//!    [`MpvPrimitive`] owned by the coordinator.
//! 2. **Signal Channel**: posts [`PrimitiveSignal`]s, tagged with the session
//!    id, back to the player worker as [`PlayerCommand::Signal`].
//!
//! Position and duration are observed as MPV properties and kept in a shared
//! [`PlaybackClock`] so the coordinator can sample them without a round trip.

use std::{
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, warn};

use crate::{
    error::PlaybackError,
    player::{
        commands::PlayerCommand,
        primitive::{PlaybackEngine, Primitive, PrimitiveSignal, SessionId},
    },
};

/// Seconds to wait for an MPV event before checking for commands again.
const EVENT_WAIT_SECS: f64 = 0.05;

#[derive(Debug)]
enum SessionCommand {
    Start,
    Pause,
    Stop,
    Release,
}

#[derive(Debug, Default, Clone, Copy)]
struct PlaybackClock {
    position_ms: u64,
    duration_ms: u64,
}

type SharedClock = Arc<Mutex<PlaybackClock>>;

/// Opens MPV sessions and routes their signals to the player worker.
pub(crate) struct MpvEngine {
    signal_tx: Sender<PlayerCommand>,
}

impl MpvEngine {
    pub(crate) fn new(signal_tx: Sender<PlayerCommand>) -> Self {
        Self { signal_tx }
    }
}

impl PlaybackEngine for MpvEngine {
    fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Primitive>, PlaybackError> {
        let (command_tx, command_rx) = mpsc::channel::<SessionCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), String>>();

        let clock: SharedClock = Arc::default();
        let thread_clock = Arc::clone(&clock);
        let signal_tx = self.signal_tx.clone();
        let url = url.to_string();

        let handle = thread::Builder::new()
            .name(format!("mpv-session-{}", session.0))
            .spawn(move || {
                let mut handler = match open_source(&url) {
                    Ok(handler) => {
                        let _ = init_tx.send(Ok(()));
                        handler
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                };

                let mut reporter = SignalReporter {
                    session,
                    signal_tx,
                    loaded: false,
                };

                if let Err(e) = session_worker(&mut handler, &command_rx, &thread_clock, &mut reporter) {
                    reporter.failed(format!("{:#}", e));
                }
            })
            .map_err(|e| PlaybackError::PlaybackSourceError(e.to_string()))?;

        match init_rx.recv() {
            Ok(Ok(())) => Ok(Box::new(MpvPrimitive {
                session,
                command_tx,
                clock,
                thread: Some(handle),
            })),
            Ok(Err(message)) => Err(PlaybackError::PlaybackSourceError(message)),
            Err(_) => Err(PlaybackError::PlaybackSourceError(
                "MPV session thread exited during start-up".to_string(),
            )),
        }
    }
}

/// Creates an MPV context with no video output and starts loading `url`
/// paused, so nothing is heard until the coordinator starts it.
fn open_source(url: &str) -> Result<mpv::MpvHandler> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    handler
        .set_property("pause", true)
        .context("Failed to pause before loading")?;
    handler
        .command(&["loadfile", url, "replace"])
        .with_context(|| format!("Failed to load source: {}", url))?;

    Ok(handler)
}

struct SignalReporter {
    session: SessionId,
    signal_tx: Sender<PlayerCommand>,
    loaded: bool,
}

impl SignalReporter {
    fn send(&self, signal: PrimitiveSignal) {
        // The worker is gone only when the application is exiting.
        let _ = self
            .signal_tx
            .send(PlayerCommand::Signal(self.session, signal));
    }

    fn failed(&self, message: String) {
        if self.loaded {
            self.send(PrimitiveSignal::RuntimeError(message));
        } else {
            self.send(PrimitiveSignal::LoadError(message));
        }
    }
}

/// The execution loop for one session.
///
/// Returns when the primitive is released or dropped.
///
/// # Errors
///
/// Returns an error if MPV rejects a command; the caller reports it as a
/// signal.
fn session_worker(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<SessionCommand>,
    clock: &SharedClock,
    reporter: &mut SignalReporter,
) -> Result<()> {
    loop {
        if !process_commands(handler, command_rx)? {
            debug!(session = %reporter.session, "MPV session released");
            return Ok(());
        }
        process_mpv_events(handler, clock, reporter);
    }
}

/// Drains and executes all pending commands. Returns `false` once the session
/// should end.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<SessionCommand>,
) -> Result<bool> {
    loop {
        match command_rx.try_recv() {
            Ok(SessionCommand::Start) => handler
                .set_property("pause", false)
                .context("Failed to start playback")?,
            Ok(SessionCommand::Pause) => handler
                .set_property("pause", true)
                .context("Failed to pause playback")?,
            Ok(SessionCommand::Stop) => handler.command(&["stop"]).context("Failed to stop")?,
            Ok(SessionCommand::Release) | Err(TryRecvError::Disconnected) => return Ok(false),
            Err(TryRecvError::Empty) => return Ok(true),
        }
    }
}

/// Waits briefly for one MPV event and translates it.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    clock: &SharedClock,
    reporter: &mut SignalReporter,
) {
    let Some(mpv_event) = handler.wait_event(EVENT_WAIT_SECS) else {
        return;
    };

    match mpv_event {
        mpv::Event::FileLoaded => {
            reporter.loaded = true;
            reporter.send(PrimitiveSignal::Ready);
        }
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(seconds)) if seconds >= 0.0 => {
                if let Ok(mut clock) = clock.lock() {
                    clock.duration_ms = (seconds * 1000.0) as u64;
                }
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                if let Ok(mut clock) = clock.lock() {
                    clock.position_ms = (seconds * 1000.0) as u64;
                }
            }
            _ => {}
        },
        mpv::Event::EndFile(result) => match result {
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => {
                reporter.send(PrimitiveSignal::Completed);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(session = %reporter.session, "MPV ended with error: {:?}", e);
                reporter.failed(format!("{:?}", e));
            }
        },
        _ => {}
    }
}

/// Handle to one MPV session, owned by the coordinator.
struct MpvPrimitive {
    session: SessionId,
    command_tx: Sender<SessionCommand>,
    clock: SharedClock,
    thread: Option<JoinHandle<()>>,
}

impl MpvPrimitive {
    fn send(&self, command: SessionCommand) -> Result<(), PlaybackError> {
        self.command_tx.send(command).map_err(|_| {
            PlaybackError::PrimitiveRuntimeError(format!(
                "MPV session {} is no longer running",
                self.session
            ))
        })
    }

    fn read_clock(&self) -> PlaybackClock {
        self.clock.lock().map(|c| *c).unwrap_or_default()
    }
}

impl Primitive for MpvPrimitive {
    fn start(&mut self) -> Result<(), PlaybackError> {
        self.send(SessionCommand::Start)
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.send(SessionCommand::Pause)
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.send(SessionCommand::Stop)
    }

    fn release(mut self: Box<Self>) {
        let _ = self.command_tx.send(SessionCommand::Release);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!(session = %self.session, "MPV session thread panicked");
            }
        }
    }

    fn position_ms(&self) -> u64 {
        self.read_clock().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.read_clock().duration_ms
    }
}
