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

//! Instrumented engine and observer for playback tests.

use std::sync::{Arc, Mutex};

use crate::{
    error::PlaybackError,
    player::{
        coordinator::{PlaybackObserver, PlaybackSnapshot},
        primitive::{PlaybackEngine, Primitive, SessionId},
    },
};

#[derive(Default)]
struct EngineLog {
    calls: Vec<String>,
    position_ms: u64,
    duration_ms: u64,
    refuse_next_open: bool,
}

/// Records every engine and primitive call, in order, as `"<call> #<session>"`.
#[derive(Clone, Default)]
pub(crate) struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl FakeEngine {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        let prefix = format!("{call} ");
        self.calls().iter().filter(|c| c.starts_with(&prefix)).count()
    }

    pub(crate) fn set_clock(&self, position_ms: u64, duration_ms: u64) {
        let mut log = self.log.lock().unwrap();
        log.position_ms = position_ms;
        log.duration_ms = duration_ms;
    }

    pub(crate) fn refuse_next_open(&self) {
        self.log.lock().unwrap().refuse_next_open = true;
    }
}

impl PlaybackEngine for FakeEngine {
    fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Primitive>, PlaybackError> {
        let mut log = self.log.lock().unwrap();
        log.calls.push(format!("open {session} {url}"));

        if std::mem::take(&mut log.refuse_next_open) {
            return Err(PlaybackError::PlaybackSourceError("refused".into()));
        }

        Ok(Box::new(FakePrimitive {
            session,
            log: Arc::clone(&self.log),
        }))
    }
}

struct FakePrimitive {
    session: SessionId,
    log: Arc<Mutex<EngineLog>>,
}

impl FakePrimitive {
    fn record(&self, call: &str) {
        self.log
            .lock()
            .unwrap()
            .calls
            .push(format!("{call} {}", self.session));
    }
}

impl Primitive for FakePrimitive {
    fn start(&mut self) -> Result<(), PlaybackError> {
        self.record("start");
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.record("pause");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.record("stop");
        Ok(())
    }

    fn release(self: Box<Self>) {
        self.record("release");
    }

    fn position_ms(&self) -> u64 {
        self.log.lock().unwrap().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.log.lock().unwrap().duration_ms
    }
}

/// Keeps every snapshot it is handed.
#[derive(Clone, Default)]
pub(crate) struct RecordingObserver {
    snapshots: Arc<Mutex<Vec<PlaybackSnapshot>>>,
}

impl RecordingObserver {
    pub(crate) fn count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub(crate) fn latest(&self) -> Option<PlaybackSnapshot> {
        self.snapshots.lock().unwrap().last().cloned()
    }
}

impl PlaybackObserver for RecordingObserver {
    fn on_playback_changed(&self, snapshot: &PlaybackSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }
}
