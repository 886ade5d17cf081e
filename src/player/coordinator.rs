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

//! Playback/progress coordination.
//!
//! The [`Coordinator`] owns at most one playback session at a time and is the
//! only writer of the published [`PlaybackSnapshot`]: which track is playing,
//! and how far each track has been played.
//!
//! # Sessions
//!
//! Every call to [`Coordinator::play`] that loads a source starts a new
//! session with a fresh [`SessionId`]. The previous session is always stopped
//! and released first. Engine signals carry the session they were raised for,
//! and anything addressed to a session other than the current one is dropped.
//!
//! # Progress
//!
//! Entering `Playing` starts a progress poll bound to that session and track.
//! Each [`Coordinator::poll_tick`] re-checks the poll's guard (same session,
//! same published track, still playing) before sampling, so pausing,
//! stopping, switching tracks or completion all end the poll at its next
//! iteration. Progress entries are never removed; a stopped track keeps its
//! last sampled value and a completed one is pinned to `1.0`.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    error::PlaybackError,
    model::Track,
    player::primitive::{PlaybackEngine, Primitive, PrimitiveSignal, SessionId},
};

pub(crate) type ProgressMap = HashMap<String, f32>;

/// The externally visible playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PlaybackSnapshot {
    pub(crate) playing_id: Option<String>,
    pub(crate) progress: ProgressMap,
}

impl PlaybackSnapshot {
    pub(crate) fn is_playing(&self, track_id: &str) -> bool {
        self.playing_id.as_deref() == Some(track_id)
    }

    pub(crate) fn progress_of(&self, track_id: &str) -> f32 {
        self.progress.get(track_id).copied().unwrap_or(0.0)
    }
}

/// Receives every published [`PlaybackSnapshot`].
///
/// Observers only ever need the latest snapshot; intermediate ones may be
/// coalesced or skipped.
pub(crate) trait PlaybackObserver {
    fn on_playback_changed(&self, snapshot: &PlaybackSnapshot);
}

/// Coordinator lifecycle state.
///
/// Stopping is immediate, so there is no separate stopped state: teardown
/// goes straight back to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerState {
    Idle,
    Loading,
    Playing,
    Paused,
}

struct Session {
    id: SessionId,
    track_id: String,
    url: String,
    primitive: Box<dyn Primitive>,
}

struct ProgressPoll {
    session: SessionId,
    track_id: String,
    next_sample: Instant,
}

/// Converts a position and duration into a fraction in `[0, 1]`.
///
/// An unknown (zero) duration reports no progress rather than dividing by
/// zero.
pub(crate) fn progress_fraction(position_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 0.0;
    }

    (position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0) as f32
}

pub(crate) struct Coordinator<E, O> {
    engine: E,
    observer: O,
    state: PlayerState,
    session: Option<Session>,
    last_session: u64,
    published: PlaybackSnapshot,
    poll: Option<ProgressPoll>,
    poll_interval: Duration,
}

impl<E: PlaybackEngine, O: PlaybackObserver> Coordinator<E, O> {
    pub(crate) fn new(engine: E, observer: O, poll_interval: Duration) -> Self {
        Self {
            engine,
            observer,
            state: PlayerState::Idle,
            session: None,
            last_session: 0,
            published: PlaybackSnapshot::default(),
            poll: None,
            poll_interval,
        }
    }

    pub(crate) fn state(&self) -> PlayerState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> &PlaybackSnapshot {
        &self.published
    }

    /// The session currently owned by the coordinator, if any.
    pub(crate) fn current_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Starts playing `track`.
    ///
    /// Does nothing if `track` is already loading, playing or paused.
    /// Otherwise any existing session is torn down and a new one begins in
    /// `Loading`; playback starts when the engine signals readiness.
    ///
    /// # Errors
    ///
    /// * [`PlaybackError::NoPlayableSource`] - the track has no preview URL.
    ///   Nothing changes.
    /// * [`PlaybackError::PlaybackSourceError`] - the engine refused the
    ///   source. The coordinator is left `Idle`.
    pub(crate) fn play(&mut self, track: &Track) -> Result<(), PlaybackError> {
        if !track.has_preview() {
            warn!(id = %track.id, title = %track.title, "no playable preview");
            return Err(PlaybackError::NoPlayableSource);
        }

        if let Some(session) = &self.session {
            if session.track_id == track.id && self.state != PlayerState::Idle {
                debug!(id = %track.id, state = ?self.state, "already the current track");
                return Ok(());
            }
        }

        if self.teardown() {
            self.publish();
        }

        self.last_session += 1;
        let id = SessionId(self.last_session);

        info!(session = %id, id = %track.id, url = %track.preview_url, "loading track");

        match self.engine.open(id, &track.preview_url) {
            Ok(primitive) => {
                self.session = Some(Session {
                    id,
                    track_id: track.id.clone(),
                    url: track.preview_url.clone(),
                    primitive,
                });
                self.state = PlayerState::Loading;
                Ok(())
            }
            Err(e) => {
                warn!(session = %id, "failed to open source: {}", e);
                self.state = PlayerState::Idle;
                Err(e)
            }
        }
    }

    /// Pauses the playing track. Does nothing unless `Playing`.
    pub(crate) fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlayerState::Playing {
            return Ok(());
        }

        let result = match self.session.as_mut() {
            Some(session) => session.primitive.pause(),
            None => Ok(()),
        };
        if let Err(e) = result {
            return Err(self.fail(e));
        }

        self.state = PlayerState::Paused;
        self.published.playing_id = None;
        self.publish();

        debug!(session = ?self.current_session(), "paused");

        Ok(())
    }

    /// Resumes the paused track under its existing session. Does nothing
    /// unless `Paused`.
    pub(crate) fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlayerState::Paused {
            return Ok(());
        }

        self.begin_playing()
    }

    /// Pauses `track` if it is playing, resumes it if it is paused, and plays
    /// it otherwise.
    pub(crate) fn toggle(&mut self, track: &Track) -> Result<(), PlaybackError> {
        let is_current = self
            .session
            .as_ref()
            .is_some_and(|s| s.track_id == track.id);

        match (is_current, self.state) {
            (true, PlayerState::Playing) => self.pause(),
            (true, PlayerState::Paused) => self.resume(),
            _ => self.play(track),
        }
    }

    /// Stops and releases the current session, if there is one.
    ///
    /// Calling this while `Idle` changes nothing and publishes nothing.
    pub(crate) fn stop(&mut self) {
        if self.teardown() {
            self.publish();
        }
    }

    /// Releases everything before the coordinator is dropped.
    pub(crate) fn shutdown(&mut self) {
        debug!("shutting down playback");
        self.stop();
    }

    /// Applies a signal raised by the engine for `session`.
    ///
    /// Signals for any session other than the current one are ignored.
    ///
    /// # Errors
    ///
    /// Returns the error the signal represents after the session has been
    /// torn down. The coordinator is always left in a consistent state.
    pub(crate) fn on_signal(
        &mut self,
        session: SessionId,
        signal: PrimitiveSignal,
    ) -> Result<(), PlaybackError> {
        let Some(track_id) = self
            .session
            .as_ref()
            .filter(|s| s.id == session)
            .map(|s| s.track_id.clone())
        else {
            debug!(%session, ?signal, "ignoring signal for stale session");
            return Ok(());
        };

        match signal {
            PrimitiveSignal::Ready => {
                if self.state != PlayerState::Loading {
                    debug!(%session, state = ?self.state, "ignoring repeated ready signal");
                    return Ok(());
                }
                self.begin_playing()
            }
            PrimitiveSignal::LoadError(message) => {
                let error = if self.state == PlayerState::Loading {
                    PlaybackError::PlaybackSourceError(message)
                } else {
                    PlaybackError::PrimitiveRuntimeError(message)
                };
                Err(self.fail(error))
            }
            PrimitiveSignal::Completed => {
                info!(%session, id = %track_id, "track finished");
                self.teardown();
                self.published.progress.insert(track_id, 1.0);
                self.publish();
                Ok(())
            }
            PrimitiveSignal::RuntimeError(message) => {
                Err(self.fail(PlaybackError::PrimitiveRuntimeError(message)))
            }
        }
    }

    /// When the progress poll next wants to run, if it is active.
    pub(crate) fn poll_deadline(&self) -> Option<Instant> {
        self.poll.as_ref().map(|p| p.next_sample)
    }

    /// Runs one iteration of the progress poll if it is due at `now`.
    ///
    /// The poll ends here, without sampling, once its session or track is no
    /// longer the one playing.
    pub(crate) fn poll_tick(&mut self, now: Instant) {
        let Some(poll) = self.poll.as_mut() else {
            return;
        };
        if now < poll.next_sample {
            return;
        }

        let session = self
            .session
            .as_ref()
            .filter(|s| s.id == poll.session && self.state == PlayerState::Playing)
            .filter(|_| self.published.is_playing(&poll.track_id));

        let Some(session) = session else {
            debug!(session = %poll.session, "progress poll finished");
            self.poll = None;
            return;
        };

        let position = session.primitive.position_ms();
        let duration = session.primitive.duration_ms();
        let fraction = progress_fraction(position, duration);

        self.published
            .progress
            .insert(poll.track_id.clone(), fraction);
        poll.next_sample = now + self.poll_interval;

        self.publish();
    }

    fn begin_playing(&mut self) -> Result<(), PlaybackError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        if let Err(e) = session.primitive.start() {
            return Err(self.fail(e));
        }

        let id = session.id;
        let track_id = session.track_id.clone();
        info!(session = %id, id = %track_id, url = %session.url, "playing");

        self.state = PlayerState::Playing;
        self.published.playing_id = Some(track_id.clone());
        self.poll = Some(ProgressPoll {
            session: id,
            track_id,
            next_sample: Instant::now(),
        });
        self.publish();

        Ok(())
    }

    /// Tears down after `error`, publishes the result and hands the error
    /// back for the caller to return.
    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        warn!(session = ?self.current_session(), "playback error: {}", error);
        if self.teardown() {
            self.publish();
        }
        error
    }

    /// Stops and releases the current session. Returns `false` if there was
    /// nothing to tear down.
    fn teardown(&mut self) -> bool {
        self.poll = None;

        let Some(mut session) = self.session.take() else {
            return false;
        };

        if let Err(e) = session.primitive.stop() {
            warn!(session = %session.id, "stop failed: {}", e);
        }
        session.primitive.release();

        debug!(session = %session.id, id = %session.track_id, "session released");

        self.state = PlayerState::Idle;
        self.published.playing_id = None;

        true
    }

    fn publish(&self) {
        self.observer.on_playback_changed(&self.published);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::{FakeEngine, RecordingObserver};

    fn track(id: &str) -> Track {
        Track::new(id, format!("Title {id}"), "Artist", format!("https://preview/{id}"))
    }

    fn coordinator() -> (Coordinator<FakeEngine, RecordingObserver>, FakeEngine, RecordingObserver) {
        let engine = FakeEngine::default();
        let observer = RecordingObserver::default();
        let coordinator = Coordinator::new(engine.clone(), observer.clone(), Duration::ZERO);
        (coordinator, engine, observer)
    }

    fn start(c: &mut Coordinator<FakeEngine, RecordingObserver>, t: &Track) -> SessionId {
        c.play(t).unwrap();
        let session = c.current_session().unwrap();
        c.on_signal(session, PrimitiveSignal::Ready).unwrap();
        session
    }

    #[test]
    fn track_without_preview_changes_nothing() {
        let (mut c, engine, observer) = coordinator();

        let err = c.play(&Track::new("x", "No Preview", "A", "")).unwrap_err();

        assert_eq!(err, PlaybackError::NoPlayableSource);
        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(engine.calls(), Vec::<String>::new());
        assert_eq!(observer.count(), 0);
    }

    #[test]
    fn track_without_preview_leaves_current_playback_alone() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");
        start(&mut c, &a);

        assert!(c.play(&Track::new("x", "t", "a", "")).is_err());

        assert_eq!(c.state(), PlayerState::Playing);
        assert!(c.snapshot().is_playing("a"));
        assert_eq!(engine.count("stop"), 0);
    }

    #[test]
    fn play_loads_then_plays_on_ready() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");

        c.play(&a).unwrap();
        assert_eq!(c.state(), PlayerState::Loading);
        assert_eq!(c.snapshot().playing_id, None);

        let session = c.current_session().unwrap();
        c.on_signal(session, PrimitiveSignal::Ready).unwrap();

        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(c.snapshot().playing_id.as_deref(), Some("a"));
        assert_eq!(
            engine.calls(),
            vec!["open #1 https://preview/a".to_string(), "start #1".to_string()]
        );
    }

    #[test]
    fn playing_the_current_track_again_is_a_noop() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");
        start(&mut c, &a);

        c.play(&a).unwrap();
        assert_eq!(c.state(), PlayerState::Playing);

        c.pause().unwrap();
        c.play(&a).unwrap();
        assert_eq!(c.state(), PlayerState::Paused);

        assert_eq!(engine.count("open"), 1);
        assert_eq!(engine.count("stop"), 0);
    }

    #[test]
    fn switching_tracks_releases_the_old_session_before_loading() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");
        let b = track("b");
        start(&mut c, &a);

        engine.set_clock(3_000, 30_000);
        c.poll_tick(Instant::now());
        assert_eq!(c.snapshot().progress_of("a"), 0.1);

        c.play(&b).unwrap();

        let calls = engine.calls();
        let stop = calls.iter().position(|c| c == "stop #1").unwrap();
        let release = calls.iter().position(|c| c == "release #1").unwrap();
        let open = calls
            .iter()
            .position(|c| c == "open #2 https://preview/b")
            .unwrap();
        assert!(stop < release && release < open);

        // The old track keeps its last sampled value.
        assert_eq!(c.snapshot().progress_of("a"), 0.1);
        assert_eq!(c.snapshot().playing_id, None);
    }

    #[test]
    fn stale_ready_after_stop_is_ignored() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");

        c.play(&a).unwrap();
        let session = c.current_session().unwrap();
        c.stop();
        c.on_signal(session, PrimitiveSignal::Ready).unwrap();

        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(c.snapshot().playing_id, None);
        assert_eq!(engine.count("start"), 0);
    }

    #[test]
    fn stale_ready_from_replaced_session_is_ignored() {
        let (mut c, engine, _) = coordinator();

        c.play(&track("a")).unwrap();
        let first = c.current_session().unwrap();
        c.play(&track("b")).unwrap();

        c.on_signal(first, PrimitiveSignal::Ready).unwrap();

        assert_eq!(c.state(), PlayerState::Loading);
        assert_eq!(engine.count("start"), 0);
    }

    #[test]
    fn stop_when_idle_publishes_nothing() {
        let (mut c, engine, observer) = coordinator();

        c.stop();
        c.stop();

        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(c.snapshot(), &PlaybackSnapshot::default());
        assert_eq!(observer.count(), 0);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn stop_releases_and_clears_playing_id() {
        let (mut c, engine, observer) = coordinator();
        start(&mut c, &track("a"));

        c.stop();

        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(c.current_session(), None);
        assert_eq!(observer.latest().unwrap().playing_id, None);
        assert_eq!(engine.count("release"), 1);
    }

    #[test]
    fn completion_pins_progress_to_one() {
        let (mut c, _engine, observer) = coordinator();
        let session = start(&mut c, &track("a"));

        c.poll_tick(Instant::now());
        assert_eq!(c.snapshot().progress_of("a"), 0.0);

        c.on_signal(session, PrimitiveSignal::Completed).unwrap();

        assert_eq!(c.snapshot().progress["a"], 1.0);
        assert_eq!(c.snapshot().playing_id, None);
        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(observer.latest().unwrap().progress["a"], 1.0);
    }

    #[test]
    fn pause_clears_playing_id_and_ends_the_poll() {
        let (mut c, engine, _) = coordinator();
        start(&mut c, &track("a"));
        engine.set_clock(1_000, 10_000);
        c.poll_tick(Instant::now());

        c.pause().unwrap();
        assert_eq!(c.state(), PlayerState::Paused);
        assert_eq!(c.snapshot().playing_id, None);

        engine.set_clock(5_000, 10_000);
        c.poll_tick(Instant::now());

        assert_eq!(c.poll_deadline(), None);
        assert_eq!(c.snapshot().progress_of("a"), 0.1);
    }

    #[test]
    fn pause_when_not_playing_is_a_noop() {
        let (mut c, engine, observer) = coordinator();

        c.pause().unwrap();
        c.play(&track("a")).unwrap();
        c.pause().unwrap();

        assert_eq!(c.state(), PlayerState::Loading);
        assert_eq!(engine.count("pause"), 0);
        assert_eq!(observer.count(), 0);
    }

    #[test]
    fn resume_restarts_polling_in_the_same_session() {
        let (mut c, engine, _) = coordinator();
        let a = track("a");
        let session = start(&mut c, &a);
        c.pause().unwrap();

        c.toggle(&a).unwrap();

        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(c.current_session(), Some(session));
        assert_eq!(engine.count("open"), 1);

        engine.set_clock(15_000, 30_000);
        c.poll_tick(Instant::now());
        assert_eq!(c.snapshot().progress_of("a"), 0.5);
    }

    #[test]
    fn toggle_pauses_the_playing_track_and_plays_others() {
        let (mut c, _engine, _) = coordinator();
        let a = track("a");
        start(&mut c, &a);

        c.toggle(&a).unwrap();
        assert_eq!(c.state(), PlayerState::Paused);

        c.toggle(&track("b")).unwrap();
        assert_eq!(c.state(), PlayerState::Loading);
        assert_eq!(c.current_session(), Some(SessionId(2)));
    }

    #[test]
    fn zero_duration_samples_as_no_progress() {
        let (mut c, engine, _) = coordinator();
        start(&mut c, &track("a"));

        engine.set_clock(750, 0);
        c.poll_tick(Instant::now());

        let progress = c.snapshot().progress_of("a");
        assert_eq!(progress, 0.0);
        assert!(progress.is_finite());
    }

    #[test]
    fn progress_fraction_is_clamped() {
        assert_eq!(progress_fraction(0, 0), 0.0);
        assert_eq!(progress_fraction(15_000, 30_000), 0.5);
        assert_eq!(progress_fraction(31_000, 30_000), 1.0);
    }

    #[test]
    fn poll_waits_for_its_interval() {
        let engine = FakeEngine::default();
        let observer = RecordingObserver::default();
        let mut c = Coordinator::new(engine.clone(), observer, Duration::from_secs(60));
        start(&mut c, &track("a"));

        let now = Instant::now();
        engine.set_clock(1_000, 10_000);
        c.poll_tick(now);
        assert_eq!(c.snapshot().progress_of("a"), 0.1);

        engine.set_clock(2_000, 10_000);
        c.poll_tick(now + Duration::from_secs(1));
        assert_eq!(c.snapshot().progress_of("a"), 0.1);

        c.poll_tick(now + Duration::from_secs(61));
        assert_eq!(c.snapshot().progress_of("a"), 0.2);
    }

    #[test]
    fn load_error_returns_to_idle() {
        let (mut c, engine, _) = coordinator();
        c.play(&track("a")).unwrap();
        let session = c.current_session().unwrap();

        let err = c
            .on_signal(session, PrimitiveSignal::LoadError("404".into()))
            .unwrap_err();

        assert_eq!(err, PlaybackError::PlaybackSourceError("404".into()));
        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(engine.count("release"), 1);
    }

    #[test]
    fn engine_refusing_the_source_leaves_idle() {
        let (mut c, engine, _) = coordinator();
        engine.refuse_next_open();

        let err = c.play(&track("a")).unwrap_err();

        assert!(matches!(err, PlaybackError::PlaybackSourceError(_)));
        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(c.current_session(), None);
    }

    #[test]
    fn runtime_error_tears_down_like_stop() {
        let (mut c, engine, _) = coordinator();
        let session = start(&mut c, &track("a"));
        engine.set_clock(2_000, 10_000);
        c.poll_tick(Instant::now());

        let err = c
            .on_signal(session, PrimitiveSignal::RuntimeError("device lost".into()))
            .unwrap_err();

        assert_eq!(err, PlaybackError::PrimitiveRuntimeError("device lost".into()));
        assert_eq!(c.state(), PlayerState::Idle);
        assert_eq!(c.snapshot().playing_id, None);
        assert_eq!(c.snapshot().progress_of("a"), 0.2);
        assert_eq!(engine.count("stop"), 1);
        assert_eq!(engine.count("release"), 1);
    }

    #[test]
    fn sessions_are_never_reused() {
        let (mut c, _engine, _) = coordinator();

        c.play(&track("a")).unwrap();
        let first = c.current_session().unwrap();
        c.stop();
        c.play(&track("a")).unwrap();
        let second = c.current_session().unwrap();

        assert!(second > first);
    }
}
