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

//! The audio engine seen from the coordinator.
//!
//! A [`PlaybackEngine`] opens one [`Primitive`] per playback session. Opening
//! only starts loading the source: the engine later reports readiness,
//! completion and failures as [`PrimitiveSignal`]s tagged with the
//! [`SessionId`] they belong to, so signals from a session that has since been
//! torn down can be recognised and dropped.

use std::fmt;

use crate::error::PlaybackError;

/// Generation number identifying one playback session.
///
/// Session ids increase monotonically for the lifetime of a coordinator and
/// are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous notifications from an engine about one of its sessions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PrimitiveSignal {
    /// The source is loaded and playback can start.
    Ready,
    /// The source could not be loaded.
    LoadError(String),
    /// Playback reached the end of the source.
    Completed,
    /// Playback failed after it had started.
    RuntimeError(String),
}

/// A loaded audio source, exclusively owned by one session.
pub(crate) trait Primitive {
    fn start(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self) -> Result<(), PlaybackError>;

    fn stop(&mut self) -> Result<(), PlaybackError>;

    /// Returns the primitive's resources to the platform.
    fn release(self: Box<Self>);

    /// Current playback position in milliseconds.
    fn position_ms(&self) -> u64;

    /// Total duration in milliseconds, or zero while it is unknown.
    fn duration_ms(&self) -> u64;
}

pub(crate) trait PlaybackEngine {
    /// Begins loading `url` for `session`.
    ///
    /// Returns once loading has been requested; the outcome arrives later as
    /// [`PrimitiveSignal::Ready`] or [`PrimitiveSignal::LoadError`].
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::PlaybackSourceError`] if the load could not
    /// even be requested.
    fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Primitive>, PlaybackError>;
}
