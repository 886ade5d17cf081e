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

//! Typed errors for playback and the remote catalog.
//!
//! Everything above these layers (tasks, events, the main loop) works with
//! [`anyhow::Result`] and converts into these where a caller needs to match on
//! the failure.

use thiserror::Error;

/// Failures raised by the playback coordinator.
///
/// None of these are fatal: the coordinator logs them and returns to idle.
#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum PlaybackError {
    /// The track has no preview URL to hand to the audio engine.
    #[error("track has no playable preview")]
    NoPlayableSource,

    /// The audio engine could not load or start the source.
    #[error("failed to load playback source: {0}")]
    PlaybackSourceError(String),

    /// The audio engine reported an error after playback had started.
    #[error("playback failed: {0}")]
    PrimitiveRuntimeError(String),
}

/// Failures talking to the remote track catalog or its token endpoint.
#[derive(Error, Debug)]
pub(crate) enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog request failed (status {code}): {message}")]
    Status { code: u16, message: String },

    #[error("catalog client credentials are not configured")]
    MissingCredentials,

    #[error("unexpected catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    pub(crate) fn from_status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }
}
