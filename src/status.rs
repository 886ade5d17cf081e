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

//! The transient message shown on the status line.
//!
//! Messages expire after a fixed time to live, checked on every tick. A new
//! message always replaces the old one.

use std::time::{Duration, Instant};

const MESSAGE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StatusMessage {
    pub(crate) kind: StatusKind,
    pub(crate) text: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct StatusLine {
    message: Option<StatusMessage>,
}

impl StatusLine {
    pub(crate) fn info(&mut self, text: impl Into<String>, now: Instant) {
        self.set(StatusKind::Info, text.into(), now);
    }

    pub(crate) fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.set(StatusKind::Error, text.into(), now);
    }

    pub(crate) fn current(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Drops the message once its time to live has passed.
    pub(crate) fn expire(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| now >= m.expires_at) {
            self.message = None;
        }
    }

    fn set(&mut self, kind: StatusKind, text: String, now: Instant) {
        self.message = Some(StatusMessage {
            kind,
            text,
            expires_at: now + MESSAGE_TTL,
        });
    }
}
