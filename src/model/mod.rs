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

//! Domain models.
//!
//! A [`Track`] is the one entity shared by the remote catalog, the local
//! store, the playback coordinator and the view.

/// A playable catalog item.
///
/// The identifier is the catalog's own track id, stable across search results
/// and the local store. An empty `preview_url` means the catalog offered no
/// preview clip for the track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Track {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) preview_url: String,
}

impl Track {
    pub(crate) fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        preview_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            preview_url: preview_url.into(),
        }
    }

    pub(crate) fn has_preview(&self) -> bool {
        !self.preview_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_preview_is_not_playable() {
        assert!(!Track::new("1", "a", "b", "").has_preview());
        assert!(!Track::new("1", "a", "b", "   ").has_preview());
        assert!(Track::new("1", "a", "b", "https://p.scdn.co/mp3-preview/x").has_preview());
    }
}
