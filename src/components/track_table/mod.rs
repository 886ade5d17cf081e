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

//! A navigable list of tracks.
//!
//! The table keeps its own cursor and reports what the user asked to do with
//! the highlighted track as a [`TrackTableAction`]; it never talks to the
//! player or the store itself.

mod event;
mod render;

use std::collections::HashSet;

use ratatui::widgets::TableState;

use crate::{model::Track, player::PlaybackSnapshot, theme::Theme};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TrackTableAction {
    TogglePlayback(Track),
    Save(Track),
}

/// What the table needs to know about the rest of the application to draw
/// its rows.
pub(crate) struct TrackRowContext<'a> {
    pub(crate) playback: &'a PlaybackSnapshot,
    pub(crate) saved_ids: &'a HashSet<String>,
    pub(crate) theme: &'a Theme,
}

pub(crate) struct TrackTableState {
    pub(crate) title: &'static str,
    pub(crate) tracks: Vec<Track>,
    pub(crate) table_state: TableState,
}

impl TrackTableState {
    pub(crate) fn new(title: &'static str) -> Self {
        Self {
            title,
            tracks: vec![],
            table_state: TableState::new(),
        }
    }

    /// Replaces the tracks, keeping the cursor on the same track if it is
    /// still present.
    pub(crate) fn set_tracks(&mut self, tracks: Vec<Track>) {
        let selected_id = self.selected_track().map(|t| t.id.clone());
        self.tracks = tracks;

        let index = selected_id
            .and_then(|id| self.tracks.iter().position(|t| t.id == id))
            .or(if self.tracks.is_empty() { None } else { Some(0) });
        self.table_state.select(index);
    }

    /// Replaces the track with the same identifier, or appends it.
    pub(crate) fn upsert(&mut self, track: Track) {
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => *existing = track,
            None => {
                self.tracks.push(track);
                if self.table_state.selected().is_none() {
                    self.table_state.select(Some(0));
                }
            }
        }
    }

    pub(crate) fn selected_track(&self) -> Option<&Track> {
        self.table_state.selected().and_then(|i| self.tracks.get(i))
    }

    fn goto_next(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        if !self.tracks.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn goto_last(&mut self) {
        if !self.tracks.is_empty() {
            self.table_state.select(Some(self.tracks.len() - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    fn track(id: &str) -> Track {
        Track::new(id, id.to_uppercase(), "Artist", format!("https://preview/{id}"))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn table(ids: &[&str]) -> TrackTableState {
        let mut table = TrackTableState::new("Test");
        table.set_tracks(ids.iter().map(|id| track(id)).collect());
        table
    }

    #[test]
    fn new_tracks_select_the_first_row() {
        let table = table(&["a", "b"]);
        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("a"));

        let empty = TrackTableState::new("Empty");
        assert!(empty.selected_track().is_none());
    }

    #[test]
    fn cursor_follows_the_selected_track_across_updates() {
        let mut table = table(&["a", "b", "c"]);
        table.process_event(&key(KeyCode::Down));
        table.process_event(&key(KeyCode::Down));

        table.set_tracks(vec![track("c"), track("a")]);

        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("c"));
    }

    #[test]
    fn navigation_wraps_around() {
        let mut table = table(&["a", "b", "c"]);

        table.process_event(&key(KeyCode::Char('k')));
        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("c"));

        table.process_event(&key(KeyCode::Char('j')));
        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("a"));

        table.process_event(&key(KeyCode::Char('G')));
        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("c"));

        table.process_event(&key(KeyCode::Char('g')));
        assert_eq!(table.selected_track().map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn enter_and_save_report_the_highlighted_track() {
        let mut table = table(&["a", "b"]);
        table.process_event(&key(KeyCode::Down));

        assert_eq!(
            table.process_event(&key(KeyCode::Enter)),
            Some(TrackTableAction::TogglePlayback(track("b")))
        );
        assert_eq!(
            table.process_event(&key(KeyCode::Char('s'))),
            Some(TrackTableAction::Save(track("b")))
        );
    }

    #[test]
    fn actions_on_an_empty_table_do_nothing() {
        let mut table = TrackTableState::new("Empty");
        assert_eq!(table.process_event(&key(KeyCode::Enter)), None);
        assert_eq!(table.process_event(&key(KeyCode::Char('p'))), None);
    }

    #[test]
    fn upsert_replaces_by_identifier() {
        let mut table = table(&["a"]);

        table.upsert(Track::new("a", "Renamed", "Artist", "https://preview/a2"));
        table.upsert(track("b"));

        assert_eq!(table.tracks.len(), 2);
        assert_eq!(table.tracks[0].title, "Renamed");
        assert_eq!(table.tracks[1].id, "b");
    }
}
