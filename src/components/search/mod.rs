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

//! Search bar input logic and state management.
//!
//! This module implements a single-line text input that, once focused with
//! `/`, captures every key until the query is submitted with Enter or the
//! user leaves with Esc. Submitting dispatches an application event carrying
//! the trimmed query; it does not run the search itself.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::events::AppEvent;

pub(crate) struct SearchBar {
    active: bool,
    pub(crate) input: Input,
}

impl SearchBar {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Returns `true` if the event was consumed by the search bar.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char('/') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => self.active = false,

            KeyCode::Enter => {
                let query = self.input.value().trim();
                if !query.is_empty() {
                    event_tx.send(AppEvent::SubmitSearch(query.to_string()))?;
                    self.active = false;
                }
            }

            // Delegate everything else to the managed input component.
            _ => {
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(bar: &mut SearchBar, text: &str, tx: &Sender<AppEvent>) {
        for c in text.chars() {
            bar.handle_event(&key(KeyCode::Char(c)), tx).unwrap();
        }
    }

    #[test]
    fn inactive_bar_ignores_keys_until_slash() {
        let (tx, _rx) = mpsc::channel();
        let mut bar = SearchBar::new();

        assert!(!bar.handle_event(&key(KeyCode::Char('q')), &tx).unwrap());
        assert!(!bar.active());

        assert!(bar.handle_event(&key(KeyCode::Char('/')), &tx).unwrap());
        assert!(bar.active());
    }

    #[test]
    fn enter_submits_the_trimmed_query() {
        let (tx, rx) = mpsc::channel();
        let mut bar = SearchBar::new();

        bar.handle_event(&key(KeyCode::Char('/')), &tx).unwrap();
        type_text(&mut bar, "  daft punk ", &tx);
        bar.handle_event(&key(KeyCode::Enter), &tx).unwrap();

        match rx.try_recv() {
            Ok(AppEvent::SubmitSearch(query)) => assert_eq!(query, "daft punk"),
            other => panic!("expected a search submission, got {other:?}"),
        }
        assert!(!bar.active());
        assert_eq!(bar.input.value(), "  daft punk ");
    }

    #[test]
    fn blank_query_is_not_submitted() {
        let (tx, rx) = mpsc::channel();
        let mut bar = SearchBar::new();

        bar.handle_event(&key(KeyCode::Char('/')), &tx).unwrap();
        type_text(&mut bar, "   ", &tx);
        bar.handle_event(&key(KeyCode::Enter), &tx).unwrap();

        assert!(rx.try_recv().is_err());
        assert!(bar.active());
    }

    #[test]
    fn escape_leaves_without_submitting() {
        let (tx, rx) = mpsc::channel();
        let mut bar = SearchBar::new();

        bar.handle_event(&key(KeyCode::Char('/')), &tx).unwrap();
        type_text(&mut bar, "q", &tx);
        bar.handle_event(&key(KeyCode::Esc), &tx).unwrap();

        assert!(!bar.active());
        assert!(rx.try_recv().is_err());
        assert_eq!(bar.input.value(), "q");
    }
}
