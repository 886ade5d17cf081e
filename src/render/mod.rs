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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed application event.

pub(crate) mod icons;
mod player;
mod search;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    App, MainView,
    components::TrackRowContext,
    render::{player::draw_player, search::draw_search_bar, status::draw_status},
};

/// Renders the user interface to the terminal frame.
///
/// The screen is split top to bottom into the search bar, the active track
/// list, the now-playing panel and a single status line.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(area);

    draw_search_bar(f, outer[0], app);

    let ctx = TrackRowContext {
        playback: &app.playback,
        saved_ids: &app.saved_ids,
        theme: &app.theme,
    };

    match app.main_view {
        MainView::Results => app.results.draw(f, outer[1], &ctx),
        MainView::Library => app.library.draw(f, outer[1], &ctx),
    }

    draw_player(f, outer[2], app);

    draw_status(f, outer[3], app);
}
