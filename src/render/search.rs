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

//! Render the search bar.
//!
//! This module renders the current query text and, while the search bar has
//! focus, the cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::App;

pub(crate) fn draw_search_bar(f: &mut Frame, area: Rect, app: &App) {
    let search_bar = &app.search_bar;

    let border_colour = if search_bar.active() {
        app.theme.accent_colour
    } else {
        app.theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1))
        .title(" Search (/) ");

    let inner = block.inner(area);

    f.render_widget(
        Paragraph::new(search_bar.input.value())
            .style(Style::default().fg(app.theme.input_colour))
            .block(block),
        area,
    );

    if search_bar.active() {
        let cursor_x = inner.x + search_bar.input.cursor() as u16;
        let cursor_y = inner.y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
