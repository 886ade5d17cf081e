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

//! Render the status line.

use ratatui::{Frame, layout::Rect, style::Style, widgets::Paragraph};

use crate::{App, status::StatusKind};

pub(crate) fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let Some(message) = app.status.current() else {
        let hint = "/ search  1 results  2 library  enter play/pause  x stop  s save  q quit";
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(app.theme.table_muted_fg)),
            area,
        );
        return;
    };

    let colour = match message.kind {
        StatusKind::Info => app.theme.accent_colour,
        StatusKind::Error => app.theme.error_colour,
    };

    f.render_widget(
        Paragraph::new(message.text.as_str()).style(Style::default().fg(colour)),
        area,
    );
}
