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

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::{
    components::{TrackRowContext, TrackTableState},
    render::icons::{ICON_NO_PREVIEW, ICON_PAUSE, ICON_PLAY, ICON_SAVED},
    util::format::{format_percent, progress_bar},
};

const PROGRESS_BAR_WIDTH: usize = 20;

impl TrackTableState {
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, ctx: &TrackRowContext) {
        let theme = ctx.theme;

        let rows = self.tracks.iter().map(|track| {
            let playing = ctx.playback.is_playing(&track.id);
            let progress = ctx.playback.progress_of(&track.id);

            // The icon shows what toggling the row would do.
            let state_icon = if playing {
                Line::from(ICON_PAUSE).style(Style::default().fg(theme.accent_colour))
            } else if track.has_preview() {
                Line::from(ICON_PLAY).style(Style::default().fg(theme.table_muted_fg))
            } else {
                Line::from(ICON_NO_PREVIEW).style(Style::default().fg(theme.table_muted_fg))
            };

            let saved = if ctx.saved_ids.contains(&track.id) {
                Line::from(ICON_SAVED).style(Style::default().fg(theme.table_saved_fg))
            } else {
                Line::from("")
            };

            let progress_fg = if playing {
                theme.accent_colour
            } else {
                theme.table_muted_fg
            };

            Row::new(vec![
                Cell::from(state_icon),
                Cell::from(saved),
                Cell::from(
                    Line::from(track.title.as_str()).style(Style::default().fg(theme.table_track_fg)),
                ),
                Cell::from(
                    Line::from(track.artist.as_str())
                        .style(Style::default().fg(theme.table_artist_fg)),
                ),
                Cell::from(
                    Line::from(progress_bar(progress, PROGRESS_BAR_WIDTH))
                        .style(Style::default().fg(progress_fg)),
                ),
                Cell::from(
                    Line::from(format_percent(progress))
                        .style(Style::default().fg(theme.table_muted_fg))
                        .alignment(Alignment::Right),
                ),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Percentage(45),
                Constraint::Percentage(30),
                Constraint::Length(PROGRESS_BAR_WIDTH as u16),
                Constraint::Length(5),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(""),
                Cell::from("Title"),
                Cell::from("Artist"),
                Cell::from("Progress"),
                Cell::from(Line::from("").alignment(Alignment::Right)),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border_colour))
                .title(format!(" {} ({}) ", self.title, self.tracks.len())),
        );

        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}
