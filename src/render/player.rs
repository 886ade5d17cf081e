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

//! Render the now-playing panel.
//!
//! Shows the most recently toggled track, whether it is playing, and how far
//! it has been played.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util::format::format_percent,
};

/// Draws the now-playing line and its progress gauge, or a placeholder when
/// nothing has been played yet.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner_area);

    let Some(track) = &app.now_playing else {
        f.render_widget(
            Paragraph::new("Nothing playing").fg(app.theme.table_muted_fg),
            chunks[0],
        );
        return;
    };

    let progress = app.playback.progress_of(&track.id);

    let icon = if app.playback.is_playing(&track.id) {
        ICON_PLAY
    } else if progress >= 1.0 {
        ICON_STOP
    } else {
        ICON_PAUSE
    };

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(chunks[0]);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let track_line = Line::from(vec![
        Span::styled(format!(" {icon} "), bold.fg(Color::White)),
        Span::styled(track.title.as_str(), bold.fg(app.theme.accent_colour)),
        Span::raw(" by "),
        Span::styled(track.artist.as_str(), bold.fg(app.theme.table_artist_fg)),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    f.render_widget(
        Paragraph::new(format_percent(progress))
            .alignment(Alignment::Right)
            .fg(Color::White),
        info_chunks[1],
    );

    let gauge_style = Style::default()
        .fg(app.theme.accent_colour)
        .bg(app.theme.gauge_track_colour);

    f.render_widget(
        Gauge::default()
            .gauge_style(gauge_style)
            .ratio(f64::from(progress).clamp(0.0, 1.0))
            .label("")
            .use_unicode(true),
        chunks[1],
    );
}
