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

//! Visual styling and colour configuration for the TUI.
//!
//! This module defines the application's colour palette and provides utilities
//! for converting colours between Ratatui's internal representation and
//! external formats (such as hexadecimal strings) used for terminal emulator
//! styling.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) gauge_track_colour: Color,
    pub(crate) input_colour: Color,
    pub(crate) error_colour: Color,

    pub(crate) table_artist_fg: Color,
    pub(crate) table_track_fg: Color,
    pub(crate) table_saved_fg: Color,
    pub(crate) table_muted_fg: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(20, 28, 36),
            accent_colour: Color::Rgb(30, 215, 96),
            border_colour: Color::Rgb(102, 102, 102),
            gauge_track_colour: Color::Rgb(40, 52, 64),
            input_colour: Color::Rgb(255, 255, 255),
            error_colour: Color::Rgb(239, 83, 80),

            table_artist_fg: Color::Rgb(179, 157, 219),
            table_track_fg: Color::Rgb(255, 255, 255),
            table_saved_fg: Color::Rgb(236, 64, 122),
            table_muted_fg: Color::Rgb(162, 161, 166),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string, used to set the terminal emulator's background colour.
    ///
    /// Returns `None` for anything other than a [`Color::Rgb`].
    pub(crate) fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}
