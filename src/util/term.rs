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

//! OSC escape sequences for the terminal emulator's background colour.
//!
//! Support depends on the emulator; XTerm, iTerm2, Alacritty and Kitty all
//! understand OSC 11 and OSC 111. Unsupported terminals ignore them.

use std::io::{self, Write};

/// Paints the whole terminal window with `hex_colour` (e.g. `"#141c24"`).
///
/// Without this the area outside the TUI's own widgets keeps the user's
/// default background and shows as a thin outline.
pub(crate) fn set_terminal_bg(hex_colour: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]11;{}\x07", hex_colour)?;
    stdout.flush()
}

/// Reverts the background to the user's configured colour. Best-effort.
pub(crate) fn reset_terminal_bg() {
    let mut stdout = io::stdout();
    let _ = write!(stdout, "\x1b]111\x07");
    let _ = stdout.flush();
}
