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

/// Renders a progress fraction as a fixed-width text bar.
///
/// The fraction is clamped to `[0, 1]`; the bar is always exactly `width`
/// characters wide.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(progress_bar(0.5, 4), "██░░");
/// ```
pub(crate) fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n('\u{2588}', filled));
    bar.extend(std::iter::repeat_n('\u{2591}', width - filled));
    bar
}

/// Formats a progress fraction as a whole percentage, e.g. `42%`.
pub(crate) fn format_percent(fraction: f32) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32)
}
