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

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};

use crate::{App, MainView, events::AppEvent};

use super::handlers::{handle_stop, handle_track_table_action};

/// Maps keyboard input to application actions and playback commands.
///
/// The search bar sees every key first; while it has focus it consumes all
/// of them. Otherwise the visible track table gets a chance to act on the
/// highlighted track before the global keys are checked.
///
/// # Errors
///
/// Returns an error if a command fails to send to a background worker.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);

    if app.search_bar.handle_event(&event, &app.event_tx)? {
        return Ok(());
    }

    let table = match app.main_view {
        MainView::Results => &mut app.results,
        MainView::Library => &mut app.library,
    };
    if let Some(action) = table.process_event(&event) {
        return handle_track_table_action(app, action);
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        KeyCode::Char('1') => app.event_tx.send(AppEvent::SetMainView(MainView::Results))?,
        KeyCode::Char('2') => app.event_tx.send(AppEvent::SetMainView(MainView::Library))?,

        KeyCode::Char('x') => handle_stop(app)?,

        _ => {}
    }

    Ok(())
}
