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

//! # Tracklet
//!
//! A terminal music-preview player: search a remote track catalog, listen to
//! short previews with per-track progress, and keep a local library of saved
//! tracks.
//!
//! ## Threads
//!
//! * The main thread owns the terminal and every piece of view state.
//! * The player worker owns the playback coordinator and the audio engine,
//!   and publishes a snapshot whenever playback state or progress changes.
//! * The task worker runs catalog searches and local store access.
//! * Two small loops forward key presses and periodic ticks.
//!
//! All of them talk to the main thread through one `std::sync::mpsc` channel
//! of [`AppEvent`]s. The terminal is restored and the player released on the
//! way out, even when the event loop fails.

mod catalog;
mod components;
mod config;
mod db;
mod error;
mod events;
mod logging;
mod model;
mod player;
mod render;
mod status;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    collections::HashSet,
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    components::{SearchBar, TrackTableState},
    config::AppConfig,
    events::{AppEvent, process_events},
    model::Track,
    player::{AudioPlayer, PlaybackSnapshot},
    status::StatusLine,
    tasks::AppTask,
    theme::Theme,
};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
enum MainView {
    Results,
    Library,
}

/// Application state.
struct App {
    pub theme: Theme,
    pub main_view: MainView,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub audio_player: AudioPlayer,

    pub search_bar: SearchBar,
    pub results: TrackTableState,
    pub library: TrackTableState,

    /// Identifiers of every track in the local library.
    pub saved_ids: HashSet<String>,

    /// The latest snapshot published by the player worker.
    pub playback: PlaybackSnapshot,
    pub now_playing: Option<Track>,

    pub status: StatusLine,
}

impl App {
    /// Create a new instance of application state, starting the player
    /// worker.
    fn new(config: &AppConfig, task_tx: Sender<AppTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));
        let audio_player = AudioPlayer::new(event_tx.clone(), poll_interval);

        Self {
            theme: Theme::default(),
            main_view: MainView::Results,
            event_tx,
            event_rx,
            task_tx,
            audio_player,
            search_bar: SearchBar::new(),
            results: TrackTableState::new("Results"),
            library: TrackTableState::new("Library"),
            saved_ids: HashSet::new(),
            playback: PlaybackSnapshot::default(),
            now_playing: None,
            status: StatusLine::default(),
        }
    }
}

/// Loads configuration, starts logging and the workers, then runs the UI
/// until the user quits.
fn main() -> Result<()> {
    let config = config::load_config();

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("Logging disabled: {:#}", e);
    }
    info!("tracklet starting");

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(&config, task_tx);

    if let Err(e) = tasks::spawn_task_worker(&config, task_rx, app.event_tx.clone()) {
        app.audio_player.shutdown();
        return Err(e.context("Failed to start task worker"));
    }

    let res = setup_terminal(&app).and_then(|mut terminal| {
        let res = run(&mut terminal, &mut app);
        restore_terminal(&mut terminal);
        res
    });

    app.audio_player.shutdown();
    info!("tracklet stopped");

    res.context("Application error occurred")
}

/// Switches the terminal into raw mode on the alternate screen, painted with
/// the theme background.
///
/// # Errors
///
/// Returns an error if raw mode or the alternate screen are unavailable.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        if let Err(e) = util::term::set_terminal_bg(&hex) {
            warn!("failed to set terminal background: {}", e);
        }
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Undoes [`setup_terminal`]. Best-effort.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the input threads and enters the main event loop.
///
/// * An input thread forwards key presses as application events.
/// * A tick thread triggers periodic UI refreshes and status expiry.
///
/// The saved library is requested once up front so that saved markers are
/// shown in search results from the start.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                // Only presses, some terminals also report releases
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("failed to read terminal event: {}", e);
                    break;
                }
            }
        }
    });

    // Effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    app.task_tx
        .send(AppTask::LoadSavedTracks)
        .context("Task worker is not running")?;

    process_events(terminal, app)
}
