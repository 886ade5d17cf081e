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

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    App, MainView,
    components::TrackTableAction,
    model::Track,
    player::PlaybackSnapshot,
    tasks::AppTask,
};

pub(super) fn handle_tick(app: &mut App) {
    app.status.expire(Instant::now());
}

pub(super) fn handle_set_main_view(app: &mut App, main_view: MainView) {
    app.main_view = main_view;
}

pub(super) fn handle_submit_search(app: &mut App, query: String) -> Result<()> {
    app.status.info(format!("Searching for '{}'...", query), Instant::now());
    app.task_tx.send(AppTask::Search(query))?;
    app.main_view = MainView::Results;

    Ok(())
}

pub(super) fn handle_search_results_ready(app: &mut App, tracks: Vec<Track>) {
    app.status.info(format!("{} results", tracks.len()), Instant::now());
    app.results.set_tracks(tracks);
    app.main_view = MainView::Results;
}

pub(super) fn handle_saved_tracks_ready(app: &mut App, tracks: Vec<Track>) {
    app.saved_ids = tracks.iter().map(|t| t.id.clone()).collect();
    app.library.set_tracks(tracks);
}

pub(super) fn handle_track_saved(app: &mut App, track: Track) {
    app.saved_ids.insert(track.id.clone());
    app.library.upsert(track);
}

pub(super) fn handle_playback_changed(app: &mut App, snapshot: PlaybackSnapshot) {
    app.playback = snapshot;
}

pub(super) fn handle_info(app: &mut App, message: String) {
    app.status.info(message, Instant::now());
}

pub(super) fn handle_error(app: &mut App, message: String) {
    warn!("{}", message);
    app.status.error(message, Instant::now());
}

pub(super) fn handle_track_table_action(app: &mut App, action: TrackTableAction) -> Result<()> {
    match action {
        TrackTableAction::TogglePlayback(track) => {
            debug!(track = %track.id, "toggle playback");
            // A track without a preview is still handed over so that the
            // refusal is reported through the usual error path.
            if track.has_preview() {
                app.now_playing = Some(track.clone());
            }
            app.audio_player.toggle(&track)?;
        }
        TrackTableAction::Save(track) => {
            app.task_tx.send(AppTask::SaveTrack(track))?;
        }
    }

    Ok(())
}

pub(super) fn handle_stop(app: &mut App) -> Result<()> {
    app.audio_player.stop()?;
    app.now_playing = None;

    Ok(())
}
