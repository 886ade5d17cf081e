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

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    db::{self, SaveOutcome},
    events::AppEvent,
    model::Track,
    tasks::TaskContext,
};

pub(super) fn search(ctx: &mut TaskContext, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Ok(());
    }

    let token = ctx
        .tokens
        .fetch_token()
        .context("Failed to obtain catalog access token")?;

    let tracks = ctx
        .catalog
        .search(query, &token)
        .context("Catalog search failed")?;

    info!(query, results = tracks.len(), "search complete");

    ctx.event_tx.send(AppEvent::SearchResultsReady(tracks))?;

    Ok(())
}

pub(super) fn save_track(ctx: &mut TaskContext, track: Track) -> Result<()> {
    let outcome = db::save_track(ctx.conn, &track)
        .with_context(|| format!("Failed to save '{}'", track.title))?;

    let stored = db::fetch_track(ctx.conn, &track.id)?
        .with_context(|| format!("Saved track {} is missing from the store", track.id))?;

    let message = match outcome {
        SaveOutcome::Inserted => format!("Saved '{}'", stored.title),
        SaveOutcome::Updated => format!("Updated '{}'", stored.title),
    };

    ctx.event_tx.send(AppEvent::TrackSaved(stored))?;
    ctx.event_tx.send(AppEvent::Info(message))?;

    Ok(())
}

pub(super) fn load_saved_tracks(ctx: &mut TaskContext) -> Result<()> {
    let tracks = db::fetch_saved_tracks(ctx.conn)?;
    ctx.event_tx.send(AppEvent::SavedTracksReady(tracks))?;

    Ok(())
}
