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

//! Track Catalog Store.
//!
//! This module handles all interactions with the SQLite database holding the
//! user's saved tracks. Tracks are keyed by their catalog identifier, so
//! saving a track a second time refreshes its details rather than adding a
//! duplicate.
//!
//! # Tables
//!
//! * `tracks` - Saved tracks with title, artist and preview URL.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

mod model;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::{error::PlaybackError, model::Track};

/// Whether [`save_track`] created a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Inserted,
    Updated,
}

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL`.
/// * **Schema**: Executes [`create_schema`] to ensure the tables exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Failed to open database: {}", path))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

    conn.set_prepared_statement_cache_capacity(16);

    create_schema(&conn)?;

    debug!(path, "database ready");

    Ok(conn)
}

/// Create the database schema.
///
/// The statement is wrapped in a single SQL transaction so the schema is
/// updated atomically.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS tracks (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            preview_url TEXT NOT NULL,
            saved_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
        );

        COMMIT;",
    )
    .context("Failed to create schema")
}

/// Saves a track, overwriting title, artist and preview URL if a track with
/// the same identifier is already stored.
///
/// # Errors
///
/// Returns [`PlaybackError::NoPlayableSource`] if the track has no preview
/// URL, in which case the store is not touched. Otherwise returns an error if
/// the SQL statement fails.
pub(crate) fn save_track(conn: &mut Connection, track: &Track) -> Result<SaveOutcome> {
    if !track.has_preview() {
        return Err(PlaybackError::NoPlayableSource.into());
    }

    let tx = conn.transaction()?;

    let exists = {
        let mut stmt = tx.prepare_cached("SELECT 1 FROM tracks WHERE id = ?")?;
        stmt.exists([&track.id])?
    };

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO tracks (id, title, artist, preview_url)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id)
             DO UPDATE SET title = ?2, artist = ?3, preview_url = ?4",
        )?;
        stmt.execute(params![
            track.id,
            track.title,
            track.artist,
            track.preview_url
        ])?;
    }

    tx.commit().context("Failed to commit saved track")?;

    let outcome = if exists {
        SaveOutcome::Updated
    } else {
        SaveOutcome::Inserted
    };

    info!(id = %track.id, title = %track.title, ?outcome, "saved track");

    Ok(outcome)
}

/// Fetches every saved track, oldest first.
///
/// # Errors
///
/// Returns an error if the SQL query fails or if there is a type mismatch
/// when mapping the database rows to the [`Track`] struct.
pub(crate) fn fetch_saved_tracks(conn: &Connection) -> Result<Vec<Track>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, artist, preview_url
         FROM tracks
         ORDER BY saved_at, rowid",
    )?;

    let results = stmt
        .query_map([], Track::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Fetches a single saved track by identifier.
pub(crate) fn fetch_track(conn: &Connection, id: &str) -> Result<Option<Track>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, artist, preview_url
         FROM tracks
         WHERE id = ?",
    )?;

    let result = stmt.query_row([id], Track::from_row).optional()?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    fn open() -> (TempDir, Connection) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracks.db");
        let conn = init_db(path.to_str().unwrap()).unwrap();
        (dir, conn)
    }

    fn track(id: &str, title: &str) -> Track {
        Track::new(id, title, "Artist", format!("https://preview/{}", id))
    }

    #[test]
    fn saving_a_new_track_inserts_it() {
        let (_dir, mut conn) = open();

        let outcome = save_track(&mut conn, &track("a", "First")).unwrap();

        assert_eq!(outcome, SaveOutcome::Inserted);
        assert_eq!(fetch_track(&conn, "a").unwrap(), Some(track("a", "First")));
    }

    #[test]
    fn saving_an_existing_track_overwrites_its_details() {
        let (_dir, mut conn) = open();
        save_track(&mut conn, &track("a", "First")).unwrap();

        let renamed = Track::new("a", "Renamed", "Someone Else", "https://preview/other");
        let outcome = save_track(&mut conn, &renamed).unwrap();

        assert_eq!(outcome, SaveOutcome::Updated);
        let saved = fetch_saved_tracks(&conn).unwrap();
        assert_eq!(saved, vec![renamed]);
    }

    #[test]
    fn track_without_preview_is_rejected() {
        let (_dir, mut conn) = open();

        let err = save_track(&mut conn, &Track::new("a", "t", "a", "")).unwrap_err();

        assert_eq!(
            err.downcast_ref::<PlaybackError>(),
            Some(&PlaybackError::NoPlayableSource)
        );
        assert!(fetch_saved_tracks(&conn).unwrap().is_empty());
    }

    #[test]
    fn saved_tracks_come_back_in_save_order() {
        let (_dir, mut conn) = open();
        for id in ["c", "a", "b"] {
            save_track(&mut conn, &track(id, id)).unwrap();
        }

        let ids: Vec<String> = fetch_saved_tracks(&conn)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn unknown_track_is_none() {
        let (_dir, conn) = open();
        assert_eq!(fetch_track(&conn, "missing").unwrap(), None);
    }

    #[test]
    fn store_persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tracks.db");
        let path = path.to_str().unwrap();

        {
            let mut conn = init_db(path).unwrap();
            save_track(&mut conn, &track("a", "Kept")).unwrap();
        }

        let conn = init_db(path).unwrap();
        assert_eq!(fetch_saved_tracks(&conn).unwrap().len(), 1);
    }
}
