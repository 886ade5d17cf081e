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

//! Remote track catalog.
//!
//! This module provides the [`CatalogClient`] used to search the remote
//! catalog for tracks, and the [`TokenProvider`] that obtains the short-lived
//! bearer token each search needs. Both use a blocking HTTP client and are
//! only ever called from the background task worker.

mod token;

pub(crate) use token::TokenProvider;

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{config::AppConfig, error::CatalogError, model::Track};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Builds the HTTP client shared by the catalog and token requests.
pub(crate) fn http_client() -> Result<Client, CatalogError> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    Ok(client)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
    #[serde(default)]
    preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    name: String,
}

impl From<TrackItem> for Track {
    fn from(item: TrackItem) -> Self {
        let artist = item
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_default();

        Track::new(item.id, item.name, artist, item.preview_url.unwrap_or_default())
    }
}

/// Client for the catalog's track search endpoint.
pub(crate) struct CatalogClient {
    http: Client,
    base_url: String,
    limit: u32,
}

impl CatalogClient {
    pub(crate) fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            limit: config.search_limit,
        }
    }

    /// Searches the catalog for tracks matching `query`.
    ///
    /// Tracks without a preview clip are kept in the results; they can be
    /// listed but not played or saved.
    ///
    /// # Arguments
    ///
    /// * `query` - Free text search terms. A blank query returns no tracks
    ///   without contacting the catalog.
    /// * `token` - Bearer token from [`TokenProvider::fetch_token`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the catalog answers with a
    /// non-success status, or the response body is not a track search result.
    pub(crate) fn search(&self, query: &str, token: &str) -> Result<Vec<Track>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let url = format!("{}/search", self.base_url);
        let limit = self.limit.to_string();

        debug!(query, limit = self.limit, "searching catalog");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            warn!(status = status.as_u16(), "catalog search failed");
            return Err(CatalogError::from_status(status.as_u16(), message));
        }

        let body = response.text()?;
        let tracks = parse_search_response(&body)?;

        for track in tracks.iter().filter(|t| !t.has_preview()) {
            info!(title = %track.title, "no preview available");
        }

        Ok(tracks)
    }
}

/// Maps a search response body onto tracks, preserving catalog order.
fn parse_search_response(body: &str) -> Result<Vec<Track>, CatalogError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    Ok(response
        .tracks
        .items
        .into_iter()
        .map(Track::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"{
        "tracks": {
            "items": [
                {
                    "id": "t1",
                    "name": "Get Lucky",
                    "artists": [{ "name": "Daft Punk" }, { "name": "Pharrell Williams" }],
                    "preview_url": "https://p.scdn.co/mp3-preview/t1"
                },
                {
                    "id": "t2",
                    "name": "Instant Crush",
                    "artists": [{ "name": "Daft Punk" }],
                    "preview_url": null
                },
                {
                    "id": "t3",
                    "name": "Contact",
                    "artists": [{ "name": "Daft Punk" }]
                }
            ]
        }
    }"#;

    fn client_for(server: &Server) -> CatalogClient {
        let config = AppConfig {
            api_base_url: format!("{}/", server.url()),
            ..AppConfig::default()
        };
        CatalogClient::new(&config, http_client().unwrap())
    }

    #[test]
    fn response_maps_first_artist_and_missing_previews() {
        let tracks = parse_search_response(BODY).unwrap();

        assert_eq!(
            tracks,
            vec![
                Track::new("t1", "Get Lucky", "Daft Punk", "https://p.scdn.co/mp3-preview/t1"),
                Track::new("t2", "Instant Crush", "Daft Punk", ""),
                Track::new("t3", "Contact", "Daft Punk", ""),
            ]
        );
    }

    #[test]
    fn malformed_response_is_a_decode_error() {
        let err = parse_search_response(r#"{"albums": {}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn search_sends_query_limit_and_bearer_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "daft punk".into()),
                Matcher::UrlEncoded("type".into(), "track".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create();

        let tracks = client_for(&server)
            .search("daft punk", "secret-token")
            .unwrap();

        mock.assert();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].id, "t1");
    }

    #[test]
    fn rejected_search_reports_status() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("expired")
            .create();

        let err = client_for(&server).search("anything", "stale").unwrap_err();

        match err {
            CatalogError::Status { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(message, "expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_query_does_not_hit_the_catalog() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();

        let tracks = client_for(&server).search("   ", "token").unwrap();

        mock.assert();
        assert!(tracks.is_empty());
    }
}
