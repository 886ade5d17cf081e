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

//! Client-credentials token exchange.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{config::AppConfig, error::CatalogError};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges the configured client credentials for a bearer token.
pub(crate) struct TokenProvider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenProvider {
    pub(crate) fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Requests a fresh access token.
    ///
    /// The token is not cached; callers fetch one per search.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingCredentials`] without issuing a request
    /// if either credential is blank, otherwise an error if the request fails
    /// or the endpoint does not return an access token.
    pub(crate) fn fetch_token(&self) -> Result<String, CatalogError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(CatalogError::MissingCredentials);
        }

        debug!(url = %self.token_url, "requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "token request failed");
            return Err(CatalogError::from_status(status.as_u16(), body));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(CatalogError::Decode("empty access token".to_string()));
        }

        Ok(token.access_token)
    }
}
