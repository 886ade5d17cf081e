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

//! Application configuration.
//!
//! This module manages the application configuration file. Catalog
//! credentials may also be supplied through the environment so they need not
//! be written to disk.

use std::env;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "tracklet";

const CLIENT_ID_VAR: &str = "TRACKLET_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "TRACKLET_CLIENT_SECRET";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) token_url: String,
    pub(crate) api_base_url: String,
    pub(crate) search_limit: u32,
    pub(crate) database_file: String,
    pub(crate) poll_interval_ms: u64,
    pub(crate) log_file: String,
    pub(crate) log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            client_id: String::new(),
            client_secret: String::new(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_base_url: "https://api.spotify.com/v1".to_string(),
            search_limit: 10,
            database_file: "tracklet.db".to_string(),
            poll_interval_ms: 500,
            log_file: "tracklet.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Replaces the credential fields with any non-empty values found by
    /// `lookup`.
    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = non_empty(CLIENT_ID_VAR) {
            self.client_id = id;
        }
        if let Some(secret) = non_empty(CLIENT_SECRET_VAR) {
            self.client_secret = secret;
        }

        self
    }
}

pub(crate) fn load_config() -> AppConfig {
    let config: AppConfig = confy::load(CONFIG_NAME, None).unwrap_or_default();
    config.apply_overrides(|key| env::var(key).ok())
}
