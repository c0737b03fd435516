// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// The name of the optional configuration file in a collection directory.
pub const CONFIG_FILE_NAME: &str = "wordcards.toml";

/// Collection settings, read from `wordcards.toml`. Every field is optional.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The port the drill server listens on.
    pub port: u16,
    /// The most review records fetched at the start of a session.
    pub records_limit: usize,
    /// How many cards are fetched per catalog page.
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            records_limit: 500,
            page_size: 100,
        }
    }
}

impl Config {
    /// Loads the configuration for a collection, falling back to the defaults
    /// if there is no configuration file.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No configuration file, using defaults.");
            return Ok(Self::default());
        }
        let contents = read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.records_limit == 0 {
            return fail("records_limit must be positive.");
        }
        if config.page_size == 0 {
            return fail("page_size must be positive.");
        }
        Ok(config)
    }
}
