// Copyright 2024. Felix Engl
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

pub mod crawl;
pub mod store;
pub mod system;

pub use crawl::{CrawlConfig, DEFAULT_URL_PATTERN};
pub use store::StoreConfig;
pub use system::SystemConfig;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// All configs of the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Configs {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Configs {
    /// Builds the configs from the documented defaults layered under the
    /// flat `SALTICUS_*` environment namespace. Every section reads from
    /// the same namespace, unknown keys are simply left to the others.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(
                Environment::with_prefix("SALTICUS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("seeds")
                    .with_list_parse_key("excluded_extensions")
                    .with_list_parse_key("discard_markers"),
            )
            .build()?;
        Ok(Self {
            crawl: source.clone().try_deserialize()?,
            system: source.clone().try_deserialize()?,
            store: source.try_deserialize()?,
        })
    }
}
