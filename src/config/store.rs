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

use serde::{Deserialize, Serialize};

/// Where the seen store lives and whether boot wipes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory of the seen store database.
    #[serde(rename = "store_path", default = "_default_store_path")]
    pub path: String,

    /// Destroy the store on startup. Dedup state from earlier runs is
    /// gone afterwards, every url becomes admissible again.
    #[serde(rename = "store_drop", default)]
    pub drop_on_boot: bool,
}

fn _default_store_path() -> String {
    "salticus_data/seen".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: _default_store_path(),
            drop_on_boot: false,
        }
    }
}
