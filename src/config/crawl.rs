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
use std::time::Duration;

/// The pattern a candidate url must match to be admissible. Known to be
/// lenient: the dot is unescaped, so host labels are barely validated.
/// Kept configurable so operators can tighten it without a rebuild.
pub const DEFAULT_URL_PATTERN: &str = "^http[s]?://[a-z0-9-]+(.[a-z0-9-]+)+";

/// Parameters of the admission engine and the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Anchored pattern deciding what even is a candidate url.
    #[serde(default = "_default_url_pattern")]
    pub url_pattern: String,

    /// Capacity of the ready queue. Admission beyond it drops the url
    /// instead of blocking the producer.
    #[serde(default = "_default_queue_capacity")]
    pub queue_capacity: usize,

    /// Capacity of the fingerprint cache in front of the seen store.
    #[serde(default = "_default_lru_capacity")]
    pub lru_capacity: usize,

    /// Size of the worker pool. Sanity wants `queue_capacity >= workers`,
    /// but nothing enforces it.
    #[serde(default = "_default_workers")]
    pub workers: usize,

    /// Per request deadline in seconds. Doubles as the liveness kick
    /// period of a worker.
    #[serde(default = "_default_request_timeout")]
    pub request_timeout: u64,

    /// Urls admitted at startup.
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Final dot segments that disqualify a candidate.
    #[serde(default = "_default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,

    /// Markers at which a candidate is truncated (query, fragment and
    /// userinfo separators).
    #[serde(default = "_default_discard_markers")]
    pub discard_markers: Vec<String>,
}

impl CrawlConfig {
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn _default_url_pattern() -> String {
    DEFAULT_URL_PATTERN.to_string()
}
const fn _default_queue_capacity() -> usize {
    4096
}
const fn _default_lru_capacity() -> usize {
    2048
}
const fn _default_workers() -> usize {
    256
}
const fn _default_request_timeout() -> u64 {
    2
}
fn _default_excluded_extensions() -> Vec<String> {
    ["jpg", "png", "pdf", "asp"]
        .map(str::to_string)
        .to_vec()
}
fn _default_discard_markers() -> Vec<String> {
    ["?", "#", "@"].map(str::to_string).to_vec()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            url_pattern: _default_url_pattern(),
            queue_capacity: _default_queue_capacity(),
            lru_capacity: _default_lru_capacity(),
            workers: _default_workers(),
            request_timeout: _default_request_timeout(),
            seeds: Vec::new(),
            excluded_extensions: _default_excluded_extensions(),
            discard_markers: _default_discard_markers(),
        }
    }
}
