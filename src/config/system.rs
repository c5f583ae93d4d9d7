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

/// Config of the run itself: logging and benchmark timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfig {
    /// The log level of the crawler.
    #[serde(default = "_default_log_level")]
    pub log_level: log::LevelFilter,

    /// Log to a file?
    #[serde(default)]
    pub log_to_file: bool,

    /// Seconds after which the run stops and the summary is emitted.
    #[serde(default = "_default_benchmark_duration")]
    pub benchmark_duration: u64,

    /// Seconds between progress reports while the run is going.
    #[serde(default = "_default_benchmark_interval")]
    pub benchmark_interval: u64,
}

impl SystemConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.benchmark_duration)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.benchmark_interval)
    }
}

const fn _default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}
const fn _default_benchmark_duration() -> u64 {
    60
}
const fn _default_benchmark_interval() -> u64 {
    5
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: _default_log_level(),
            log_to_file: false,
            benchmark_duration: _default_benchmark_duration(),
            benchmark_interval: _default_benchmark_interval(),
        }
    }
}
