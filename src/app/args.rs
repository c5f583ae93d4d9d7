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

use crate::config::Configs;
use clap::Parser;

/// Welcome to Salticus
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct SalticusArgs {
    /// Seed urls admitted at startup (overrides SALTICUS_SEEDS).
    #[arg(short, long, value_delimiter = ',')]
    pub seeds: Vec<String>,

    /// Benchmark duration in seconds (overrides SALTICUS_BENCHMARK_DURATION).
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Worker pool size (overrides SALTICUS_WORKERS).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Destroy the seen store before crawling.
    #[arg(long)]
    pub drop_store: bool,

    /// Overrides the log level.
    #[arg(long)]
    pub log_level: Option<log::LevelFilter>,

    /// Log to file
    #[arg(long)]
    pub log_to_file: bool,
}

impl SalticusArgs {
    /// Folds the explicit flags over the env-derived configs.
    pub fn apply_to(&self, configs: &mut Configs) {
        if !self.seeds.is_empty() {
            configs.crawl.seeds = self.seeds.clone();
        }
        if let Some(duration) = self.duration {
            configs.system.benchmark_duration = duration;
        }
        if let Some(workers) = self.workers {
            configs.crawl.workers = workers;
        }
        if self.drop_store {
            configs.store.drop_on_boot = true;
        }
        if let Some(log_level) = self.log_level {
            configs.system.log_level = log_level;
        }
        if self.log_to_file {
            configs.system.log_to_file = true;
        }
    }
}

#[cfg(test)]
mod test {
    use super::SalticusArgs;
    use crate::config::Configs;
    use clap::Parser;

    #[test]
    fn flags_override_the_configs() {
        let args = SalticusArgs::parse_from([
            "salticus",
            "--seeds",
            "https://a.example,https://b.example",
            "--duration",
            "10",
            "--workers",
            "8",
            "--drop-store",
        ]);
        let mut configs = Configs::default();
        args.apply_to(&mut configs);
        assert_eq!(
            vec!["https://a.example", "https://b.example"],
            configs.crawl.seeds
        );
        assert_eq!(10, configs.system.benchmark_duration);
        assert_eq!(8, configs.crawl.workers);
        assert!(configs.store.drop_on_boot);
    }

    #[test]
    fn absent_flags_leave_the_configs_alone() {
        let args = SalticusArgs::parse_from(["salticus"]);
        let mut configs = Configs::default();
        args.apply_to(&mut configs);
        assert_eq!(Configs::default(), configs);
    }
}
