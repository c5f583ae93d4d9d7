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
use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S)} {h({l})} [{T}] {t}: {m}{n}";

fn encoder() -> Box<PatternEncoder> {
    Box::new(PatternEncoder::new(LOG_PATTERN))
}

/// When file logging is requested the log lands next to the seen store,
/// so one run leaves everything it produced in one place.
fn log_file_path(configs: &Configs) -> PathBuf {
    Path::new(&configs.store.path)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("salticus.log")
}

/// Installs the global logger: our own target at the configured level,
/// everything else at warn. Failing here aborts startup, a crawl without
/// observability is not worth running.
pub fn configure_logging(configs: &Configs) -> anyhow::Result<()> {
    let sink: Box<dyn Append> = if configs.system.log_to_file {
        let path = log_file_path(configs);
        Box::new(
            FileAppender::builder()
                .encoder(encoder())
                .build(&path)
                .with_context(|| format!("Was not able to create the log file {}", path.display()))?,
        )
    } else {
        Box::new(ConsoleAppender::builder().encoder(encoder()).build())
    };

    let config = Config::builder()
        .appender(Appender::builder().build("sink", sink))
        .logger(Logger::builder().build("salticus", configs.system.log_level))
        .build(Root::builder().appender("sink").build(LevelFilter::Warn))
        .context("Broken logging configuration")?;
    log4rs::init_config(config).context("A global logger is already installed")?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::log_file_path;
    use crate::config::Configs;
    use std::path::Path;

    #[test]
    fn the_log_file_lands_next_to_the_store() {
        let mut configs = Configs::default();
        configs.store.path = "salticus_data/seen".to_string();
        assert_eq!(
            Path::new("salticus_data/salticus.log"),
            log_file_path(&configs)
        );
    }

    #[test]
    fn a_bare_store_path_logs_into_the_working_directory() {
        let mut configs = Configs::default();
        configs.store.path = "seen".to_string();
        assert_eq!(Path::new("salticus.log"), log_file_path(&configs));
    }
}
