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

pub mod args;
mod logging;

pub use logging::configure_logging;

use crate::broker::Broker;
use crate::config::Configs;
use crate::fetch::HttpFetcher;
use crate::runtime::shutdown;
use crate::seen::RocksSeenStore;
use crate::worker::Worker;
use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Closing numbers of a benchmark run.
#[derive(Debug, Copy, Clone)]
pub struct Summary {
    pub duration: Duration,
    pub left: usize,
    pub error_count: u64,
    pub accumulate: u64,
    pub seen: u64,
}

/// The application
pub struct Salticus {
    configs: Configs,
}

impl Salticus {
    pub fn new(configs: Configs) -> Self {
        Self { configs }
    }

    /// Builds the runtime and drives a full benchmark run on it.
    pub fn run(self) -> anyhow::Result<Summary> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Was not able to initialize the runtime")?;
        runtime.block_on(self.run_crawl())
    }

    async fn run_crawl(self) -> anyhow::Result<Summary> {
        let configs = self.configs;
        anyhow::ensure!(configs.crawl.workers > 0, "The worker pool must not be empty");

        let store = RocksSeenStore::open(&configs.store.path, configs.store.drop_on_boot)
            .context("Was not able to open the seen store")?;
        let broker = Arc::new(Broker::new(&configs.crawl, store)?);

        if configs.crawl.seeds.is_empty() {
            log::warn!("No seeds configured, nothing will be crawled");
        }
        for seed in &configs.crawl.seeds {
            broker.push(seed);
        }
        log::info!(
            "Seeded {} urls; queue {} / cache {} / {} workers / {}s deadline",
            broker.left(),
            configs.crawl.queue_capacity,
            configs.crawl.lru_capacity,
            configs.crawl.workers,
            configs.crawl.request_timeout
        );

        let (signal, receiver) = shutdown();
        let mut set = JoinSet::new();
        for id in 0..configs.crawl.workers {
            log::debug!("Spawn worker: {id}");
            let fetcher = HttpFetcher::new(configs.crawl.request_deadline())
                .context("Was not able to build the http client")?;
            let worker = Worker::new(
                id,
                broker.clone(),
                fetcher,
                configs.crawl.request_deadline(),
                configs.crawl.discard_markers.clone(),
            );
            let shutdown = receiver.clone();
            set.spawn(async move { worker.run(shutdown).await });
        }

        let started = Instant::now();
        let mut ticker = tokio::time::interval(configs.system.interval());
        ticker.tick().await;
        let deadline = tokio::time::sleep(configs.system.duration());
        tokio::pin!(deadline);
        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                _ = &mut deadline => break,
                _ = &mut interrupt => {
                    log::info!("Interrupted, shutting down early.");
                    break;
                }
                _ = ticker.tick() => {
                    log::info!(
                        "{} queued, {} fetched, {} errors, {} seen",
                        broker.left(),
                        broker.accumulate(),
                        broker.error_count(),
                        broker.seen_count()
                    );
                }
            }
        }

        signal.cancel();
        // Pending fetches are abandoned, only the worker loops are joined.
        set.abort_all();
        while set.join_next().await.is_some() {}

        let summary = Summary {
            duration: started.elapsed(),
            left: broker.left(),
            error_count: broker.error_count(),
            accumulate: broker.accumulate(),
            seen: broker.seen_count(),
        };
        log::info!(
            "Finished after {:?}: {} left, {} errors, {} responses, {} seen",
            summary.duration,
            summary.left,
            summary.error_count,
            summary.accumulate,
            summary.seen
        );
        Ok(summary)
    }
}
