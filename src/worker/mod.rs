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

use crate::broker::Broker;
use crate::fetch::{FetchError, Fetcher, PageEvents};
use crate::runtime::Shutdown;
use crate::seen::SeenStore;
use crate::url::normalize_href;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// The hooks a worker installs on its fetcher: discovered links are
/// normalized and offered back to the broker, outcomes are counted.
struct PageHooks<S> {
    broker: Arc<Broker<S>>,
    discard_markers: Vec<String>,
}

impl<S: SeenStore> PageEvents for PageHooks<S> {
    fn on_anchor(&self, base: &str, href: &str) {
        let canonical = normalize_href(base, href, &self.discard_markers);
        self.broker.push(&canonical);
    }

    fn on_response(&self, url: &str, status: u16) {
        log::debug!("Visited {url} ({status})");
        self.broker.note_response();
    }

    fn on_error(&self, url: &str, error: &FetchError) {
        log::warn!("Failed to visit {url}: {error}");
        self.broker.note_error();
    }
}

/// A unit of fetch concurrency.
///
/// Each worker continuously drains the broker. A capacity-1 idle channel
/// hands control back to the loop when a visit finishes; if no token
/// arrives within the request deadline the loop kicks off a fresh visit
/// anyway, so a wedged fetch cannot stall the slot forever. A visit that
/// completes after such a kick offers a surplus token, which the
/// capacity-1 channel simply drops.
pub struct Worker<S, F> {
    id: usize,
    patience: Duration,
    hooks: Arc<PageHooks<S>>,
    fetcher: Arc<F>,
}

impl<S: SeenStore, F: Fetcher> Worker<S, F> {
    pub fn new(
        id: usize,
        broker: Arc<Broker<S>>,
        fetcher: F,
        patience: Duration,
        discard_markers: Vec<String>,
    ) -> Self {
        Self {
            id,
            patience,
            hooks: Arc::new(PageHooks {
                broker,
                discard_markers,
            }),
            fetcher: Arc::new(fetcher),
        }
    }

    /// One full cycle: take an url from the broker, drive the fetcher
    /// over it, report everything through the hooks.
    pub async fn visit(&self) {
        if let Some(url) = self.hooks.broker.pop().await {
            self.fetcher.fetch(&url, self.hooks.as_ref()).await;
        }
    }

    /// Drives visits until shutdown. Never returns on its own.
    pub async fn run(self, shutdown: Shutdown) {
        let (idle_tx, mut idle_rx) = mpsc::channel::<()>(1);
        // Arm the loop so the first dispatch is immediate.
        let _ = idle_tx.try_send(());
        loop {
            if shutdown.is_shutdown() {
                log::debug!("Worker {} stopping", self.id);
                break;
            }
            tokio::select! {
                _ = shutdown.wait() => {
                    log::debug!("Worker {} stopping", self.id);
                    break;
                }
                outcome = tokio::time::timeout(self.patience, idle_rx.recv()) => {
                    match outcome {
                        Ok(Some(())) => {}
                        Ok(None) => break,
                        Err(_) => log::debug!(
                            "Worker {} kicked a visit after {:?} without an idle token",
                            self.id,
                            self.patience
                        ),
                    }
                    let visitor = self.clone();
                    let idle = idle_tx.clone();
                    tokio::spawn(async move {
                        visitor.visit().await;
                        let _ = idle.try_send(());
                    });
                }
            }
        }
    }
}

// Not derived: that would demand `S: Clone` and `F: Clone`.
impl<S, F> Clone for Worker<S, F> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            patience: self.patience,
            hooks: self.hooks.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}
