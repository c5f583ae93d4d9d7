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

use crate::config::CrawlConfig;
use crate::queue::{QueueError, ReadyQueue};
use crate::seen::SeenStore;
use crate::url::UrlFingerprint;
use lru::LruCache;
use regex::Regex;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can keep a broker from being built. All of them are
/// fatal: a crawl without a working admission gate is not worth starting.
#[derive(Debug, Error)]
pub enum BrokerInitError {
    #[error("the url validity pattern does not compile: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("the {0} capacity must not be zero")]
    ZeroCapacity(&'static str),
}

/// The admission and dispatch engine.
///
/// The broker is the sole authority over the ready queue, the fingerprint
/// cache and the seen store. `push` gates a candidate through shape and
/// extension checks, the cache and the store, then attempts a
/// non-blocking enqueue; only a successful enqueue marks the url as seen.
/// A full queue drops the candidate *without* marking it, so an url that
/// could not be admitted today remains admissible tomorrow.
///
/// `push` is safe to call from many workers at once. Two concurrent
/// pushes of the same fresh url may both slip past the checks and enqueue
/// it twice; the store's idempotent insert makes the second record a
/// no-op and the cost is one redundant fetch. That window is accepted in
/// exchange for a lock-free admission path.
pub struct Broker<S> {
    queue: ReadyQueue,
    recent: Mutex<LruCache<UrlFingerprint, ()>>,
    store: S,
    pattern: Regex,
    excluded_extensions: HashSet<String>,
    responses: AtomicU64,
    errors: AtomicU64,
}

impl<S: SeenStore> Broker<S> {
    /// Builds a broker from a validated configuration record.
    pub fn new(config: &CrawlConfig, store: S) -> Result<Self, BrokerInitError> {
        let pattern = Regex::new(&config.url_pattern)?;
        let queue_capacity = NonZeroUsize::new(config.queue_capacity)
            .ok_or(BrokerInitError::ZeroCapacity("queue"))?;
        let lru_capacity = NonZeroUsize::new(config.lru_capacity)
            .ok_or(BrokerInitError::ZeroCapacity("lru"))?;
        Ok(Self {
            queue: ReadyQueue::new(queue_capacity),
            recent: Mutex::new(LruCache::new(lru_capacity)),
            store,
            pattern,
            excluded_extensions: config.excluded_extensions.iter().cloned().collect(),
            responses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        })
    }

    /// Offers an url for admission. One-way: rejections, duplicates and
    /// backpressure drops all return as if nothing happened.
    pub fn push(&self, url: &str) {
        if !self.pattern.is_match(url) {
            log::trace!("Invalid url {url}");
            return;
        }
        if let Some(extension) = final_extension(url) {
            if self.excluded_extensions.contains(extension) {
                log::trace!("Excluded extension on {url}");
                return;
            }
        }
        let fingerprint = UrlFingerprint::digest(url);
        if self
            .recent
            .lock()
            .unwrap()
            .get(&fingerprint)
            .is_some()
        {
            log::trace!("Duplicate (cached) {url}");
            return;
        }
        match self.store.contains(&fingerprint) {
            Ok(true) => {
                log::trace!("Duplicate (stored) {url}");
                return;
            }
            Ok(false) => {}
            Err(error) => {
                // Fail open: the store's unique keyspace absorbs the copy.
                log::warn!("Membership lookup failed for {url}, admitting anyway: {error}");
            }
        }
        match self.queue.enqueue(url.to_string()) {
            Ok(()) => {
                self.recent.lock().unwrap().put(fingerprint.clone(), ());
                if let Err(error) = self.store.insert(&fingerprint) {
                    log::warn!("Failed to record {url} as seen: {error}");
                }
                log::debug!("Pushed {url}, {} queued", self.queue.len());
            }
            Err(QueueError::Full { .. }) => {
                // Not marked seen: the url must stay admissible later.
                log::debug!(
                    "Ready queue full ({} entries), discarded {url}",
                    self.queue.capacity()
                );
            }
            Err(QueueError::Closed) => {
                log::warn!("Ready queue closed, discarded {url}");
            }
        }
    }

    /// Takes the next admitted url, waiting until one is available.
    /// Exactly one caller receives each url.
    pub async fn pop(&self) -> Option<String> {
        self.queue.dequeue().await
    }

    /// Current ready-queue depth.
    pub fn left(&self) -> usize {
        self.queue.len()
    }

    /// Completed responses so far.
    pub fn accumulate(&self) -> u64 {
        self.responses.load(Ordering::Relaxed)
    }

    /// Failed fetches so far.
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn note_response(&self) {
        self.responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn note_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Distinct fingerprints recorded so far. Observation only; a failing
    /// store reads as zero rather than killing the report.
    pub fn seen_count(&self) -> u64 {
        match self.store.count() {
            Ok(count) => count,
            Err(error) => {
                log::warn!("Failed to count the seen store: {error}");
                0
            }
        }
    }
}

/// The segment after the last dot of the url, if any.
fn final_extension(url: &str) -> Option<&str> {
    let (_, extension) = url.rsplit_once('.')?;
    (!extension.is_empty()).then_some(extension)
}

#[cfg(test)]
mod test {
    use super::{final_extension, Broker, BrokerInitError};
    use crate::config::CrawlConfig;
    use crate::seen::{MemorySeenStore, MockSeenStore, RocksSeenStore, SeenStore, SeenStoreError};
    use crate::url::UrlFingerprint;

    fn config(queue_capacity: usize, lru_capacity: usize) -> CrawlConfig {
        CrawlConfig {
            queue_capacity,
            lru_capacity,
            ..CrawlConfig::default()
        }
    }

    fn broker(queue_capacity: usize, lru_capacity: usize) -> Broker<MemorySeenStore> {
        Broker::new(&config(queue_capacity, lru_capacity), MemorySeenStore::new()).unwrap()
    }

    #[test]
    fn extracts_the_final_dot_segment() {
        assert_eq!(Some("jpg"), final_extension("https://example.com/pic.jpg"));
        assert_eq!(
            Some("com/page"),
            final_extension("https://example.com/page")
        );
        assert_eq!(None, final_extension("no-dots-at-all"));
        assert_eq!(None, final_extension("trailing."));
    }

    #[test]
    fn a_broken_pattern_is_fatal() {
        let mut cfg = config(16, 16);
        cfg.url_pattern = "[".to_string();
        assert!(matches!(
            Broker::new(&cfg, MemorySeenStore::new()),
            Err(BrokerInitError::InvalidPattern(_))
        ));
    }

    #[test]
    fn zero_capacities_are_fatal() {
        assert!(matches!(
            Broker::new(&config(0, 16), MemorySeenStore::new()),
            Err(BrokerInitError::ZeroCapacity("queue"))
        ));
        assert!(matches!(
            Broker::new(&config(16, 0), MemorySeenStore::new()),
            Err(BrokerInitError::ZeroCapacity("lru"))
        ));
    }

    #[tokio::test]
    async fn pushing_twice_admits_once() {
        let b = broker(16, 16);
        b.push("https://example.com/a");
        b.push("https://example.com/a");
        assert_eq!(1, b.left());
        assert_eq!(1, b.seen_count());
        assert_eq!("https://example.com/a", b.pop().await.unwrap());
        assert_eq!(0, b.left());
    }

    #[test]
    fn rejections_never_touch_the_store() {
        let b = broker(16, 16);
        // Bad shape: no scheme, or a relative leftover.
        b.push("");
        b.push("page.html");
        b.push("ftp://example.com/a");
        // Excluded extensions.
        b.push("https://example.com/pic.jpg");
        b.push("https://example.com/doc.pdf");
        assert_eq!(0, b.left());
        assert_eq!(0, b.seen_count());
    }

    #[test]
    fn the_extension_filter_spares_ordinary_pages() {
        let b = broker(16, 16);
        b.push("https://example.com/pic.jpg");
        b.push("https://example.com/page");
        assert_eq!(1, b.left());
        assert_eq!(1, b.seen_count());
    }

    #[test]
    fn a_full_queue_drops_without_marking_seen() {
        let b = broker(2, 16);
        b.push("https://example.com/a");
        b.push("https://example.com/b");
        b.push("https://example.com/c");
        assert_eq!(2, b.left());
        assert_eq!(2, b.seen_count());
        assert!(!b
            .store
            .contains(&UrlFingerprint::digest("https://example.com/c"))
            .unwrap());
    }

    #[tokio::test]
    async fn a_dropped_url_stays_admissible() {
        let b = broker(2, 16);
        b.push("https://example.com/a");
        b.push("https://example.com/b");
        b.push("https://example.com/c");
        // Still full, still dropped.
        b.push("https://example.com/c");
        assert_eq!(2, b.left());
        // Once a slot frees up the dropped url goes through.
        b.pop().await.unwrap();
        b.push("https://example.com/c");
        assert_eq!(2, b.left());
        assert_eq!(3, b.seen_count());
    }

    #[test]
    fn the_store_rejects_what_the_cache_evicted() {
        // A cache of one: pushing b evicts a.
        let b = broker(16, 1);
        b.push("https://example.com/a");
        b.push("https://example.com/b");
        b.push("https://example.com/a");
        assert_eq!(2, b.left());
        assert_eq!(2, b.seen_count());
    }

    #[test]
    fn a_failing_lookup_fails_open() {
        let mut store = MockSeenStore::new();
        store
            .expect_contains()
            .returning(|_| Err(SeenStoreError::Unavailable("down".to_string())));
        store.expect_insert().returning(|_| Ok(()));
        let b = Broker::new(&config(16, 16), store).unwrap();
        b.push("https://example.com/a");
        assert_eq!(1, b.left());
    }

    #[tokio::test]
    async fn a_failing_insert_is_swallowed() {
        let mut store = MockSeenStore::new();
        store.expect_contains().returning(|_| Ok(false));
        store
            .expect_insert()
            .returning(|_| Err(SeenStoreError::Unavailable("down".to_string())));
        let b = Broker::new(&config(16, 16), store).unwrap();
        b.push("https://example.com/a");
        // Still admitted: the enqueue already happened.
        assert_eq!("https://example.com/a", b.pop().await.unwrap());
    }

    #[test]
    fn a_restart_still_rejects_known_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen");
        {
            let store = RocksSeenStore::open(&path, false).unwrap();
            let b = Broker::new(&config(16, 16), store).unwrap();
            b.push("https://a.example");
            assert_eq!(1, b.seen_count());
        }
        // Second run, bootstrap drop disabled, cache empty again.
        let store = RocksSeenStore::open(&path, false).unwrap();
        let b = Broker::new(&config(16, 16), store).unwrap();
        b.push("https://a.example");
        assert_eq!(0, b.left());
        assert_eq!(1, b.seen_count());
    }

    #[test]
    fn counters_are_monotonic() {
        let b = broker(16, 16);
        assert_eq!(0, b.accumulate());
        assert_eq!(0, b.error_count());
        b.note_response();
        b.note_response();
        b.note_error();
        assert_eq!(2, b.accumulate());
        assert_eq!(1, b.error_count());
    }
}
