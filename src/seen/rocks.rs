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

use super::{SeenStore, SeenStoreError};
use crate::url::UrlFingerprint;
use rocksdb::{Options, DB};
use std::path::Path;
use std::sync::Arc;

/// The durable seen store.
///
/// Keys are the fingerprint bytes, values are empty: `insert` is a plain
/// put and therefore idempotent, uniqueness comes from the keyspace
/// itself. The handle is cheap to clone and safe to share across workers.
#[derive(Debug, Clone)]
pub struct RocksSeenStore {
    db: Arc<DB>,
}

impl RocksSeenStore {
    /// Opens the store at `path`, creating it if missing. With
    /// `drop_existing` any previous database is destroyed first, which is
    /// the bootstrap mode: dedup state from earlier runs is gone.
    pub fn open<P: AsRef<Path>>(path: P, drop_existing: bool) -> Result<Self, SeenStoreError> {
        let path = path.as_ref();
        if path.is_file() {
            return Err(SeenStoreError::Unavailable(format!(
                "{} exists but is not a directory",
                path.display()
            )));
        }
        if drop_existing && path.exists() {
            DB::destroy(&Options::default(), path)?;
        }
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl SeenStore for RocksSeenStore {
    fn insert(&self, fingerprint: &UrlFingerprint) -> Result<(), SeenStoreError> {
        Ok(self.db.put(fingerprint.as_bytes(), b"")?)
    }

    fn contains(&self, fingerprint: &UrlFingerprint) -> Result<bool, SeenStoreError> {
        if !self.db.key_may_exist(fingerprint.as_bytes()) {
            return Ok(false);
        }
        Ok(self.db.get_pinned(fingerprint.as_bytes())?.is_some())
    }

    fn count(&self) -> Result<u64, SeenStoreError> {
        self.db.flush()?;
        let mut iter = self.db.raw_iterator();
        iter.seek_to_first();
        let mut ct = 0u64;
        while iter.valid() {
            ct += 1;
            iter.next();
        }
        Ok(ct)
    }
}

#[cfg(test)]
mod test {
    use super::RocksSeenStore;
    use crate::seen::SeenStore;
    use crate::url::UrlFingerprint;

    #[test]
    fn insert_contains_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksSeenStore::open(dir.path().join("seen"), false).unwrap();

        let a = UrlFingerprint::digest("https://example.com/a");
        let b = UrlFingerprint::digest("https://example.com/b");
        assert!(!store.contains(&a).unwrap());

        store.insert(&a).unwrap();
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();

        assert!(store.contains(&a).unwrap());
        assert!(store.contains(&b).unwrap());
        assert_eq!(2, store.count().unwrap());
    }

    #[test]
    fn fingerprints_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen");
        let fingerprint = UrlFingerprint::digest("https://a.example");

        {
            let store = RocksSeenStore::open(&path, false).unwrap();
            store.insert(&fingerprint).unwrap();
        }

        let reopened = RocksSeenStore::open(&path, false).unwrap();
        assert!(reopened.contains(&fingerprint).unwrap());
        assert_eq!(1, reopened.count().unwrap());
    }

    #[test]
    fn bootstrap_drops_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen");
        let fingerprint = UrlFingerprint::digest("https://a.example");

        {
            let store = RocksSeenStore::open(&path, false).unwrap();
            store.insert(&fingerprint).unwrap();
        }

        let wiped = RocksSeenStore::open(&path, true).unwrap();
        assert!(!wiped.contains(&fingerprint).unwrap());
        assert_eq!(0, wiped.count().unwrap());
    }

    #[test]
    fn refuses_a_plain_file_as_store_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen");
        std::fs::write(&path, b"not a database").unwrap();
        assert!(RocksSeenStore::open(&path, false).is_err());
    }
}
