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
use std::collections::HashSet;
use std::sync::Mutex;

/// A seen store that forgets everything on restart. The test double for
/// everything that does not care about persistence.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    fingerprints: Mutex<HashSet<UrlFingerprint>>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeenStore for MemorySeenStore {
    fn insert(&self, fingerprint: &UrlFingerprint) -> Result<(), SeenStoreError> {
        self.fingerprints.lock().unwrap().insert(fingerprint.clone());
        Ok(())
    }

    fn contains(&self, fingerprint: &UrlFingerprint) -> Result<bool, SeenStoreError> {
        Ok(self.fingerprints.lock().unwrap().contains(fingerprint))
    }

    fn count(&self) -> Result<u64, SeenStoreError> {
        Ok(self.fingerprints.lock().unwrap().len() as u64)
    }
}

#[cfg(test)]
mod test {
    use super::MemorySeenStore;
    use crate::seen::SeenStore;
    use crate::url::UrlFingerprint;

    #[test]
    fn insert_is_idempotent() {
        let store = MemorySeenStore::new();
        let fingerprint = UrlFingerprint::digest("https://example.com/a");
        store.insert(&fingerprint).unwrap();
        store.insert(&fingerprint).unwrap();
        assert!(store.contains(&fingerprint).unwrap());
        assert_eq!(1, store.count().unwrap());
    }
}
