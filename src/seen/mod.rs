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

#[cfg(test)]
mod memory;
mod rocks;

#[cfg(test)]
pub use memory::MemorySeenStore;
pub use rocks::RocksSeenStore;

use crate::url::UrlFingerprint;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Errors of the seen store backend.
#[derive(Debug, Error)]
pub enum SeenStoreError {
    #[error(transparent)]
    Database(#[from] rocksdb::Error),
    /// The backend cannot be reached or is not what we expect it to be.
    #[error("seen store unavailable: {0}")]
    Unavailable(String),
}

/// The durable membership set of url fingerprints.
///
/// The broker is the only writer. Uniqueness is the store's problem:
/// `insert` of a known fingerprint must be a no-op, never an error, and
/// the store must tolerate many concurrent readers and writers.
#[cfg_attr(test, automock)]
pub trait SeenStore: Send + Sync + 'static {
    /// Idempotent insertion.
    fn insert(&self, fingerprint: &UrlFingerprint) -> Result<(), SeenStoreError>;

    /// Membership test.
    fn contains(&self, fingerprint: &UrlFingerprint) -> Result<bool, SeenStoreError>;

    /// Number of distinct fingerprints ever recorded. Observation only,
    /// may be expensive.
    fn count(&self) -> Result<u64, SeenStoreError>;
}
