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

use std::fmt::{Display, Formatter};

/// The stable identity of a canonical url: the MD5 of its bytes rendered
/// as 32 lowercase hex characters. This is what lives in the admission
/// cache and in the seen store, the url text itself is never persisted.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct UrlFingerprint(String);

impl UrlFingerprint {
    /// Digests a canonical url.
    pub fn digest(url: &str) -> Self {
        Self(format!("{:x}", md5::compute(url.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw key written to the seen store.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Display for UrlFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
