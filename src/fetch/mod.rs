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

mod client;

pub use client::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

/// Why a visit failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect, timeout, decode and protocol failures.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The server answered, but outside the 2xx range.
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// The hook set a fetcher drives while visiting one page.
pub trait PageEvents: Send + Sync {
    /// One `a[href]` element. `base` is the final url the page was
    /// actually fetched from, redirects included.
    fn on_anchor(&self, base: &str, href: &str);

    /// The visit completed with a 2xx response.
    fn on_response(&self, url: &str, status: u16);

    /// The visit failed.
    fn on_error(&self, url: &str, error: &FetchError);
}

/// Capability of visiting a single url: one GET with a deadline, results
/// reported exclusively through [`PageEvents`]. Fetchers never return
/// errors, a failure is an event like any other.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str, events: &dyn PageEvents);
}
