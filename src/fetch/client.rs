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

use super::{FetchError, Fetcher, PageEvents};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;

/// A matcher for the anchors of a page.
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// The http implementation of [`Fetcher`]: one client per worker, one GET
/// per visit, anchors harvested from html bodies only.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a client with the per-request deadline baked in.
    pub fn new(request_deadline: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(request_deadline)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, events: &dyn PageEvents) {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                events.on_error(url, &error.into());
                return;
            }
        };
        let status = response.status();
        if !status.is_success() {
            events.on_error(url, &FetchError::Status(status));
            return;
        }
        let base = response.url().to_string();
        let html = is_html(&response);
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                events.on_error(url, &error.into());
                return;
            }
        };
        events.on_response(url, status.as_u16());
        if html {
            for href in harvest_anchors(&body) {
                events.on_anchor(&base, &href);
            }
        }
    }
}

fn is_html(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("html"))
        .unwrap_or(false)
}

/// Collects the `href` values of all anchors, document order.
fn harvest_anchors(body: &str) -> Vec<String> {
    let html = Html::parse_document(body);
    html.select(&ANCHORS)
        .filter_map(|element| element.attr("href"))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod test {
    use super::harvest_anchors;

    #[test]
    fn harvests_hrefs_in_document_order() {
        const BODY: &str = r#"
            <html><body>
                <a href="/a">first</a>
                <p>noise <a href="https://other.example/b">second</a></p>
                <a name="no-href">ignored</a>
                <a href="">third</a>
            </body></html>
        "#;
        assert_eq!(
            vec!["/a", "https://other.example/b", ""],
            harvest_anchors(BODY)
        );
    }

    #[test]
    fn a_page_without_anchors_yields_nothing() {
        assert!(harvest_anchors("<html><body><p>plain</p></body></html>").is_empty());
    }
}
