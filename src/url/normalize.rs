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

/// Rewrites a raw `href` value into its canonical form.
///
/// Pure and order sensitive:
///
/// 1. An empty link stays empty.
/// 2. A link starting with `/` is glued onto `base_url` with its leading
///    slash dropped: `base_url + raw_link[1..]`. This is plain
///    concatenation, not url resolution; `base_url` is expected to be a
///    fetched url, whose path component is never empty. Relative links
///    without a leading slash are left untouched.
/// 3. A trailing `/` is stripped.
/// 4. The result is truncated at the first discard marker (query,
///    fragment and userinfo separators by default), the marker included.
///
/// The function is idempotent over its own output.
pub fn normalize_href(base_url: &str, raw_link: &str, discard_markers: &[String]) -> String {
    if raw_link.is_empty() {
        return String::new();
    }
    let mut canonical = if let Some(stripped) = raw_link.strip_prefix('/') {
        let mut joined = String::with_capacity(base_url.len() + stripped.len());
        joined.push_str(base_url);
        joined.push_str(stripped);
        joined
    } else {
        raw_link.to_string()
    };
    if canonical.ends_with('/') {
        canonical.pop();
    }
    if let Some(cut) = discard_markers
        .iter()
        .filter_map(|marker| canonical.find(marker.as_str()))
        .min()
    {
        canonical.truncate(cut);
    }
    canonical
}

#[cfg(test)]
mod test {
    use super::normalize_href;

    fn markers() -> Vec<String> {
        vec!["?".to_string(), "#".to_string(), "@".to_string()]
    }

    #[test]
    fn empty_links_stay_empty() {
        assert_eq!("", normalize_href("https://example.com/", "", &markers()));
    }

    #[test]
    fn root_relative_links_are_glued_onto_the_base() {
        assert_eq!(
            "https://example.com/a",
            normalize_href("https://example.com/", "/a", &markers())
        );
    }

    #[test]
    fn plain_relative_links_are_left_alone() {
        assert_eq!(
            "page.html",
            normalize_href("https://example.com/", "page.html", &markers())
        );
    }

    #[test]
    fn a_bare_slash_collapses_to_the_base() {
        assert_eq!(
            "https://example.com",
            normalize_href("https://example.com/", "/", &markers())
        );
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        assert_eq!(
            "https://example.com/a",
            normalize_href("https://example.com/", "/a/", &markers())
        );
    }

    #[test]
    fn queries_fragments_and_userinfo_are_discarded() {
        assert_eq!(
            "https://h.example/p",
            normalize_href("https://h.example/", "/p?x=1#frag", &markers())
        );
        assert_eq!(
            "https://h.example/p",
            normalize_href("https://h.example/", "/p#frag?x=1", &markers())
        );
        assert_eq!(
            "https://example.com/u",
            normalize_href("https://example.com/", "/u@host", &markers())
        );
    }

    #[test]
    fn query_and_fragment_variants_collapse_to_one_url() {
        let a = normalize_href("https://h.example/", "/p?x=1", &markers());
        let b = normalize_href("https://h.example/", "/p#frag", &markers());
        assert_eq!(a, b);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["/a", "/a/", "/p?x=1#frag", "", "/", "https://example.com/x"] {
            let once = normalize_href("https://example.com/", raw, &markers());
            let twice = normalize_href("https://example.com/", &once, &markers());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }
}
