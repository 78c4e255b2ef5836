//! Page identity
//!
//! Persisted annotation sets are namespaced by a storage key derived
//! deterministically from the page URL: origin + path + query + fragment.
//! Reloads of the identical URL map to the same key; any URL component
//! difference (including query and fragment) yields a different key.

use url::Url;

use crate::annotations::RecordKind;

/// Normalized identity of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageKey {
    canonical: String,
}

impl PageKey {
    /// Normalize a page URL. A string that does not parse as a URL is used
    /// verbatim so annotations on odd schemes still round-trip.
    pub fn new(url: &str) -> Self {
        let canonical = match Url::parse(url) {
            Ok(parsed) => {
                let mut out = parsed.origin().ascii_serialization();
                out.push_str(parsed.path());
                if let Some(query) = parsed.query() {
                    out.push('?');
                    out.push_str(query);
                }
                if let Some(fragment) = parsed.fragment() {
                    out.push('#');
                    out.push_str(fragment);
                }
                out
            }
            Err(_) => url.to_string(),
        };
        Self { canonical }
    }

    /// The normalized URL form.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Storage key for one record kind on this page.
    pub fn storage_key(&self, kind: RecordKind) -> String {
        format!("{}:{}", kind.as_str(), self.canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_includes_query_and_fragment() {
        let page = PageKey::new("https://example.com/a?x=1#frag");
        assert_eq!(
            page.storage_key(RecordKind::Highlights),
            "highlights:https://example.com/a?x=1#frag"
        );
        assert_eq!(
            page.storage_key(RecordKind::Visualizations),
            "visualizations:https://example.com/a?x=1#frag"
        );
    }

    #[test]
    fn test_identical_urls_share_a_key() {
        let a = PageKey::new("https://example.com/a?x=1");
        let b = PageKey::new("https://example.com/a?x=1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_urls_differ() {
        let base = PageKey::new("https://example.com/a");
        for other in [
            "https://example.com/b",
            "https://example.com/a?x=1",
            "https://example.com/a#frag",
            "http://example.com/a",
        ] {
            assert_ne!(base, PageKey::new(other), "{}", other);
        }
    }

    #[test]
    fn test_unparseable_url_used_verbatim() {
        let page = PageKey::new("not a url");
        assert_eq!(
            page.storage_key(RecordKind::Highlights),
            "highlights:not a url"
        );
    }
}
