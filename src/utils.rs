//! Utility helpers used across the crate.
//!
//! Identifier derivation from URLs and first-occurrence de-duplication of
//! the URL list.
use percent_encoding::percent_decode_str;
use sanitize_filename::sanitize;
use std::collections::HashSet;
use url::Url;

/// Name used when a URL carries no usable final path segment.
pub const FALLBACK_FILENAME: &str = "output.bin";

/// Extracts a clean filename from a URL.
///
/// 1. Parses the URL.
/// 2. Extracts the last segment of the path.
/// 3. URL-decodes it (converts %20 to space, etc.).
/// 4. Sanitizes it to remove characters invalid for the OS.
/// 5. Falls back to "output.bin" if no valid filename is found.
pub fn get_filename_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .map(|mut s| s.next_back().unwrap_or("").to_string())
        })
        .map(|s| percent_decode_str(&s).decode_utf8_lossy().to_string())
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Drops repeated URLs, keeping the order of first appearance.
pub fn unique_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .map(Into::into)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_extraction() {
        assert_eq!(
            get_filename_from_url("https://example.com/archive.zip"),
            "archive.zip"
        );

        // Query parameters are not part of the name
        assert_eq!(
            get_filename_from_url("https://example.com/image.png?id=123&quality=high"),
            "image.png"
        );

        assert_eq!(
            get_filename_from_url("https://example.com/my%20vacation%20photo.jpg"),
            "my vacation photo.jpg"
        );

        assert_eq!(get_filename_from_url("https://example.com/"), FALLBACK_FILENAME);
        assert_eq!(get_filename_from_url("not a url"), FALLBACK_FILENAME);
    }

    #[test]
    fn test_traversal_is_sanitized() {
        let name = get_filename_from_url("https://example.com/a/..%2F..%2Fetc%2Fpasswd");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_unique_urls_keeps_first_occurrence() {
        let urls = unique_urls([
            "http://b/2.bin",
            "http://a/1.bin",
            "http://b/2.bin",
            "http://c/3.bin",
            "http://a/1.bin",
        ]);
        assert_eq!(urls, ["http://b/2.bin", "http://a/1.bin", "http://c/3.bin"]);
    }

    #[test]
    fn test_unique_urls_empty() {
        assert!(unique_urls(Vec::<String>::new()).is_empty());
    }
}
