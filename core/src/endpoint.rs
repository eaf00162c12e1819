//! URL builders for the feed API endpoints.

use url::Url;

use crate::error::ApiError;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://a2.wykop.pl";

/// URL of page `page` of the entries tagged `tag`.
///
/// `base_url` must already be free of a trailing slash; `ClientConfig`
/// normalises it once so that every page of a tag is signed over the same
/// prefix. The result is run through `Url` so that non-ASCII tags come out
/// percent-encoded, which is the form that goes on the wire and therefore the
/// form that gets signed.
pub fn tag_entries_url(base_url: &str, tag: &str, page: u32, app_key: &str) -> Result<String, ApiError> {
    if !is_plain_segment(tag) {
        return Err(ApiError::InvalidTag(tag.to_string()));
    }
    if !is_plain_segment(app_key) {
        return Err(ApiError::InvalidAppKey(app_key.to_string()));
    }
    if page < 1 {
        return Err(ApiError::InvalidPage(page));
    }
    let raw = format!("{base_url}/Tags/Entries/{tag}/page/{page}/appkey/{app_key}");
    let parsed = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;
    if !has_tag_entries_shape(&parsed, page) {
        return Err(ApiError::InvalidUrl {
            url: raw,
            reason: "path does not end in /Tags/Entries/{tag}/page/{page}/appkey/{key}".to_string(),
        });
    }
    Ok(parsed.into())
}

/// Whether `value` stays a single path segment once `Url` has normalised it.
///
/// `Url` treats `\` as `/` for http(s), collapses `.` and `..` segments
/// (including their `%2e` spellings) and keeps existing escapes as they are,
/// so `%` is refused outright.
fn is_plain_segment(value: &str) -> bool {
    let shape_changing =
        |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace();
    !value.is_empty() && value != "." && value != ".." && !value.chars().any(shape_changing)
}

fn has_tag_entries_shape(url: &Url, page: u32) -> bool {
    let Some(segments) = url.path_segments() else {
        return false;
    };
    let segments: Vec<&str> = segments.collect();
    let Some(start) = segments.len().checked_sub(7) else {
        return false;
    };
    let tail = &segments[start..];
    tail[0] == "Tags"
        && tail[1] == "Entries"
        && tail[3] == "page"
        && tail[4] == page.to_string()
        && tail[5] == "appkey"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_canonical_tag_url() {
        let url = tag_entries_url(DEFAULT_BASE_URL, "linux", 2, "ABC123").unwrap();
        assert_eq!(url, "https://a2.wykop.pl/Tags/Entries/linux/page/2/appkey/ABC123");
    }

    #[test]
    fn keeps_port_of_local_base() {
        let url = tag_entries_url("http://127.0.0.1:3000", "rust", 1, "K").unwrap();
        assert_eq!(url, "http://127.0.0.1:3000/Tags/Entries/rust/page/1/appkey/K");
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = tag_entries_url(DEFAULT_BASE_URL, "linux", 0, "ABC123").unwrap_err();
        assert!(matches!(err, ApiError::InvalidPage(0)));
    }

    #[test]
    fn empty_tag_is_rejected() {
        let err = tag_entries_url(DEFAULT_BASE_URL, "", 1, "ABC123").unwrap_err();
        assert!(matches!(err, ApiError::InvalidTag(_)));
    }

    #[test]
    fn tags_that_would_change_the_path_are_rejected() {
        for tag in ["a/b", "a?b", "a#b", "a b", "tab\t", "a\\b", ".", "..", "%2e%2e", "%2E%2E", "%2e", "a%2fb"] {
            let err = tag_entries_url(DEFAULT_BASE_URL, tag, 1, "K").unwrap_err();
            assert!(matches!(err, ApiError::InvalidTag(_)), "{tag:?}");
        }
    }

    #[test]
    fn non_ascii_tags_are_percent_encoded() {
        let url = tag_entries_url("http://localhost:3000", "żółw", 1, "K").unwrap();
        assert_eq!(
            url,
            "http://localhost:3000/Tags/Entries/%C5%BC%C3%B3%C5%82w/page/1/appkey/K"
        );
    }

    #[test]
    fn unparseable_base_is_rejected() {
        let err = tag_entries_url("not a base", "linux", 1, "K").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn dot_tags_do_not_reach_another_endpoint() {
        for tag in [".", "..", "%2e%2e"] {
            let result = tag_entries_url(DEFAULT_BASE_URL, tag, 1, "K");
            assert!(matches!(result, Err(ApiError::InvalidTag(_))), "{tag:?}: {result:?}");
        }
    }

    #[test]
    fn dots_inside_a_tag_are_fine() {
        let url = tag_entries_url(DEFAULT_BASE_URL, "node.js", 1, "K").unwrap();
        assert_eq!(url, "https://a2.wykop.pl/Tags/Entries/node.js/page/1/appkey/K");
    }

    #[test]
    fn app_keys_that_would_change_the_path_are_rejected() {
        for key in ["", "a/b", "a?b", "a#b", "a\\b", "..", "%2e%2e", "k y"] {
            let err = tag_entries_url(DEFAULT_BASE_URL, "linux", 1, key).unwrap_err();
            assert!(matches!(err, ApiError::InvalidAppKey(_)), "{key:?}");
        }
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = tag_entries_url("http://localhost:3000/api", "rust", 2, "K").unwrap();
        assert_eq!(url, "http://localhost:3000/api/Tags/Entries/rust/page/2/appkey/K");
    }

    #[test]
    fn base_that_swallows_the_path_is_rejected() {
        // Everything after '?' in the base becomes query, leaving no endpoint path.
        let err = tag_entries_url("http://localhost:3000?x=", "rust", 1, "K").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }), "{err:?}");
    }
}
