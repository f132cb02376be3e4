//! Normalisation of user-entered Jellyfin server addresses.
//!
//! Users tend to paste whatever is in their browser's address bar, which for
//! Jellyfin is usually the web client's home page. [`clean_server_url`] turns
//! that into the base URL the REST API lives under.

use std::sync::LazyLock;

use regex::Regex;

/// Suffix appended by the Jellyfin web client to its home page.
static WEB_HOME_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/web/index\.html#!/home\.html$").expect("valid regex"));

static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

/// Scheme assumed when the user omits one.
pub const DEFAULT_SCHEME: &str = "http://";

/// Reduce a pasted Jellyfin address to its API base URL.
///
/// 1. Strips the web client's `/web/index.html#!/home.html` suffix.
/// 2. Strips a single trailing `/`.
/// 3. Prepends `http://` when no `http`/`https` scheme is present.
///
/// The result is not guaranteed to be a valid URL; callers still need to
/// parse it.
pub fn clean_server_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_suffix = WEB_HOME_SUFFIX_RE.replace(trimmed, "");
    let without_slash = without_suffix
        .strip_suffix('/')
        .unwrap_or(&without_suffix);

    if SCHEME_RE.is_match(without_slash) {
        without_slash.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{without_slash}")
    }
}

/// Join an API path onto a base URL without doubling the separator.
pub fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_web_client_home_suffix() {
        assert_eq!(
            clean_server_url("http://media.local:8096/web/index.html#!/home.html"),
            "http://media.local:8096"
        );
    }

    #[test]
    fn strips_single_trailing_slash() {
        assert_eq!(
            clean_server_url("https://jf.example.com/"),
            "https://jf.example.com"
        );
    }

    #[test]
    fn prepends_http_when_scheme_missing() {
        assert_eq!(clean_server_url("10.0.0.5:8096"), "http://10.0.0.5:8096");
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        assert_eq!(clean_server_url("HTTPS://JF.LAN"), "HTTPS://JF.LAN");
    }

    #[test]
    fn keeps_reverse_proxy_subpath() {
        assert_eq!(
            clean_server_url("https://example.com/jellyfin/"),
            "https://example.com/jellyfin"
        );
    }

    #[test]
    fn join_path_handles_slashes() {
        assert_eq!(join_path("http://a/", "/Users"), "http://a/Users");
        assert_eq!(join_path("http://a", "Users"), "http://a/Users");
    }
}
