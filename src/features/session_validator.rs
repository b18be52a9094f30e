//! Session Validator: classifies the page a navigation landed on.
//!
//! The check is pure string work on the final URL and is repeated after every
//! navigation: the site may redirect any single request to its auth-wall even
//! when the previous one was served normally.

use std::sync::OnceLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use tracing::debug;

use crate::types::SessionState;

/// First path segments that only ever serve login / interstitial pages.
const AUTH_WALL_SEGMENTS: &[&str] = &["login", "authwall", "checkpoint", "uas", "signup"];

/// Login pages are recognised at any depth.
const LOGIN_SEGMENT: &str = "login";

/// Markers that may appear anywhere in a redirect URL (query included).
const AUTH_WALL_MARKERS: &[&str] = &["authwall", "sessionredirect"];

static AUTH_WALL_MATCHER: OnceLock<Option<AhoCorasick>> = OnceLock::new();

fn auth_wall_matcher() -> Option<&'static AhoCorasick> {
    AUTH_WALL_MATCHER
        .get_or_init(|| {
            AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .build(AUTH_WALL_MARKERS)
                .ok()
        })
        .as_ref()
}

/// `Unknown` for anything that is not an http(s) URL (blank tabs, `chrome-error://`).
pub fn classify(url: &str) -> SessionState {
    let Ok(parsed) = url::Url::parse(url.trim()) else {
        return SessionState::Unknown;
    };
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return SessionState::Unknown;
    }

    let segments: Vec<String> = parsed
        .path_segments()
        .map(|s| s.map(str::to_ascii_lowercase).collect())
        .unwrap_or_default();
    let first_segment = segments.first().map(String::as_str).unwrap_or_default();
    if AUTH_WALL_SEGMENTS.contains(&first_segment) {
        debug!("session: auth-wall path segment '{}' in {}", first_segment, url);
        return SessionState::AuthWall;
    }
    // Mobile and localized login pages nest the segment (`/m/login/`).
    if segments.iter().any(|s| s == LOGIN_SEGMENT) {
        debug!("session: login page at {}", url);
        return SessionState::AuthWall;
    }

    if auth_wall_matcher().is_some_and(|m| m.is_match(url)) {
        debug!("session: auth-wall marker in {}", url);
        return SessionState::AuthWall;
    }

    SessionState::Authenticated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_auth_wall_urls() {
        for url in [
            "https://www.linkedin.com/login",
            "https://www.linkedin.com/login?fromSignIn=true",
            "https://www.linkedin.com/authwall?trk=gf&sessionRedirect=https%3A%2F%2Fwww.linkedin.com%2Fin%2Fada",
            "https://www.linkedin.com/checkpoint/challenge/AgF",
            "https://www.linkedin.com/uas/login?session_redirect=x",
            "https://www.linkedin.com/signup/cold-join",
            "https://www.linkedin.com/in/ada?sessionRedirect=1",
            "https://www.linkedin.com/m/login/",
            "https://www.linkedin.com/checkpoint/lg/login?errorKey=x",
        ] {
            assert_eq!(classify(url), SessionState::AuthWall, "{url}");
        }
    }

    #[test]
    fn profile_and_detail_urls_are_authenticated() {
        for url in [
            "https://www.linkedin.com/feed/",
            "https://www.linkedin.com/in/ada-lovelace/",
            "https://www.linkedin.com/in/login-expert/details/skills/",
            "https://www.linkedin.com/in/ada/overlay/contact-info/",
        ] {
            assert_eq!(classify(url), SessionState::Authenticated, "{url}");
        }
    }

    #[test]
    fn non_web_urls_are_unknown() {
        assert_eq!(classify("about:blank"), SessionState::Unknown);
        assert_eq!(classify("chrome-error://chromewebdata/"), SessionState::Unknown);
        assert_eq!(classify(""), SessionState::Unknown);
        assert_eq!(classify("not a url"), SessionState::Unknown);
    }
}
