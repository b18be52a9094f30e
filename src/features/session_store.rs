//! Session cookie store: load an exported cookie jar, normalize its domain
//! scoping and inject it into the browsing context.
//!
//! Cookies exported from a logged-in browser are scoped either to the bare
//! site domain or to its `www` host. The site redirects between the two, and a
//! jar that only covers one side ends in a redirect loop or an auth-wall, so
//! every root-scoped cookie gets a `www` twin and vice versa before injection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tracing::{info, warn};

use crate::core::error::ScoutError;
use crate::scraping::page::BrowsingPage;
use crate::types::Cookie;

// ─────────────────────────────────────────────────────────────────────────────
// Locations
// ─────────────────────────────────────────────────────────────────────────────

/// `~/.profile-scout/cookies.json`, the fallback location for the jar.
pub fn home_cookie_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".profile-scout").join("cookies.json"))
}

/// The configured path when it exists, else the home fallback when that
/// exists, else the configured path unchanged (so the error names it).
pub fn locate_cookie_file(configured: &Path) -> PathBuf {
    if configured.exists() {
        return configured.to_path_buf();
    }
    match home_cookie_path() {
        Some(p) if p.exists() => {
            info!("session_store: using cookie jar at {}", p.display());
            p
        }
        _ => configured.to_path_buf(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Read a JSON array of cookies. Entries that do not deserialize are skipped
/// with a warning; a jar with no usable entry is an error.
pub fn load_cookie_file(path: &Path) -> Result<Vec<Cookie>, ScoutError> {
    let store_err = |reason: String| ScoutError::CookieStore {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| store_err(e.to_string()))?;
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|e| store_err(format!("not a JSON array: {e}")))?;

    let total = raw.len();
    let cookies: Vec<Cookie> = raw
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Cookie>(v).ok())
        .collect();

    if cookies.len() < total {
        warn!(
            "session_store: skipped {} malformed cookie entries in {}",
            total - cookies.len(),
            path.display()
        );
    }
    if cookies.is_empty() {
        return Err(store_err("no usable cookies".to_string()));
    }

    info!(
        "session_store: 🍪 loaded {} cookies from {}",
        cookies.len(),
        path.display()
    );
    Ok(cookies)
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain variants
// ─────────────────────────────────────────────────────────────────────────────

/// The `www` ⇄ bare counterpart of a cookie domain, keeping its leading dot
/// if any. Only the site root (two labels) and its `www`
/// host have a counterpart; other subdomains return `None`.
///
/// * `".example.com"`     → `".www.example.com"`
/// * `"www.example.com"`  → `"example.com"`
/// * `"api.example.com"`  → `None`
pub fn counterpart_domain(domain: &str) -> Option<String> {
    let (dot, host) = match domain.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", domain),
    };
    if host.is_empty() {
        return None;
    }
    if let Some(root) = host.strip_prefix("www.") {
        return (root.split('.').count() == 2).then(|| format!("{dot}{root}"));
    }
    (host.split('.').count() == 2).then(|| format!("{dot}www.{host}"))
}

/// Add the missing `www` / bare twin of every root-scoped cookie.
///
/// Input order is kept; each twin follows its source. A twin that already
/// exists in the jar (same name, domain and path) is not duplicated.
pub fn with_domain_variants(cookies: Vec<Cookie>) -> Vec<Cookie> {
    let key = |c: &Cookie| (c.name.clone(), c.domain.clone(), c.path.clone());
    let mut seen: HashSet<(String, String, String)> = cookies.iter().map(key).collect();
    let mut out = Vec::with_capacity(cookies.len() * 2);

    for cookie in cookies {
        let twin = counterpart_domain(&cookie.domain).map(|domain| Cookie {
            domain,
            ..cookie.clone()
        });
        out.push(cookie);
        if let Some(twin) = twin {
            if seen.insert(key(&twin)) {
                out.push(twin);
            }
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Session cookie checks
// ─────────────────────────────────────────────────────────────────────────────

pub fn has_session_cookie(cookies: &[Cookie], name: &str) -> bool {
    cookies
        .iter()
        .any(|c| c.name == name && !c.value.trim().is_empty())
}

/// Expiry of the named session cookie; `None` for session-scoped (`-1`) or
/// absent cookies.
pub fn session_cookie_expiry(cookies: &[Cookie], name: &str) -> Option<DateTime<Utc>> {
    cookies
        .iter()
        .filter(|c| c.name == name)
        .filter_map(|c| c.expires)
        .filter(|&exp| exp > 0.0)
        .reduce(f64::min)
        .and_then(|exp| Utc.timestamp_opt(exp as i64, 0).single())
}

// ─────────────────────────────────────────────────────────────────────────────
// Inject
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize domain variants and inject the jar into `page` **before** the
/// first navigation. Returns the number of cookies set.
pub async fn inject<P: BrowsingPage + ?Sized>(page: &P, cookies: Vec<Cookie>) -> anyhow::Result<usize> {
    let jar = with_domain_variants(cookies);
    page.set_cookies(&jar).await?;
    info!("session_store: 💉 injected {} session cookies", jar.len());
    Ok(jar.len())
}
