use std::path::{Path, PathBuf};

use crate::scraping::synchronizer::SyncBudget;

// ---------------------------------------------------------------------------
// ScoutConfig: file-based config loader (profile-scout.json) with env-var fallback
// ---------------------------------------------------------------------------

pub const ENV_CONFIG_PATH: &str = "PROFILE_SCOUT_CONFIG";
pub const ENV_CHROME_EXECUTABLE: &str = "CHROME_EXECUTABLE";
pub const ENV_COOKIES: &str = "LINKEDIN_COOKIES";
pub const ENV_HEADLESS: &str = "HEADLESS";
pub const ENV_MAX_PROFILES: &str = "MAX_PROFILES";
pub const ENV_DELAY_BETWEEN_PROFILES: &str = "DELAY_BETWEEN_PROFILES";
pub const ENV_PROXY_SERVER: &str = "PROXY_SERVER";
pub const ENV_NAVIGATION_TIMEOUT_MS: &str = "NAVIGATION_TIMEOUT_MS";
pub const ENV_SELECTORS: &str = "PROFILE_SCOUT_SELECTORS";

/// Top-level config loaded from `profile-scout.json`.
///
/// Every `Option` field falls back to an environment variable and then to a
/// built-in default through its `resolve_*` method, so an absent file behaves
/// exactly like an empty one.
#[derive(serde::Deserialize, Default, Clone, Debug)]
#[serde(default)]
pub struct ScoutConfig {
    /// Exported cookie jar (JSON array). Env: `LINKEDIN_COOKIES`.
    pub cookies_path: Option<String>,
    /// Env: `HEADLESS` ("false" shows the window). Default: `true`.
    pub headless: Option<bool>,
    /// Hard cap on profiles per run. Env: `MAX_PROFILES`. Default: 100.
    pub max_profiles: Option<usize>,
    /// Pause between two profiles. Env: `DELAY_BETWEEN_PROFILES`. Default: 5.
    pub delay_between_profiles_secs: Option<u64>,
    /// e.g. `http://host:8080` or `socks5://host:1080`. Env: `PROXY_SERVER`.
    pub proxy_server: Option<String>,
    /// Budget for a single `goto`. Env: `NAVIGATION_TIMEOUT_MS`. Default: 30000.
    pub navigation_timeout_ms: Option<u64>,
    /// Pause before the single navigation retry. Default: 1000.
    pub navigation_retry_delay_ms: Option<u64>,
    /// Authenticated landing page used to validate a cookie set.
    pub session_probe_url: Option<String>,
    /// Scheme + host prepended to relative profile paths.
    pub site_root: Option<String>,
    /// JSON overlay for the built-in selector table. Env: `PROFILE_SCOUT_SELECTORS`.
    pub selectors_path: Option<String>,
    /// Name of the cookie that carries the authenticated session.
    pub session_cookie_name: Option<String>,
    pub sync: SyncBudget,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

impl ScoutConfig {
    pub fn resolve_cookies_path(&self) -> PathBuf {
        self.cookies_path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| env_string(ENV_COOKIES))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("cookies.json"))
    }

    pub fn resolve_headless(&self) -> bool {
        if let Some(b) = self.headless {
            return b;
        }
        env_string(ENV_HEADLESS)
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true)
    }

    pub fn resolve_max_profiles(&self) -> usize {
        self.max_profiles
            .or_else(|| env_parse(ENV_MAX_PROFILES))
            .unwrap_or(100)
    }

    pub fn resolve_delay_between_profiles_secs(&self) -> u64 {
        self.delay_between_profiles_secs
            .or_else(|| env_parse(ENV_DELAY_BETWEEN_PROFILES))
            .unwrap_or(5)
    }

    pub fn resolve_proxy_server(&self) -> Option<String> {
        self.proxy_server
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| env_string(ENV_PROXY_SERVER))
    }

    pub fn resolve_navigation_timeout_ms(&self) -> u64 {
        self.navigation_timeout_ms
            .or_else(|| env_parse(ENV_NAVIGATION_TIMEOUT_MS))
            .unwrap_or(30_000)
    }

    pub fn resolve_navigation_retry_delay_ms(&self) -> u64 {
        self.navigation_retry_delay_ms.unwrap_or(1_000)
    }

    pub fn resolve_session_probe_url(&self) -> String {
        self.session_probe_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "https://www.linkedin.com/feed/".to_string())
    }

    pub fn resolve_site_root(&self) -> String {
        self.site_root
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "https://www.linkedin.com".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolve_selectors_path(&self) -> Option<PathBuf> {
        self.selectors_path
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| env_string(ENV_SELECTORS))
            .map(PathBuf::from)
    }

    pub fn resolve_session_cookie_name(&self) -> String {
        self.session_cookie_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "li_at".to_string())
    }
}

/// Load `profile-scout.json` from standard locations.
///
/// Search order (first found wins):
/// 1. `PROFILE_SCOUT_CONFIG` env var path
/// 2. `./profile-scout.json`
/// 3. `../profile-scout.json`
///
/// Missing file → `ScoutConfig::default()`.
/// Parse error → log a warning, return `ScoutConfig::default()`.
pub fn load_scout_config() -> ScoutConfig {
    let mut candidates = vec![
        PathBuf::from("profile-scout.json"),
        PathBuf::from("../profile-scout.json"),
    ];
    if let Some(env_path) = env_string(ENV_CONFIG_PATH) {
        candidates.insert(0, PathBuf::from(env_path));
    }

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        return match serde_json::from_str::<ScoutConfig>(&contents) {
            Ok(cfg) => {
                tracing::info!("profile-scout.json loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::warn!(
                    "profile-scout.json parse error at {}: {}, using defaults",
                    path.display(),
                    e
                );
                ScoutConfig::default()
            }
        };
    }

    ScoutConfig::default()
}

/// Optional override for the Chromium-family browser executable.
///
/// Only returns a value when `CHROME_EXECUTABLE` is set to an existing path;
/// otherwise `scraping::browser_manager::find_chrome_executable()` auto-discovers.
pub fn chrome_executable_override() -> Option<String> {
    let p = env_string(ENV_CHROME_EXECUTABLE)?;
    if Path::new(&p).exists() {
        Some(p)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_win_over_defaults() {
        let cfg: ScoutConfig = serde_json::from_str(
            r#"{
                "cookies_path": "/tmp/jar.json",
                "headless": false,
                "max_profiles": 3,
                "navigation_timeout_ms": 1500,
                "site_root": "https://www.linkedin.com/",
                "sync": { "scroll_steps": 2 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_cookies_path(), PathBuf::from("/tmp/jar.json"));
        assert!(!cfg.resolve_headless());
        assert_eq!(cfg.resolve_max_profiles(), 3);
        assert_eq!(cfg.resolve_navigation_timeout_ms(), 1500);
        assert_eq!(cfg.resolve_site_root(), "https://www.linkedin.com");
        assert_eq!(cfg.sync.scroll_steps, 2);
        assert_eq!(cfg.sync.scroll_step_px, SyncBudget::default().scroll_step_px);
    }

    #[test]
    fn empty_file_resolves_to_builtin_defaults() {
        let cfg: ScoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(
            cfg.resolve_session_probe_url(),
            "https://www.linkedin.com/feed/"
        );
        assert_eq!(cfg.resolve_session_cookie_name(), "li_at");
    }
}
