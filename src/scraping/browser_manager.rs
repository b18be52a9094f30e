//! Native browser management using `chromiumoxide`.
//!
//! This module is the **single source of truth** for:
//! * Finding a usable browser executable (Brave → Chrome → Chromium, cross-platform).
//! * Launching one headless (or headed) browser session for a scraping run.
//! * [`ChromePage`], the CDP implementation of [`BrowsingPage`].
//!
//! Stealth model:
//! - This module provides *process-level* defaults (user-agent rotation, browser flags, proxy).
//! - JS-level masking is registered per page by [`super::stealth::install`].

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, SetCookiesParams};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use rand::seq::IndexedRandom;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::page::{BrowsingPage, NetworkSnapshot};
use crate::core::config::{chrome_executable_override, ScoutConfig};
use crate::types::Cookie;

// ── Realistic User-Agent pool ────────────────────────────────────────────────

// Chromium-family only: the engine *is* Chromium, so a Firefox/Safari UA would
// contradict every other fingerprint the page can read.
const DESKTOP_USER_AGENTS: &[&str] = &[
    // Chrome 132 – Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36",
    // Chrome 132 – macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36",
    // Chrome 131 – Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Edge 132 – Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36 Edg/132.0.0.0",
];

/// Returns a randomly-chosen realistic desktop User-Agent string.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    DESKTOP_USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(DESKTOP_USER_AGENTS[0])
}

// ── Browser executable discovery ─────────────────────────────────────────────

/// Find a usable Chromium-family browser executable.
///
/// Resolution order:
/// 1. `CHROME_EXECUTABLE` env var (explicit override)
/// 2. PATH lookup – finds package-manager installs on all platforms.
/// 3. OS-specific well-known install paths.
pub fn find_chrome_executable() -> Option<String> {
    if let Some(p) = chrome_executable_override() {
        return Some(p);
    }

    for exe in [
        "brave-browser",
        "brave",
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ] {
        if let Ok(path) = which::which(exe) {
            return Some(path.to_string_lossy().to_string());
        }
    }

    #[cfg(target_os = "macos")]
    let candidates: &[&str] = &[
        "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    #[cfg(target_os = "linux")]
    let candidates: &[&str] = &[
        "/usr/bin/brave-browser",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/usr/local/bin/chromium",
        "/snap/bin/chromium",
    ];
    #[cfg(target_os = "windows")]
    let candidates: &[&str] = &[
        r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
    ];
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let candidates: &[&str] = &[];

    candidates
        .iter()
        .find(|c| Path::new(c).exists())
        .map(|c| c.to_string())
}

// ── Browser config builder ───────────────────────────────────────────────────

/// Build a `BrowserConfig` with stealth defaults.
///
/// Flags:
/// * Compatibility with CI / restricted environments (`--no-sandbox`, `--disable-dev-shm-usage`).
/// * Stealth: `--disable-blink-features=AutomationControlled` hides the
///   `navigator.webdriver` flag; UA is randomly drawn from `DESKTOP_USER_AGENTS`.
pub fn build_browser_config(
    exe: &str,
    proxy_url: Option<&str>,
    headless: bool,
    width: u32,
    height: u32,
) -> Result<BrowserConfig> {
    let ua = random_user_agent();

    let mut builder = BrowserConfig::builder()
        .chrome_executable(exe)
        .viewport(Viewport {
            width,
            height,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .window_size(width, height)
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--disable-sync")
        .arg("--disable-translate")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--mute-audio")
        .arg("--lang=en-US")
        .arg("--disable-blink-features=AutomationControlled")
        .arg(format!("--user-agent={}", ua));

    if !headless {
        builder = builder.with_head();
    }
    if let Some(proxy) = proxy_url {
        builder = builder.arg(format!("--proxy-server={}", proxy));
    }

    builder
        .build()
        .map_err(|e| anyhow!("Failed to build browser config: {}", e))
}

// ── Browser session ──────────────────────────────────────────────────────────

/// One browser process with one tab, owned by a single scraping run.
///
/// Acquired at the start of the run and released by [`BrowserSession::shutdown`];
/// there is no pooling across runs.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: ChromePage,
}

impl BrowserSession {
    pub async fn launch(config: &ScoutConfig) -> Result<Self> {
        let exe = find_chrome_executable().ok_or_else(|| {
            anyhow!("No browser found. Install Brave, Chrome, or Chromium. Set CHROME_EXECUTABLE if installed in a non-standard location.")
        })?;
        let headless = config.resolve_headless();
        let proxy = config.resolve_proxy_server();

        info!(
            "🚀 launching browser ({}, headless={}, proxy={})",
            exe,
            headless,
            proxy.as_deref().unwrap_or("none")
        );
        let browser_config = build_browser_config(&exe, proxy.as_deref(), headless, 1920, 1080)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| anyhow!("Failed to launch browser ({}): {}", exe, e))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("CDP handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("Failed to open tab: {}", e))?;

        Ok(Self {
            browser,
            handler,
            page: ChromePage::new(page),
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// Close the tab and the browser process.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.page.close().await {
            warn!("Tab close error (non-fatal): {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("Browser close error (non-fatal): {}", e);
        }
        self.browser.wait().await.ok();
        self.handler.abort();
        info!("🛑 browser session closed");
    }
}

// ── CDP page ─────────────────────────────────────────────────────────────────

/// [`BrowsingPage`] over a chromiumoxide tab.
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval_json(&self, expression: String) -> Result<serde_json::Value> {
        self.page
            .evaluate(expression)
            .await
            .map_err(|e| anyhow!("evaluate failed: {}", e))?
            .into_value::<serde_json::Value>()
            .map_err(|e| anyhow!("evaluate result: {}", e))
    }
}

/// JS string literal for `s`.
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// CDP `CookieParam` for one cookie. Session-scoped expiries (`-1`) are
/// dropped rather than sent as a past date.
fn to_cookie_param(cookie: &Cookie) -> Option<CookieParam> {
    if cookie.domain.is_empty() {
        return None;
    }
    let mut value = serde_json::to_value(cookie).ok()?;
    if cookie.expires.is_some_and(|e| e <= 0.0) {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("expires");
        }
    }
    serde_json::from_value::<CookieParam>(value).ok()
}

#[async_trait]
impl BrowsingPage for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| anyhow!("Failed to navigate: {}", e))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(|e| anyhow!("Failed to read url: {}", e))?
            .unwrap_or_default())
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| anyhow!("Failed to get page content: {}", e))
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        let params: Vec<CookieParam> = cookies.iter().filter_map(to_cookie_param).collect();
        if params.len() < cookies.len() {
            warn!(
                "skipped {} cookies without a usable domain",
                cookies.len() - params.len()
            );
        }
        if params.is_empty() {
            return Err(anyhow!("no valid CookieParams to inject"));
        }
        self.page
            .execute(SetCookiesParams::new(params))
            .await
            .map_err(|e| anyhow!("Failed to set cookies: {}", e))?;
        Ok(())
    }

    async fn add_init_script(&self, script: &str) -> Result<()> {
        self.page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(script.to_string()))
            .await
            .map_err(|e| anyhow!("Failed to inject init script: {}", e))?;
        Ok(())
    }

    async fn element_exists(&self, css: &str) -> Result<bool> {
        let v = self
            .eval_json(format!(
                "(() => {{ try {{ return document.querySelector({}) !== null; }} catch (e) {{ return false; }} }})()",
                js_str(css)
            ))
            .await?;
        Ok(v.as_bool().unwrap_or(false))
    }

    async fn scroll_to(&self, y: u64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollTo({{top: {y}, behavior: 'smooth'}});"))
            .await
            .map_err(|e| anyhow!("scroll failed: {}", e))?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64> {
        let v = self
            .eval_json(
                "Math.max(document.body.scrollHeight, document.documentElement.scrollHeight)"
                    .to_string(),
            )
            .await?;
        v.as_u64().ok_or_else(|| anyhow!("scrollHeight not a number"))
    }

    async fn click_matching(&self, css: &str, text: Option<&str>) -> Result<usize> {
        let needle = text
            .map(|t| js_str(&t.to_lowercase()))
            .unwrap_or_else(|| "null".to_string());
        let v = self
            .eval_json(format!(
                r#"(() => {{
                    const needle = {needle};
                    let clicked = 0;
                    let nodes = [];
                    try {{ nodes = document.querySelectorAll({css}); }} catch (e) {{ return 0; }}
                    for (const el of nodes) {{
                        if (needle && !(el.innerText || '').toLowerCase().includes(needle)) continue;
                        try {{ el.click(); clicked++; }} catch (e) {{}}
                    }}
                    return clicked;
                }})()"#,
                needle = needle,
                css = js_str(css)
            ))
            .await?;
        Ok(v.as_u64().unwrap_or(0) as usize)
    }

    async fn network_snapshot(&self) -> Result<NetworkSnapshot> {
        let v = self
            .eval_json(
                "({ ready: document.readyState === 'complete', resources: performance.getEntriesByType('resource').length })"
                    .to_string(),
            )
            .await?;
        Ok(NetworkSnapshot {
            ready_complete: v.get("ready").and_then(|r| r.as_bool()).unwrap_or(false),
            resource_count: v.get("resources").and_then(|r| r.as_u64()).unwrap_or(0),
        })
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| anyhow!("Failed to close tab: {}", e))
    }
}
