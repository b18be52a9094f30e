//! The seam between the engine and a live browsing context.
//!
//! Everything above this trait (synchronizer, navigation, engine) is written
//! against [`BrowsingPage`], so it runs unchanged against the Chromium CDP
//! page in [`super::browser_manager`] and against in-memory pages in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Cookie;

/// Point-in-time network/document state used for the idle heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    /// `document.readyState == "complete"`.
    pub ready_complete: bool,
    /// Number of resource-timing entries recorded so far.
    pub resource_count: u64,
}

#[async_trait]
pub trait BrowsingPage: Send + Sync {
    /// Navigate and wait for the navigation to commit.
    async fn goto(&self, url: &str) -> Result<()>;

    /// URL of the document currently loaded (after any redirects).
    async fn current_url(&self) -> Result<String>;

    /// Serialized DOM of the current document.
    async fn content(&self) -> Result<String>;

    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()>;

    /// Register a script evaluated before any page script on every new document.
    async fn add_init_script(&self, script: &str) -> Result<()>;

    async fn element_exists(&self, css: &str) -> Result<bool>;

    async fn scroll_to(&self, y: u64) -> Result<()>;

    async fn scroll_height(&self) -> Result<u64>;

    /// Click every element matching `css` whose visible text contains
    /// `text` (case-insensitive) when given. Returns the number clicked.
    async fn click_matching(&self, css: &str, text: Option<&str>) -> Result<usize>;

    async fn network_snapshot(&self) -> Result<NetworkSnapshot>;

    async fn close(&self) -> Result<()>;
}
