//! Navigation Controller.
//!
//! Sequences visits across one profile: the root page, its
//! `details/<section>/` sub-pages and the contact overlay. Every visit is
//! `goto` under a timeout (retried once) → session check → settle → DOM
//! snapshot. Extractors work on the snapshot, so nothing on a page has to
//! stay loaded once its [`PageHandle`] exists.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use backoff::future::retry;
use backoff::ExponentialBackoffBuilder;
use scraper::Html;
use tracing::{debug, info, warn};

use super::page::BrowsingPage;
use super::synchronizer::{PageSynchronizer, SyncPlan, SyncReport};
use crate::core::error::ScoutError;
use crate::extract::sections::interests::InterestTab;
use crate::extract::selectors::SyncSelectors;
use crate::features::session_validator::classify;
use crate::types::SessionState;

const MAX_ATTEMPTS: usize = 2;

/// Sections whose full list is only rendered on a dedicated sub-page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSection {
    Experience,
    Education,
    Skills,
    Certifications,
    Interests(InterestTab),
    Recommendations,
}

impl DetailSection {
    /// Path below `details/`, without slashes at either end.
    pub fn path(&self) -> String {
        match self {
            DetailSection::Experience => "experience".to_string(),
            DetailSection::Education => "education".to_string(),
            DetailSection::Skills => "skills".to_string(),
            DetailSection::Certifications => "certifications".to_string(),
            DetailSection::Interests(tab) => format!("interests/{}", tab.slug()),
            DetailSection::Recommendations => "recommendations".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePurpose {
    SessionProbe,
    Profile,
    Detail(DetailSection),
    ContactOverlay,
}

impl PagePurpose {
    fn plan(&self, selectors: &SyncSelectors) -> SyncPlan {
        match self {
            PagePurpose::SessionProbe => SyncPlan::landing(selectors),
            PagePurpose::Profile => SyncPlan::profile(selectors),
            PagePurpose::Detail(_) => SyncPlan::detail(selectors),
            PagePurpose::ContactOverlay => SyncPlan::overlay(selectors),
        }
    }
}

/// A settled page, captured as serialized DOM.
#[derive(Debug, Clone)]
pub struct PageHandle {
    /// Where the navigation actually landed.
    pub url: String,
    pub html: String,
    pub state: SessionState,
    pub sync: SyncReport,
}

impl PageHandle {
    /// Parsed snapshot. `Html` is not `Send`: parse, extract and drop it
    /// without holding it across an `.await`.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

enum NavFailure {
    AuthWall(String),
    Transport(String),
}

pub struct NavigationController<'a, P: BrowsingPage + ?Sized> {
    page: &'a P,
    sync: &'a PageSynchronizer,
    selectors: &'a SyncSelectors,
    root_url: String,
    timeout: Duration,
    retry_delay: Duration,
}

impl<'a, P: BrowsingPage + ?Sized> NavigationController<'a, P> {
    pub fn new(
        page: &'a P,
        sync: &'a PageSynchronizer,
        selectors: &'a SyncSelectors,
        root_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            page,
            sync,
            selectors,
            root_url: root_url.into().trim_end_matches('/').to_string(),
            timeout,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn detail_url(&self, section: DetailSection) -> String {
        format!("{}/details/{}/", self.root_url, section.path())
    }

    pub fn overlay_url(&self) -> String {
        format!("{}/overlay/contact-info/", self.root_url)
    }

    /// Navigate to `url` and bring it to a settled, authenticated state.
    ///
    /// Transport failures, timeouts and landings on a non-web page are
    /// retried once. An auth-wall is never retried.
    pub async fn visit(&self, url: &str, purpose: PagePurpose) -> Result<PageHandle, ScoutError> {
        let attempts = AtomicUsize::new(0);
        let landed = retry(
            ExponentialBackoffBuilder::new()
                .with_initial_interval(self.retry_delay)
                .with_max_interval(self.retry_delay * 2)
                .with_max_elapsed_time(Some(self.timeout * MAX_ATTEMPTS as u32 + self.retry_delay * 2))
                .build(),
            || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    match self.attempt(url).await {
                        Ok(landed) => Ok(landed),
                        Err(NavFailure::AuthWall(at)) => {
                            Err(backoff::Error::permanent(NavFailure::AuthWall(at)))
                        }
                        Err(NavFailure::Transport(reason)) if attempt >= MAX_ATTEMPTS => {
                            Err(backoff::Error::permanent(NavFailure::Transport(reason)))
                        }
                        Err(NavFailure::Transport(reason)) => {
                            warn!("navigation to {} failed (attempt {}): {}, retrying", url, attempt, reason);
                            Err(backoff::Error::transient(NavFailure::Transport(reason)))
                        }
                    }
                }
            },
        )
        .await;

        let landed = match landed {
            Ok(landed) => landed,
            Err(NavFailure::AuthWall(at)) => {
                warn!("🔒 auth-wall at {} (requested {})", at, url);
                return Err(ScoutError::AuthWall { url: at });
            }
            Err(NavFailure::Transport(reason)) => {
                return Err(ScoutError::Navigation {
                    url: url.to_string(),
                    attempts: attempts.load(Ordering::SeqCst),
                    reason,
                });
            }
        };

        let report = self.sync.settle(self.page, &purpose.plan(self.selectors)).await;
        let html = self.page.content().await.map_err(|e| ScoutError::Navigation {
            url: url.to_string(),
            attempts: attempts.load(Ordering::SeqCst),
            reason: format!("snapshot failed: {e}"),
        })?;

        debug!("visited {} ({:?}, {} bytes)", landed, purpose, html.len());
        Ok(PageHandle {
            url: landed,
            html,
            state: SessionState::Authenticated,
            sync: report,
        })
    }

    async fn attempt(&self, url: &str) -> Result<String, NavFailure> {
        match tokio::time::timeout(self.timeout, self.page.goto(url)).await {
            Err(_) => {
                return Err(NavFailure::Transport(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
            Ok(Err(e)) => return Err(NavFailure::Transport(e.to_string())),
            Ok(Ok(())) => {}
        }

        let landed = self
            .page
            .current_url()
            .await
            .map_err(|e| NavFailure::Transport(format!("no current url: {e}")))?;
        match classify(&landed) {
            SessionState::Authenticated => Ok(landed),
            SessionState::AuthWall => Err(NavFailure::AuthWall(landed)),
            SessionState::Unknown => Err(NavFailure::Transport(format!(
                "landed on non-web page '{landed}'"
            ))),
        }
    }

    pub async fn visit_detail(&self, section: DetailSection) -> Result<PageHandle, ScoutError> {
        let url = self.detail_url(section);
        info!("📄 details/{}", section.path());
        self.visit(&url, PagePurpose::Detail(section)).await
    }

    pub async fn visit_overlay(&self) -> Result<PageHandle, ScoutError> {
        let url = self.overlay_url();
        self.visit(&url, PagePurpose::ContactOverlay).await
    }

    /// Back to the profile root before root-page-only work resumes.
    pub async fn return_to_root(&self) -> Result<PageHandle, ScoutError> {
        let url = self.root_url.clone();
        self.visit(&url, PagePurpose::Profile).await
    }
}
