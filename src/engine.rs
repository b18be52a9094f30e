//! Profile extraction engine.
//!
//! One [`ProfileScout`] owns one browsing page for its lifetime and works
//! through profiles strictly one after another: root page, detail sub-pages,
//! back to the root, contact overlay, then assembly. Only an auth-wall or an
//! unrecoverable root navigation fails a profile; everything else degrades to
//! empty sections.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use scraper::ElementRef;
use tracing::{error, info, warn};

use crate::core::config::ScoutConfig;
use crate::core::error::ScoutError;
use crate::extract::assembler::{assemble, ProfileParts};
use crate::extract::normalize::{normalize_profile_url, public_identifier};
use crate::extract::sections::interests::InterestTab;
use crate::extract::sections::{
    about, certifications, contact, current_role, education, experience, identity, interests,
    languages, media, recommendations, skills,
};
use crate::extract::selectors::SelectorTable;
use crate::features::pacing::RequestDelay;
use crate::features::session_store::{self, has_session_cookie, session_cookie_expiry};
use crate::scraping::navigation::{DetailSection, NavigationController, PageHandle, PagePurpose};
use crate::scraping::page::BrowsingPage;
use crate::scraping::synchronizer::PageSynchronizer;
use crate::types::{BatchOutcome, Cookie, ProfileFailure, ProfileRecord};

/// What a batch does after a profile hits the auth-wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthWallPolicy {
    /// Stop the run; later profiles would hit the same wall.
    #[default]
    Stop,
    Continue,
}

/// Parse a snapshot and run `f` on its root element.
///
/// Keeps the non-`Send` DOM out of every `.await` in the engine.
fn on_document<T>(handle: &PageHandle, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
    let doc = handle.document();
    f(doc.root_element())
}

pub struct ProfileScout<P: BrowsingPage> {
    page: P,
    config: ScoutConfig,
    selectors: SelectorTable,
    sync: PageSynchronizer,
    delay: RequestDelay,
}

impl<P: BrowsingPage> ProfileScout<P> {
    pub fn new(page: P, config: ScoutConfig, selectors: SelectorTable) -> Self {
        let sync = PageSynchronizer::new(config.sync.clone());
        let delay = RequestDelay::around_secs(config.resolve_delay_between_profiles_secs());
        Self {
            page,
            config,
            selectors,
            sync,
            delay,
        }
    }

    pub fn with_delay(mut self, delay: RequestDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    fn navigator(&self, root: &str) -> NavigationController<'_, P> {
        NavigationController::new(
            &self.page,
            &self.sync,
            &self.selectors.sync,
            root,
            Duration::from_millis(self.config.resolve_navigation_timeout_ms()),
        )
        .with_retry_delay(Duration::from_millis(
            self.config.resolve_navigation_retry_delay_ms(),
        ))
    }

    /// Inject the cookie jar (with `www` / bare-domain twins) before any
    /// navigation. A missing or expired session cookie is only a warning:
    /// the session probe decides.
    pub async fn install_cookies(&self, cookies: Vec<Cookie>) -> anyhow::Result<usize> {
        let name = self.config.resolve_session_cookie_name();
        if !has_session_cookie(&cookies, &name) {
            warn!("🍪 no '{}' cookie in the jar; expect an auth-wall", name);
        } else if let Some(expiry) = session_cookie_expiry(&cookies, &name) {
            if expiry < Utc::now() {
                warn!("🍪 '{}' expired at {}; export a fresh cookie jar", name, expiry.to_rfc3339());
            } else {
                info!("🍪 '{}' valid until {}", name, expiry.to_rfc3339());
            }
        }
        session_store::inject(&self.page, cookies).await
    }

    /// Load the authenticated landing page once before any profile.
    pub async fn validate_session(&self) -> Result<(), ScoutError> {
        let probe = self.config.resolve_session_probe_url();
        self.navigator(&probe)
            .visit(&probe, PagePurpose::SessionProbe)
            .await?;
        info!("✅ session accepted at {}", probe);
        Ok(())
    }

    /// Canonical root URL for `raw`, rebuilt as `{site_root}/in/{id}` so a
    /// sub-page link (`/details/...`, `/recent-activity/...`) still yields
    /// the profile root. Site-relative paths are accepted.
    pub fn profile_url(&self, raw: &str) -> Result<String, ScoutError> {
        let raw = raw.trim();
        let site_root = self.config.resolve_site_root();
        let site_root = site_root.trim_end_matches('/');
        let absolute = if raw.starts_with('/') {
            format!("{}{}", site_root, raw)
        } else {
            raw.to_string()
        };
        let id = public_identifier(&normalize_profile_url(&absolute));
        if id.is_empty() {
            return Err(ScoutError::InvalidProfileUrl(raw.to_string()));
        }
        Ok(format!("{}/in/{}", site_root, id))
    }

    async fn detail(
        &self,
        nav: &NavigationController<'_, P>,
        section: DetailSection,
    ) -> Option<PageHandle> {
        match nav.visit_detail(section).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("section details/{} skipped: {}", section.path(), e);
                None
            }
        }
    }

    pub async fn scrape_profile(&self, raw_url: &str) -> Result<ProfileRecord, ScoutError> {
        let url = self.profile_url(raw_url)?;
        info!("👤 scraping {}", url);
        let table = &self.selectors;
        let nav = self.navigator(&url);

        let root = nav.visit(&url, PagePurpose::Profile).await?;
        let mut parts = on_document(&root, |doc| ProfileParts {
            linkedin_url: url.clone(),
            identity: identity::extract(doc, &table.identity, &root.url),
            media: media::extract(doc, &table.media),
            current_role: current_role::extract(doc, &table.current_role),
            about: about::extract(doc, &table.about),
            languages: languages::extract(doc, table),
            ..ProfileParts::default()
        });
        if parts.identity.full_name.is_empty() {
            warn!("no name resolved on {}; the selector table may be stale", root.url);
        }

        if let Some(page) = self.detail(&nav, DetailSection::Experience).await {
            parts.experiences = on_document(&page, |doc| experience::extract(doc, None, table));
        }
        if let Some(page) = self.detail(&nav, DetailSection::Skills).await {
            parts.skills = on_document(&page, |doc| skills::extract(doc, None, table));
        }
        if let Some(page) = self.detail(&nav, DetailSection::Education).await {
            parts.educations = on_document(&page, |doc| education::extract(doc, None, table));
        }
        if let Some(page) = self.detail(&nav, DetailSection::Certifications).await {
            parts.certifications = on_document(&page, |doc| certifications::extract(doc, table));
        }
        for tab in InterestTab::ALL {
            if let Some(page) = self.detail(&nav, DetailSection::Interests(tab)).await {
                parts.interests.extend(on_document(&page, |doc| {
                    interests::extract(doc, tab, &table.list)
                }));
            }
        }
        if let Some(page) = self.detail(&nav, DetailSection::Recommendations).await {
            parts.recommendations.extend(on_document(&page, |doc| {
                recommendations::extract_received(doc, table)
            }));
        }

        let root = match nav.return_to_root().await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!("return to {} failed, using the first snapshot: {}", url, e);
                root
            }
        };
        self.apply_root_fallbacks(&root, &mut parts);

        match nav.visit_overlay().await {
            Ok(overlay) => {
                parts.contact = on_document(&overlay, |doc| contact::extract(doc, &table.contact));
            }
            Err(e) => warn!("contact overlay skipped: {}", e),
        }

        parts.scraped_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let record = assemble(parts);
        info!(
            "✅ {} ({} experiences, {} skills, {} educations)",
            if record.full_name.is_empty() { &record.linkedin_url } else { &record.full_name },
            record.experiences.len(),
            record.skills.len(),
            record.educations.len()
        );
        Ok(record)
    }

    /// Sections whose detail page yielded nothing are read from the root
    /// page's cards; the current role falls back to the first experience.
    fn apply_root_fallbacks(&self, root: &PageHandle, parts: &mut ProfileParts) {
        let table = &self.selectors;
        on_document(root, |doc| {
            if parts.experiences.is_empty() {
                parts.experiences =
                    experience::extract(doc, Some(&table.experience.root_section), table);
                if !parts.experiences.is_empty() {
                    info!("experience read from the profile card");
                }
            }
            if parts.educations.is_empty() {
                parts.educations =
                    education::extract(doc, Some(&table.education.root_section), table);
            }
            if parts.skills.items.is_empty() {
                parts.skills = skills::extract(doc, Some(&table.skills.root_section), table);
            }
        });
        if parts.current_role.is_empty() {
            parts.current_role = current_role::from_experience(&parts.experiences);
        }
    }

    /// Scrape `urls` in order, one at a time, pausing between profiles.
    pub async fn scrape_all(&self, urls: &[String], policy: AuthWallPolicy) -> BatchOutcome {
        let cap = self.config.resolve_max_profiles();
        if urls.len() > cap {
            warn!("{} profiles requested, capped at {}", urls.len(), cap);
        }
        let batch = &urls[..urls.len().min(cap)];
        let mut outcome = BatchOutcome::default();

        for (i, url) in batch.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, batch.len(), url);
            match self.scrape_profile(url).await {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    error!("❌ {}: {}", url, e);
                    let fatal = e.is_session_fatal();
                    outcome.failures.push(ProfileFailure {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                    if fatal && policy == AuthWallPolicy::Stop {
                        warn!("session rejected, stopping after {} of {} profiles", i + 1, batch.len());
                        outcome.aborted = true;
                        break;
                    }
                }
            }
            if i + 1 < batch.len() {
                self.delay.pause().await;
            }
        }

        info!(
            "🏁 run finished: {} scraped, {} failed{}",
            outcome.records.len(),
            outcome.failures.len(),
            if outcome.aborted { " (aborted)" } else { "" }
        );
        outcome
    }
}
