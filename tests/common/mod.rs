#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use profile_scout::scraping::page::{BrowsingPage, NetworkSnapshot};
use profile_scout::scraping::synchronizer::SyncBudget;
use profile_scout::{Cookie, ScoutConfig};

pub const FEED: &str = "https://www.linkedin.com/feed/";
pub const ADA: &str = "https://www.linkedin.com/in/ada-lovelace";
pub const GRACE: &str = "https://www.linkedin.com/in/grace-hopper";
pub const AUTH_WALL: &str = "https://www.linkedin.com/authwall?trk=public_profile&sessionRedirect=x";

pub const ADA_PROFILE: &str = include_str!("../fixtures/ada_profile.html");
pub const ADA_EXPERIENCE: &str = include_str!("../fixtures/ada_experience.html");
pub const ADA_SKILLS: &str = include_str!("../fixtures/ada_skills.html");
pub const ADA_CERTIFICATIONS: &str = include_str!("../fixtures/ada_certifications.html");
pub const ADA_INTERESTS_COMPANIES: &str = include_str!("../fixtures/ada_interests_companies.html");
pub const ADA_RECOMMENDATIONS: &str = include_str!("../fixtures/ada_recommendations.html");
pub const ADA_CONTACT: &str = include_str!("../fixtures/ada_contact.html");
pub const GRACE_PROFILE: &str = include_str!("../fixtures/grace_profile.html");
pub const FEED_PAGE: &str = "<html><body><nav class=\"global-nav\"></nav><main>feed</main></body></html>";

const BLANK: &str = "<html><head></head><body></body></html>";

/// In-memory browsing page: serves fixtures by exact URL, follows scripted
/// redirects, fails scripted gotos and records what the engine did.
#[derive(Default)]
pub struct FakePage {
    routes: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failures: Mutex<HashMap<String, usize>>,
    stalls: HashSet<String>,
    current: Mutex<String>,
    pub visits: Mutex<Vec<String>>,
    pub cookies: Mutex<Vec<Cookie>>,
    pub init_scripts: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default().route(FEED, FEED_PAGE)
    }

    pub fn route(mut self, url: &str, html: &str) -> Self {
        self.routes.insert(url.to_string(), html.to_string());
        self
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// The next `times` gotos to `url` fail with a transport error.
    pub fn fail(self, url: &str, times: usize) -> Self {
        self.failures.lock().unwrap().insert(url.to_string(), times);
        self
    }

    /// Gotos to `url` never complete.
    pub fn stall(mut self, url: &str) -> Self {
        self.stalls.insert(url.to_string());
        self
    }

    /// Fully routed profile of Ada: root, every populated detail page, overlay.
    pub fn with_ada(self) -> Self {
        self.route(ADA, ADA_PROFILE)
            .route(&format!("{ADA}/details/experience/"), ADA_EXPERIENCE)
            .route(&format!("{ADA}/details/skills/"), ADA_SKILLS)
            .route(&format!("{ADA}/details/certifications/"), ADA_CERTIFICATIONS)
            .route(&format!("{ADA}/details/interests/companies/"), ADA_INTERESTS_COMPANIES)
            .route(&format!("{ADA}/details/recommendations/"), ADA_RECOMMENDATIONS)
            .route(&format!("{ADA}/overlay/contact-info/"), ADA_CONTACT)
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn visited(&self, url: &str) -> usize {
        self.visits().iter().filter(|v| v.as_str() == url).count()
    }

    fn html(&self) -> String {
        let current = self.current.lock().unwrap().clone();
        self.routes.get(&current).cloned().unwrap_or_else(|| BLANK.to_string())
    }

    fn exists(&self, css: &str) -> bool {
        let Ok(selector) = Selector::parse(css) else {
            return false;
        };
        let doc = Html::parse_document(&self.html());
        let found = doc.select(&selector).next().is_some();
        found
    }
}

#[async_trait]
impl BrowsingPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visits.lock().unwrap().push(url.to_string());
        if self.stalls.contains(url) {
            std::future::pending::<()>().await;
        }
        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(left) = failures.get_mut(url) {
                if *left > 0 {
                    *left -= 1;
                    return Err(anyhow!("net::ERR_TIMED_OUT"));
                }
            }
        }
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        *self.current.lock().unwrap() = landed;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.html())
    }

    async fn set_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        self.cookies.lock().unwrap().extend_from_slice(cookies);
        Ok(())
    }

    async fn add_init_script(&self, script: &str) -> Result<()> {
        self.init_scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }

    async fn element_exists(&self, css: &str) -> Result<bool> {
        Ok(self.exists(css))
    }

    async fn scroll_to(&self, _y: u64) -> Result<()> {
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64> {
        Ok(2_000)
    }

    async fn click_matching(&self, _css: &str, _text: Option<&str>) -> Result<usize> {
        Ok(0)
    }

    async fn network_snapshot(&self) -> Result<NetworkSnapshot> {
        Ok(NetworkSnapshot {
            ready_complete: true,
            resource_count: 12,
        })
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Config with millisecond budgets and no pacing.
pub fn test_config() -> ScoutConfig {
    ScoutConfig {
        max_profiles: Some(10),
        delay_between_profiles_secs: Some(0),
        navigation_timeout_ms: Some(2_000),
        navigation_retry_delay_ms: Some(5),
        session_probe_url: Some(FEED.to_string()),
        site_root: Some("https://www.linkedin.com".to_string()),
        session_cookie_name: Some("li_at".to_string()),
        sync: SyncBudget {
            poll_interval_ms: 1,
            render_timeout_ms: 10,
            scroll_steps: 2,
            scroll_step_px: 1_000,
            scroll_base_delay_ms: 1,
            scroll_delay_growth_ms: 1,
            expand_settle_ms: 1,
            network_quiet_ms: 2,
            network_timeout_ms: 50,
            skeleton_timeout_ms: 10,
        },
        ..ScoutConfig::default()
    }
}
