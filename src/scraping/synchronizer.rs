//! Page Synchronizer: the bounded wait cascade that brings a freshly
//! navigated page to a state where lazily rendered sections are in the DOM.
//!
//! Order: render signal → dismiss overlays → organic scroll → expand
//! controls → network idle → loading skeletons gone. Every step has its own
//! budget. A step that runs out of budget is recorded in the [`SyncReport`]
//! and the cascade moves on; `settle` never fails.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::page::BrowsingPage;
use crate::extract::selectors::{ClickTarget, SyncSelectors};

/// Time and distance budgets of the cascade (all durations in ms).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncBudget {
    pub poll_interval_ms: u64,
    pub render_timeout_ms: u64,
    /// Upper bound on scroll steps, whatever the page height.
    pub scroll_steps: u32,
    pub scroll_step_px: u64,
    /// Delay after the first scroll step; each later step waits longer.
    pub scroll_base_delay_ms: u64,
    pub scroll_delay_growth_ms: u64,
    pub expand_settle_ms: u64,
    /// No new resource entries for this long counts as idle.
    pub network_quiet_ms: u64,
    pub network_timeout_ms: u64,
    pub skeleton_timeout_ms: u64,
}

impl Default for SyncBudget {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            render_timeout_ms: 10_000,
            scroll_steps: 6,
            scroll_step_px: 800,
            scroll_base_delay_ms: 400,
            scroll_delay_growth_ms: 150,
            expand_settle_ms: 500,
            network_quiet_ms: 1_500,
            network_timeout_ms: 8_000,
            skeleton_timeout_ms: 5_000,
        }
    }
}

/// What to wait for on one particular page.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Any of these attached ends the render wait.
    pub render_signal: Vec<String>,
    pub dismiss: Vec<ClickTarget>,
    pub expand: Vec<ClickTarget>,
    pub loading_markers: Vec<String>,
    pub scroll: bool,
}

impl SyncPlan {
    /// Profile root: full cascade including expanders ("see more" on About).
    pub fn profile(selectors: &SyncSelectors) -> Self {
        Self {
            render_signal: selectors.profile_ready.clone(),
            dismiss: selectors.dismiss.clone(),
            expand: selectors.expand.clone(),
            loading_markers: selectors.loading_markers.clone(),
            scroll: true,
        }
    }

    /// Detail sub-page: lists paginate on scroll, nothing to expand.
    pub fn detail(selectors: &SyncSelectors) -> Self {
        Self {
            render_signal: selectors.detail_ready.clone(),
            dismiss: selectors.dismiss.clone(),
            expand: Vec::new(),
            loading_markers: selectors.loading_markers.clone(),
            scroll: true,
        }
    }

    /// Contact overlay: a modal, nothing to scroll or dismiss.
    pub fn overlay(selectors: &SyncSelectors) -> Self {
        Self {
            render_signal: selectors.overlay_ready.clone(),
            loading_markers: selectors.loading_markers.clone(),
            ..Self::default()
        }
    }

    /// Session probe landing page.
    pub fn landing(selectors: &SyncSelectors) -> Self {
        Self {
            render_signal: selectors.landing_ready.clone(),
            ..Self::default()
        }
    }
}

/// Outcome of one `settle` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub render_signal: bool,
    pub overlays_dismissed: usize,
    /// Offsets actually scrolled to, in order (excluding the return to top).
    pub scroll_offsets: Vec<u64>,
    /// Pause after each scroll step, in order.
    pub scroll_delays_ms: Vec<u64>,
    pub expanded: usize,
    pub network_idle: bool,
    pub skeletons_cleared: bool,
    /// Steps that degraded, for logs.
    pub issues: Vec<String>,
}

impl SyncReport {
    /// `true` when every bounded wait finished inside its budget.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageSynchronizer {
    budget: SyncBudget,
}

impl PageSynchronizer {
    pub fn new(budget: SyncBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> &SyncBudget {
        &self.budget
    }

    pub async fn settle<P: BrowsingPage + ?Sized>(&self, page: &P, plan: &SyncPlan) -> SyncReport {
        let started = Instant::now();
        let mut report = SyncReport::default();

        report.render_signal = self.wait_for_render(page, &plan.render_signal).await;
        if !report.render_signal && !plan.render_signal.is_empty() {
            report.issues.push(format!(
                "render signal not attached within {}ms",
                self.budget.render_timeout_ms
            ));
        }

        report.overlays_dismissed = click_all(page, &plan.dismiss).await;

        if plan.scroll {
            self.organic_scroll(page, &mut report).await;
        }

        if !plan.expand.is_empty() {
            report.expanded = click_all(page, &plan.expand).await;
            if report.expanded > 0 {
                tokio::time::sleep(Duration::from_millis(self.budget.expand_settle_ms)).await;
            }
        }

        report.network_idle = self.wait_for_network_idle(page).await;
        if !report.network_idle {
            report.issues.push(format!(
                "network not idle within {}ms",
                self.budget.network_timeout_ms
            ));
        }

        report.skeletons_cleared = self.wait_for_skeletons(page, &plan.loading_markers).await;
        if !report.skeletons_cleared {
            report.issues.push(format!(
                "loading markers still present after {}ms",
                self.budget.skeleton_timeout_ms
            ));
        }

        if report.is_clean() {
            info!(
                "⏱️ page settled in {}ms ({} scroll steps, {} expanded)",
                started.elapsed().as_millis(),
                report.scroll_offsets.len(),
                report.expanded
            );
        } else {
            warn!(
                "page settled with degraded steps after {}ms: {}",
                started.elapsed().as_millis(),
                report.issues.join("; ")
            );
        }
        report
    }

    /// Poll until any of `selectors` is attached. An empty list succeeds at once.
    async fn wait_for_render<P: BrowsingPage + ?Sized>(&self, page: &P, selectors: &[String]) -> bool {
        if selectors.is_empty() {
            return true;
        }
        let deadline = Instant::now() + Duration::from_millis(self.budget.render_timeout_ms);
        loop {
            for css in selectors {
                if page.element_exists(css).await.unwrap_or(false) {
                    debug!("render signal '{}' attached", css);
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(self.budget.poll_interval_ms)).await;
        }
    }

    /// Step down the page at strictly increasing offsets, pausing a little
    /// longer after each step, then return to the top.
    async fn organic_scroll<P: BrowsingPage + ?Sized>(&self, page: &P, report: &mut SyncReport) {
        let plan = scroll_plan(&self.budget, page.scroll_height().await.ok());
        for (offset, delay) in plan {
            if let Err(e) = page.scroll_to(offset).await {
                warn!("scroll to {} failed: {}", offset, e);
                report.issues.push(format!("scroll interrupted at {offset}px"));
                break;
            }
            report.scroll_offsets.push(offset);
            report.scroll_delays_ms.push(delay);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if let Err(e) = page.scroll_to(0).await {
            debug!("scroll back to top failed: {}", e);
        }
    }

    /// Playwright-style networkidle: document complete and the resource-entry
    /// count unchanged for `network_quiet_ms`.
    async fn wait_for_network_idle<P: BrowsingPage + ?Sized>(&self, page: &P) -> bool {
        let start = Instant::now();
        let mut last_count = 0u64;
        let mut stable_since = Instant::now();

        loop {
            if start.elapsed().as_millis() as u64 >= self.budget.network_timeout_ms {
                return false;
            }
            let snap = page.network_snapshot().await.unwrap_or_default();
            if !snap.ready_complete || snap.resource_count != last_count {
                last_count = snap.resource_count;
                stable_since = Instant::now();
            } else if stable_since.elapsed().as_millis() as u64 >= self.budget.network_quiet_ms {
                debug!(
                    "network idle after {}ms ({} resources)",
                    start.elapsed().as_millis(),
                    snap.resource_count
                );
                return true;
            }
            tokio::time::sleep(Duration::from_millis(self.budget.poll_interval_ms)).await;
        }
    }

    async fn wait_for_skeletons<P: BrowsingPage + ?Sized>(&self, page: &P, markers: &[String]) -> bool {
        let deadline = Instant::now() + Duration::from_millis(self.budget.skeleton_timeout_ms);
        loop {
            let mut present = false;
            for css in markers {
                if page.element_exists(css).await.unwrap_or(false) {
                    present = true;
                    break;
                }
            }
            if !present {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(self.budget.poll_interval_ms)).await;
        }
    }
}

async fn click_all<P: BrowsingPage + ?Sized>(page: &P, targets: &[ClickTarget]) -> usize {
    let mut clicked = 0;
    for target in targets {
        match page.click_matching(&target.css, target.has_text.as_deref()).await {
            Ok(n) => clicked += n,
            Err(e) => debug!("click '{}' skipped: {}", target.css, e),
        }
    }
    clicked
}

/// `(offset, delay_ms)` per scroll step.
///
/// Offsets advance by `scroll_step_px` and delays by at least 1ms per step,
/// so both sequences are strictly increasing. The step count covers the page
/// height when it is known and never exceeds `scroll_steps`.
pub fn scroll_plan(budget: &SyncBudget, page_height: Option<u64>) -> Vec<(u64, u64)> {
    let step_px = budget.scroll_step_px.max(1);
    let cap = u64::from(budget.scroll_steps);
    let steps = match page_height {
        Some(h) if h > 0 => h.div_ceil(step_px).clamp(1, cap.max(1)),
        _ => cap,
    };
    let growth = budget.scroll_delay_growth_ms.max(1);
    (1..=steps)
        .map(|i| (i * step_px, budget.scroll_base_delay_ms + (i - 1) * growth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::page::NetworkSnapshot;
    use crate::types::Cookie;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn quick_budget() -> SyncBudget {
        SyncBudget {
            poll_interval_ms: 1,
            render_timeout_ms: 20,
            scroll_steps: 4,
            scroll_step_px: 500,
            scroll_base_delay_ms: 1,
            scroll_delay_growth_ms: 1,
            expand_settle_ms: 1,
            network_quiet_ms: 3,
            network_timeout_ms: 40,
            skeleton_timeout_ms: 15,
        }
    }

    /// Scripted page: `present` selectors exist, everything else is absent.
    #[derive(Default)]
    struct ScriptedPage {
        present: Vec<&'static str>,
        height: u64,
        idle: bool,
        scrolls: Mutex<Vec<u64>>,
        clicks: Mutex<Vec<String>>,
        resource_ticks: Mutex<u64>,
    }

    #[async_trait]
    impl BrowsingPage for ScriptedPage {
        async fn goto(&self, _url: &str) -> Result<()> {
            Ok(())
        }
        async fn current_url(&self) -> Result<String> {
            Ok("https://www.linkedin.com/in/ada".into())
        }
        async fn content(&self) -> Result<String> {
            Ok(String::new())
        }
        async fn set_cookies(&self, _cookies: &[Cookie]) -> Result<()> {
            Ok(())
        }
        async fn add_init_script(&self, _script: &str) -> Result<()> {
            Ok(())
        }
        async fn element_exists(&self, css: &str) -> Result<bool> {
            Ok(self.present.contains(&css))
        }
        async fn scroll_to(&self, y: u64) -> Result<()> {
            self.scrolls.lock().unwrap().push(y);
            Ok(())
        }
        async fn scroll_height(&self) -> Result<u64> {
            if self.height == 0 {
                Err(anyhow!("no body"))
            } else {
                Ok(self.height)
            }
        }
        async fn click_matching(&self, css: &str, _text: Option<&str>) -> Result<usize> {
            if self.present.contains(&css) {
                self.clicks.lock().unwrap().push(css.to_string());
                Ok(1)
            } else {
                Ok(0)
            }
        }
        async fn network_snapshot(&self) -> Result<NetworkSnapshot> {
            let mut ticks = self.resource_ticks.lock().unwrap();
            if !self.idle {
                *ticks += 1;
            }
            Ok(NetworkSnapshot {
                ready_complete: true,
                resource_count: *ticks,
            })
        }
        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    fn plan() -> SyncPlan {
        SyncPlan {
            render_signal: vec!["h1".into()],
            dismiss: vec![ClickTarget::css("button.toast")],
            expand: vec![ClickTarget::with_text("button", "see more")],
            loading_markers: vec![".artdeco-loader".into()],
            scroll: true,
        }
    }

    #[test]
    fn scroll_offsets_and_delays_strictly_increase() {
        let budget = SyncBudget::default();
        let steps = scroll_plan(&budget, Some(100_000));
        assert_eq!(steps.len(), budget.scroll_steps as usize);
        for pair in steps.windows(2) {
            assert!(pair[1].0 > pair[0].0);
            assert!(pair[1].1 > pair[0].1);
        }
    }

    #[test]
    fn scroll_steps_follow_short_pages_and_unknown_heights() {
        let budget = SyncBudget {
            scroll_steps: 10,
            scroll_step_px: 800,
            scroll_delay_growth_ms: 0,
            ..SyncBudget::default()
        };
        assert_eq!(scroll_plan(&budget, Some(1_700)).len(), 3);
        assert_eq!(scroll_plan(&budget, Some(10)).len(), 1);
        let unknown = scroll_plan(&budget, None);
        assert_eq!(unknown.len(), 10);
        assert!(unknown[1].1 > unknown[0].1);
    }

    #[tokio::test]
    async fn settled_page_reports_clean_cascade() {
        let page = ScriptedPage {
            present: vec!["h1", "button.toast", "button"],
            height: 1_200,
            idle: true,
            ..Default::default()
        };
        let sync = PageSynchronizer::new(quick_budget());
        let report = sync.settle(&page, &plan()).await;

        assert!(report.render_signal);
        assert_eq!(report.overlays_dismissed, 1);
        assert_eq!(report.expanded, 1);
        assert_eq!(report.scroll_offsets, vec![500, 1_000, 1_500]);
        assert!(report.network_idle);
        assert!(report.skeletons_cleared);
        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(page.scrolls.lock().unwrap().last(), Some(&0));
    }

    #[tokio::test]
    async fn stalls_degrade_instead_of_failing() {
        let page = ScriptedPage {
            present: vec![".artdeco-loader"],
            height: 0,
            idle: false,
            ..Default::default()
        };
        let sync = PageSynchronizer::new(quick_budget());
        let report = sync.settle(&page, &plan()).await;

        assert!(!report.render_signal);
        assert!(!report.network_idle);
        assert!(!report.skeletons_cleared);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.scroll_offsets.len(), 4);
    }
}
