//! Versioned selector table.
//!
//! Every locator the engine uses lives here as data. Markup drift is fixed by
//! editing the table (or dropping a JSON overlay next to the binary) rather
//! than by touching extractor code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::resolver::{Candidate, ContextField, SelectorStrategy, Validator};
use crate::core::error::ScoutError;

/// Bumped whenever the built-in candidates change.
pub const SELECTOR_TABLE_VERSION: &str = "2025.10";

const ARIA_TEXT: &str = r#"span[aria-hidden="true"]"#;

fn strategy(field: &str, candidates: Vec<Candidate>) -> SelectorStrategy {
    SelectorStrategy::new(field, candidates)
}

/// `section` containing the anchor div with the given id (`div#experience`,
/// `div#education`, ...), falling back to a heading text match.
fn anchored_section(field: &str, anchor_id: &str, heading: &str) -> SelectorStrategy {
    strategy(
        field,
        vec![
            Candidate::css("section.artdeco-card").has(format!("div#{anchor_id}")),
            Candidate::css("section").has(format!("div#{anchor_id}")),
            Candidate::css(format!(r#"section[data-section="{anchor_id}"]"#)),
            Candidate::css("section.artdeco-card").has_text(heading),
        ],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

/// A control the synchronizer clicks: every element matching `css` whose
/// text contains `has_text` (case-insensitive) when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
}

impl ClickTarget {
    pub fn css(css: &str) -> Self {
        Self {
            css: css.to_string(),
            has_text: None,
        }
    }

    pub fn with_text(css: &str, text: &str) -> Self {
        Self {
            css: css.to_string(),
            has_text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSelectors {
    /// Primary render signal of a profile root page.
    pub profile_ready: Vec<String>,
    /// Primary render signal of a detail sub-page.
    pub detail_ready: Vec<String>,
    /// Primary render signal of the contact-info overlay.
    pub overlay_ready: Vec<String>,
    /// Render signal of any authenticated landing page (session probe).
    pub landing_ready: Vec<String>,
    /// Modals, toasts and chat bubbles covering the content.
    pub dismiss: Vec<ClickTarget>,
    /// Benign "see more" style expanders.
    pub expand: Vec<ClickTarget>,
    /// Skeletons and spinners still streaming content.
    pub loading_markers: Vec<String>,
}

impl Default for SyncSelectors {
    fn default() -> Self {
        Self {
            profile_ready: vec![
                "h1.text-heading-xlarge".into(),
                "main h1".into(),
                "h1".into(),
            ],
            detail_ready: vec![
                "li.artdeco-list__item".into(),
                "li.pvs-list__paged-list-item".into(),
                "main section".into(),
            ],
            overlay_ready: vec![
                "section.pv-contact-info__contact-type".into(),
                "div.artdeco-modal__content".into(),
            ],
            landing_ready: vec!["main".into(), "nav.global-nav".into()],
            dismiss: vec![
                ClickTarget::css("button.msg-overlay-bubble-header__control--new-convo-btn"),
                ClickTarget::css("button.artdeco-toast-item__dismiss"),
                ClickTarget::css("button[data-test-modal-close-btn]"),
            ],
            expand: vec![
                ClickTarget::css("button#line-clamp-show-more-button"),
                ClickTarget::with_text("button.inline-show-more-text__button", "more"),
                ClickTarget::with_text("button", "see more"),
                ClickTarget::with_text("button", "show more"),
            ],
            loading_markers: vec![
                ".artdeco-loader".into(),
                ".artdeco-spinner".into(),
                "[class*=\"skeleton\"]".into(),
                "[aria-busy=\"true\"]".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySelectors {
    pub full_name: SelectorStrategy,
    pub headline: SelectorStrategy,
    pub location: SelectorStrategy,
    pub connections: SelectorStrategy,
    pub followers: SelectorStrategy,
    pub urn: SelectorStrategy,
    /// Presence of any match sets `openConnection`.
    pub connect_control: SelectorStrategy,
}

impl Default for IdentitySelectors {
    fn default() -> Self {
        let min_name = || Validator::MinLen { chars: 2 };
        let not_name = || Validator::DiffersFrom {
            field: ContextField::FullName,
        };
        let comma = || Validator::Contains { needle: ",".into() };
        Self {
            full_name: strategy(
                "fullName",
                vec![
                    Candidate::css("h1.text-heading-xlarge").check(min_name()),
                    Candidate::css(r#"h1[class*="text-heading-xlarge"]"#).check(min_name()),
                    Candidate::css(r#"h1[class*="text-heading"]"#).check(min_name()),
                    Candidate::css(".pv-text-details__left-panel h1").check(min_name()),
                    Candidate::css("section.top-card h1").check(min_name()),
                    Candidate::css(r#"div[data-section="profile-top-card"] h1"#).check(min_name()),
                    Candidate::css("main h1").check(min_name()),
                    Candidate::css("h1").check(min_name()),
                ],
            ),
            headline: strategy(
                "headline",
                vec![
                    Candidate::css("div.text-body-medium.break-words").check(not_name()),
                    Candidate::css(r#"div[class*="text-body-medium"]"#).check(not_name()),
                    Candidate::css(".pv-text-details__left-panel .text-body-medium").check(not_name()),
                    Candidate::css(r#"section.top-card div[class*="text-body"]"#).check(not_name()),
                ],
            ),
            location: strategy(
                "addressWithCountry",
                vec![
                    Candidate::css("span.text-body-small.inline.t-black--light.break-words")
                        .check(comma()),
                    Candidate::css(r#"span[class*="text-body-small"]"#).check(comma()),
                    Candidate::css(".pv-text-details__left-panel span.text-body-small").check(comma()),
                    Candidate::css(r#"section.top-card span[class*="text-body-small"]"#)
                        .check(comma()),
                    // single-token locations ("Germany") only from the dedicated span
                    Candidate::css("span.text-body-small.inline.t-black--light.break-words"),
                ],
            ),
            connections: strategy(
                "connections",
                vec![
                    Candidate::css("li.text-body-small")
                        .has_text("connection")
                        .check(Validator::HasDigit),
                    Candidate::css("li").has_text("connection").check(Validator::HasDigit),
                    Candidate::css(r#"a[href*="mynetwork"]"#).check(Validator::HasDigit),
                ],
            ),
            followers: strategy(
                "followers",
                vec![
                    Candidate::css("li.text-body-small")
                        .has_text("follower")
                        .check(Validator::HasDigit),
                    Candidate::css("li").has_text("follower").check(Validator::HasDigit),
                    Candidate::css("p").has_text("follower").check(Validator::HasDigit),
                ],
            ),
            urn: strategy(
                "urn",
                vec![
                    Candidate::css(r#"[data-entity-urn*="urn:li:fsd_profile"]"#)
                        .attr("data-entity-urn"),
                    Candidate::css(r#"[data-member-urn*="urn:li:"]"#).attr("data-member-urn"),
                    Candidate::css(r#"a[href*="urn%3Ali%3Afsd_profile"], a[href*="urn:li:fsd_profile"]"#)
                        .attr("href"),
                ],
            ),
            connect_control: strategy(
                "openConnection",
                vec![
                    Candidate::css(r#"button[aria-label*="to connect"]"#).attr("aria-label"),
                    Candidate::css("main button").has_text("connect").check(
                        Validator::NotContains {
                            needle: "onnection".into(),
                        },
                    ),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSelectors {
    pub picture: SelectorStrategy,
}

impl Default for MediaSelectors {
    fn default() -> Self {
        let profile = || Validator::Contains {
            needle: "http".into(),
        };
        Self {
            picture: strategy(
                "profilePic",
                vec![
                    Candidate::css("img.pv-top-card-profile-picture__image")
                        .attr("src")
                        .check(profile()),
                    Candidate::css("img.pv-top-card-profile-picture__image--show")
                        .attr("src")
                        .check(profile()),
                    Candidate::css(r#"img[class*="profile-picture"]"#)
                        .attr("src")
                        .check(profile()),
                    Candidate::css(r#"button[aria-label*="View"] img"#)
                        .attr("src")
                        .check(profile()),
                    Candidate::css("img.pv-top-card--photo").attr("src").check(profile()),
                ],
            ),
        }
    }
}

/// Experience card on the root page, read for the current-role summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentRoleSelectors {
    pub section: SelectorStrategy,
    pub first_item: SelectorStrategy,
    pub job_title: SelectorStrategy,
    pub company: SelectorStrategy,
    pub duration: SelectorStrategy,
    pub company_link: SelectorStrategy,
}

impl Default for CurrentRoleSelectors {
    fn default() -> Self {
        Self {
            section: anchored_section("experienceSection", "experience", "Experience"),
            first_item: strategy(
                "currentRoleItem",
                vec![
                    Candidate::css("li.artdeco-list__item"),
                    Candidate::css("li.pvs-list__paged-list-item"),
                    Candidate::css("li"),
                ],
            ),
            job_title: strategy(
                "jobTitle",
                vec![
                    Candidate::css("div.display-flex.flex-column.full-width").then(ARIA_TEXT),
                    Candidate::css("div.display-flex.align-items-center").then(ARIA_TEXT),
                    Candidate::css(r#"div[class*="display-flex"]"#).then(ARIA_TEXT),
                ],
            ),
            company: strategy(
                "companyName",
                vec![
                    Candidate::css("span.t-14.t-normal:not(.t-black--light)").then(ARIA_TEXT),
                    Candidate::css("span.t-14").then(ARIA_TEXT),
                ],
            ),
            duration: strategy(
                "currentJobDuration",
                vec![Candidate::css("span.t-14.t-normal.t-black--light").then(ARIA_TEXT)],
            ),
            company_link: strategy(
                "companyLinkedin",
                vec![Candidate::css(r#"a[href*="/company/"]"#).attr("href")],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutSelectors {
    pub text: SelectorStrategy,
}

impl Default for AboutSelectors {
    fn default() -> Self {
        let long = || Validator::MinLen { chars: 21 };
        Self {
            text: strategy(
                "about",
                vec![
                    Candidate::css("section.artdeco-card")
                        .has("div#about")
                        .then(format!("div.display-flex.ph5.pv3 {ARIA_TEXT}"))
                        .check(long()),
                    Candidate::css("section")
                        .has("div#about")
                        .then(format!("div.display-flex {ARIA_TEXT}"))
                        .check(long()),
                    Candidate::css(r#"section[data-section="summary"]"#)
                        .then(ARIA_TEXT)
                        .check(long()),
                    Candidate::css("#about-this-profile-entrypoint span").check(long()),
                    Candidate::css("section")
                        .has_text("About")
                        .then(format!("div.inline-show-more-text {ARIA_TEXT}"))
                        .check(long()),
                ],
            ),
        }
    }
}

/// Field locators shared by every list-shaped section (detail pages and
/// root-page cards alike). Each is evaluated inside one list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSelectors {
    pub items: SelectorStrategy,
    pub title: SelectorStrategy,
    pub subtitle: SelectorStrategy,
    /// Every match is read; the first is the caption, the rest are insights.
    pub captions: SelectorStrategy,
    pub description: SelectorStrategy,
    pub logo: SelectorStrategy,
    pub company_link: SelectorStrategy,
    pub school_link: SelectorStrategy,
    pub profile_link: SelectorStrategy,
    pub any_link: SelectorStrategy,
    pub entity_title: SelectorStrategy,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            items: strategy(
                "items",
                vec![
                    Candidate::css("li.artdeco-list__item"),
                    Candidate::css("li.pvs-list__paged-list-item"),
                    Candidate::css("main ul > li"),
                ],
            ),
            title: strategy(
                "title",
                vec![
                    Candidate::css("div.display-flex.align-items-center").then(ARIA_TEXT),
                    Candidate::css("div.display-flex.flex-column.full-width").then(ARIA_TEXT),
                    Candidate::css("span.mr1.t-bold").then(ARIA_TEXT),
                    Candidate::css("span.t-bold").then(ARIA_TEXT),
                ],
            ),
            subtitle: strategy(
                "subtitle",
                vec![
                    Candidate::css("span.t-14.t-normal:not(.t-black--light)").then(ARIA_TEXT),
                ],
            ),
            captions: strategy(
                "caption",
                vec![Candidate::css("span.t-14.t-normal.t-black--light").then(ARIA_TEXT)],
            ),
            description: strategy(
                "description",
                vec![
                    Candidate::css("div.inline-show-more-text").then(ARIA_TEXT),
                    Candidate::css("div.pvs-entity__sub-components")
                        .then(format!("div.display-flex.full-width {ARIA_TEXT}")),
                ],
            ),
            logo: strategy("logo", vec![Candidate::css("img").attr("src")]),
            company_link: strategy(
                "companyLink",
                vec![Candidate::css(r#"a[href*="/company/"]"#).attr("href")],
            ),
            school_link: strategy(
                "schoolLink",
                vec![Candidate::css(r#"a[href*="/school/"]"#).attr("href")],
            ),
            profile_link: strategy(
                "profileLink",
                vec![Candidate::css(r#"a[href*="/in/"]"#).attr("href")],
            ),
            any_link: strategy("link", vec![Candidate::css("a[href]").attr("href")]),
            entity_title: strategy(
                "entityTitle",
                vec![
                    Candidate::css("span.mr1.hoverable-link-text.t-bold").then(ARIA_TEXT),
                    Candidate::css("span.t-bold").then(ARIA_TEXT),
                    Candidate::css("div.display-flex.align-items-center").then(ARIA_TEXT),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceSelectors {
    /// Root-page card, used when the detail page yields nothing.
    pub root_section: SelectorStrategy,
    /// Marker that distinguishes an employer header from a role item.
    pub company_header: SelectorStrategy,
    pub header_title: SelectorStrategy,
    pub role_title: SelectorStrategy,
}

impl Default for ExperienceSelectors {
    fn default() -> Self {
        Self {
            root_section: anchored_section("experienceSection", "experience", "Experience"),
            company_header: strategy(
                "companyHeader",
                vec![Candidate::css(
                    "div.display-flex.flex-column.full-width.align-items-start",
                )],
            ),
            header_title: strategy(
                "companyName",
                vec![
                    Candidate::css("span.mr1.t-bold").then(ARIA_TEXT),
                    Candidate::css("div.display-flex.align-items-center").then(ARIA_TEXT),
                ],
            ),
            role_title: strategy(
                "roleTitle",
                vec![
                    Candidate::css("div.display-flex.flex-column.full-width").then(ARIA_TEXT),
                    Candidate::css("div.display-flex.align-items-center").then(ARIA_TEXT),
                    Candidate::css("span.mr1.t-bold").then(ARIA_TEXT),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationSelectors {
    pub root_section: SelectorStrategy,
}

impl Default for EducationSelectors {
    fn default() -> Self {
        Self {
            root_section: anchored_section("educationSection", "education", "Education"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsSelectors {
    pub root_section: SelectorStrategy,
}

impl Default for SkillsSelectors {
    fn default() -> Self {
        Self {
            root_section: anchored_section("skillsSection", "skills", "Skills"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagesSelectors {
    pub section: SelectorStrategy,
}

impl Default for LanguagesSelectors {
    fn default() -> Self {
        Self {
            section: anchored_section("languagesSection", "languages", "Languages"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationsSelectors {
    pub body: SelectorStrategy,
}

impl Default for RecommendationsSelectors {
    fn default() -> Self {
        Self {
            body: strategy(
                "recommendationText",
                vec![
                    Candidate::css("div.inline-show-more-text").then(ARIA_TEXT),
                    Candidate::css("div.pvs-entity__sub-components")
                        .then(format!("div.display-flex.full-width {ARIA_TEXT}")),
                    Candidate::css("div.display-flex.full-width").then(ARIA_TEXT).nth(1),
                ],
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSelectors {
    pub email: SelectorStrategy,
    pub phone: SelectorStrategy,
}

impl Default for ContactSelectors {
    fn default() -> Self {
        Self {
            email: strategy(
                "email",
                vec![
                    Candidate::css("section.pv-contact-info__contact-type.ci-email")
                        .check(Validator::Contains { needle: "@".into() }),
                    Candidate::css(r#"a[href^="mailto:"]"#).attr("href"),
                ],
            ),
            phone: strategy(
                "mobileNumber",
                vec![
                    Candidate::css("section.pv-contact-info__contact-type.ci-phone")
                        .check(Validator::HasDigit),
                    Candidate::css(r#"a[href^="tel:"]"#).attr("href"),
                ],
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorTable {
    pub version: String,
    pub sync: SyncSelectors,
    pub identity: IdentitySelectors,
    pub media: MediaSelectors,
    pub current_role: CurrentRoleSelectors,
    pub about: AboutSelectors,
    pub list: ListSelectors,
    pub experience: ExperienceSelectors,
    pub education: EducationSelectors,
    pub skills: SkillsSelectors,
    pub languages: LanguagesSelectors,
    pub recommendations: RecommendationsSelectors,
    pub contact: ContactSelectors,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            version: SELECTOR_TABLE_VERSION.to_string(),
            sync: SyncSelectors::default(),
            identity: IdentitySelectors::default(),
            media: MediaSelectors::default(),
            current_role: CurrentRoleSelectors::default(),
            about: AboutSelectors::default(),
            list: ListSelectors::default(),
            experience: ExperienceSelectors::default(),
            education: EducationSelectors::default(),
            skills: SkillsSelectors::default(),
            languages: LanguagesSelectors::default(),
            recommendations: RecommendationsSelectors::default(),
            contact: ContactSelectors::default(),
        }
    }
}

impl SelectorTable {
    /// Built-in table with a JSON overlay applied.
    ///
    /// Groups present in the file replace the built-in ones field by field;
    /// absent groups and fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ScoutError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ScoutError::SelectorTable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw).map_err(|e| ScoutError::SelectorTable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let table: SelectorTable = serde_json::from_str(raw)?;
        info!("selector table {} loaded", table.version);
        Ok(table)
    }
}
