use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────────────────────

/// Authentication state of the page currently loaded in the browsing context.
///
/// Derived from the current URL after every navigation and never cached:
/// the site can silently redirect any request to its auth-wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Authenticated,
    AuthWall,
    Unknown,
}

/// CDP / Playwright `sameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// A browser cookie as exported by a logged-in browsing context.
///
/// The engine treats it as opaque apart from `domain`, which it rewrites when
/// synthesizing the `www` / bare-domain counterparts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    /// Unix seconds; `-1` (or absent) marks a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

// ───────────────────────────────────────────────────────────────────────────
// Section items
// ───────────────────────────────────────────────────────────────────────────

/// One text fragment attached to an item (job description, skill insight,
/// education grade, recommendation body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextComponent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "textComponent".to_string(),
            text: text.into(),
        }
    }

    pub fn insight(text: impl Into<String>) -> Self {
        Self {
            kind: "insightComponent".to_string(),
            text: text.into(),
        }
    }
}

/// Generic composite entry used by every repeated profile section.
///
/// When `breakdown` is `true` the item is an employer (or institution) header
/// and `sub_components` holds at least one role; the header itself carries no
/// role-specific duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionItem {
    pub title: String,
    pub subtitle: String,
    pub caption: String,
    pub metadata: String,
    pub company_id: String,
    pub company_urn: String,
    pub company_link1: String,
    pub logo: String,
    pub breakdown: bool,
    pub description: Vec<TextComponent>,
    pub sub_components: Vec<SectionItem>,
}

impl SectionItem {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A titled group of items, e.g. the "Companies" tab of interests or the
/// "Received" tab of recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSection {
    pub section_name: String,
    pub section_components: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureDimension {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

// ───────────────────────────────────────────────────────────────────────────
// Canonical record
// ───────────────────────────────────────────────────────────────────────────

/// The canonical, schema-stable output for one profile.
///
/// Every field is always serialized: missing data is represented by the
/// field's typed empty value (`""`, `0`, `[]`, `null`), never by an absent key.
/// Built only by [`crate::extract::assembler::assemble`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub linkedin_url: String,
    pub scraped_at: String,

    // identity
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub headline: String,
    pub address_with_country: String,
    pub address_country_only: String,
    pub address_without_country: String,
    pub public_identifier: String,
    pub urn: String,
    pub open_connection: bool,

    // social proof
    pub connections: u64,
    pub followers: u64,

    // media
    pub profile_pic: String,
    pub profile_pic_high_quality: String,
    pub profile_pic_all_dimensions: Vec<PictureDimension>,

    // current role
    pub job_title: String,
    pub company_name: String,
    pub company_industry: String,
    pub company_website: String,
    pub company_linkedin: String,
    pub company_founded_in: Option<u32>,
    pub company_size: String,
    pub current_job_duration: String,
    pub current_job_duration_in_yrs: f64,

    pub about: String,

    // contact
    pub email: Option<String>,
    pub mobile_number: Option<String>,

    // sectioned collections
    pub experiences: Vec<SectionItem>,
    pub educations: Vec<SectionItem>,
    pub license_and_certificates: Vec<SectionItem>,
    pub languages: Vec<SectionItem>,
    pub skills: Vec<SectionItem>,
    pub top_skills_by_endorsements: String,
    pub interests: Vec<NamedSection>,
    pub recommendations: Vec<NamedSection>,

    // reserved: never extracted, kept for downstream schema stability
    pub honors_and_awards: Vec<serde_json::Value>,
    pub volunteer_and_awards: Vec<serde_json::Value>,
    pub projects: Vec<serde_json::Value>,
    pub publications: Vec<serde_json::Value>,
    pub patents: Vec<serde_json::Value>,
    pub courses: Vec<serde_json::Value>,
    pub test_scores: Vec<serde_json::Value>,
    pub organizations: Vec<serde_json::Value>,
    pub volunteer_causes: Vec<serde_json::Value>,
    pub verifications: Vec<serde_json::Value>,
    pub promos: Vec<serde_json::Value>,
    pub highlights: Vec<serde_json::Value>,
    pub updates: Vec<serde_json::Value>,
}

/// Outcome of a multi-profile run.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<ProfileRecord>,
    pub failures: Vec<ProfileFailure>,
    /// `true` when the run stopped early because the session was rejected.
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileFailure {
    pub url: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cookie_accepts_playwright_export_shape() {
        let raw = json!({
            "name": "li_at",
            "value": "AQED",
            "domain": ".linkedin.com",
            "path": "/",
            "expires": 1_800_000_000.0,
            "httpOnly": true,
            "secure": true,
            "sameSite": "None"
        });
        let cookie: Cookie = serde_json::from_value(raw).unwrap();
        assert_eq!(cookie.name, "li_at");
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, Some(SameSite::None));
    }

    #[test]
    fn cookie_defaults_path_and_flags() {
        let cookie: Cookie =
            serde_json::from_value(json!({"name": "JSESSIONID", "value": "x"})).unwrap();
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
        assert!(cookie.same_site.is_none());
    }

    #[test]
    fn section_item_serializes_camel_case_keys() {
        let item = SectionItem::titled("Acme");
        let v = serde_json::to_value(&item).unwrap();
        assert!(v.get("companyLink1").is_some());
        assert!(v.get("subComponents").is_some());
        assert_eq!(v["breakdown"], json!(false));
    }
}
