//! Field normalizers: pure conversions from raw DOM text/attributes into the
//! typed values stored on a [`crate::types::ProfileRecord`].
//!
//! None of these fail. Unparseable input maps to the field's empty value.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::PictureDimension;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    // Patterns are compile-time literals exercised by the unit tests below.
    cell.get_or_init(|| Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}")))
}

static YEARS_RE: OnceLock<Regex> = OnceLock::new();
static MONTHS_RE: OnceLock<Regex> = OnceLock::new();
static DIGITS_RE: OnceLock<Regex> = OnceLock::new();
static ENTITY_ID_RE: OnceLock<Regex> = OnceLock::new();
static LOCALE_SEGMENT_RE: OnceLock<Regex> = OnceLock::new();
static PUBLIC_ID_RE: OnceLock<Regex> = OnceLock::new();
static URN_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();
static ENDORSEMENT_RE: OnceLock<Regex> = OnceLock::new();
static SHRINK_RE: OnceLock<Regex> = OnceLock::new();

/// Collapse runs of whitespace and trim.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"1 yr 2 mos"` → `1.17`. Missing parts count as zero; `""` → `0.0`.
pub fn duration_to_years(duration: &str) -> f64 {
    if duration.trim().is_empty() {
        return 0.0;
    }
    let years = regex(&YEARS_RE, r"(\d+)\s*yr")
        .captures(duration)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(0.0);
    let months = regex(&MONTHS_RE, r"(\d+)\s*mo")
        .captures(duration)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or(0.0);
    ((years + months / 12.0) * 100.0).round() / 100.0
}

/// `"10,219 connections"` → `10219`, `"500+ connections"` → `500`, no digits → `0`.
pub fn count_from_text(text: &str) -> u64 {
    let stripped = text.replace(',', "");
    regex(&DIGITS_RE, r"\d+")
        .find(&stripped)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// First whitespace token is the first name, the remainder the last name.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Split `"City, Region, Country"` into `(country_only, without_country)`.
///
/// A location without a comma is treated as a country on its own.
pub fn split_location(location: &str) -> (String, String) {
    let parts: Vec<&str> = location
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), String::new()),
        [head @ .., last] => ((*last).to_string(), head.join(", ")),
    }
}

/// Numeric id from a `/company/<id>` or `/school/<id>` link; `""` when the
/// link uses a vanity slug instead.
pub fn company_id(link: &str) -> String {
    regex(&ENTITY_ID_RE, r"/(?:company|school)/(\d+)")
        .captures(link)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

pub fn company_urn(company_id: &str) -> String {
    if company_id.is_empty() {
        String::new()
    } else {
        format!("urn:li:fsd_company:{company_id}")
    }
}

/// Drop query string and fragment (tracking parameters).
pub fn clean_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim().to_string()
}

/// `https://www.linkedin.com/company/acme/?trk=x` → `linkedin.com/company/acme/`.
pub fn company_linkedin(href: &str) -> String {
    let cleaned = clean_url(href);
    let Some(idx) = cleaned.find("/company/") else {
        return String::new();
    };
    format!("linkedin.com{}", &cleaned[idx..])
}

/// Canonical profile URL: no locale segment, no query, https, no trailing slash.
pub fn normalize_profile_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let without_locale = regex(&LOCALE_SEGMENT_RE, r"/[a-z]{2}_[A-Z]{2}/").replace(trimmed, "/");
    let mut out = clean_url(&without_locale);
    if let Some(rest) = out.strip_prefix("http://") {
        out = format!("https://{rest}");
    } else if !out.starts_with("https://") {
        out = format!("https://{out}");
    }
    out.trim_end_matches('/').to_string()
}

/// The `<id>` in `/in/<id>`; `""` when the URL is not a profile URL.
pub fn public_identifier(url: &str) -> String {
    regex(&PUBLIC_ID_RE, r"/in/([^/?#]+)")
        .captures(url)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

/// First `urn:li:...` token found in an attribute value.
pub fn linkedin_urn(value: &str) -> String {
    regex(&URN_RE, r#"urn:li:[^&\s"',]+"#)
        .find(value)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn email_from_text(text: &str) -> Option<String> {
    regex(&EMAIL_RE, r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .find(text)
        .map(|m| m.as_str().to_string())
}

pub fn phone_from_text(text: &str) -> Option<String> {
    regex(
        &PHONE_RE,
        r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
    )
    .find(text)
    .map(|m| m.as_str().trim().to_string())
}

/// `"12 endorsements"` → `Some(12)`.
pub fn endorsement_count(text: &str) -> Option<u64> {
    regex(&ENDORSEMENT_RE, r"(?i)(\d[\d,]*)\s+endorsement")
        .captures(text)
        .and_then(|c| c[1].replace(',', "").parse().ok())
}

/// Square sizes synthesized from a `shrink_W_H` profile-photo URL, in the
/// order consumers expect: default, high quality, then the rest.
const PICTURE_SIZES: [u32; 4] = [200, 800, 400, 100];

/// Expand one profile-photo URL into the declared dimension set.
///
/// Photo URLs carrying a `shrink_W_H` size token are rewritten per size; any
/// other non-empty URL yields a single 200×200 entry.
pub fn picture_dimensions(src: &str) -> Vec<PictureDimension> {
    let src = src.trim();
    if src.is_empty() {
        return Vec::new();
    }
    let shrink = regex(&SHRINK_RE, r"shrink_\d+_\d+");
    if !shrink.is_match(src) {
        return vec![PictureDimension {
            width: 200,
            height: 200,
            url: src.to_string(),
        }];
    }
    PICTURE_SIZES
        .iter()
        .map(|&size| PictureDimension {
            width: size,
            height: size,
            url: shrink
                .replace(src, format!("shrink_{size}_{size}").as_str())
                .into_owned(),
        })
        .collect()
}

/// Text before the first `" · "` separator (e.g. `"Acme · Full-time"` → `"Acme"`).
pub fn before_separator(text: &str) -> String {
    text.split(" · ").next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_years_and_months() {
        assert_eq!(duration_to_years("1 yr 2 mos"), 1.17);
        assert_eq!(duration_to_years("3 yrs"), 3.0);
        assert_eq!(duration_to_years("6 mos"), 0.5);
        assert_eq!(duration_to_years("2 yrs 11 mos"), 2.92);
        assert_eq!(duration_to_years(""), 0.0);
        assert_eq!(duration_to_years("Present"), 0.0);
    }

    #[test]
    fn counts_strip_commas() {
        assert_eq!(count_from_text("10,219 connections"), 10219);
        assert_eq!(count_from_text("500+ connections"), 500);
        assert_eq!(count_from_text("1,024 followers"), 1024);
        assert_eq!(count_from_text("followers"), 0);
        assert_eq!(count_from_text(""), 0);
    }

    #[test]
    fn names_split_on_first_token() {
        assert_eq!(split_name("Ada Lovelace"), ("Ada".into(), "Lovelace".into()));
        assert_eq!(
            split_name("  Jean Claude  Van Damme "),
            ("Jean".into(), "Claude Van Damme".into())
        );
        assert_eq!(split_name("Cher"), ("Cher".into(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
    }

    #[test]
    fn location_triplet() {
        assert_eq!(
            split_location("Berlin, Berlin, Germany"),
            ("Germany".into(), "Berlin, Berlin".into())
        );
        assert_eq!(split_location("Germany"), ("Germany".into(), String::new()));
        assert_eq!(split_location(""), (String::new(), String::new()));
    }

    #[test]
    fn company_links() {
        assert_eq!(
            company_id("https://www.linkedin.com/company/1441/?trk=x"),
            "1441"
        );
        assert_eq!(company_id("https://www.linkedin.com/school/166636/"), "166636");
        assert_eq!(company_id("https://www.linkedin.com/company/acme/"), "");
        assert_eq!(company_urn("1441"), "urn:li:fsd_company:1441");
        assert_eq!(company_urn(""), "");
        assert_eq!(
            company_linkedin("https://www.linkedin.com/company/acme/?trk=abc"),
            "linkedin.com/company/acme/"
        );
        assert_eq!(company_linkedin("https://example.com/x"), "");
    }

    #[test]
    fn profile_url_normalization() {
        assert_eq!(
            normalize_profile_url("http://www.linkedin.com/in/ada-l/?originalSubdomain=uk"),
            "https://www.linkedin.com/in/ada-l"
        );
        assert_eq!(
            normalize_profile_url("www.linkedin.com/in/ada-l/de_DE/"),
            "https://www.linkedin.com/in/ada-l"
        );
        assert_eq!(public_identifier("https://www.linkedin.com/in/ada-l"), "ada-l");
        assert_eq!(public_identifier("https://www.linkedin.com/feed/"), "");
    }

    #[test]
    fn contact_patterns() {
        assert_eq!(
            email_from_text("Email ada@example.org (work)").as_deref(),
            Some("ada@example.org")
        );
        assert_eq!(email_from_text("no address here"), None);
        assert_eq!(
            phone_from_text("Phone +1 415-555-0100 (Mobile)").as_deref(),
            Some("+1 415-555-0100")
        );
        assert_eq!(phone_from_text("none"), None);
    }

    #[test]
    fn endorsements_and_urns() {
        assert_eq!(endorsement_count("12 endorsements"), Some(12));
        assert_eq!(endorsement_count("1 endorsement"), Some(1));
        assert_eq!(endorsement_count("Endorsed by 3 colleagues"), None);
        assert_eq!(
            linkedin_urn("urn:li:fsd_profile:ACoAAB123&trk=1"),
            "urn:li:fsd_profile:ACoAAB123"
        );
        assert_eq!(linkedin_urn("nothing"), "");
    }

    #[test]
    fn picture_sizes_from_shrink_token() {
        let src = "https://media.licdn.com/dms/image/C4E03AQ/profile-displayphoto-shrink_100_100/0/1?e=1&v=beta";
        let dims = picture_dimensions(src);
        assert_eq!(dims.len(), 4);
        assert_eq!(dims[0].width, 200);
        assert!(dims[0].url.contains("shrink_200_200"));
        assert!(dims[1].url.contains("shrink_800_800"));

        let plain = picture_dimensions("https://cdn.example.com/profile.jpg");
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].url, "https://cdn.example.com/profile.jpg");
        assert!(picture_dimensions("").is_empty());
    }

    #[test]
    fn separator_and_whitespace() {
        assert_eq!(before_separator("Acme Corp · Full-time"), "Acme Corp");
        assert_eq!(before_separator("Acme Corp"), "Acme Corp");
        assert_eq!(clean_text("  a \n  b\t c "), "a b c");
    }
}
