//! Record Assembler.
//!
//! Pure composition of section outputs into a [`ProfileRecord`]. The record is
//! built with one exhaustive struct literal, so a field added to the record
//! that is not wired here fails to compile instead of silently going missing.

use super::sections::contact::Contact;
use super::sections::current_role::CurrentRole;
use super::sections::identity::Identity;
use super::sections::media::Media;
use super::sections::skills::Skills;
use crate::types::{NamedSection, ProfileRecord, SectionItem};

/// Every section output of one profile. Sections that were not reached keep
/// their `Default`.
#[derive(Debug, Clone, Default)]
pub struct ProfileParts {
    pub linkedin_url: String,
    pub scraped_at: String,
    pub identity: Identity,
    pub media: Media,
    pub current_role: CurrentRole,
    pub about: String,
    pub contact: Contact,
    pub experiences: Vec<SectionItem>,
    pub educations: Vec<SectionItem>,
    pub certifications: Vec<SectionItem>,
    pub languages: Vec<SectionItem>,
    pub skills: Skills,
    pub interests: Vec<NamedSection>,
    pub recommendations: Vec<NamedSection>,
}

pub fn assemble(parts: ProfileParts) -> ProfileRecord {
    let ProfileParts {
        linkedin_url,
        scraped_at,
        identity,
        media,
        current_role,
        about,
        contact,
        experiences,
        educations,
        certifications,
        languages,
        skills,
        interests,
        recommendations,
    } = parts;

    ProfileRecord {
        linkedin_url,
        scraped_at,

        full_name: identity.full_name,
        first_name: identity.first_name,
        last_name: identity.last_name,
        headline: identity.headline,
        address_with_country: identity.address_with_country,
        address_country_only: identity.address_country_only,
        address_without_country: identity.address_without_country,
        public_identifier: identity.public_identifier,
        urn: identity.urn,
        open_connection: identity.open_connection,

        connections: identity.connections,
        followers: identity.followers,

        profile_pic: media.profile_pic,
        profile_pic_high_quality: media.profile_pic_high_quality,
        profile_pic_all_dimensions: media.profile_pic_all_dimensions,

        job_title: current_role.job_title,
        company_name: current_role.company_name,
        company_industry: String::new(),
        company_website: String::new(),
        company_linkedin: current_role.company_linkedin,
        company_founded_in: None,
        company_size: String::new(),
        current_job_duration: current_role.current_job_duration,
        current_job_duration_in_yrs: current_role.current_job_duration_in_yrs,

        about,

        email: contact.email,
        mobile_number: contact.mobile_number,

        experiences,
        educations,
        license_and_certificates: certifications,
        languages,
        skills: skills.items,
        top_skills_by_endorsements: skills.top_skills_by_endorsements,
        interests,
        recommendations,

        honors_and_awards: Vec::new(),
        volunteer_and_awards: Vec::new(),
        projects: Vec::new(),
        publications: Vec::new(),
        patents: Vec::new(),
        courses: Vec::new(),
        test_scores: Vec::new(),
        organizations: Vec::new(),
        volunteer_causes: Vec::new(),
        verifications: Vec::new(),
        promos: Vec::new(),
        highlights: Vec::new(),
        updates: Vec::new(),
    }
}

impl ProfileRecord {
    /// Record with every field at its empty value.
    pub fn empty(linkedin_url: &str) -> Self {
        assemble(ProfileParts {
            linkedin_url: linkedin_url.to_string(),
            ..ProfileParts::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const KEYS: &[&str] = &[
        "linkedinUrl", "scrapedAt", "fullName", "firstName", "lastName", "headline",
        "addressWithCountry", "addressCountryOnly", "addressWithoutCountry", "publicIdentifier",
        "urn", "openConnection", "connections", "followers", "profilePic", "profilePicHighQuality",
        "profilePicAllDimensions", "jobTitle", "companyName", "companyIndustry", "companyWebsite",
        "companyLinkedin", "companyFoundedIn", "companySize", "currentJobDuration",
        "currentJobDurationInYrs", "about", "email", "mobileNumber", "experiences", "educations",
        "licenseAndCertificates", "languages", "skills", "topSkillsByEndorsements", "interests",
        "recommendations", "honorsAndAwards", "volunteerAndAwards", "projects", "publications",
        "patents", "courses", "testScores", "organizations", "volunteerCauses", "verifications",
        "promos", "highlights", "updates",
    ];

    #[test]
    fn empty_parts_still_serialize_every_key() {
        let record = ProfileRecord::empty("https://www.linkedin.com/in/nobody");
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();

        for key in KEYS {
            assert!(obj.contains_key(*key), "missing key {key}");
        }
        assert_eq!(obj.len(), KEYS.len());
        assert_eq!(obj["about"], Value::String(String::new()));
        assert_eq!(obj["connections"], Value::from(0));
        assert_eq!(obj["email"], Value::Null);
        assert_eq!(obj["companyFoundedIn"], Value::Null);
        assert_eq!(obj["experiences"], Value::Array(vec![]));
        assert_eq!(obj["openConnection"], Value::Bool(false));
    }

    #[test]
    fn section_outputs_land_in_their_fields() {
        let record = assemble(ProfileParts {
            about: "Poet of numbers".into(),
            skills: Skills {
                items: vec![SectionItem::titled("Rust")],
                top_skills_by_endorsements: "Rust".into(),
            },
            certifications: vec![SectionItem::titled("CKA")],
            contact: Contact {
                email: Some("ada@example.com".into()),
                mobile_number: None,
            },
            ..ProfileParts::default()
        });
        assert_eq!(record.about, "Poet of numbers");
        assert_eq!(record.skills[0].title, "Rust");
        assert_eq!(record.top_skills_by_endorsements, "Rust");
        assert_eq!(record.license_and_certificates[0].title, "CKA");
        assert_eq!(record.email.as_deref(), Some("ada@example.com"));
    }
}
