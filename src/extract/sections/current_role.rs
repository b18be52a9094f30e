//! Current-role summary, read from the first entry of the root page's
//! experience card.

use scraper::ElementRef;

use crate::extract::normalize::{before_separator, company_linkedin, duration_to_years};
use crate::extract::resolver::{resolve_element, resolve_value};
use crate::extract::selectors::CurrentRoleSelectors;
use crate::types::SectionItem;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentRole {
    pub job_title: String,
    pub company_name: String,
    pub company_linkedin: String,
    pub current_job_duration: String,
    pub current_job_duration_in_yrs: f64,
}

impl CurrentRole {
    pub fn is_empty(&self) -> bool {
        self.job_title.is_empty()
    }

    fn with_duration(mut self, caption: &str) -> Self {
        self.current_job_duration = duration_part(caption);
        self.current_job_duration_in_yrs = duration_to_years(&self.current_job_duration);
        self
    }
}

/// The tenure segment of a caption such as `"Jan 2020 - Present · 4 yrs 10 mos"`.
///
/// Captions without a tenure segment return their first segment.
pub fn duration_part(caption: &str) -> String {
    caption
        .split(" · ")
        .map(str::trim)
        .find(|seg| seg.contains("yr") || seg.contains("mo"))
        .map(str::to_string)
        .unwrap_or_else(|| before_separator(caption))
}

pub fn extract(scope: ElementRef<'_>, selectors: &CurrentRoleSelectors) -> CurrentRole {
    let Some(section) = resolve_element(&selectors.section, scope) else {
        return CurrentRole::default();
    };
    let Some(item) = resolve_element(&selectors.first_item, section) else {
        return CurrentRole::default();
    };

    CurrentRole {
        job_title: resolve_value(&selectors.job_title, item),
        company_name: before_separator(&resolve_value(&selectors.company, item)),
        company_linkedin: company_linkedin(&resolve_value(&selectors.company_link, item)),
        ..CurrentRole::default()
    }
    .with_duration(&resolve_value(&selectors.duration, item))
}

/// Derive the summary from the first grouped experience.
pub fn from_experience(experiences: &[SectionItem]) -> CurrentRole {
    let Some(first) = experiences.first() else {
        return CurrentRole::default();
    };
    let Some(role) = first.sub_components.first() else {
        return CurrentRole::default();
    };
    CurrentRole {
        job_title: role.title.clone(),
        company_name: first.title.clone(),
        company_linkedin: company_linkedin(&first.company_link1),
        ..CurrentRole::default()
    }
    .with_duration(&role.caption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::page;

    #[test]
    fn first_entry_of_the_experience_card() {
        let doc = page(
            r#"<section class="artdeco-card"><div id="experience"></div>
                 <ul><li class="artdeco-list__item">
                   <a href="https://www.linkedin.com/company/1035/?trk=x"><img src="l.png"></a>
                   <div class="display-flex flex-column full-width">
                     <div class="display-flex align-items-center"><span class="mr1 t-bold"><span aria-hidden="true">Staff Engineer</span></span></div>
                     <span class="t-14 t-normal"><span aria-hidden="true">Microsoft · Full-time</span></span>
                     <span class="t-14 t-normal t-black--light"><span aria-hidden="true">Mar 2021 - Present · 2 yrs 6 mos</span></span>
                   </div>
                 </li></ul>
               </section>"#,
        );
        let role = extract(doc.root_element(), &CurrentRoleSelectors::default());
        assert_eq!(role.job_title, "Staff Engineer");
        assert_eq!(role.company_name, "Microsoft");
        assert_eq!(role.company_linkedin, "linkedin.com/company/1035/");
        assert_eq!(role.current_job_duration, "2 yrs 6 mos");
        assert_eq!(role.current_job_duration_in_yrs, 2.5);
    }

    #[test]
    fn falls_back_to_grouped_experience() {
        let mut acme = SectionItem::titled("Acme");
        acme.breakdown = true;
        acme.company_link1 = "https://www.linkedin.com/company/acme/".into();
        let mut role = SectionItem::titled("CTO");
        role.caption = "2019 - Present · 1 yr".into();
        acme.sub_components.push(role);

        let current = from_experience(&[acme]);
        assert_eq!(current.job_title, "CTO");
        assert_eq!(current.company_name, "Acme");
        assert_eq!(current.current_job_duration_in_yrs, 1.0);
        assert!(from_experience(&[]).is_empty());
    }

    #[test]
    fn duration_segments() {
        assert_eq!(duration_part("Jan 2020 - Present · 4 yrs 10 mos"), "4 yrs 10 mos");
        assert_eq!(duration_part("3 mos"), "3 mos");
        assert_eq!(duration_part("Jan 2020 - Present"), "Jan 2020 - Present");
        assert_eq!(duration_part(""), "");
    }
}
