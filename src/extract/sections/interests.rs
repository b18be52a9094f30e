use scraper::ElementRef;

use super::list_items;
use crate::extract::normalize::clean_url;
use crate::extract::resolver::{resolve_texts, resolve_value};
use crate::extract::selectors::ListSelectors;
use crate::types::{NamedSection, SectionItem};

/// Tabs of `details/interests/`, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestTab {
    Companies,
    Groups,
    Schools,
}

impl InterestTab {
    pub const ALL: [InterestTab; 3] = [InterestTab::Companies, InterestTab::Groups, InterestTab::Schools];

    pub fn label(&self) -> &'static str {
        match self {
            InterestTab::Companies => "Companies",
            InterestTab::Groups => "Groups",
            InterestTab::Schools => "Schools",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            InterestTab::Companies => "companies",
            InterestTab::Groups => "groups",
            InterestTab::Schools => "schools",
        }
    }
}

/// Followed entities of one tab; `None` when the tab lists nothing.
pub fn extract(scope: ElementRef<'_>, tab: InterestTab, list: &ListSelectors) -> Option<NamedSection> {
    let components: Vec<SectionItem> = list_items(scope, None, &list.items)
        .into_iter()
        .filter_map(|item| {
            let title = resolve_value(&list.entity_title, item);
            if title.is_empty() {
                return None;
            }
            Some(SectionItem {
                title,
                subtitle: resolve_value(&list.subtitle, item),
                caption: resolve_texts(&list.captions, item)
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
                company_link1: clean_url(&resolve_value(&list.any_link, item)),
                logo: resolve_value(&list.logo, item),
                ..SectionItem::default()
            })
        })
        .collect();

    (!components.is_empty()).then(|| NamedSection {
        section_name: tab.label().to_string(),
        section_components: components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::page;

    #[test]
    fn followed_companies() {
        let doc = page(
            r#"<ul><li class="artdeco-list__item">
                 <a href="https://www.linkedin.com/company/anthropic/?trk=x">
                   <span class="mr1 hoverable-link-text t-bold"><span aria-hidden="true">Anthropic</span></span>
                 </a>
                 <span class="t-14 t-normal t-black--light"><span aria-hidden="true">512,044 followers</span></span>
               </li></ul>"#,
        );
        let section = extract(doc.root_element(), InterestTab::Companies, &ListSelectors::default()).unwrap();
        assert_eq!(section.section_name, "Companies");
        assert_eq!(section.section_components.len(), 1);
        let company = &section.section_components[0];
        assert_eq!(company.title, "Anthropic");
        assert_eq!(company.caption, "512,044 followers");
        assert_eq!(company.company_link1, "https://www.linkedin.com/company/anthropic/");
    }

    #[test]
    fn empty_tab_is_omitted() {
        let doc = page("<p>Nothing to see</p>");
        assert!(extract(doc.root_element(), InterestTab::Schools, &ListSelectors::default()).is_none());
    }
}
