use scraper::ElementRef;

use super::{list_items, ListFields};
use crate::extract::normalize::clean_url;
use crate::extract::resolver::resolve_value;
use crate::extract::selectors::SelectorTable;
use crate::types::{NamedSection, SectionItem, TextComponent};

pub const RECEIVED: &str = "Received";

/// Received recommendations from `details/recommendations/`.
///
/// Each component is the recommender (name, headline, relationship caption,
/// profile link, picture) with the recommendation body as its only
/// sub-component.
pub fn extract_received(scope: ElementRef<'_>, table: &SelectorTable) -> Option<NamedSection> {
    let list = &table.list;
    let components: Vec<SectionItem> = list_items(scope, None, &list.items)
        .into_iter()
        .filter_map(|item| {
            let name = resolve_value(&list.entity_title, item);
            if name.is_empty() {
                return None;
            }
            let fields = ListFields::read(item, list);
            let body = resolve_value(&table.recommendations.body, item);
            Some(SectionItem {
                title: name,
                caption: fields.caption(),
                subtitle: fields.subtitle,
                company_link1: clean_url(&resolve_value(&list.profile_link, item)),
                logo: fields.logo,
                sub_components: vec![SectionItem {
                    description: if body.is_empty() {
                        Vec::new()
                    } else {
                        vec![TextComponent::text(body)]
                    },
                    ..SectionItem::default()
                }],
                ..SectionItem::default()
            })
        })
        .collect();

    (!components.is_empty()).then(|| NamedSection {
        section_name: RECEIVED.to_string(),
        section_components: components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::page;

    #[test]
    fn recommender_and_body() {
        let doc = page(
            r#"<ul><li class="artdeco-list__item">
                 <a href="https://www.linkedin.com/in/charles-babbage?miniProfile=1"><img src="cb.jpg">
                   <span class="mr1 hoverable-link-text t-bold"><span aria-hidden="true">Charles Babbage</span></span></a>
                 <span class="t-14 t-normal"><span aria-hidden="true">Inventor</span></span>
                 <span class="t-14 t-normal t-black--light"><span aria-hidden="true">June 1843, Charles worked with Ada on the same team</span></span>
                 <div class="inline-show-more-text"><span aria-hidden="true">Ada sees further than anyone.</span></div>
               </li></ul>"#,
        );
        let received = extract_received(doc.root_element(), &SelectorTable::default()).unwrap();
        assert_eq!(received.section_name, "Received");
        let rec = &received.section_components[0];
        assert_eq!(rec.title, "Charles Babbage");
        assert_eq!(rec.subtitle, "Inventor");
        assert_eq!(rec.company_link1, "https://www.linkedin.com/in/charles-babbage");
        assert_eq!(
            rec.sub_components[0].description,
            vec![TextComponent::text("Ada sees further than anyone.")]
        );
    }
}
