use scraper::ElementRef;

use super::{list_items, EntityLink, ListFields};
use crate::extract::resolver::SelectorStrategy;
use crate::extract::selectors::SelectorTable;
use crate::types::SectionItem;

const SEARCH_URL: &str = "https://www.linkedin.com/search/results/all/";

/// Site search for an institution without a school page of its own.
pub fn school_search_url(name: &str) -> String {
    url::Url::parse_with_params(SEARCH_URL, &[("keywords", name)])
        .map(|u| u.to_string())
        .unwrap_or_default()
}

pub fn extract(
    scope: ElementRef<'_>,
    container: Option<&SelectorStrategy>,
    table: &SelectorTable,
) -> Vec<SectionItem> {
    list_items(scope, container, &table.list.items)
        .into_iter()
        .filter_map(|item| {
            let fields = ListFields::read(item, &table.list);
            if fields.title.is_empty() {
                return None;
            }
            let school = EntityLink::read(item, &table.list.school_link);
            let company_link1 = if school.link.is_empty() {
                school_search_url(&fields.title)
            } else {
                school.link
            };
            Some(SectionItem {
                caption: fields.caption(),
                sub_components: vec![SectionItem {
                    description: fields.insights(),
                    ..SectionItem::default()
                }],
                title: fields.title,
                subtitle: fields.subtitle,
                company_id: school.id,
                company_urn: school.urn,
                company_link1,
                logo: fields.logo,
                ..SectionItem::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::{list_item, page};
    use crate::types::TextComponent;

    #[test]
    fn schools_with_and_without_pages() {
        let linked = list_item("Stanford University", "MSc, Computer Science", &["2012 - 2014", "Grade: A"])
            .replace("<img", r#"<a href="https://www.linkedin.com/school/1792/?trk=x">x</a><img"#);
        let doc = page(&format!(
            "<ul>{}{}</ul>",
            linked,
            list_item("Self-taught Academy", "", &[])
        ));
        let items = extract(doc.root_element(), None, &SelectorTable::default());
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].company_id, "1792");
        assert_eq!(items[0].company_link1, "https://www.linkedin.com/school/1792/");
        assert_eq!(items[0].caption, "2012 - 2014");
        assert_eq!(
            items[0].sub_components[0].description,
            vec![TextComponent::insight("Grade: A")]
        );

        assert_eq!(items[1].company_id, "");
        assert_eq!(
            items[1].company_link1,
            "https://www.linkedin.com/search/results/all/?keywords=Self-taught+Academy"
        );
        assert!(!items[1].breakdown);
    }
}
