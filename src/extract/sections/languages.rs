use scraper::ElementRef;

use super::{list_items, ListFields};
use crate::extract::selectors::SelectorTable;
use crate::types::SectionItem;

/// Languages card of the root page; the caption carries the proficiency.
pub fn extract(scope: ElementRef<'_>, table: &SelectorTable) -> Vec<SectionItem> {
    list_items(scope, Some(&table.languages.section), &table.list.items)
        .into_iter()
        .filter_map(|item| {
            let fields = ListFields::read(item, &table.list);
            (!fields.title.is_empty()).then(|| SectionItem {
                caption: fields.caption(),
                title: fields.title,
                sub_components: vec![SectionItem::default()],
                ..SectionItem::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::{list_item, page};

    #[test]
    fn languages_card_on_the_root_page() {
        let doc = page(&format!(
            r#"<section class="artdeco-card"><div id="languages"></div><h2>Languages</h2><ul>{}{}</ul></section>
               <section class="artdeco-card"><div id="skills"></div><ul>{}</ul></section>"#,
            list_item("English", "", &["Native or bilingual proficiency"]),
            list_item("French", "", &["Professional working proficiency"]),
            list_item("Rust", "", &[]),
        ));
        let items = extract(doc.root_element(), &SelectorTable::default());
        let names: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(names, vec!["English", "French"]);
        assert_eq!(items[0].caption, "Native or bilingual proficiency");
    }
}
