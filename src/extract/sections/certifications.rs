use scraper::ElementRef;

use super::{list_items, EntityLink, ListFields};
use crate::extract::selectors::SelectorTable;
use crate::types::SectionItem;

/// Licenses and certifications from `details/certifications/`.
pub fn extract(scope: ElementRef<'_>, table: &SelectorTable) -> Vec<SectionItem> {
    list_items(scope, None, &table.list.items)
        .into_iter()
        .filter_map(|item| {
            let fields = ListFields::read(item, &table.list);
            if fields.title.is_empty() {
                return None;
            }
            let issuer = EntityLink::read(item, &table.list.company_link);
            Some(SectionItem {
                caption: fields.caption(),
                title: fields.title,
                subtitle: fields.subtitle,
                company_id: issuer.id,
                company_urn: issuer.urn,
                company_link1: issuer.link,
                logo: fields.logo,
                sub_components: vec![SectionItem::default()],
                ..SectionItem::default()
            })
        })
        .collect()
}
