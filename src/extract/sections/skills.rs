use scraper::ElementRef;

use super::{list_items, ListFields};
use crate::extract::normalize::endorsement_count;
use crate::extract::resolver::SelectorStrategy;
use crate::extract::selectors::SelectorTable;
use crate::types::{SectionItem, TextComponent};

const TOP_SKILLS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skills {
    pub items: Vec<SectionItem>,
    /// Up to five skill names, most endorsed first, joined by `", "`.
    pub top_skills_by_endorsements: String,
}

/// Rank `(name, endorsements)` pairs. Zero-endorsement skills are left out;
/// equal counts keep their list order.
pub fn rank_top_skills(counts: &[(String, u64)]) -> String {
    let mut ranked: Vec<&(String, u64)> = counts.iter().filter(|(_, n)| *n > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_SKILLS)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn extract(
    scope: ElementRef<'_>,
    container: Option<&SelectorStrategy>,
    table: &SelectorTable,
) -> Skills {
    let mut items = Vec::new();
    let mut counts = Vec::new();

    for item in list_items(scope, container, &table.list.items) {
        let fields = ListFields::read(item, &table.list);
        if fields.title.is_empty() {
            continue;
        }
        let endorsements = fields
            .captions
            .iter()
            .find_map(|c| endorsement_count(c))
            .unwrap_or(0);
        counts.push((fields.title.clone(), endorsements));
        items.push(SectionItem {
            title: fields.title,
            sub_components: vec![SectionItem {
                description: fields.captions.into_iter().map(TextComponent::insight).collect(),
                ..SectionItem::default()
            }],
            ..SectionItem::default()
        });
    }

    Skills {
        items,
        top_skills_by_endorsements: rank_top_skills(&counts),
    }
}
