//! Experience with employer grouping.
//!
//! The list is flat in document order: an employer header is followed by the
//! roles held there. A role that follows no header is a standalone position
//! and becomes its own single-role item.

use scraper::ElementRef;
use tracing::debug;

use super::{list_items, EntityLink, ListFields};
use crate::extract::normalize::before_separator;
use crate::extract::resolver::{resolve_element, resolve_value, SelectorStrategy};
use crate::extract::selectors::SelectorTable;
use crate::types::{SectionItem, TextComponent};

/// One list item, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ExperienceEntry {
    /// Employer header; `sub_components` is still empty.
    CompanyHeader(SectionItem),
    /// A position. `employer` carries what the item says about the company,
    /// used only when no header is open.
    Role { role: SectionItem, employer: SectionItem },
}

/// Fold entries into employer groups.
///
/// A header opens a group that collects the following roles until the next
/// header or the end of the list. A header that collected no role is emitted
/// with `breakdown = false`. Entries without a title are dropped.
pub fn group_experience(entries: Vec<ExperienceEntry>) -> Vec<SectionItem> {
    let mut out = Vec::new();
    let mut open: Option<SectionItem> = None;

    for entry in entries {
        match entry {
            ExperienceEntry::CompanyHeader(header) => {
                if let Some(group) = open.take() {
                    out.push(close(group));
                }
                if header.title.is_empty() {
                    debug!("experience: header without title dropped");
                    continue;
                }
                open = Some(header);
            }
            ExperienceEntry::Role { role, employer } => {
                if role.title.is_empty() {
                    debug!("experience: role without title dropped");
                    continue;
                }
                match open.as_mut() {
                    Some(group) => group.sub_components.push(role),
                    None => {
                        let title = if employer.title.is_empty() {
                            role.title.clone()
                        } else {
                            employer.title.clone()
                        };
                        out.push(SectionItem {
                            title,
                            caption: role.caption.clone(),
                            breakdown: false,
                            sub_components: vec![role],
                            ..employer
                        });
                    }
                }
            }
        }
    }
    if let Some(group) = open {
        out.push(close(group));
    }
    out
}

fn close(mut group: SectionItem) -> SectionItem {
    group.breakdown = !group.sub_components.is_empty();
    group
}

fn read_entry(item: ElementRef<'_>, table: &SelectorTable) -> ExperienceEntry {
    let list = &table.list;
    let fields = ListFields::read(item, list);
    let link = EntityLink::read(item, &list.company_link);

    if resolve_element(&table.experience.company_header, item).is_some() {
        return ExperienceEntry::CompanyHeader(SectionItem {
            title: resolve_value(&table.experience.header_title, item),
            subtitle: fields.subtitle.clone(),
            caption: fields.caption(),
            company_id: link.id,
            company_urn: link.urn,
            company_link1: link.link,
            logo: fields.logo,
            ..SectionItem::default()
        });
    }

    let description = resolve_value(&list.description, item);
    let role = SectionItem {
        title: resolve_value(&table.experience.role_title, item),
        caption: fields.caption(),
        metadata: fields.captions.get(1).cloned().unwrap_or_default(),
        description: if description.is_empty() {
            Vec::new()
        } else {
            vec![TextComponent::text(description)]
        },
        ..SectionItem::default()
    };
    let employer = SectionItem {
        title: before_separator(&fields.subtitle),
        company_id: link.id,
        company_urn: link.urn,
        company_link1: link.link,
        logo: fields.logo,
        ..SectionItem::default()
    };
    ExperienceEntry::Role { role, employer }
}

/// Classified entries in document order.
pub fn read_entries(
    scope: ElementRef<'_>,
    container: Option<&SelectorStrategy>,
    table: &SelectorTable,
) -> Vec<ExperienceEntry> {
    list_items(scope, container, &table.list.items)
        .into_iter()
        .map(|item| read_entry(item, table))
        .collect()
}

pub fn extract(
    scope: ElementRef<'_>,
    container: Option<&SelectorStrategy>,
    table: &SelectorTable,
) -> Vec<SectionItem> {
    group_experience(read_entries(scope, container, table))
}
