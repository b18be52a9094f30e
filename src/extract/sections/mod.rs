//! Section Extractors.
//!
//! Each extractor is a pure function over a parsed DOM snapshot. A missing
//! container or an item without a title yields less data, never an error.

pub mod about;
pub mod certifications;
pub mod contact;
pub mod current_role;
pub mod education;
pub mod experience;
pub mod identity;
pub mod interests;
pub mod languages;
pub mod media;
pub mod recommendations;
pub mod skills;

use scraper::ElementRef;
use tracing::debug;

use super::normalize::{clean_url, company_id, company_urn};
use super::resolver::{resolve_all, resolve_element, resolve_texts, resolve_value, SelectorStrategy};
use super::selectors::ListSelectors;
use crate::types::TextComponent;

/// Item containers of a list-shaped section.
///
/// `container` narrows the scope to one card of the root page first; detail
/// pages pass `None` and enumerate the whole document.
pub(crate) fn list_items<'a>(
    scope: ElementRef<'a>,
    container: Option<&SelectorStrategy>,
    items: &SelectorStrategy,
) -> Vec<ElementRef<'a>> {
    let scope = match container {
        None => scope,
        Some(strategy) => match resolve_element(strategy, scope) {
            Some(section) => section,
            None => {
                debug!("section container '{}' not found", strategy.field);
                return Vec::new();
            }
        },
    };
    resolve_all(items, scope)
}

/// Fields every list item shares.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListFields {
    pub title: String,
    pub subtitle: String,
    pub captions: Vec<String>,
    pub logo: String,
}

impl ListFields {
    pub fn read(item: ElementRef<'_>, list: &ListSelectors) -> Self {
        Self {
            title: resolve_value(&list.title, item),
            subtitle: resolve_value(&list.subtitle, item),
            captions: resolve_texts(&list.captions, item),
            logo: resolve_value(&list.logo, item),
        }
    }

    pub fn caption(&self) -> String {
        self.captions.first().cloned().unwrap_or_default()
    }

    /// Captions after the first, as insight fragments (grades, endorsements).
    pub fn insights(&self) -> Vec<TextComponent> {
        self.captions
            .iter()
            .skip(1)
            .map(|c| TextComponent::insight(c.clone()))
            .collect()
    }
}

/// Organization link of an item, with the id and urn derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct EntityLink {
    pub link: String,
    pub id: String,
    pub urn: String,
}

impl EntityLink {
    pub fn read(item: ElementRef<'_>, strategy: &SelectorStrategy) -> Self {
        let href = resolve_value(strategy, item);
        let id = company_id(&href);
        Self {
            link: clean_url(&href),
            urn: company_urn(&id),
            id,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use scraper::Html;

    /// One `li.artdeco-list__item` in the markup shape of a detail page.
    pub fn list_item(title: &str, subtitle: &str, captions: &[&str]) -> String {
        let captions: String = captions
            .iter()
            .map(|c| {
                format!(r#"<span class="t-14 t-normal t-black--light"><span aria-hidden="true">{c}</span></span>"#)
            })
            .collect();
        let subtitle = if subtitle.is_empty() {
            String::new()
        } else {
            format!(r#"<span class="t-14 t-normal"><span aria-hidden="true">{subtitle}</span></span>"#)
        };
        format!(
            r#"<li class="artdeco-list__item">
                 <img src="https://media.example.com/logo.png">
                 <div class="display-flex align-items-center"><span class="mr1 t-bold"><span aria-hidden="true">{title}</span></span></div>
                 {subtitle}{captions}
               </li>"#
        )
    }

    pub fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body><main>{body}</main></body></html>"))
    }
}
