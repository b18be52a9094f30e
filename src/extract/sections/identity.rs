//! Top card: name, headline, location, social proof and profile ids.

use scraper::ElementRef;

use crate::extract::normalize::{count_from_text, linkedin_urn, public_identifier, split_location, split_name};
use crate::extract::resolver::{resolve, FieldContext};
use crate::extract::selectors::IdentitySelectors;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub headline: String,
    pub address_with_country: String,
    pub address_country_only: String,
    pub address_without_country: String,
    pub public_identifier: String,
    pub urn: String,
    pub open_connection: bool,
    pub connections: u64,
    pub followers: u64,
}

/// `page_url` is the URL the root page landed on; the public identifier is
/// read from it rather than from the DOM.
pub fn extract(scope: ElementRef<'_>, selectors: &IdentitySelectors, page_url: &str) -> Identity {
    let mut ctx = FieldContext::default();

    let full_name = resolve(&selectors.full_name, scope, &ctx).value;
    ctx.full_name = full_name.clone();
    let headline = resolve(&selectors.headline, scope, &ctx).value;
    ctx.headline = headline.clone();

    let location = resolve(&selectors.location, scope, &ctx).value;
    let (address_country_only, address_without_country) = split_location(&location);
    let (first_name, last_name) = split_name(&full_name);

    Identity {
        first_name,
        last_name,
        headline,
        address_country_only,
        address_without_country,
        address_with_country: location,
        public_identifier: public_identifier(page_url),
        urn: linkedin_urn(&resolve(&selectors.urn, scope, &ctx).value),
        open_connection: resolve(&selectors.connect_control, scope, &ctx).matched,
        connections: count_from_text(&resolve(&selectors.connections, scope, &ctx).value),
        followers: count_from_text(&resolve(&selectors.followers, scope, &ctx).value),
        full_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sections::test_support::page;

    const TOP_CARD: &str = r#"
        <section class="artdeco-card" data-member-urn="urn:li:member:123">
          <div data-entity-urn="urn:li:fsd_profile:ACoAAB12"></div>
          <h1 class="text-heading-xlarge">Ada Lovelace</h1>
          <div class="text-body-medium break-words">Analytical Engine Programmer</div>
          <span class="text-body-small inline t-black--light break-words">London, England, United Kingdom</span>
          <ul>
            <li class="text-body-small">10,219 followers</li>
            <li class="text-body-small">500+ connections</li>
          </ul>
          <button aria-label="Invite Ada Lovelace to connect">Connect</button>
        </section>"#;

    #[test]
    fn full_top_card() {
        let doc = page(TOP_CARD);
        let id = extract(
            doc.root_element(),
            &IdentitySelectors::default(),
            "https://www.linkedin.com/in/ada-lovelace/",
        );
        assert_eq!(id.full_name, "Ada Lovelace");
        assert_eq!((id.first_name.as_str(), id.last_name.as_str()), ("Ada", "Lovelace"));
        assert_eq!(id.headline, "Analytical Engine Programmer");
        assert_eq!(id.address_country_only, "United Kingdom");
        assert_eq!(id.address_without_country, "London, England");
        assert_eq!(id.connections, 500);
        assert_eq!(id.followers, 10_219);
        assert_eq!(id.public_identifier, "ada-lovelace");
        assert_eq!(id.urn, "urn:li:fsd_profile:ACoAAB12");
        assert!(id.open_connection);
    }

    #[test]
    fn headline_echoing_the_name_is_rejected() {
        let doc = page(
            r#"<h1>Grace Hopper</h1>
               <div class="text-body-medium break-words">Grace Hopper</div>
               <section class="top-card"><div class="text-body-small">Rear Admiral</div></section>"#,
        );
        let id = extract(doc.root_element(), &IdentitySelectors::default(), "");
        assert_eq!(id.full_name, "Grace Hopper");
        assert_eq!(id.headline, "Rear Admiral");
        assert!(!id.open_connection);
        assert_eq!(id.connections, 0);
    }
}
