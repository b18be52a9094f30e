use scraper::ElementRef;

use crate::extract::resolver::resolve_value;
use crate::extract::selectors::AboutSelectors;

/// Free-text About; `""` when the card is absent.
pub fn extract(scope: ElementRef<'_>, selectors: &AboutSelectors) -> String {
    resolve_value(&selectors.text, scope)
}
