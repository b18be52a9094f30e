use scraper::ElementRef;

use crate::extract::normalize::{email_from_text, phone_from_text};
use crate::extract::resolver::resolve_value;
use crate::extract::selectors::ContactSelectors;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}

/// Email and phone from the contact-info overlay.
pub fn extract(scope: ElementRef<'_>, selectors: &ContactSelectors) -> Contact {
    let email = resolve_value(&selectors.email, scope);
    let phone = resolve_value(&selectors.phone, scope);
    Contact {
        email: email_from_text(email.trim_start_matches("mailto:")),
        mobile_number: phone_from_text(phone.trim_start_matches("tel:")),
    }
}
