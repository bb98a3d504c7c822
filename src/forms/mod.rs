//! Contact form validation and the newsletter subscriber list.

pub mod contact;
pub mod newsletter;

pub use contact::{message_length_hint, validate_contact, ContactInput, ContactMessage, LengthHint};
pub use newsletter::SubscriberStore;

use regex::Regex;
use std::sync::OnceLock;

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

/// `local@domain.tld`: no whitespace, one `@`, and a dot in the domain with
/// text on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}
