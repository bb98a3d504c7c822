use serde::{Deserialize, Serialize};

use crate::error::{FieldError, ValidationError};
use crate::forms::is_valid_email;
use crate::logging::{log, obj, v_str, Domain, Level};

pub const NAME_MIN: usize = 2;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 500;
const WARN_ABOVE: usize = 400;
const LIMIT_ABOVE: usize = 450;

/// Raw form fields as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A submission that passed validation, fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Every failing field is reported; nothing is accepted partially.
pub fn validate_contact(input: &ContactInput) -> Result<ContactMessage, ValidationError> {
    let name = input.name.trim();
    let email = input.email.trim();
    let subject = input.subject.trim();
    let message = input.message.trim();

    let mut fields = Vec::new();
    if name.chars().count() < NAME_MIN {
        fields.push(FieldError::new("name", "Please enter your name (at least 2 characters)"));
    }
    if !is_valid_email(email) {
        fields.push(FieldError::new("email", "Please enter a valid email address"));
    }
    if subject.is_empty() {
        fields.push(FieldError::new("subject", "Please select a subject"));
    }
    let len = message.chars().count();
    if !(MESSAGE_MIN..=MESSAGE_MAX).contains(&len) {
        fields.push(FieldError::new("message", "Message must be between 10 and 500 characters"));
    }

    if !fields.is_empty() {
        let names: Vec<&str> = fields.iter().map(|f| f.field).collect();
        log(
            Level::Info,
            Domain::Form,
            "contact_rejected",
            obj(&[("fields", v_str(&names.join(",")))]),
        );
        return Err(ValidationError { fields });
    }

    Ok(ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
    })
}

/// Character counter state shown under the message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthHint {
    Normal,
    Warning,
    Limit,
}

pub fn message_length_hint(len: usize) -> LengthHint {
    if len > LIMIT_ABOVE {
        LengthHint::Limit
    } else if len > WARN_ABOVE {
        LengthHint::Warning
    } else {
        LengthHint::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, subject: &str, message: &str) -> ContactInput {
        ContactInput {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let msg = validate_contact(&input("  Ada ", "ada@club.org ", "join", "  I would like to join.  ")).unwrap();
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@club.org");
        assert_eq!(msg.message, "I would like to join.");
    }

    #[test]
    fn test_all_failures_reported_together() {
        let err = validate_contact(&input(" A ", "nope", "  ", "short")).unwrap_err();
        for field in ["name", "email", "subject", "message"] {
            assert!(err.has_field(field), "missing {}", field);
        }
    }

    #[test]
    fn test_message_bounds() {
        let ok = "x".repeat(MESSAGE_MAX);
        assert!(validate_contact(&input("Ada", "a@b.co", "s", &ok)).is_ok());
        let long = "x".repeat(MESSAGE_MAX + 1);
        let err = validate_contact(&input("Ada", "a@b.co", "s", &long)).unwrap_err();
        assert_eq!(err.fields.len(), 1);
        assert!(err.has_field("message"));
        assert!(validate_contact(&input("Ada", "a@b.co", "s", "123456789")).is_err());
        assert!(validate_contact(&input("Ada", "a@b.co", "s", "1234567890")).is_ok());
    }

    #[test]
    fn test_length_hint() {
        assert_eq!(message_length_hint(0), LengthHint::Normal);
        assert_eq!(message_length_hint(400), LengthHint::Normal);
        assert_eq!(message_length_hint(401), LengthHint::Warning);
        assert_eq!(message_length_hint(450), LengthHint::Warning);
        assert_eq!(message_length_hint(451), LengthHint::Limit);
    }
}
