//! Contact field rules.
//!
//! Every check runs against the trimmed value. Lengths are counted in
//! `char`s.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ContactFields, FieldErrors, FieldName};

pub const NAME_MIN_CHARS: usize = 2;
pub const SUBJECT_MIN_CHARS: usize = 3;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 1000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Returns the first rule `value` violates for `field`.
pub fn validate_field(field: FieldName, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(format!("{} is required", field.label()));
    }

    let chars = value.chars().count();
    match field {
        FieldName::Name if chars < NAME_MIN_CHARS => Some(format!(
            "Name must be at least {NAME_MIN_CHARS} characters"
        )),
        FieldName::Email if !is_valid_email(value) => {
            Some("Please enter a valid email address".to_string())
        }
        FieldName::Subject if chars < SUBJECT_MIN_CHARS => Some(format!(
            "Subject must be at least {SUBJECT_MIN_CHARS} characters"
        )),
        FieldName::Message if chars < MESSAGE_MIN_CHARS => Some(format!(
            "Message must be at least {MESSAGE_MIN_CHARS} characters"
        )),
        FieldName::Message if chars > MESSAGE_MAX_CHARS => Some(format!(
            "Message must be less than {MESSAGE_MAX_CHARS} characters"
        )),
        _ => None,
    }
}

pub fn validate_all(fields: &ContactFields) -> FieldErrors {
    fields
        .iter()
        .filter_map(|(field, value)| validate_field(field, value).map(|error| (field, error)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> ContactFields {
        ContactFields {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            subject: "Engines".into(),
            message: "About the analytical engine.".into(),
        }
    }

    #[test]
    fn name_rules() {
        assert_eq!(
            validate_field(FieldName::Name, "").as_deref(),
            Some("Name is required")
        );
        assert_eq!(
            validate_field(FieldName::Name, "A").as_deref(),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(validate_field(FieldName::Name, "Al"), None);
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        assert_eq!(
            validate_field(FieldName::Subject, "   \t").as_deref(),
            Some("Subject is required")
        );
        assert_eq!(
            validate_field(FieldName::Name, " A ").as_deref(),
            Some("Name must be at least 2 characters")
        );
    }

    #[test]
    fn email_rules() {
        assert_eq!(
            validate_field(FieldName::Email, "").as_deref(),
            Some("Email is required")
        );
        assert_eq!(
            validate_field(FieldName::Email, "not-an-email").as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(validate_field(FieldName::Email, "a@b.co"), None);
        assert!(validate_field(FieldName::Email, "a b@c.de").is_some());
        assert!(validate_field(FieldName::Email, "a@@b.co").is_some());
        assert!(validate_field(FieldName::Email, "a@b").is_some());
        assert_eq!(validate_field(FieldName::Email, "first.last@mail.example.org"), None);
    }

    #[test]
    fn subject_rules() {
        assert_eq!(
            validate_field(FieldName::Subject, "Hi").as_deref(),
            Some("Subject must be at least 3 characters")
        );
        assert_eq!(validate_field(FieldName::Subject, "Hey"), None);
    }

    #[test]
    fn message_length_bounds() {
        assert_eq!(
            validate_field(FieldName::Message, "short").as_deref(),
            Some("Message must be at least 10 characters")
        );
        assert_eq!(validate_field(FieldName::Message, &"x".repeat(1000)), None);
        assert_eq!(
            validate_field(FieldName::Message, &"x".repeat(1001)).as_deref(),
            Some("Message must be less than 1000 characters")
        );
    }

    #[test]
    fn message_length_counts_chars_not_bytes() {
        assert_eq!(validate_field(FieldName::Message, &"é".repeat(1000)), None);
        assert_eq!(validate_field(FieldName::Message, &"日本語".repeat(4)), None);
    }

    #[test]
    fn validate_all_reports_only_failing_fields() {
        assert!(validate_all(&valid_fields()).is_empty());

        let mut fields = valid_fields();
        fields.email = "nope".into();
        fields.message.clear();
        let errors = validate_all(&fields);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(FieldName::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(errors.get(FieldName::Message), Some("Message is required"));
        assert!(!errors.contains(FieldName::Name));
    }

    #[test]
    fn validate_all_on_empty_form_flags_every_field() {
        let errors = validate_all(&ContactFields::default());
        assert_eq!(errors.fields().collect::<Vec<_>>(), FieldName::ALL.to_vec());
    }
}
