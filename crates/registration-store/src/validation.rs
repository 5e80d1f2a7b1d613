//! Submission validation.
//!
//! Every field is checked; all violations are reported together rather than
//! stopping at the first one.

use crate::types::{ClassName, NewRegistration, RegistrationFields};
use std::fmt;

/// Minimum length of name, city and state after trimming.
pub const MIN_TEXT_LENGTH: usize = 2;
/// Maximum length of the free-form question.
pub const MAX_QUESTION_LENGTH: usize = 500;
/// Allowed phone number length, whitespace not counted.
pub const PHONE_LENGTH: std::ops::RangeInclusive<usize> = 7..=16;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

/// One or more rejected fields of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Whether the given field was rejected.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Validate raw fields into a trimmed registration.
pub fn validate(fields: &RegistrationFields) -> Result<NewRegistration, ValidationError> {
    let mut violations = Vec::new();

    let full_name = required_text(
        &mut violations,
        "fullName",
        fields.full_name.as_deref(),
        "Full name is required",
        "Name must be at least 2 characters long",
    );

    let class_name = match trimmed(fields.class_name.as_deref()) {
        None => {
            violations.push(violation("className", "Class is required"));
            None
        }
        Some(label) => match label.parse::<ClassName>() {
            Ok(class_name) => Some(class_name),
            Err(_) => {
                violations.push(violation("className", "Please select a valid class"));
                None
            }
        },
    };

    let city = required_text(
        &mut violations,
        "city",
        fields.city.as_deref(),
        "City is required",
        "City must be at least 2 characters long",
    );

    let state = required_text(
        &mut violations,
        "state",
        fields.state.as_deref(),
        "State is required",
        "State must be at least 2 characters long",
    );

    let phone_number = match trimmed(fields.phone_number.as_deref()) {
        None => {
            violations.push(violation("phoneNumber", "Phone number is required"));
            None
        }
        Some(number) if is_valid_phone_number(number) => Some(number.to_string()),
        Some(_) => {
            violations.push(violation("phoneNumber", "Please enter a valid phone number"));
            None
        }
    };

    let question = fields.question.as_deref().map(str::trim).unwrap_or_default();
    if question.chars().count() > MAX_QUESTION_LENGTH {
        violations.push(violation("question", "Question cannot exceed 500 characters"));
    }

    match (full_name, class_name, city, state, phone_number) {
        (Some(full_name), Some(class_name), Some(city), Some(state), Some(phone_number))
            if violations.is_empty() =>
        {
            Ok(NewRegistration {
                full_name,
                class_name,
                city,
                state,
                phone_number,
                question: question.to_string(),
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

/// Digits, whitespace, `-`, `+`, `(` and `)` only, with 7 to 16
/// non-whitespace characters.
pub fn is_valid_phone_number(number: &str) -> bool {
    let allowed = number
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '+' | '(' | ')'));
    let length = number.chars().filter(|c| !c.is_whitespace()).count();

    allowed && PHONE_LENGTH.contains(&length)
}

fn violation(field: &'static str, message: &'static str) -> FieldViolation {
    FieldViolation { field, message }
}

/// Trimmed value, or `None` when absent or blank.
fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_text(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: Option<&str>,
    missing: &'static str,
    too_short: &'static str,
) -> Option<String> {
    match trimmed(value) {
        None => {
            violations.push(violation(field, missing));
            None
        }
        Some(text) if text.chars().count() < MIN_TEXT_LENGTH => {
            violations.push(violation(field, too_short));
            None
        }
        Some(text) => Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> RegistrationFields {
        RegistrationFields {
            full_name: Some("John Doe".into()),
            class_name: Some("10th".into()),
            city: Some("Pune".into()),
            state: Some("MH".into()),
            phone_number: Some("9876543210".into()),
            question: None,
        }
    }

    #[test]
    fn test_valid_submission() {
        let registration = validate(&valid_fields()).unwrap();

        assert_eq!(registration.full_name, "John Doe");
        assert_eq!(registration.class_name, ClassName::Tenth);
        assert_eq!(registration.city, "Pune");
        assert_eq!(registration.state, "MH");
        assert_eq!(registration.phone_number, "9876543210");
        assert_eq!(registration.question, "");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = RegistrationFields {
            full_name: Some("  Jane Roe ".into()),
            class_name: Some(" Other ".into()),
            city: Some("\tMumbai\n".into()),
            state: Some(" MH".into()),
            phone_number: Some(" +91 (987) 654-3210 ".into()),
            question: Some("  When do classes start?  ".into()),
        };

        let registration = validate(&fields).unwrap();
        assert_eq!(registration.full_name, "Jane Roe");
        assert_eq!(registration.class_name, ClassName::Other);
        assert_eq!(registration.city, "Mumbai");
        assert_eq!(registration.phone_number, "+91 (987) 654-3210");
        assert_eq!(registration.question, "When do classes start?");
    }

    #[test]
    fn test_short_name_rejected() {
        let mut fields = valid_fields();
        fields.full_name = Some("J".into());

        let err = validate(&fields).unwrap_err();
        assert!(err.has_field("fullName"));
        assert_eq!(err.to_string(), "Name must be at least 2 characters long");
    }

    #[test]
    fn test_name_shorter_than_two_after_trim() {
        let mut fields = valid_fields();
        fields.full_name = Some("  J  ".into());

        let err = validate(&fields).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.has_field("fullName"));
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let err = validate(&RegistrationFields::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Full name is required, Class is required, City is required, \
             State is required, Phone number is required"
        );
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let mut fields = valid_fields();
        fields.city = Some("   ".into());

        let err = validate(&fields).unwrap_err();
        assert_eq!(err.to_string(), "City is required");
    }

    #[test]
    fn test_unknown_class_rejected() {
        let mut fields = valid_fields();
        fields.class_name = Some("13th".into());

        let err = validate(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Please select a valid class");
    }

    #[test]
    fn test_multiple_violations_joined() {
        let mut fields = valid_fields();
        fields.city = Some("P".into());
        fields.state = Some("M".into());
        fields.phone_number = Some("12ab".into());

        let err = validate(&fields).unwrap_err();
        assert_eq!(
            err.to_string(),
            "City must be at least 2 characters long, \
             State must be at least 2 characters long, \
             Please enter a valid phone number"
        );
    }

    #[test]
    fn test_question_length_limit() {
        let mut fields = valid_fields();
        fields.question = Some("a".repeat(MAX_QUESTION_LENGTH));
        assert!(validate(&fields).is_ok());

        fields.question = Some("a".repeat(MAX_QUESTION_LENGTH + 1));
        let err = validate(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Question cannot exceed 500 characters");
    }

    #[test]
    fn test_phone_number_pattern() {
        assert!(is_valid_phone_number("9876543210"));
        assert!(is_valid_phone_number("+1 (415) 555-1234"));
        assert!(is_valid_phone_number("1234567"));
        assert!(is_valid_phone_number("1234567890123456"));

        assert!(!is_valid_phone_number("123456"));
        assert!(!is_valid_phone_number("12345678901234567"));
        assert!(!is_valid_phone_number("98765x4321"));
        assert!(!is_valid_phone_number("+1.415.555.1234"));
    }

    #[test]
    fn test_phone_number_length_ignores_whitespace() {
        // 16 digits spread over 19 characters
        assert!(is_valid_phone_number("1234 5678 9012 3456"));
        assert!(!is_valid_phone_number("1234 5678 9012 34567"));
        assert!(!is_valid_phone_number("123   456"));
    }

    #[test]
    fn test_phone_number_accepts_any_whitespace() {
        assert!(is_valid_phone_number("98765\t43210"));
        assert!(is_valid_phone_number("98765\u{a0}43210"));
        assert!(!is_valid_phone_number("98765_43210"));
    }

    #[test]
    fn test_class_name_parsing() {
        for class_name in ClassName::ALL {
            assert_eq!(class_name.as_str().parse::<ClassName>(), Ok(class_name));
        }
        assert!("other".parse::<ClassName>().is_err());
        assert!("4th".parse::<ClassName>().is_err());
    }
}
