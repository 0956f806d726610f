//! Local form validation helpers
//!
//! Forms derive [`validator::Validate`]; this module flattens the resulting
//! errors into ordered `field: message` pairs for inline display.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A single field-level validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `phone` or `items[0].fabric_name`
    pub field: String,
    pub message: String,
}

/// All validation failures of a form, sorted by field path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message for a field, if it failed
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
    }

    /// Append errors from a nested form under `prefix`
    pub fn extend_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for e in other.0 {
            self.0.push(FieldError {
                field: format!("{}.{}", prefix, e.field),
                message: e.message,
            });
        }
        self.0.sort_by(|a, b| a.field.cmp(&b.field));
    }

    /// `Ok` when nothing failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|err| FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        out.sort_by(|a, b| a.field.cmp(&b.field));
        FieldErrors(out)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Forms that can be checked locally before any request is made
pub trait Checked: Validate {
    /// Run every local rule
    fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

// =========================================================================
// Shared rules
// =========================================================================

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Presence check followed by a minimum character count
pub fn required_min_len(
    value: &str,
    min: usize,
    required: &'static str,
    too_short: &'static str,
) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(failure("required", required));
    }
    if value.chars().count() < min {
        return Err(failure("length", too_short));
    }
    Ok(())
}

pub fn email_pattern(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("required", "Email is required"));
    }
    if !EMAIL_RE.is_match(value) {
        return Err(failure("email", "Please enter a valid email address"));
    }
    Ok(())
}

pub fn positive_meters(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(failure("range", "Required meters must be greater than 0"))
    }
}

pub fn non_negative_meters(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(failure("range", "Available meters cannot be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(email_pattern("buyer@example.com").is_ok());
        assert!(email_pattern("buyer@example").is_err());
        assert!(email_pattern("bu yer@example.com").is_err());

        let err = email_pattern("").unwrap_err();
        assert_eq!(err.message.unwrap(), "Email is required");
    }

    #[test]
    fn test_required_min_len() {
        assert!(required_min_len("Acme", 2, "req", "short").is_ok());
        let err = required_min_len("  ", 2, "req", "short").unwrap_err();
        assert_eq!(err.code, "required");
        let err = required_min_len("A", 2, "req", "short").unwrap_err();
        assert_eq!(err.code, "length");
    }

    #[test]
    fn test_meters_rules() {
        assert!(positive_meters(&Decimal::ONE).is_ok());
        assert!(positive_meters(&Decimal::ZERO).is_err());
        assert!(non_negative_meters(&Decimal::ZERO).is_ok());
        assert!(non_negative_meters(&Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn test_field_errors_prefix_and_display() {
        let mut errors = FieldErrors::default();
        errors.push("buyer_name", "Buyer name is required");

        let mut nested = FieldErrors::default();
        nested.push("color", "Color required");
        errors.extend_prefixed("items[0]", nested);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for("items[0].color"), Some("Color required"));
        assert_eq!(
            errors.to_string(),
            "buyer_name: Buyer name is required; items[0].color: Color required"
        );
    }
}
