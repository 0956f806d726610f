//! Form submission: local checks first, then the server, then the cache
//!
//! A submission never touches the form it was given. When local rules fail
//! no request is made and the field messages come back as
//! [`FormError::Invalid`]; when the server refuses, its message (or a
//! per-operation fallback) comes back as [`FormError::Rejected`]. Either way
//! the caller still holds the draft for correction.

use thiserror::Error;

use crate::api::ApiError;
use crate::core::cache::Mutation;
use crate::core::validation::{Checked, FieldErrors};
use crate::entities::buyer::BuyerForm;
use crate::entities::inventory::InventoryForm;
use crate::entities::sample_request::SampleRequestForm;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please correct the form: {0}")]
    Invalid(FieldErrors),

    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl FormError {
    pub fn rejected(source: ApiError, fallback: &str) -> Self {
        FormError::Rejected {
            message: source.message_or(fallback),
            source,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            FormError::Invalid(errors) => Some(errors),
            FormError::Rejected { .. } => None,
        }
    }
}

/// Whether a form creates a record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    pub fn from_id(id: Option<String>) -> Self {
        match id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "update",
        }
    }
}

/// A submittable form
pub trait Form: Checked {
    /// Human name of the record, as used in messages
    const NOUN: &'static str;

    /// Cache resources made stale by a successful submit
    const MUTATION: Mutation;

    fn success_message(mode: &FormMode) -> String {
        let mut noun = Self::NOUN.to_string();
        if let Some(first) = noun.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{} {}d successfully", noun, mode.verb())
    }

    fn failure_fallback(mode: &FormMode) -> String {
        format!("Failed to {} {}", mode.verb(), Self::NOUN)
    }

    /// Run local validation
    fn precheck(&self) -> Result<(), FormError> {
        self.check().map_err(FormError::Invalid)
    }
}

impl Form for BuyerForm {
    const NOUN: &'static str = "buyer";
    const MUTATION: Mutation = Mutation::Buyer;
}

impl Form for InventoryForm {
    const NOUN: &'static str = "inventory";
    const MUTATION: Mutation = Mutation::Inventory;

    fn failure_fallback(_mode: &FormMode) -> String {
        "Failed to save inventory".to_string()
    }
}

impl Form for SampleRequestForm {
    const NOUN: &'static str = "sample request";
    const MUTATION: Mutation = Mutation::SampleRequest;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            BuyerForm::success_message(&FormMode::Create),
            "Buyer created successfully"
        );
        assert_eq!(
            BuyerForm::failure_fallback(&FormMode::Edit("b1".into())),
            "Failed to update buyer"
        );
        assert_eq!(
            SampleRequestForm::success_message(&FormMode::Edit("r1".into())),
            "Sample request updated successfully"
        );
        assert_eq!(
            InventoryForm::failure_fallback(&FormMode::Create),
            "Failed to save inventory"
        );
    }

    #[test]
    fn test_precheck_reports_fields() {
        let err = BuyerForm::default().precheck().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.message_for("name"), Some("Buyer name is required"));
    }
}
