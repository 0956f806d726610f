//! Buyer entity type - customers who request fabric samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::entity::Entity;
use crate::core::validation::{email_pattern, required_min_len, Checked};

/// A buyer record
///
/// Buyers are soft-deleted: `is_deleted` flips and the record stays on the
/// server. List views only ever ask for non-deleted buyers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub contact_person: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Buyer {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

/// Dropdown projection returned by `/api/buyers/active`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBuyer {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact_person: String,
}

/// One page of buyers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerPage {
    pub buyers: Vec<Buyer>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

/// Server-side filters for the buyer list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BuyerFilters {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl BuyerFilters {
    /// Query parameters for the filters that are set
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(email) = self.email.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("email", email.to_string()));
        }
        pairs
    }
}

/// Create/edit form for a buyer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BuyerForm {
    #[validate(custom = "validate_name")]
    pub name: String,

    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_person: String,

    #[validate(custom = "email_pattern")]
    pub email: String,

    #[validate(custom = "validate_phone")]
    pub phone: String,

    #[validate(custom = "validate_address")]
    pub address: String,
}

impl Checked for BuyerForm {}

impl From<&Buyer> for BuyerForm {
    fn from(buyer: &Buyer) -> Self {
        Self {
            name: buyer.name.clone(),
            contact_person: buyer.contact_person.clone(),
            email: buyer.email.clone(),
            phone: buyer.phone.clone(),
            address: buyer.address.clone(),
        }
    }
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    required_min_len(
        value,
        2,
        "Buyer name is required",
        "Name must be at least 2 characters",
    )
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    required_min_len(
        value,
        10,
        "Phone number is required",
        "Phone number must be at least 10 digits",
    )
}

fn validate_address(value: &str) -> Result<(), ValidationError> {
    required_min_len(
        value,
        10,
        "Address is required",
        "Address must be at least 10 characters",
    )
}
