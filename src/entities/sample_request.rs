//! Sample request entity type - a buyer's ask for fabric samples

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::core::entity::{Entity, Priority, Status};
use crate::core::validation::{positive_meters, Checked, FieldErrors};
use crate::entities::inventory::InventoryItem;

/// A single fabric line within a sample request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricItem {
    /// Absent until the request is saved
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub fabric_name: String,

    #[serde(default)]
    pub color: String,

    #[serde(default)]
    pub gsm: u32,

    pub required_meters: Decimal,

    /// Stock level copied from inventory when the fabric was selected
    #[serde(default)]
    pub available_meters: Decimal,

    #[serde(default)]
    pub status: Status,
}

/// A sample request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    #[serde(rename = "_id")]
    pub id: String,

    pub buyer_name: String,

    #[serde(default)]
    pub contact_person: String,

    pub required_by_date: DateTime<Utc>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,

    #[serde(default)]
    pub items: Vec<FabricItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for SampleRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.buyer_name
    }
}

impl SampleRequest {
    /// Status shown for the whole request: the first item's status
    ///
    /// A request without items counts as REQUESTED.
    pub fn current_status(&self) -> Status {
        self.items.first().map(|i| i.status).unwrap_or_default()
    }

    /// Find an item by ID
    pub fn item(&self, item_id: &str) -> Option<&FabricItem> {
        self.items
            .iter()
            .find(|i| i.id.as_deref() == Some(item_id))
    }

    /// Total meters requested across all items
    pub fn total_meters(&self) -> Decimal {
        self.items.iter().map(|i| i.required_meters).sum()
    }
}

/// One page of sample requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleRequestPage {
    pub requests: Vec<SampleRequest>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

// =========================================================================
// Forms
// =========================================================================

/// Attempted edit of a field copied from an inventory snapshot
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field} was copied from inventory and is read-only; clear the fabric selection to edit it")]
pub struct ReadOnlyField {
    pub field: &'static str,
}

/// Draft of a fabric line in the sample request form
///
/// Selecting a fabric from inventory copies its name, color, gsm and stock
/// into the draft and locks those fields until the selection is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FabricItemForm {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[validate(length(min = 1, message = "Fabric name required"))]
    fabric_name: String,

    #[validate(length(min = 1, message = "Color required"))]
    color: String,

    #[validate(range(min = 1, message = "GSM must be at least 1"))]
    gsm: u32,

    #[validate(custom = "positive_meters")]
    required_meters: Decimal,

    available_meters: Decimal,

    status: Status,

    #[serde(skip)]
    locked: bool,
}

impl Checked for FabricItemForm {}

impl FabricItemForm {
    /// An empty line in REQUESTED status
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy an inventory snapshot into the draft and lock the copied fields
    pub fn apply_snapshot(&mut self, item: &InventoryItem) {
        self.fabric_name = item.fabric_name.clone();
        self.color = item.color.clone();
        self.gsm = item.gsm;
        self.available_meters = item.available_meters;
        self.locked = true;
    }

    /// Drop the selection and unlock the copied fields
    pub fn clear_snapshot(&mut self) {
        self.fabric_name.clear();
        self.color.clear();
        self.gsm = 0;
        self.available_meters = Decimal::ZERO;
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fabric_name(&self) -> &str {
        &self.fabric_name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn gsm(&self) -> u32 {
        self.gsm
    }

    pub fn required_meters(&self) -> Decimal {
        self.required_meters
    }

    pub fn available_meters(&self) -> Decimal {
        self.available_meters
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_fabric_name(&mut self, value: impl Into<String>) -> Result<(), ReadOnlyField> {
        self.guard("fabric_name")?;
        self.fabric_name = value.into();
        Ok(())
    }

    pub fn set_color(&mut self, value: impl Into<String>) -> Result<(), ReadOnlyField> {
        self.guard("color")?;
        self.color = value.into();
        Ok(())
    }

    pub fn set_gsm(&mut self, value: u32) -> Result<(), ReadOnlyField> {
        self.guard("gsm")?;
        self.gsm = value;
        Ok(())
    }

    /// Always editable; this is the quantity being requested
    pub fn set_required_meters(&mut self, value: Decimal) {
        self.required_meters = value;
    }

    fn guard(&self, field: &'static str) -> Result<(), ReadOnlyField> {
        if self.locked {
            Err(ReadOnlyField { field })
        } else {
            Ok(())
        }
    }
}

impl From<&FabricItem> for FabricItemForm {
    fn from(item: &FabricItem) -> Self {
        Self {
            id: item.id.clone(),
            fabric_name: item.fabric_name.clone(),
            color: item.color.clone(),
            gsm: item.gsm,
            required_meters: item.required_meters,
            available_meters: item.available_meters,
            status: item.status,
            locked: false,
        }
    }
}

/// Create/edit form for a sample request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequestForm {
    #[validate(length(min = 1, message = "Buyer name is required"))]
    pub buyer_name: String,

    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_person: String,

    pub required_by_date: Option<NaiveDate>,

    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,

    #[serde(default)]
    pub attachments: Vec<String>,

    #[validate(custom = "at_least_one_item")]
    pub items: Vec<FabricItemForm>,
}

impl Checked for SampleRequestForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };
        if self.required_by_date.is_none() {
            errors.push("required_by_date", "Required date is mandatory");
        }
        for (index, item) in self.items.iter().enumerate() {
            if let Err(item_errors) = item.check() {
                errors.extend_prefixed(&format!("items[{}]", index), item_errors);
            }
        }
        errors.into_result()
    }
}

impl SampleRequestForm {
    /// A blank form with one empty item, as the create view starts
    pub fn new() -> Self {
        Self {
            items: vec![FabricItemForm::new()],
            ..Self::default()
        }
    }

    /// Copy buyer name and contact from a buyer selection
    pub fn apply_buyer(&mut self, name: &str, contact_person: &str) {
        self.buyer_name = name.to_string();
        self.contact_person = contact_person.to_string();
    }
}

impl From<&SampleRequest> for SampleRequestForm {
    fn from(request: &SampleRequest) -> Self {
        let items = if request.items.is_empty() {
            vec![FabricItemForm::new()]
        } else {
            request.items.iter().map(FabricItemForm::from).collect()
        };
        Self {
            buyer_name: request.buyer_name.clone(),
            contact_person: request.contact_person.clone(),
            required_by_date: Some(request.required_by_date.date_naive()),
            priority: request.priority,
            remarks: request.remarks.clone(),
            attachments: request.attachments.clone(),
            items,
        }
    }
}

fn at_least_one_item(items: &[FabricItemForm]) -> Result<(), ValidationError> {
    if items.is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("At least one fabric item is required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navy() -> InventoryItem {
        InventoryItem {
            id: "inv-1".to_string(),
            fabric_name: "Cotton Twill".to_string(),
            color: "Navy".to_string(),
            gsm: 180,
            available_meters: Decimal::from(120),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{
            "_id": "r1",
            "buyerName": "Acme Co.",
            "contactPerson": "Jane Doe",
            "requiredByDate": "2026-10-20T00:00:00.000Z",
            "priority": "HIGH",
            "attachments": ["https://files.example/a.png"],
            "items": [{
                "_id": "it1",
                "fabricName": "Cotton Twill",
                "color": "Navy",
                "gsm": 180,
                "requiredMeters": 12.5,
                "availableMeters": 120,
                "status": "IN_SAMPLING"
            }]
        }"#;
        let req: SampleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.priority, Priority::High);
        assert_eq!(req.current_status(), Status::InSampling);
        assert_eq!(req.item("it1").unwrap().required_meters, Decimal::new(125, 1));
        assert!(req.item("missing").is_none());
    }

    #[test]
    fn test_request_without_items_is_requested() {
        let json = r#"{"_id":"r2","buyerName":"B","requiredByDate":"2026-10-20T00:00:00Z"}"#;
        let req: SampleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.current_status(), Status::Requested);
        assert_eq!(req.total_meters(), Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_populates_and_locks() {
        let mut item = FabricItemForm::new();
        item.apply_snapshot(&navy());

        assert_eq!(item.fabric_name(), "Cotton Twill");
        assert_eq!(item.color(), "Navy");
        assert_eq!(item.gsm(), 180);
        assert_eq!(item.available_meters(), Decimal::from(120));
        assert!(item.is_locked());

        assert_eq!(
            item.set_color("Red").unwrap_err(),
            ReadOnlyField { field: "color" }
        );
        assert!(item.set_gsm(200).is_err());
        assert_eq!(item.color(), "Navy");

        item.set_required_meters(Decimal::from(5));
        assert_eq!(item.required_meters(), Decimal::from(5));
    }

    #[test]
    fn test_clearing_snapshot_unlocks() {
        let mut item = FabricItemForm::new();
        item.apply_snapshot(&navy());
        item.clear_snapshot();

        assert!(!item.is_locked());
        assert_eq!(item.fabric_name(), "");
        assert!(item.set_fabric_name("Linen").is_ok());
    }

    #[test]
    fn test_form_checks_items() {
        let mut form = SampleRequestForm::new();
        form.apply_buyer("Acme Co.", "Jane Doe");
        form.required_by_date = NaiveDate::from_ymd_opt(2026, 10, 20);

        let errors = form.check().unwrap_err();
        assert_eq!(
            errors.message_for("items[0].fabric_name"),
            Some("Fabric name required")
        );
        assert_eq!(
            errors.message_for("items[0].required_meters"),
            Some("Required meters must be greater than 0")
        );

        form.items[0].apply_snapshot(&navy());
        form.items[0].set_required_meters(Decimal::from(10));
        assert!(form.check().is_ok());
    }

    #[test]
    fn test_form_requires_date_and_items() {
        let form = SampleRequestForm {
            buyer_name: "Acme Co.".to_string(),
            contact_person: "Jane".to_string(),
            ..SampleRequestForm::default()
        };
        let errors = form.check().unwrap_err();
        assert_eq!(
            errors.message_for("required_by_date"),
            Some("Required date is mandatory")
        );
        assert_eq!(
            errors.message_for("items"),
            Some("At least one fabric item is required")
        );
    }

    #[test]
    fn test_form_payload_shape() {
        let mut form = SampleRequestForm::new();
        form.apply_buyer("Acme Co.", "Jane Doe");
        form.required_by_date = NaiveDate::from_ymd_opt(2026, 10, 20);
        form.items[0].apply_snapshot(&navy());

        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["requiredByDate"], "2026-10-20");
        assert_eq!(body["priority"], "MEDIUM");
        assert_eq!(body["items"][0]["fabricName"], "Cotton Twill");
        assert_eq!(body["items"][0]["status"], "REQUESTED");
        assert!(body["items"][0].get("locked").is_none());
        assert!(body["items"][0].get("_id").is_none());
    }
}
