//! Inventory entity type - fabric stock on hand

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::entity::Entity;
use crate::core::validation::{non_negative_meters, Checked};

/// A fabric stock record
///
/// Stock is decremented server-side when a fabric item is marked SENT; the
/// console only reads and edits these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub fabric_name: String,
    pub color: String,
    pub gsm: u32,
    pub available_meters: Decimal,
}

impl Entity for InventoryItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.fabric_name
    }
}

impl InventoryItem {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::of(self.available_meters)
    }
}

/// Inventory list payload
///
/// The plain list endpoint returns a bare array; with `limit` it wraps the
/// records as `{ "inventory": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InventoryList {
    Bare(Vec<InventoryItem>),
    Wrapped {
        #[serde(default)]
        inventory: Vec<InventoryItem>,
    },
}

impl InventoryList {
    pub fn into_items(self) -> Vec<InventoryItem> {
        match self {
            InventoryList::Bare(items) => items,
            InventoryList::Wrapped { inventory } => inventory,
        }
    }
}

/// Stock band used by the inventory filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// 50 m or less
    Low,
    /// More than 50 m, up to 100 m
    Medium,
    /// More than 100 m
    High,
}

impl StockLevel {
    pub fn of(meters: Decimal) -> Self {
        if meters <= Decimal::from(50) {
            StockLevel::Low
        } else if meters <= Decimal::from(100) {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockLevel::Low => write!(f, "low"),
            StockLevel::Medium => write!(f, "medium"),
            StockLevel::High => write!(f, "high"),
        }
    }
}

/// Create/edit form for an inventory record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryForm {
    #[validate(length(min = 1, message = "Fabric name is required"))]
    pub fabric_name: String,

    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,

    #[validate(range(min = 1, message = "GSM must be at least 1"))]
    pub gsm: u32,

    #[validate(custom = "non_negative_meters")]
    pub available_meters: Decimal,
}

impl Checked for InventoryForm {}

impl From<&InventoryItem> for InventoryForm {
    fn from(item: &InventoryItem) -> Self {
        Self {
            fabric_name: item.fabric_name.clone(),
            color: item.color.clone(),
            gsm: item.gsm,
            available_meters: item.available_meters,
        }
    }
}
