//! Entity type definitions

pub mod buyer;
pub mod dashboard;
pub mod inventory;
pub mod sample_request;
pub mod user;

pub use buyer::{ActiveBuyer, Buyer, BuyerFilters, BuyerForm, BuyerPage};
pub use dashboard::DashboardStats;
pub use inventory::{InventoryForm, InventoryItem, InventoryList, StockLevel};
pub use sample_request::{
    FabricItem, FabricItemForm, ReadOnlyField, SampleRequest, SampleRequestForm,
    SampleRequestPage,
};
pub use user::{LoginRequest, LoginResponse, User};
