//! Inventory endpoints

use super::{ApiClient, ApiError};
use crate::entities::inventory::{InventoryForm, InventoryItem, InventoryList};

impl ApiClient {
    /// `GET /api/inventory`
    pub async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let list: InventoryList = self.get("/api/inventory", &[]).await?;
        Ok(list.into_items())
    }

    /// `GET /api/inventory?limit=N`, used to load autocomplete candidates
    pub async fn list_inventory_limited(
        &self,
        limit: u32,
    ) -> Result<Vec<InventoryItem>, ApiError> {
        let list: InventoryList = self
            .get("/api/inventory", &[("limit", limit.to_string())])
            .await?;
        Ok(list.into_items())
    }

    pub async fn get_inventory(&self, id: &str) -> Result<InventoryItem, ApiError> {
        self.get(&Self::resource_path(&["api", "inventory", id])?, &[]).await
    }

    pub async fn create_inventory(&self, form: &InventoryForm) -> Result<InventoryItem, ApiError> {
        self.post("/api/inventory", form).await
    }

    pub async fn update_inventory(
        &self,
        id: &str,
        form: &InventoryForm,
    ) -> Result<InventoryItem, ApiError> {
        self.put(&Self::resource_path(&["api", "inventory", id])?, form).await
    }

    pub async fn delete_inventory(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.delete(&Self::resource_path(&["api", "inventory", id])?).await
    }
}
