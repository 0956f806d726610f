//! Buyer endpoints

use super::{ApiClient, ApiError};
use crate::entities::buyer::{ActiveBuyer, Buyer, BuyerFilters, BuyerForm, BuyerPage};

impl ApiClient {
    /// `GET /api/buyers?page&limit[&name][&email]`
    pub async fn list_buyers(
        &self,
        page: u32,
        limit: u32,
        filters: &BuyerFilters,
    ) -> Result<BuyerPage, ApiError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        query.extend(filters.query_pairs());
        self.get("/api/buyers", &query).await
    }

    pub async fn get_buyer(&self, id: &str) -> Result<Buyer, ApiError> {
        self.get(&Self::resource_path(&["api", "buyers", id])?, &[]).await
    }

    pub async fn create_buyer(&self, form: &BuyerForm) -> Result<Buyer, ApiError> {
        self.post("/api/buyers", form).await
    }

    pub async fn update_buyer(&self, id: &str, form: &BuyerForm) -> Result<Buyer, ApiError> {
        self.put(&Self::resource_path(&["api", "buyers", id])?, form).await
    }

    /// Soft delete; the server flags the record rather than removing it
    pub async fn delete_buyer(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.delete(&Self::resource_path(&["api", "buyers", id])?).await
    }

    /// Non-deleted buyers for dropdowns
    pub async fn active_buyers(&self) -> Result<Vec<ActiveBuyer>, ApiError> {
        self.get("/api/buyers/active", &[]).await
    }
}
