//! Sample request endpoints

use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::core::entity::Status;
use crate::core::workflow::ConfirmedTransition;
use crate::entities::sample_request::{SampleRequest, SampleRequestForm, SampleRequestPage};

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: Status,
}

impl ApiClient {
    /// `GET /api/sample-requests?page&limit`
    pub async fn list_sample_requests(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<SampleRequestPage, ApiError> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.get("/api/sample-requests", &query).await
    }

    pub async fn get_sample_request(&self, id: &str) -> Result<SampleRequest, ApiError> {
        self.get(&Self::resource_path(&["api", "sample-requests", id])?, &[]).await
    }

    pub async fn create_sample_request(
        &self,
        form: &SampleRequestForm,
    ) -> Result<SampleRequest, ApiError> {
        self.post("/api/sample-requests", form).await
    }

    pub async fn update_sample_request(
        &self,
        id: &str,
        form: &SampleRequestForm,
    ) -> Result<SampleRequest, ApiError> {
        self.put(&Self::resource_path(&["api", "sample-requests", id])?, form).await
    }

    pub async fn delete_sample_request(&self, id: &str) -> Result<Option<String>, ApiError> {
        self.delete(&Self::resource_path(&["api", "sample-requests", id])?).await
    }

    /// `PATCH /api/sample-requests/{id}/items/{itemId}/status`
    ///
    /// Only a [`ConfirmedTransition`] can be sent, so a move to SENT cannot
    /// reach the server without the user's confirmation.
    pub async fn update_item_status(
        &self,
        request_id: &str,
        transition: &ConfirmedTransition,
    ) -> Result<Option<String>, ApiError> {
        let path = Self::resource_path(&[
            "api",
            "sample-requests",
            request_id,
            "items",
            transition.item_id(),
            "status",
        ])?;
        self.patch(
            &path,
            &StatusUpdate {
                status: transition.to(),
            },
        )
        .await
    }
}
