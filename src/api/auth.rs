//! Authentication endpoint

use super::{ApiClient, ApiError};
use crate::entities::user::{LoginRequest, LoginResponse};

impl ApiClient {
    /// `POST /api/auth/login`
    ///
    /// Returns the user and token; starting the session is up to the caller.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post("/api/auth/login", credentials).await
    }
}
