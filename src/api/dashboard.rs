use super::{ApiClient, ApiError};
use crate::entities::dashboard::DashboardStats;

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/api/dashboard/stats", &[]).await
    }
}
