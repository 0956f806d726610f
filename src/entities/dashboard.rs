//! Dashboard statistics

use serde::{Deserialize, Serialize};

/// Headline figures for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_sample_requests: u64,
    pub pending_samples: u64,
    pub sent_today: u64,
    pub approval_rate_percentage: f64,
}
