//! Actor roles and the console sections they can reach

use serde::{Deserialize, Serialize};

/// Role of the signed-in user, as issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Sales,
    SamplingHead,
}

/// Top-level areas of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    SampleRequests,
    Inventory,
    Buyers,
}

impl Role {
    /// Whether this role may move fabric items through the status workflow
    pub fn can_transition(&self) -> bool {
        matches!(self, Role::Admin | Role::SamplingHead)
    }

    /// Whether the section is shown to this role
    ///
    /// Inventory is hidden from sales and sampling staff; buyer management
    /// is admin only.
    pub fn can_access(&self, section: Section) -> bool {
        match section {
            Section::Dashboard | Section::SampleRequests => true,
            Section::Inventory => *self == Role::Admin,
            Section::Buyers => *self == Role::Admin,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Sales => write!(f, "SALES"),
            Role::SamplingHead => write!(f, "SAMPLING_HEAD"),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Dashboard => write!(f, "dashboard"),
            Section::SampleRequests => write!(f, "sample requests"),
            Section::Inventory => write!(f, "inventory"),
            Section::Buyers => write!(f, "buyers"),
        }
    }
}
