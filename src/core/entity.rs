//! Entity trait - common interface for all console resources

use serde::{de::DeserializeOwned, Serialize};

/// Common trait for records served by the ERP backend
pub trait Entity: Serialize + DeserializeOwned {
    /// Get the server-assigned ID
    fn id(&self) -> &str;

    /// Get a human-readable title for tables and prompts
    fn title(&self) -> &str;
}

/// Status of a fabric item within a sample request
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum Status {
    #[default]
    Requested,
    InSampling,
    Sent,
    Approved,
    Rejected,
}

impl Status {
    /// All statuses in workflow order (REJECTED last)
    pub const ALL: [Status; 5] = [
        Status::Requested,
        Status::InSampling,
        Status::Sent,
        Status::Approved,
        Status::Rejected,
    ];

    /// Terminal statuses offer no further action
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Approved | Status::Rejected)
    }

    /// Display label with spaces instead of underscores
    pub fn label(&self) -> String {
        self.to_string().replace('_', " ")
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Requested => write!(f, "REQUESTED"),
            Status::InSampling => write!(f, "IN_SAMPLING"),
            Status::Sent => write!(f, "SENT"),
            Status::Approved => write!(f, "APPROVED"),
            Status::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "REQUESTED" => Ok(Status::Requested),
            "IN_SAMPLING" => Ok(Status::InSampling),
            "SENT" => Ok(Status::Sent),
            "APPROVED" => Ok(Status::Approved),
            "REJECTED" => Ok(Status::Rejected),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Priority of a sample request
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&Status::InSampling).unwrap();
        assert_eq!(json, "\"IN_SAMPLING\"");

        let parsed: Status = serde_json::from_str("\"SENT\"").unwrap();
        assert_eq!(parsed, Status::Sent);
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!("in sampling".parse::<Status>().unwrap(), Status::InSampling);
        assert_eq!("in-sampling".parse::<Status>().unwrap(), Status::InSampling);
        assert!("shipped".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_label_and_terminal() {
        assert_eq!(Status::InSampling.label(), "IN SAMPLING");
        assert!(Status::Approved.is_terminal());
        assert!(Status::Rejected.is_terminal());
        assert!(!Status::Sent.is_terminal());
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
    }
}
