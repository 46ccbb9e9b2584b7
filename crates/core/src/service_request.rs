//! Guest service and maintenance request kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::notification::NotificationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestType {
    Service,
    Maintenance,
}

impl ServiceRequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceRequestType::Service => "service",
            ServiceRequestType::Maintenance => "maintenance",
        }
    }

    /// Notification type used when a request of this kind is opened.
    pub fn notification_type(self) -> NotificationType {
        match self {
            ServiceRequestType::Service => NotificationType::Service,
            ServiceRequestType::Maintenance => NotificationType::Maintenance,
        }
    }
}

impl fmt::Display for ServiceRequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceRequestType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(ServiceRequestType::Service),
            "maintenance" => Ok(ServiceRequestType::Maintenance),
            other => Err(CoreError::Validation(format!(
                "Unknown request type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for ServiceRequestType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
