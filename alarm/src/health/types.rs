//! Health check result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a single website check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Response with a 2xx status
    Up { status: u16 },
    /// Response with any other status
    Down { status: u16 },
    /// No response at all (DNS, connect, TLS, timeout)
    Unreachable { error: String },
}

impl CheckOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            CheckOutcome::Up { status }
        } else {
            CheckOutcome::Down { status }
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckOutcome::Up { .. })
    }
}

/// Result of checking one URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub url: String,
    pub outcome: CheckOutcome,
    pub last_check: DateTime<Utc>,
    pub response_time_ms: u64,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.outcome.is_healthy()
    }

    /// Alert subject for a failed check, `None` when the site is up.
    pub fn alert_subject(&self) -> Option<String> {
        match &self.outcome {
            CheckOutcome::Up { .. } => None,
            CheckOutcome::Down { status } => Some(format!(
                "Website Alert: {} returned status code {}",
                self.url, status
            )),
            CheckOutcome::Unreachable { .. } => {
                Some(format!("Website Alert: {} is unreachable.", self.url))
            }
        }
    }
}
