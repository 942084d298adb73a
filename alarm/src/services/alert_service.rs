// File: alarm/src/services/alert_service.rs
use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::AlertConfig;
use crate::notify::{build_notifier, AlertMessage, Notifier};

pub struct AlertService {
    notifier: Option<Box<dyn Notifier>>,
    disabled_reason: Option<String>,
}

impl AlertService {
    /// Resolve the configured backend. Missing settings disable the service
    /// instead of failing, so a healthy site can still be checked.
    pub fn new(config: &AlertConfig) -> Result<Self> {
        match config.resolve() {
            Ok(notifier_config) => {
                let notifier = build_notifier(&notifier_config)?;
                info!("Alert service enabled via {}", notifier.channel_type());
                Ok(Self::with_notifier(notifier))
            }
            Err(e) => {
                warn!("Alert service disabled: {}", e);
                Ok(Self {
                    notifier: None,
                    disabled_reason: Some(e.to_string()),
                })
            }
        }
    }

    pub fn with_notifier(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
            disabled_reason: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    pub fn channel_type(&self) -> Option<&'static str> {
        self.notifier.as_ref().map(|n| n.channel_type())
    }

    /// Send the fixed-format alert email for `subject`.
    ///
    /// Returns `Ok(false)` without sending when the service is disabled.
    pub async fn send_alert(&self, subject: &str) -> Result<bool> {
        let Some(notifier) = &self.notifier else {
            error!("Error: Required environment variables for sending email are not set.");
            if let Some(reason) = &self.disabled_reason {
                error!("{}", reason);
            }
            return Ok(false);
        };

        let message = AlertMessage::from_subject(subject);
        notifier.send(&message).await.map_err(|e| {
            error!("Failed to send alert via {}: {}", notifier.channel_type(), e);
            anyhow::Error::new(e)
        })?;

        Ok(true)
    }
}
