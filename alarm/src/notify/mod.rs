//! Email notification backends.
//!
//! - Microsoft Graph `sendMail` with an app-only OAuth token
//! - Direct SMTP login

mod graph;
mod smtp;

pub use graph::GraphNotifier;
pub use smtp::SmtpNotifier;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::config::NotifierConfig;
use crate::constants::alerts;
use crate::errors::NotifyError;

/// Alert email content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    /// Fixed body wrapping the subject.
    pub fn from_subject(subject: impl Into<String>) -> Self {
        let subject = subject.into();
        let body = format!("{}\n\nDetails: {}", alerts::BODY_PREFIX, subject);
        Self { subject, body }
    }
}

/// Trait for notification backends.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Backend name for logging.
    fn channel_type(&self) -> &'static str;

    /// Deliver one alert email.
    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError>;
}

/// Build the backend described by resolved settings.
pub fn build_notifier(config: &NotifierConfig) -> Result<Box<dyn Notifier>> {
    match config {
        NotifierConfig::Graph(settings) => Ok(Box::new(GraphNotifier::new(settings.clone())?)),
        NotifierConfig::Smtp(settings) => Ok(Box::new(SmtpNotifier::new(settings.clone())?)),
    }
}
