//! Direct SMTP notification backend.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{AlertMessage, Notifier};
use crate::config::{SmtpSecurity, SmtpSettings};
use crate::constants::smtp;
use crate::errors::NotifyError;

/// SMTP channel. Must be constructed inside a tokio runtime.
pub struct SmtpNotifier {
    settings: SmtpSettings,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        let builder = match settings.security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
                    .map_err(|e| anyhow!("Invalid SMTP server {}: {}", settings.server, e))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)
                .map_err(|e| anyhow!("Invalid SMTP server {}: {}", settings.server, e))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
            }
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(smtp::TIMEOUT_SECONDS)))
            .build();

        debug!(
            "SMTP transport configured for {}:{} ({:?})",
            settings.server, settings.port, settings.security
        );

        Ok(Self {
            settings,
            transport,
        })
    }

    fn build_message(&self, message: &AlertMessage) -> Result<Message, NotifyError> {
        let from = parse_mailbox(&self.settings.sender_email)?;
        let to = parse_mailbox(&self.settings.receiver_email)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| NotifyError::Transport {
                reason: format!("failed to build message: {}", e),
            })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn channel_type(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        let email = self.build_message(message)?;

        match self.transport.send(email).await {
            Ok(response) => {
                debug!("SMTP server replied with code {}", response.code());
                info!("Email notification sent successfully via SMTP!");
                Ok(())
            }
            Err(e) => {
                error!(
                    "An exception occurred while sending the email via {}: {}",
                    self.settings.server, e
                );
                Err(NotifyError::Transport {
                    reason: e.to_string(),
                })
            }
        }
    }
}
