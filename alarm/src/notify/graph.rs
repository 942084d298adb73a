//! Microsoft Graph notification backend.
//!
//! Acquires an app-only token with the client-credentials grant, then posts
//! the alert to `/users/{sender}/sendMail`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{Client as HttpClient, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::{AlertMessage, Notifier};
use crate::config::GraphSettings;
use crate::constants::{graph, http};
use crate::errors::NotifyError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message: GraphMessage<'a>,
    save_to_sent_items: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage<'a> {
    subject: &'a str,
    body: ItemBody<'a>,
    to_recipients: Vec<Recipient<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody<'a> {
    content_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: EmailAddress<'a>,
}

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
    address: &'a str,
}

pub struct GraphNotifier {
    settings: GraphSettings,
    client: HttpClient,
    token_cache: Mutex<Option<CachedToken>>,
}

impl GraphNotifier {
    pub fn new(settings: GraphSettings) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(http::NOTIFY_TIMEOUT)
            .connect_timeout(http::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client for GraphNotifier: {}", e))?;

        Ok(Self {
            settings,
            client,
            token_cache: Mutex::new(None),
        })
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.settings.authority_host, self.settings.tenant_id
        )
    }

    /// `{graph_base_url}/users/{sender}/sendMail` with the sender percent-encoded
    /// as a single path segment.
    fn send_mail_endpoint(&self) -> Result<Url, NotifyError> {
        let invalid = |reason: String| NotifyError::Transport {
            reason: format!(
                "invalid Graph base URL '{}': {}",
                self.settings.graph_base_url, reason
            ),
        };

        let mut url = Url::parse(&self.settings.graph_base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("users")
            .push(&self.settings.sender_email)
            .push("sendMail");
        Ok(url)
    }

    /// Cached token when still valid, otherwise a fresh one from the authority.
    async fn access_token(&self) -> Result<String, NotifyError> {
        let mut cache = self.token_cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Utc::now() {
                debug!("Reusing cached Graph access token");
                return Ok(cached.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken, NotifyError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("scope", graph::SCOPE),
        ];

        debug!("Requesting Graph access token for tenant {}", self.settings.tenant_id);

        let response = self
            .client
            .post(self.token_endpoint())
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifyError::TokenRequest {
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::TokenRequest {
                reason: format!("failed to read response body: {}", e),
            })?;

        let parsed: TokenResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Token endpoint body is not JSON: {}", e);
                let err = NotifyError::TokenRejected {
                    error: format!("HTTP {}", status.as_u16()),
                    description: Some(body),
                };
                error!("Error: {}", err);
                return Err(err);
            }
        };

        match parsed.access_token {
            Some(access_token) if status.is_success() => {
                let lifetime = parsed.expires_in.unwrap_or(3600) - graph::TOKEN_EXPIRY_SKEW_SECONDS;
                Ok(CachedToken {
                    access_token,
                    expires_at: Utc::now() + ChronoDuration::seconds(lifetime.max(0)),
                })
            }
            _ => {
                let err = NotifyError::TokenRejected {
                    error: parsed
                        .error
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
                    description: parsed.error_description,
                };
                error!("Error: {}", err);
                Err(err)
            }
        }
    }

    async fn invalidate_token(&self) {
        *self.token_cache.lock().await = None;
    }
}

fn build_send_mail_request<'a>(message: &'a AlertMessage, receiver: &'a str) -> SendMailRequest<'a> {
    SendMailRequest {
        message: GraphMessage {
            subject: &message.subject,
            body: ItemBody {
                content_type: "Text",
                content: &message.body,
            },
            to_recipients: vec![Recipient {
                email_address: EmailAddress { address: receiver },
            }],
        },
        save_to_sent_items: true,
    }
}

#[async_trait]
impl Notifier for GraphNotifier {
    fn channel_type(&self) -> &'static str {
        "graph"
    }

    async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        let token = self.access_token().await?;
        let payload = build_send_mail_request(message, &self.settings.receiver_email);

        let endpoint = self.send_mail_endpoint()?;
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == graph::SEND_ACCEPTED_STATUS {
            info!("Email notification sent successfully via Graph API!");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("Error sending email: {} {}", status, body);

        if status == 401 {
            self.invalidate_token().await;
        }

        Err(NotifyError::SendRejected { status, body })
    }
}
