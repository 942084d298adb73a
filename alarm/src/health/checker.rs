//! Single-shot website check

use super::types::{CheckOutcome, HealthStatus};
use crate::constants::http;
use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::{Client as HttpClient, Url};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct WebsiteChecker {
    client: HttpClient,
}

impl WebsiteChecker {
    pub fn new(timeout: Duration, verify_tls: bool) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(http::CONNECT_TIMEOUT.min(timeout))
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client for website checks: {}", e))?;

        if !verify_tls {
            debug!("TLS certificate verification disabled for website checks");
        }

        Ok(Self { client })
    }

    /// GET the URL once and classify the result. Transport errors become
    /// `CheckOutcome::Unreachable` rather than an `Err`.
    pub async fn check(&self, url: &Url) -> HealthStatus {
        let started = Instant::now();

        let outcome = match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let outcome = CheckOutcome::from_status(response.status().as_u16());
                match &outcome {
                    CheckOutcome::Up { status } => {
                        info!("Success: {} returned status code {}", url, status)
                    }
                    CheckOutcome::Down { status } => {
                        warn!("Failure: {} returned status code {}", url, status)
                    }
                    CheckOutcome::Unreachable { .. } => {}
                }
                outcome
            }
            Err(e) => {
                error!("Error: Could not connect to {}. Error: {}", url, e);
                CheckOutcome::Unreachable {
                    error: describe_error(&e),
                }
            }
        };

        HealthStatus {
            url: url.to_string(),
            outcome,
            last_check: Utc::now(),
            response_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_redirect() {
        format!("redirect policy violated: {}", e)
    } else {
        e.to_string()
    }
}
