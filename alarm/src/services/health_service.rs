// File: alarm/src/services/health_service.rs
use anyhow::Result;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::health::{HealthStatus, WebsiteChecker};
use crate::services::AlertService;

/// Outcome of one check-then-alert run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: HealthStatus,
    pub alert_sent: bool,
}

pub struct HealthService {
    target: Url,
    checker: WebsiteChecker,
    alert_service: Arc<AlertService>,
}

impl HealthService {
    pub fn new(config: &Config, alert_service: Arc<AlertService>) -> Result<Self> {
        let target = config.website_url()?;
        let checker = WebsiteChecker::new(
            Duration::from_secs(config.check_timeout_seconds),
            config.verify_tls,
        )?;

        Ok(Self {
            target,
            checker,
            alert_service,
        })
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Check the site once and alert if it is not healthy.
    pub async fn run_once(&self) -> Result<RunReport> {
        info!("Starting check for {}...", self.target);

        let status = self.checker.check(&self.target).await;

        let alert_sent = match status.alert_subject() {
            Some(subject) => self.alert_service.send_alert(&subject).await?,
            None => false,
        };

        Ok(RunReport { status, alert_sent })
    }
}
