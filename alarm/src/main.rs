// File: alarm/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use web_alarm::{AlertService, ConfigManager, HealthService};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("web_alarm=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("lettre=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let config_manager = ConfigManager::from_env().await?;
    let config = config_manager.get_current_config();

    let alert_service = Arc::new(AlertService::new(&config.alerts)?);
    if !alert_service.is_enabled() {
        warn!("Alerts will not be delivered if the site is down");
    }

    let health_service = HealthService::new(&config, alert_service)?;
    let report = health_service.run_once().await?;

    if report.status.is_healthy() {
        info!(
            "{} is up ({} ms)",
            report.status.url, report.status.response_time_ms
        );
    } else if report.alert_sent {
        info!("Alert delivered for {}", report.status.url);
    }

    Ok(())
}
