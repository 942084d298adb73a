// File: alarm/src/config/manager.rs
use super::{Config, NotifierKind, SmtpSecurity};
use crate::constants::{defaults, env};
use crate::errors::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    /// Load `.env`, the optional TOML file and the process environment.
    pub async fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }

        let explicit_path = std::env::var(env::CONFIG_PATH)
            .ok()
            .filter(|p| !p.trim().is_empty());
        let (config_path, required) = match explicit_path {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(defaults::CONFIG_PATH), false),
        };

        let config =
            Self::load_configuration(&config_path, required, |key| std::env::var(key).ok())
                .await?;

        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    /// Read `config_path` (skipped when absent unless `required`), then apply
    /// overrides from `lookup`.
    pub async fn load_configuration<F>(
        config_path: &Path,
        required: bool,
        lookup: F,
    ) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match fs::read_to_string(config_path).await {
            Ok(content) => {
                debug!("Loading config file: {}", config_path.display());
                toml::from_str::<Config>(&content).map_err(|e| ConfigError::ParseError {
                    reason: format!("{}: {}", config_path.display(), e),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(
                    "No config file at {}, using environment only",
                    config_path.display()
                );
                Config::default()
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: config_path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        apply_env_overrides(&mut config, &lookup)?;

        if config.check_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: env::CHECK_TIMEOUT_SECONDS.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        info!(
            "Configuration loaded: timeout {}s, TLS verification {}, {:?} alert backend",
            config.check_timeout_seconds,
            if config.verify_tls { "on" } else { "off" },
            config.alerts.backend_kind()
        );

        Ok(config)
    }
}

fn apply_env_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    override_string(&mut config.website_url, var(env::WEBSITE_URL));
    if let Some(value) = var(env::CHECK_TIMEOUT_SECONDS) {
        config.check_timeout_seconds = parse_value(env::CHECK_TIMEOUT_SECONDS, &value)?;
    }
    if let Some(value) = var(env::VERIFY_TLS) {
        config.verify_tls = parse_bool(env::VERIFY_TLS, &value)?;
    }

    let alerts = &mut config.alerts;
    if let Some(value) = var(env::NOTIFIER) {
        alerts.backend = Some(parse_value::<NotifierKind>(env::NOTIFIER, &value)?);
    }
    override_string(&mut alerts.sender_email, var(env::SENDER_EMAIL));
    override_string(&mut alerts.receiver_email, var(env::RECEIVER_EMAIL));

    override_string(&mut alerts.graph.tenant_id, var(env::TENANT_ID));
    override_string(&mut alerts.graph.client_id, var(env::CLIENT_ID));
    override_string(&mut alerts.graph.client_secret, var(env::CLIENT_SECRET));
    if let Some(value) = var(env::GRAPH_AUTHORITY_HOST) {
        alerts.graph.authority_host = value;
    }
    if let Some(value) = var(env::GRAPH_BASE_URL) {
        alerts.graph.graph_base_url = value;
    }

    override_string(&mut alerts.smtp.server, var(env::SMTP_SERVER));
    if let Some(value) = var(env::SMTP_PORT) {
        alerts.smtp.port = Some(parse_value(env::SMTP_PORT, &value)?);
    }
    override_string(&mut alerts.smtp.username, var(env::SMTP_USERNAME));
    override_string(&mut alerts.smtp.password, var(env::SMTP_PASSWORD));
    if let Some(value) = var(env::SMTP_SECURITY) {
        alerts.smtp.security = parse_value::<SmtpSecurity>(env::SMTP_SECURITY, &value)?;
    }

    Ok(())
}

fn override_string(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}

fn parse_value<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}': {}", value, e),
        })
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a boolean", value),
        }),
    }
}
