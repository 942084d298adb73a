// File: alarm/src/config/mod.rs
pub mod manager;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{env, graph, http, smtp};
use crate::errors::ConfigError;
use reqwest::Url;

pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub website_url: Option<String>,
    #[serde(default = "default_check_timeout")]
    pub check_timeout_seconds: u64,
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default)]
    pub alerts: AlertConfig,
}

fn default_check_timeout() -> u64 {
    http::CHECK_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            website_url: None,
            check_timeout_seconds: default_check_timeout(),
            verify_tls: false,
            alerts: AlertConfig::default(),
        }
    }
}

impl Config {
    /// The URL to check, validated as an absolute http(s) URL.
    pub fn website_url(&self) -> Result<Url, ConfigError> {
        let raw = present(&self.website_url).ok_or_else(|| ConfigError::MissingRequired {
            field: env::WEBSITE_URL.to_string(),
        })?;

        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            field: env::WEBSITE_URL.to_string(),
            reason: format!("'{}' is not a valid URL: {}", raw, e),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidValue {
                field: env::WEBSITE_URL.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Graph,
    Smtp,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graph" => Ok(NotifierKind::Graph),
            "smtp" => Ok(NotifierKind::Smtp),
            other => Err(format!("expected 'graph' or 'smtp', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS
    #[default]
    Starttls,
    /// Implicit TLS from the first byte
    #[serde(alias = "ssl")]
    Tls,
    /// No encryption
    #[serde(alias = "plain")]
    None,
}

impl SmtpSecurity {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::Starttls => smtp::STARTTLS_PORT,
            SmtpSecurity::Tls => smtp::TLS_PORT,
            SmtpSecurity::None => smtp::PLAIN_PORT,
        }
    }
}

impl FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpSecurity::Starttls),
            "tls" | "ssl" => Ok(SmtpSecurity::Tls),
            "none" | "plain" => Ok(SmtpSecurity::None),
            other => Err(format!(
                "expected 'starttls', 'tls' or 'none', got '{}'",
                other
            )),
        }
    }
}

/// Raw alert settings as loaded; nothing here is required until an alert is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertConfig {
    pub backend: Option<NotifierKind>,
    pub sender_email: Option<String>,
    pub receiver_email: Option<String>,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_authority_host")]
    pub authority_host: String,
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
}

fn default_authority_host() -> String {
    graph::AUTHORITY_HOST.to_string()
}

fn default_graph_base_url() -> String {
    graph::BASE_URL.to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret: None,
            authority_host: default_authority_host(),
            graph_base_url: default_graph_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub security: SmtpSecurity,
}

/// Fully populated settings for one notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Graph(GraphSettings),
    Smtp(SmtpSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSettings {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
    pub graph_base_url: String,
    pub sender_email: String,
    pub receiver_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: SmtpSecurity,
    pub sender_email: String,
    pub receiver_email: String,
}

impl AlertConfig {
    /// Explicit backend if set, otherwise inferred from which credentials are present.
    pub fn backend_kind(&self) -> NotifierKind {
        if let Some(kind) = self.backend {
            return kind;
        }

        let has_graph = [
            &self.graph.tenant_id,
            &self.graph.client_id,
            &self.graph.client_secret,
        ]
        .iter()
        .any(|v| present(v).is_some());

        if !has_graph && present(&self.smtp.server).is_some() {
            NotifierKind::Smtp
        } else {
            NotifierKind::Graph
        }
    }

    /// Resolve into settings for the selected backend, naming every missing variable.
    pub fn resolve(&self) -> Result<NotifierConfig, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |value: &Option<String>, name: &'static str| -> String {
            match present(value) {
                Some(v) => v.to_string(),
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let resolved = match self.backend_kind() {
            NotifierKind::Graph => {
                let tenant_id = require(&self.graph.tenant_id, env::TENANT_ID);
                let client_id = require(&self.graph.client_id, env::CLIENT_ID);
                let client_secret = require(&self.graph.client_secret, env::CLIENT_SECRET);
                let sender_email = require(&self.sender_email, env::SENDER_EMAIL);
                let receiver_email = require(&self.receiver_email, env::RECEIVER_EMAIL);

                NotifierConfig::Graph(GraphSettings {
                    tenant_id,
                    client_id,
                    client_secret,
                    authority_host: self.graph.authority_host.trim_end_matches('/').to_string(),
                    graph_base_url: self.graph.graph_base_url.trim_end_matches('/').to_string(),
                    sender_email,
                    receiver_email,
                })
            }
            NotifierKind::Smtp => {
                let server = require(&self.smtp.server, env::SMTP_SERVER);
                let password = require(&self.smtp.password, env::SMTP_PASSWORD);
                let sender_email = require(&self.sender_email, env::SENDER_EMAIL);
                let receiver_email = require(&self.receiver_email, env::RECEIVER_EMAIL);
                let username = present(&self.smtp.username)
                    .map(str::to_string)
                    .unwrap_or_else(|| sender_email.clone());

                NotifierConfig::Smtp(SmtpSettings {
                    server,
                    port: self
                        .smtp
                        .port
                        .unwrap_or_else(|| self.smtp.security.default_port()),
                    username,
                    password,
                    security: self.smtp.security,
                    sender_email,
                    receiver_email,
                })
            }
        };

        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            })
        }
    }
}

/// Treat blank values the same as absent ones.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
