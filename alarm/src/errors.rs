//! Custom error types for the website alarm
//!
//! Configuration and notification failures carry enough context to be
//! logged as-is; everything above them is glued together with `anyhow`.

use std::fmt;

/// Configuration error variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration (one or more comma-separated names)
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Notification delivery error variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Token endpoint could not be reached or its body could not be read
    TokenRequest { reason: String },

    /// Token endpoint answered without an access token
    TokenRejected {
        error: String,
        description: Option<String>,
    },

    /// Mail API answered with something other than "accepted"
    SendRejected { status: u16, body: String },

    /// Sender or recipient could not be parsed as a mailbox
    InvalidAddress { address: String, reason: String },

    /// Network or protocol failure while delivering the message
    Transport { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::TokenRequest { reason } => {
                write!(f, "Failed to acquire access token: {}", reason)
            }
            NotifyError::TokenRejected { error, description } => match description {
                Some(description) => write!(
                    f,
                    "Failed to acquire access token ({}): {}",
                    error, description
                ),
                None => write!(f, "Failed to acquire access token ({})", error),
            },
            NotifyError::SendRejected { status, body } => {
                write!(f, "Error sending email: {} {}", status, body)
            }
            NotifyError::InvalidAddress { address, reason } => {
                write!(f, "Invalid email address '{}': {}", address, reason)
            }
            NotifyError::Transport { reason } => {
                write!(f, "Email transport failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for NotifyError {}
