//! Central repository for timeouts, endpoints and fixed alert text
//!
//! Constants are grouped by the part of the pipeline that uses them.

use std::time::Duration;

/// Website check constants
pub mod http {
    use super::Duration;

    /// Default timeout for the website GET request
    pub const CHECK_TIMEOUT_SECONDS: u64 = 10;

    /// Timeout for requests to the token endpoint and Graph API
    pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for establishing outbound connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Microsoft Entra / Graph constants
pub mod graph {
    /// Default authority host for the client-credentials grant
    pub const AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

    /// Default Graph API base URL
    pub const BASE_URL: &str = "https://graph.microsoft.com/v1.0";

    /// App-only scope covering the permissions granted to the app registration
    pub const SCOPE: &str = "https://graph.microsoft.com/.default";

    /// Status code Graph returns when sendMail has been accepted
    pub const SEND_ACCEPTED_STATUS: u16 = 202;

    /// Cached tokens are dropped this many seconds before they expire
    pub const TOKEN_EXPIRY_SKEW_SECONDS: i64 = 300;
}

/// SMTP constants
pub mod smtp {
    pub const STARTTLS_PORT: u16 = 587;
    pub const TLS_PORT: u16 = 465;
    pub const PLAIN_PORT: u16 = 25;

    /// SMTP session timeout in seconds
    pub const TIMEOUT_SECONDS: u64 = 30;
}

/// Alert text
pub mod alerts {
    /// Fixed lead-in for every alert body
    pub const BODY_PREFIX: &str = "This is an automated alert from your website monitoring script.";
}

/// Configuration defaults
pub mod defaults {
    /// Default config file, read only if present
    pub const CONFIG_PATH: &str = "config/main.toml";
}

/// Environment variable names
pub mod env {
    /// Explicit config file path; the file must exist when this is set
    pub const CONFIG_PATH: &str = "WEB_ALARM_CONFIG";

    pub const WEBSITE_URL: &str = "WEBSITE_URL";
    pub const CHECK_TIMEOUT_SECONDS: &str = "CHECK_TIMEOUT_SECONDS";
    pub const VERIFY_TLS: &str = "VERIFY_TLS";

    pub const NOTIFIER: &str = "NOTIFIER";
    pub const SENDER_EMAIL: &str = "SENDER_EMAIL";
    pub const RECEIVER_EMAIL: &str = "RECEIVER_EMAIL";

    pub const TENANT_ID: &str = "TENANT_ID";
    pub const CLIENT_ID: &str = "CLIENT_ID";
    pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
    pub const GRAPH_AUTHORITY_HOST: &str = "GRAPH_AUTHORITY_HOST";
    pub const GRAPH_BASE_URL: &str = "GRAPH_BASE_URL";

    pub const SMTP_SERVER: &str = "SMTP_SERVER";
    pub const SMTP_PORT: &str = "SMTP_PORT";
    pub const SMTP_USERNAME: &str = "SMTP_USERNAME";
    pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
    pub const SMTP_SECURITY: &str = "SMTP_SECURITY";
}
