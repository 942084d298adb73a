pub mod config;
pub mod constants;
pub mod errors;
pub mod health;
pub mod notify;
pub mod services;

// Re-export commonly used types
pub use config::{AlertConfig, Config, ConfigManager, NotifierConfig};
pub use errors::{ConfigError, NotifyError};
pub use health::{CheckOutcome, HealthStatus, WebsiteChecker};
pub use notify::{AlertMessage, Notifier};
pub use services::{AlertService, HealthService, RunReport};
