// File: alarm/src/services/mod.rs

pub mod alert_service;
pub mod health_service;

pub use alert_service::AlertService;
pub use health_service::{HealthService, RunReport};
