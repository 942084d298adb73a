//! Website health checking
//!
//! A single GET against the configured URL, classified into up, down or
//! unreachable.

pub mod checker;
pub mod types;

pub use checker::WebsiteChecker;
pub use types::{CheckOutcome, HealthStatus};
