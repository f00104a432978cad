//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client for the Application Intake API,
//! settings loading and log setup.

pub mod config;
pub mod intake_api;
pub mod logging;

pub use config::*;
pub use intake_api::*;
pub use logging::*;
