//! Configuration management module for dingrelay
//!
//! This module provides configuration loading with support for:
//! - A TOML configuration file
//! - `DINGRELAY_*` environment variable overrides
//! - `DINGTALK_*` credential fallbacks for interop with the platform tooling
//!
//! The loaded `Settings` record is validated once, at load time; required
//! credential fields are bound then rather than checked ad hoc per call.

pub mod environment;
pub mod error;
pub mod settings;

// Re-export public types
pub use environment::Environment;
pub use error::ConfigError;
pub use settings::{ApiConfig, CredentialsConfig, LoggerSettings, Settings};
