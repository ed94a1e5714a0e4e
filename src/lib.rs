//! Dingrelay Library
//!
//! DingTalk notification-dispatch client: relays text, markdown, and link
//! messages to staff targets through a corporate robot.

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod notify;

pub use error::{AppError, AppResult};
