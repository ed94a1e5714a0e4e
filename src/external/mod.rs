//! Clients for external HTTP services.

pub mod client;
pub mod dingtalk;
