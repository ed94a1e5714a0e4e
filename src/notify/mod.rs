//! Notification dispatch.
//!
//! The `Notifier` relays typed message payloads to conversation targets
//! through an injected `MessagingTransport`. Delivery is at-most-once:
//! one outbound call per invocation, failures surfaced immediately.

pub mod dispatcher;
pub mod message;
pub mod transport;

pub use dispatcher::Notifier;
pub use message::MessagePayload;
pub use transport::{DeliveryReceipt, MessagingTransport};
