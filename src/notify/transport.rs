//! Messaging transport abstraction.
//!
//! The platform is an explicit capability injected into the dispatcher at
//! construction time, so dispatch logic can be exercised against a stub
//! without the real network dependency.

use super::message::MessagePayload;
use crate::error::AppResult;
use async_trait::async_trait;

/// Outcome of an accepted delivery
#[derive(Debug, Clone, Default)]
pub struct DeliveryReceipt {
    /// Platform identifier for the send (`processQueryKey`), when reported
    pub message_id: Option<String>,
    /// HTTP status of the platform response
    pub status: u16,
    /// Time taken for the network call in milliseconds
    pub duration_ms: u64,
    /// Targets the platform rejected as unknown
    pub invalid_targets: Vec<String>,
    /// Targets the platform refused due to flow control
    pub flow_controlled_targets: Vec<String>,
}

/// Trait for messaging transports
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// Implementations must be Send + Sync and hold no mutable state, so
/// concurrent calls stay independent. Each delivery method performs at most
/// one outbound network call; failures surface immediately with no retry.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Returns the transport name for logging/debugging
    fn name(&self) -> &'static str;

    /// Delivers a payload to every target in one platform call
    async fn deliver_batch(
        &self,
        targets: &[String],
        payload: &MessagePayload,
    ) -> AppResult<DeliveryReceipt>;

    /// Delivers a payload to a single target
    async fn deliver(&self, target: &str, payload: &MessagePayload) -> AppResult<DeliveryReceipt> {
        let targets = [target.to_string()];
        self.deliver_batch(&targets, payload).await
    }

    /// Checks that the transport can reach and authenticate to the platform
    async fn probe(&self) -> AppResult<()>;
}
