//! Notification dispatcher.
//!
//! `Notifier` binds validated configuration to an injected messaging
//! transport and exposes the send operations. It is stateless between calls
//! apart from that immutable state: no retry, no queueing, at most one
//! transport call per invocation.

use std::sync::Arc;

use super::message::MessagePayload;
use super::transport::{DeliveryReceipt, MessagingTransport};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Notification-dispatch client for one messaging endpoint
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MessagingTransport>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Notifier {
    /// Create a notifier over the given transport
    ///
    /// Fails with a configuration error when required credential fields are
    /// absent from `settings`; no network activity happens here.
    pub fn new(settings: &Settings, transport: Arc<dyn MessagingTransport>) -> AppResult<Self> {
        settings.validate()?;
        Ok(Self { transport })
    }

    /// Send a plain text message to a single target
    ///
    /// Empty targets and messages are rejected before any network call.
    /// On success returns the platform receipt; transport and platform
    /// failures surface unchanged to the caller.
    pub async fn send_text(&self, target: &str, content: &str) -> AppResult<DeliveryReceipt> {
        self.dispatch(target, MessagePayload::text(content)).await
    }

    /// Send a markdown message to a single target
    pub async fn send_markdown(
        &self,
        target: &str,
        title: &str,
        text: &str,
    ) -> AppResult<DeliveryReceipt> {
        self.dispatch(target, MessagePayload::markdown(title, text))
            .await
    }

    /// Send a link card to a single target
    pub async fn send_link(
        &self,
        target: &str,
        title: &str,
        text: &str,
        message_url: &str,
        pic_url: Option<String>,
    ) -> AppResult<DeliveryReceipt> {
        self.dispatch(target, MessagePayload::link(title, text, message_url, pic_url))
            .await
    }

    /// Send one payload to many targets in a single platform call
    pub async fn send_batch(
        &self,
        targets: &[String],
        payload: MessagePayload,
    ) -> AppResult<DeliveryReceipt> {
        if targets.is_empty() {
            return Err(AppError::Validation {
                field: "target".to_string(),
                reason: "at least one target is required".to_string(),
            });
        }
        for target in targets {
            Self::ensure_target(target)?;
        }
        payload.validate()?;

        let receipt = self.transport.deliver_batch(targets, &payload).await?;
        self.log_receipt(&payload, targets.len(), &receipt);
        Ok(receipt)
    }

    /// Check connectivity and authentication against the platform
    pub async fn probe(&self) -> AppResult<()> {
        self.transport.probe().await
    }

    async fn dispatch(&self, target: &str, payload: MessagePayload) -> AppResult<DeliveryReceipt> {
        Self::ensure_target(target)?;
        payload.validate()?;

        let receipt = self.transport.deliver(target, &payload).await?;
        self.log_receipt(&payload, 1, &receipt);
        Ok(receipt)
    }

    fn log_receipt(&self, payload: &MessagePayload, targets: usize, receipt: &DeliveryReceipt) {
        tracing::info!(
            transport = self.transport.name(),
            kind = payload.kind(),
            targets,
            message_id = receipt.message_id.as_deref().unwrap_or("-"),
            status = receipt.status,
            duration_ms = receipt.duration_ms,
            "message delivered"
        );
        if !receipt.invalid_targets.is_empty() {
            tracing::warn!(
                invalid = ?receipt.invalid_targets,
                "platform rejected unknown targets"
            );
        }
        if !receipt.flow_controlled_targets.is_empty() {
            tracing::warn!(
                flow_controlled = ?receipt.flow_controlled_targets,
                "platform flow-controlled targets"
            );
        }
    }

    fn ensure_target(target: &str) -> AppResult<()> {
        if target.trim().is_empty() {
            return Err(AppError::Validation {
                field: "target".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialsConfig;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport stub recording calls and returning a scripted outcome
    struct StubTransport {
        calls: AtomicUsize,
        delivered: Mutex<Vec<(Vec<String>, String)>>,
        outcome: StubOutcome,
    }

    enum StubOutcome {
        Accept,
        RejectWith(u16, &'static str),
    }

    impl StubTransport {
        fn accepting() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delivered: Mutex::new(Vec::new()),
                outcome: StubOutcome::Accept,
            }
        }

        fn rejecting(status: u16, reason: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delivered: Mutex::new(Vec::new()),
                outcome: StubOutcome::RejectWith(status, reason),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MessagingTransport for StubTransport {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn deliver_batch(
            &self,
            targets: &[String],
            payload: &MessagePayload,
        ) -> AppResult<DeliveryReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.delivered
                .lock()
                .unwrap()
                .push((targets.to_vec(), payload.msg_param()));
            match self.outcome {
                StubOutcome::Accept => Ok(DeliveryReceipt {
                    message_id: Some(format!("pqk-{}", targets.join("+"))),
                    status: 200,
                    duration_ms: 1,
                    ..Default::default()
                }),
                StubOutcome::RejectWith(status, reason) => {
                    Err(AppError::delivery(Some(status), reason))
                }
            }
        }

        async fn probe(&self) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn valid_settings() -> Settings {
        Settings {
            credentials: CredentialsConfig {
                access_token: Some("abc123".to_string()),
                robot_code: Some("ding_robot".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn notifier_with(stub: Arc<StubTransport>) -> Notifier {
        Notifier::new(&valid_settings(), stub).unwrap()
    }

    #[tokio::test]
    async fn test_send_text_success_performs_one_call() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let receipt = notifier
            .send_text("31261924402207", "测试消息")
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("pqk-31261924402207"));
        assert_eq!(stub.call_count(), 1);

        let delivered = stub.delivered.lock().unwrap();
        assert_eq!(delivered[0].0, vec!["31261924402207".to_string()]);
        assert!(delivered[0].1.contains("测试消息"));
    }

    #[tokio::test]
    async fn test_construction_fails_on_missing_configuration() {
        let stub = Arc::new(StubTransport::accepting());
        let mut settings = valid_settings();
        settings.credentials.access_token = None;

        let err = Notifier::new(&settings, stub.clone()).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
        // zero outbound calls on construction failure
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_platform_rejection_surfaces_delivery_error_without_retry() {
        let stub = Arc::new(StubTransport::rejecting(401, "unauthorized"));
        let notifier = notifier_with(stub.clone());

        let err = notifier.send_text("31261924402207", "hi").await.unwrap_err();
        assert_eq!(err.delivery_status(), Some(401));
        assert!(err.to_string().contains("unauthorized"));
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_network() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let err = notifier.send_text("31261924402207", "").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_target_rejected_before_network() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let err = notifier.send_text("  ", "hello").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_independent_sends_do_not_interfere() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let (a, b) = tokio::join!(
            notifier.send_text("1001", "first"),
            notifier.send_text("1002", "second"),
        );

        assert_eq!(a.unwrap().message_id.as_deref(), Some("pqk-1001"));
        assert_eq!(b.unwrap().message_id.as_deref(), Some("pqk-1002"));
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_send_markdown_renders_title_and_text() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        notifier
            .send_markdown("1001", "Deploy", "**done**")
            .await
            .unwrap();

        let delivered = stub.delivered.lock().unwrap();
        assert!(delivered[0].1.contains("Deploy"));
        assert!(delivered[0].1.contains("**done**"));
    }

    #[tokio::test]
    async fn test_send_markdown_requires_title() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let err = notifier.send_markdown("1001", "", "body").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_batch_single_platform_call() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let targets = vec!["1001".to_string(), "1002".to_string()];
        notifier
            .send_batch(&targets, MessagePayload::text("hello"))
            .await
            .unwrap();

        assert_eq!(stub.call_count(), 1);
        assert_eq!(stub.delivered.lock().unwrap()[0].0, targets);
    }

    #[tokio::test]
    async fn test_send_batch_rejects_empty_target_list() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let err = notifier
            .send_batch(&[], MessagePayload::text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_send_batch_rejects_blank_target_entry() {
        let stub = Arc::new(StubTransport::accepting());
        let notifier = notifier_with(stub.clone());

        let targets = vec!["1001".to_string(), " ".to_string()];
        let err = notifier
            .send_batch(&targets, MessagePayload::text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(stub.call_count(), 0);
    }
}
