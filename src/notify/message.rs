//! Typed message payloads for the platform's robot message API.
//!
//! Each payload knows its platform message key and how to render the
//! `msgParam` JSON document the wire format expects.

use crate::error::{AppError, AppResult};
use serde_json::json;

/// A message payload deliverable to a conversation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    /// Plain text message
    Text { content: String },
    /// Markdown message with a title
    Markdown { title: String, text: String },
    /// Link card: title, description, destination URL, optional picture
    Link {
        title: String,
        text: String,
        message_url: String,
        pic_url: Option<String>,
    },
}

impl MessagePayload {
    pub fn text(content: impl Into<String>) -> Self {
        MessagePayload::Text {
            content: content.into(),
        }
    }

    pub fn markdown(title: impl Into<String>, text: impl Into<String>) -> Self {
        MessagePayload::Markdown {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn link(
        title: impl Into<String>,
        text: impl Into<String>,
        message_url: impl Into<String>,
        pic_url: Option<String>,
    ) -> Self {
        MessagePayload::Link {
            title: title.into(),
            text: text.into(),
            message_url: message_url.into(),
            pic_url,
        }
    }

    /// Payload kind for logging
    pub fn kind(&self) -> &'static str {
        match self {
            MessagePayload::Text { .. } => "text",
            MessagePayload::Markdown { .. } => "markdown",
            MessagePayload::Link { .. } => "link",
        }
    }

    /// Platform message key for the robot batch-send API
    pub fn msg_key(&self) -> &'static str {
        match self {
            MessagePayload::Text { .. } => "sampleText",
            MessagePayload::Markdown { .. } => "sampleMarkdown",
            MessagePayload::Link { .. } => "sampleLink",
        }
    }

    /// Render the `msgParam` JSON document as a string
    pub fn msg_param(&self) -> String {
        match self {
            MessagePayload::Text { content } => json!({ "content": content }).to_string(),
            MessagePayload::Markdown { title, text } => {
                json!({ "title": title, "text": text }).to_string()
            }
            MessagePayload::Link {
                title,
                text,
                message_url,
                pic_url,
            } => {
                let mut param = json!({
                    "title": title,
                    "text": text,
                    "messageUrl": message_url,
                });
                if let Some(pic) = pic_url {
                    param["picUrl"] = json!(pic);
                }
                param.to_string()
            }
        }
    }

    /// Reject empty payload fields before any network activity
    pub fn validate(&self) -> AppResult<()> {
        match self {
            MessagePayload::Text { content } => {
                require_non_empty("message", content)?;
            }
            MessagePayload::Markdown { title, text } => {
                require_non_empty("title", title)?;
                require_non_empty("message", text)?;
            }
            MessagePayload::Link {
                title,
                text,
                message_url,
                ..
            } => {
                require_non_empty("title", title)?;
                require_non_empty("message", text)?;
                require_non_empty("url", message_url)?;
            }
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_text_msg_key_and_param() {
        let payload = MessagePayload::text("测试消息");
        assert_eq!(payload.msg_key(), "sampleText");

        let param: Value = serde_json::from_str(&payload.msg_param()).unwrap();
        assert_eq!(param["content"], "测试消息");
    }

    #[test]
    fn test_markdown_msg_key_and_param() {
        let payload = MessagePayload::markdown("Deploy", "**done**");
        assert_eq!(payload.msg_key(), "sampleMarkdown");

        let param: Value = serde_json::from_str(&payload.msg_param()).unwrap();
        assert_eq!(param["title"], "Deploy");
        assert_eq!(param["text"], "**done**");
    }

    #[test]
    fn test_link_param_omits_absent_picture() {
        let payload = MessagePayload::link("Release", "v1.2", "https://example.com/r", None);
        assert_eq!(payload.msg_key(), "sampleLink");

        let param: Value = serde_json::from_str(&payload.msg_param()).unwrap();
        assert_eq!(param["messageUrl"], "https://example.com/r");
        assert!(param.get("picUrl").is_none());
    }

    #[test]
    fn test_link_param_includes_picture() {
        let payload = MessagePayload::link(
            "Release",
            "v1.2",
            "https://example.com/r",
            Some("https://example.com/p.png".to_string()),
        );
        let param: Value = serde_json::from_str(&payload.msg_param()).unwrap();
        assert_eq!(param["picUrl"], "https://example.com/p.png");
    }

    #[test]
    fn test_text_param_preserves_unicode() {
        // serde_json writes UTF-8 directly, matching the platform's
        // expectation of unescaped CJK content
        let payload = MessagePayload::text("测试");
        assert!(payload.msg_param().contains("测试"));
    }

    #[test]
    fn test_validate_rejects_empty_content() {
        assert!(MessagePayload::text("").validate().is_err());
        assert!(MessagePayload::text("   ").validate().is_err());
        assert!(MessagePayload::text("ok").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_incomplete_markdown_and_link() {
        assert!(MessagePayload::markdown("", "body").validate().is_err());
        assert!(MessagePayload::markdown("t", "").validate().is_err());
        assert!(
            MessagePayload::link("t", "body", "", None)
                .validate()
                .is_err()
        );
        assert!(
            MessagePayload::link("t", "body", "https://example.com", None)
                .validate()
                .is_ok()
        );
    }
}
