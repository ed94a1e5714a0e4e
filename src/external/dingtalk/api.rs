use std::time::Instant;

use async_trait::async_trait;

use super::types::{
    AccessTokenRequest, AccessTokenResponse, BatchSendRequest, BatchSendResponse, ContactUser,
    PlatformErrorBody,
};
use crate::config::{CredentialsConfig, Settings};
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;
use crate::notify::message::MessagePayload;
use crate::notify::transport::{DeliveryReceipt, MessagingTransport};

const ACCESS_TOKEN_PATH: &str = "/oauth2/accessToken";
const BATCH_SEND_PATH: &str = "/robot/oToMessages/batchSend";
const CONTACT_USER_PATH: &str = "/contact/users";
const USERINFO_PATH: &str = "/oauth2/userinfo";

/// Header carrying the access token on authenticated calls
const TOKEN_HEADER: &str = "x-acs-dingtalk-access-token";

/// DingTalk open-platform API client
///
/// Holds the HTTP client and the credentials bound at construction. Every
/// operation performs exactly one outbound request and surfaces failures
/// immediately; there is no retry or queueing.
#[derive(Debug)]
pub struct DingTalkApi {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialsConfig,
    timeout_seconds: u64,
}

impl DingTalkApi {
    /// Create an API client from validated settings
    ///
    /// Re-validates the settings so a handle can never be constructed from
    /// incomplete credentials. No network activity happens here.
    pub fn new(settings: &Settings) -> AppResult<Self> {
        settings.validate()?;
        let http = build_http_client(&settings.api)?;
        Ok(Self {
            http,
            base_url: settings.api.base_url.trim_end_matches('/').to_string(),
            credentials: settings.credentials.clone(),
            timeout_seconds: settings.api.timeout_seconds,
        })
    }

    /// Bind a pre-issued access token for subsequent authenticated calls
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.access_token = Some(token.into());
        self
    }

    /// Make sure an access token is bound, exchanging the configured
    /// client pair when no pre-issued token exists
    ///
    /// Performs at most one network call, and none when a token is already
    /// bound.
    pub async fn ensure_access_token(self) -> AppResult<Self> {
        if self.credentials.has_access_token() {
            return Ok(self);
        }

        let (client_id, client_secret) = match (
            self.credentials.client_id.clone(),
            self.credentials.client_secret.clone(),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(AppError::Configuration {
                    key: "credentials".to_string(),
                    reason: "no access token and no client_id/client_secret pair configured"
                        .to_string(),
                });
            }
        };

        let token = self.fetch_access_token(&client_id, &client_secret).await?;
        Ok(self.with_access_token(token))
    }

    /// Exchange a client id/secret pair for an access token
    pub async fn fetch_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> AppResult<String> {
        let resp = self
            .http
            .post(self.endpoint(ACCESS_TOKEN_PATH))
            .json(&AccessTokenRequest {
                app_key: client_id,
                app_secret: client_secret,
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, "fetch_access_token"))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp, "fetch_access_token").await);
        }

        let body: AccessTokenResponse = resp.json().await.map_err(|e| {
            AppError::delivery(None, format!("fetch_access_token invalid JSON: {}", e))
        })?;

        Ok(body.access_token)
    }

    /// Send a message to a set of staff targets via the robot batch API
    ///
    /// The receipt carries the platform's `processQueryKey` plus any
    /// rejected-target lists.
    pub async fn batch_send(
        &self,
        user_ids: &[String],
        msg_key: &str,
        msg_param: String,
    ) -> AppResult<DeliveryReceipt> {
        let token = self.token()?;
        let request = BatchSendRequest {
            robot_code: self.credentials.robot_code.as_deref().unwrap_or_default(),
            user_ids,
            msg_key,
            msg_param,
        };

        let start = Instant::now();
        let resp = self
            .http
            .post(self.endpoint(BATCH_SEND_PATH))
            .header(TOKEN_HEADER, token)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, "batch_send"))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(Self::rejection(resp, "batch_send").await);
        }

        let body: BatchSendResponse = resp.json().await.map_err(|e| {
            AppError::delivery(Some(status), format!("batch_send invalid JSON: {}", e))
        })?;

        Ok(DeliveryReceipt {
            message_id: body.process_query_key,
            status,
            duration_ms,
            invalid_targets: body.invalid_staff_id_list,
            flow_controlled_targets: body.flow_controlled_staff_id_list,
        })
    }

    /// Look up a contact record by staff user id
    pub async fn get_user_info(&self, user_id: &str) -> AppResult<ContactUser> {
        let token = self.token()?;
        let url = format!("{}/{}", self.endpoint(CONTACT_USER_PATH), user_id);

        let resp = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, "get_user_info"))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(Self::rejection(resp, "get_user_info").await);
        }

        resp.json().await.map_err(|e| {
            AppError::delivery(Some(status), format!("get_user_info invalid JSON: {}", e))
        })
    }

    /// Check that the bound token can reach and authenticate to the platform
    pub async fn check_connection(&self) -> AppResult<()> {
        let token = self.token()?;

        let resp = self
            .http
            .get(self.endpoint(USERINFO_PATH))
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, "check_connection"))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp, "check_connection").await);
        }

        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> AppResult<&str> {
        self.credentials
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Configuration {
                key: "credentials.access_token".to_string(),
                reason: "access token not bound; configure one or call ensure_access_token"
                    .to_string(),
            })
    }

    fn map_transport_error(&self, error: reqwest::Error, operation: &str) -> AppError {
        if error.is_timeout() {
            return AppError::Timeout {
                seconds: self.timeout_seconds,
            };
        }
        let reason = format!("{} request failed: {}", operation, error);
        AppError::Delivery {
            status: None,
            reason,
            source: Some(error.into()),
        }
    }

    async fn rejection(resp: reqwest::Response, operation: &str) -> AppError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        AppError::delivery(
            Some(status),
            format!("{}: {}", operation, PlatformErrorBody::reason_from(&body)),
        )
    }
}

#[async_trait]
impl MessagingTransport for DingTalkApi {
    fn name(&self) -> &'static str {
        "dingtalk"
    }

    async fn deliver_batch(
        &self,
        targets: &[String],
        payload: &MessagePayload,
    ) -> AppResult<DeliveryReceipt> {
        self.batch_send(targets, payload.msg_key(), payload.msg_param())
            .await
    }

    async fn probe(&self) -> AppResult<()> {
        self.check_connection().await
    }
}
