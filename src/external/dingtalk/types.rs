use serde::{Deserialize, Serialize};

/// Body for `POST /oauth2/accessToken`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest<'a> {
    pub app_key: &'a str,
    pub app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expire_in: Option<i64>,
}

/// Body for `POST /robot/oToMessages/batchSend`
///
/// `msg_param` is a JSON document encoded as a string, per the platform
/// contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSendRequest<'a> {
    pub robot_code: &'a str,
    pub user_ids: &'a [String],
    pub msg_key: &'a str,
    pub msg_param: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchSendResponse {
    /// Platform identifier for the accepted send, used as the delivery
    /// success indicator
    pub process_query_key: Option<String>,
    pub invalid_staff_id_list: Vec<String>,
    pub flow_controlled_staff_id_list: Vec<String>,
}

/// Contact record from `GET /contact/users/{user_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactUser {
    pub user_id: Option<String>,
    pub union_id: Option<String>,
    pub nick: Option<String>,
    pub avatar_url: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub state_code: Option<String>,
    pub title: Option<String>,
}

/// Error body the platform returns alongside non-2xx statuses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl PlatformErrorBody {
    /// Best-effort human-readable reason from an error response body
    pub fn reason_from(body: &str) -> String {
        match serde_json::from_str::<PlatformErrorBody>(body) {
            Ok(parsed) => match (parsed.code, parsed.message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message,
                (Some(code), None) => code,
                (None, None) => body.to_string(),
            },
            Err(_) => body.to_string(),
        }
    }
}
