use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// User agent sent with every platform request
const USER_AGENT: &str = concat!("dingrelay/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for platform requests
///
/// # Features
/// - **Connection pooling**: Reuses TCP connections across requests
/// - **Timeouts**: request timeout from configuration, 10s connect timeout
/// - **Compression**: gzip response decoding
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
/// - **Proxy**: optional proxy from configuration, matching the platform
///   tooling's `http://host:port` convention
///
/// The client is cheap to clone; one instance is built per API handle and
/// shared across its calls.
pub fn build_http_client(config: &ApiConfig) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        // Compression
        .gzip(true)
        // Security
        .use_rustls_tls()
        .user_agent(USER_AGENT);

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| AppError::Validation {
            field: "api.proxy".to_string(),
            reason: format!("invalid proxy URL '{}': {}", proxy_url, e),
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| AppError::Internal {
        source: anyhow::Error::new(e).context("Failed to build HTTP client"),
    })
}
