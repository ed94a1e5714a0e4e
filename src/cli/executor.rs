//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use super::parser::{Cli, Commands, MessageKind};
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::external::dingtalk::DingTalkApi;
use crate::notify::Notifier;

/// Execute a CLI command with the given settings
///
/// Builds the platform transport, acquires an access token when needed,
/// and dispatches to the requested operation.
///
/// # Errors
/// Returns validation failures and any configuration, delivery, or timeout
/// error from the underlying client, unchanged.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    if let Err(msg) = cli.validate() {
        return Err(AppError::Validation {
            field: "cli_arguments".to_string(),
            reason: msg,
        });
    }

    match &cli.command {
        Commands::Send {
            target,
            message,
            kind,
            title,
            url,
            pic_url,
            proxy: _,
        } => {
            let api = build_api(&settings).await?;
            let notifier = Notifier::new(&settings, Arc::new(api))?;

            let receipt = match kind {
                MessageKind::Text => notifier.send_text(target, message).await?,
                MessageKind::Markdown => {
                    notifier
                        .send_markdown(target, title.as_deref().unwrap_or_default(), message)
                        .await?
                }
                MessageKind::Link => {
                    notifier
                        .send_link(
                            target,
                            title.as_deref().unwrap_or_default(),
                            message,
                            url.as_deref().unwrap_or_default(),
                            pic_url.clone(),
                        )
                        .await?
                }
            };

            println!(
                "delivered: {}",
                receipt.message_id.as_deref().unwrap_or("accepted")
            );
            Ok(())
        }

        Commands::Probe => {
            let api = build_api(&settings).await?;
            api.check_connection().await?;
            println!("connection ok");
            Ok(())
        }

        Commands::Userinfo { target } => {
            let api = build_api(&settings).await?;
            let user = api.get_user_info(target).await?;
            let rendered = serde_json::to_string_pretty(&user).map_err(|e| AppError::Internal {
                source: anyhow::Error::new(e).context("Failed to render contact record"),
            })?;
            println!("{}", rendered);
            Ok(())
        }
    }
}

/// Build the platform API handle, exchanging credentials for a token when
/// no pre-issued one is configured
async fn build_api(settings: &Settings) -> AppResult<DingTalkApi> {
    DingTalkApi::new(settings)?.ensure_access_token().await
}
