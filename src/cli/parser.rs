//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Send DingTalk robot messages from the command line
#[derive(Parser, Debug)]
#[command(name = "dingrelay")]
#[command(about = "Send DingTalk robot messages from the command line")]
#[command(long_about = "
Dingrelay relays text, markdown, and link messages to DingTalk staff
targets through a corporate robot.

Credentials come from a TOML configuration file, DINGRELAY_* environment
variables, or the conventional DINGTALK_* variables (DINGTALK_CLIENT_ID,
DINGTALK_CLIENT_SECRET, DINGTALK_ACCESS_TOKEN, DINGTALK_ROBOT_CODE).

EXAMPLES:
    # Send a text message
    dingrelay send --target 31261924402207 --message \"build finished\"

    # Send a markdown message
    dingrelay send --target 31261924402207 --kind markdown \\
        --title \"Nightly build\" --message \"**all tests passed**\"

    # Send a link card
    dingrelay send --target 31261924402207 --kind link \\
        --title \"Release v1.2\" --message \"changelog inside\" \\
        --url https://example.com/release

    # Verify connectivity and credentials
    dingrelay probe

    # Look up a contact record
    dingrelay userinfo --target 31261924402207
")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// TOML file with [api], [credentials], and [logger] sections.
    /// Environment variables still override values from the file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message to a staff target
    Send {
        /// Destination staff user id
        #[arg(short, long)]
        target: String,

        /// Message content (the body text for markdown and link kinds)
        #[arg(short, long)]
        message: String,

        /// Message kind
        #[arg(short, long, value_enum, default_value_t = MessageKind::Text)]
        kind: MessageKind,

        /// Message title (required for markdown and link kinds)
        #[arg(long)]
        title: Option<String>,

        /// Destination URL (required for the link kind)
        #[arg(long)]
        url: Option<String>,

        /// Picture URL shown on a link card
        #[arg(long)]
        pic_url: Option<String>,

        /// Proxy server, `http://host:port`
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Check connectivity and authentication against the platform
    Probe,

    /// Print a contact record as JSON
    Userinfo {
        /// Staff user id to look up
        #[arg(short, long)]
        target: String,
    },
}

/// Message kind for the send command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageKind {
    Text,
    Markdown,
    Link,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("--verbose and --quiet are mutually exclusive".to_string());
        }

        if let Commands::Send {
            kind, title, url, ..
        } = &self.command
        {
            match kind {
                MessageKind::Markdown if title.is_none() => {
                    return Err("markdown messages require --title".to_string());
                }
                MessageKind::Link if title.is_none() || url.is_none() => {
                    return Err("link messages require --title and --url".to_string());
                }
                _ => {}
            }
        }

        Ok(())
    }
}
