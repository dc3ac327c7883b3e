use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client::ExplainLevel;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "expound-cli",
    version,
    about = "Terminal client for the expound explain service"
)]
pub struct Args {
    /// URL of the explain endpoint.
    #[arg(
        long,
        env = "EXPOUND_ENDPOINT",
        default_value = "http://127.0.0.1:8000/api/explain"
    )]
    pub endpoint: Url,
    /// Path of the client state file. Defaults to a file in the user data
    /// directory.
    #[arg(long, env = "EXPOUND_STATE_PATH")]
    pub state_path: Option<PathBuf>,
    /// Log filter, e.g. "debug" or "client=trace".
    #[arg(long = "log", env = "EXPOUND_CLI_LOG", default_value = "warn")]
    pub log_filter: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Explain the given text (reads stdin when no text is given).
    Explain {
        /// Text to explain.
        text: Option<String>,
        /// Explanation style: simple, detailed or eli5.
        #[arg(long, default_value = "simple")]
        level: ExplainLevel,
        /// Copy the explanation markdown to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// List past explanations, most recent first.
    History,
    /// Replay a stored explanation without a network call.
    Restore {
        /// Zero-based index into the history list.
        index: usize,
        /// Copy the explanation markdown to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Re-submit the most recently attempted request.
    Retry,
    /// Clear the history log.
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show or set the colour theme (dark or light).
    Theme {
        /// New theme value.
        value: Option<String>,
    },
}
