//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default directory holding persisted per-platform session state.
pub const DEFAULT_STATE_DIR: &str = ".auth";

/// Retrieve billing PDF artifacts from web portals.
///
/// Billfetch maintains persisted browser-session state per platform and
/// plans which billing periods are currently downloadable.
#[derive(Parser, Debug)]
#[command(name = "billfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the billing periods currently downloadable for a platform
    Periods {
        /// Platform name (e.g. partner, arnona)
        platform: String,
    },

    /// Inspect or maintain persisted session state
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// List platforms with persisted session state
    List {
        /// Directory holding the state records
        #[arg(long, default_value = DEFAULT_STATE_DIR)]
        state_dir: PathBuf,
    },

    /// Summarize one platform's persisted session state
    Show {
        /// Platform name
        platform: String,
        /// Directory holding the state records
        #[arg(long, default_value = DEFAULT_STATE_DIR)]
        state_dir: PathBuf,
    },

    /// Delete one platform's persisted session state
    Clear {
        /// Platform name
        platform: String,
        /// Directory holding the state records
        #[arg(long, default_value = DEFAULT_STATE_DIR)]
        state_dir: PathBuf,
    },
}
