//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cogniwell_core::config::StoreKind;

/// Terminal client for the cogniwell cognitive-training service.
#[derive(Parser, Debug)]
#[command(name = "cogniwell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Backend origin, overriding config and environment
    #[arg(long, global = true)]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the saved configuration, updating it when options are given.
    /// The global --origin is saved too.
    Config {
        /// Where to keep the session credential: keyring or file
        #[arg(long)]
        store: Option<StoreKind>,
        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Log in and store the session credential
    Login {
        /// Account email
        email: String,
    },
    /// Create an account, then log in
    Register {
        /// Full name shown in the app
        #[arg(long)]
        name: String,
        /// Account email
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show training progress metrics
    Progress,
    /// Fetch an exercise by id
    Exercise {
        id: String,
    },
    /// Generate a new exercise from a JSON request
    Generate {
        /// JSON request body, e.g. '{"exercise_type": "word-recall"}'
        request: String,
    },
    /// Submit exercise results from a JSON file
    Submit {
        /// memory-match, category-naming, word-recall or language-fluency
        kind: String,
        /// Path to the results JSON
        file: PathBuf,
    },
}
