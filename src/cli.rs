// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). `Config` then turns the
// raw flags into the values the rest of the program works with.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::github::RetryPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "awesome-sort",
    version,
    about = "Sorts the repository lists of an awesome list by GitHub stars",
    long_about = "awesome-sort downloads a markdown awesome list, looks up the GitHub stars of \
                  every linked repository, sorts each list by stars and prints the result with \
                  the star count shown next to every entry."
)]
pub struct Cli {
    /// URL of the raw markdown file
    ///
    /// Example: https://raw.githubusercontent.com/rust-unofficial/awesome-rust/main/README.md
    pub url: String,

    /// GitHub personal access token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Write the result to this file instead of stdout (must not exist yet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print debug messages to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of concurrent GitHub requests per block
    /// (default: one per entry)
    #[arg(long = "block-size", visible_alias = "bs")]
    pub block_size: Option<usize>,

    /// Requests per repository before giving up on a temporary API error
    #[arg(long, default_value_t = 5)]
    pub retries: u32,

    /// Milliseconds to wait between two of those requests
    #[arg(long = "backoff-ms", default_value_t = 500)]
    pub backoff_ms: u64,

    /// Timeout of every HTTP request, in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub token: String,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub width: Option<usize>,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            url: cli.url,
            token: cli.token,
            output: cli.output,
            verbose: cli.verbose,
            // 0 would stall the stream, treat it as "no limit"
            width: cli.block_size.filter(|&n| n > 0),
            retry: RetryPolicy {
                attempts: cli.retries.max(1),
                backoff: Duration::from_millis(cli.backoff_ms),
            },
            timeout: Duration::from_secs(cli.timeout_secs),
        }
    }
}
