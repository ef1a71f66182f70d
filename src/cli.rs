use clap::{Parser, Subcommand};

use crate::models::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ScanConfig,
    ScanTarget,
};
use crate::error::ConfigError;

#[derive(Parser)]
#[command(name = "webprobe")]
#[command(version, about = "Same-origin crawler and web vulnerability prober")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl a site and probe every page for SQLi, XSS and data exposure
    Scan {
        #[arg(short, long)]
        url: String,

        #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH)]
        depth: usize,

        /// Per-request timeout in seconds
        #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Abort the whole scan after this many seconds
        #[arg(long)]
        max_time: Option<u64>,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        user_agent: String,

        /// Write a JSON export of the report
        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Re-render a JSON export
    Report {
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value = "html")]
        format: String,

        #[arg(short, long)]
        output: Option<String>,
    },
}

pub fn scan_config(
    url: &str,
    depth: usize,
    timeout: u64,
    concurrency: usize,
    max_time: Option<u64>,
    user_agent: &str,
) -> Result<ScanConfig, ConfigError> {
    let target = ScanTarget::new(url, depth)?;
    let config = ScanConfig::new(target)
        .with_timeout(timeout)
        .with_concurrency(concurrency)
        .with_max_time(max_time.map(std::time::Duration::from_secs))
        .with_user_agent(user_agent);
    config.validate()?;
    Ok(config)
}
