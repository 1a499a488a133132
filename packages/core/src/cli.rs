use std::path::PathBuf;

use clap::Parser;

use crate::config::default_config_path;

/// Shoujin notifier CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "shoujin-notifier",
    version,
    about = "Post newly solved AtCoder / Codeforces problems to a webhook"
)]
pub struct Cli {
    /// Users to process, as named in the config file (default: all)
    pub users: Vec<String>,

    /// Webhook URL to post the summary to
    #[arg(long, env = "SHOUJIN_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Path of the JSON config file (created with defaults if missing)
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Directory holding the per-user submission cache
    #[arg(long, value_name = "DIR", env = "SHOUJIN_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Print the summary but do not post it
    #[arg(long)]
    pub no_post: bool,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config_file.clone().unwrap_or_else(default_config_path)
    }
}
