use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;

use shoujin_notifier::cache::CacheStore;
use shoujin_notifier::cli::Cli;
use shoujin_notifier::config::{ConfigFile, Settings};
use shoujin_notifier::error::AppResult;
use shoujin_notifier::judges::JudgeRegistry;
use shoujin_notifier::logging::init_logging;
use shoujin_notifier::notify::WebhookClient;
use shoujin_notifier::runner::run_once;
use shoujin_notifier::services::rate_limit::{RandomDelay, RateLimiter};
use shoujin_notifier::services::Endpoints;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let file = ConfigFile::load_or_create(&cli.config_path())?;
    let settings = Settings::resolve(&cli, file)?;

    tracing::info!("run started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let limiter: Arc<dyn RateLimiter + Send + Sync> = Arc::new(RandomDelay::default());
    let judges = JudgeRegistry::connect(settings.services(), &Endpoints::default(), limiter).await?;
    let cache = CacheStore::new(&settings.cache_dir);

    let text = run_once(&judges, &cache, &settings.users).await?;
    if text.is_empty() {
        tracing::info!("nothing to notify...");
        return Ok(());
    }

    println!("{}", text);

    if settings.post {
        WebhookClient::new(settings.webhook_url.clone()).post(&text).await?;
    } else {
        tracing::info!("--no-post given; skipping webhook");
    }

    Ok(())
}
