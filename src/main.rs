use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use streaming_playlist_maker::app::APP_NAME;
use streaming_playlist_maker::config::{self, DEFAULT_CONFIG_NAME};
use streaming_playlist_maker::{App, AppConfig, FileConfig, Statistics};

const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

#[derive(Parser, Debug)]
#[clap(version = env!("BUILD_VERSION"))]
struct CliArgs {
    /// Configuration name, resolved to <config-dir>/<name>.json, or a path to a JSON file.
    #[clap(long, default_value = DEFAULT_CONFIG_NAME)]
    pub config: String,

    /// Directory holding named configurations. Defaults to $HOME/.config.
    #[clap(long)]
    pub config_dir: Option<PathBuf>,

    /// Interval between statistics snapshots in the log.
    #[clap(long, default_value_t = 60)]
    pub stats_interval_secs: u64,

    /// Log titles instead of saving them.
    #[clap(long)]
    pub dry_run: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            config: args.config.clone(),
            config_dir: args.config_dir.clone(),
            stats_interval_secs: args.stats_interval_secs,
            dry_run: args.dry_run,
            access_token: std::env::var(ACCESS_TOKEN_ENV).ok(),
        }
    }
}

async fn log_stats_periodically(stats: Arc<Statistics>, interval: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    // Skip the first immediate tick
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => info!("Statistics:\n{}", stats),
            _ = token.cancelled() => return,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    info!("Starting {} {}", APP_NAME, env!("BUILD_VERSION"));

    let cli_config = config::CliConfig::from(&cli_args);
    let config_path = config::config_path(&cli_config.config, cli_config.config_dir.as_deref())?;
    info!("Loading config from {:?}", config_path);
    let file_config = FileConfig::load(&config_path)?;
    let app_config = AppConfig::resolve(&cli_config, Some(file_config))?;
    info!(
        "Loaded {} jobs ({} active), market {}",
        app_config.jobs.len(),
        app_config.active_jobs().count(),
        app_config.market
    );

    let stats = Arc::new(Statistics::new());
    let shutdown_token = CancellationToken::new();
    tokio::spawn(log_stats_periodically(
        stats.clone(),
        app_config.stats_interval,
        shutdown_token.clone(),
    ));

    let app = App::new(app_config, stats.clone())?;

    tokio::select! {
        _ = app.run() => {
            shutdown_token.cancel();
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, statistics:\n{}", stats);
            std::process::exit(0);
        }
    }
    Ok(())
}
