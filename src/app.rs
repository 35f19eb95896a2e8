//! Wiring from a resolved [`AppConfig`] to a runnable set of jobs.

use crate::config::AppConfig;
use crate::jobs::Orchestrator;
use crate::notifications::{CloudMessageNotifier, Notifier, PRIORITY_ISSUES, PRIORITY_STATS};
use crate::playlist::{PlaylistCache, PlaylistService, SpotifyClient, StaticTokenProvider};
use crate::rate_limit::RateLimitedClient;
use crate::savers::SaverContext;
use crate::sources::SourceContext;
use crate::stats::Statistics;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const APP_NAME: &str = "Streaming playlist maker";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct App {
    config: AppConfig,
    orchestrator: Orchestrator,
    notifier: Option<Arc<dyn Notifier>>,
}

impl App {
    pub fn new(config: AppConfig, stats: Arc<Statistics>) -> Result<Self> {
        let playlists = match &config.access_token {
            Some(token) => {
                let api_client = RateLimitedClient::with_timeout(HTTP_TIMEOUT, config.api_interval)
                    .context("Failed to build the API client")?;
                let api = SpotifyClient::new(
                    Arc::new(api_client),
                    Arc::new(StaticTokenProvider::new(token.clone())),
                    config.api_base_url.clone(),
                    config.market.clone(),
                );
                Some(Arc::new(PlaylistService::new(
                    Arc::new(api),
                    Arc::new(PlaylistCache::new()),
                )))
            }
            None => {
                warn!("No access token configured, playlist sources and savers are disabled");
                None
            }
        };

        let web_client = RateLimitedClient::with_timeout(HTTP_TIMEOUT, config.web_interval)
            .context("Failed to build the web client")?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build the stream client")?;

        let source_ctx = SourceContext {
            web_client: Arc::new(web_client),
            stream_client: stream_client.clone(),
            playlists: playlists.clone(),
            title_timeout: config.stream_title_timeout,
            job_timeout: config.stream_job_timeout,
        };
        let saver_ctx = SaverContext {
            playlists,
            market: config.market.clone(),
        };

        let notifier = config.notify.as_ref().map(|settings| {
            Arc::new(CloudMessageNotifier::new(stream_client, settings, APP_NAME))
                as Arc<dyn Notifier>
        });

        Ok(Self {
            orchestrator: Orchestrator::new(source_ctx, saver_ctx, stats, config.channel_capacity),
            config,
            notifier,
        })
    }

    pub fn stats(&self) -> &Arc<Statistics> {
        self.orchestrator.stats()
    }

    /// Run all active jobs, then log and send the final report.
    pub async fn run(&self) {
        let skipped = self.orchestrator.run(&self.config.jobs).await;
        info!("Jobs completed");
        self.report(skipped).await;
    }

    async fn report(&self, skipped: Vec<String>) {
        let stats = self.stats();
        let mut issues = skipped;
        issues.extend(stats.find_issues());
        let issues = issues.join("\n");

        info!("Statistics:\n{}\n{}", issues, stats);

        let Some(notifier) = &self.notifier else {
            return;
        };
        if let Err(err) = notifier
            .notify(PRIORITY_STATS, &format!("\n{}", stats))
            .await
        {
            error!("Could not send notification: {}", err);
        }
        if !issues.is_empty() {
            if let Err(err) = notifier.notify(PRIORITY_ISSUES, &issues).await {
                error!("Could not send notification: {}", err);
            }
        }
    }
}
