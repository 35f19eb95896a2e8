mod file_config;

pub use file_config::{FileConfig, NotifyConfig};

use crate::jobs::Job;
use crate::playlist::spotify_client::DEFAULT_API_BASE_URL;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "streaming-playlist-maker";
pub const DEFAULT_NOTIFY_URL: &str = "https://llamalab.com/automate/cloud/message";

/// CLI arguments that can be used for config resolution.
/// Values present in the JSON file take precedence.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: String,
    pub config_dir: Option<PathBuf>,
    pub stats_interval_secs: u64,
    pub dry_run: bool,
    /// Usually taken from `SPOTIFY_ACCESS_TOKEN`.
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jobs: Vec<Job>,

    pub market: String,
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub api_interval: Duration,

    pub web_interval: Duration,
    pub stream_title_timeout: Duration,
    pub stream_job_timeout: Duration,
    pub channel_capacity: usize,

    pub stats_interval: Duration,
    pub notify: Option<NotifySettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySettings {
    pub url: String,
    pub secret: String,
    pub to: String,
}

/// Path of the configuration file named by `--config`.
///
/// Anything that looks like a path is used as is; a bare name resolves to
/// `<config_dir>/<name>.json`, with `$HOME/.config` as the default directory.
pub fn config_path(name: &str, config_dir: Option<&Path>) -> Result<PathBuf> {
    if name.is_empty() {
        bail!("Configuration name is empty");
    }
    if name.contains('/') || name.ends_with(".json") {
        return Ok(PathBuf::from(name));
    }
    let dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config"),
            None => bail!("HOME is not set, use --config-dir or a config file path"),
        },
    };
    Ok(dir.join(format!("{}.json", name)))
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and the JSON file.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let mut jobs = file.jobs;
        if cli.dry_run {
            for job in &mut jobs {
                job.saver.saver_type = "stdout".to_string();
            }
        }

        let channel_capacity = file.channel_capacity.unwrap_or(10);
        if channel_capacity == 0 {
            bail!("ChannelCapacity must be greater than 0");
        }

        let access_token = file
            .access_token
            .filter(|t| !t.is_empty())
            .or_else(|| cli.access_token.clone().filter(|t| !t.is_empty()));

        let stats_interval_secs = file.stats_interval_secs.unwrap_or(cli.stats_interval_secs);
        if stats_interval_secs == 0 {
            bail!("Statistics interval must be greater than 0");
        }

        let notify = match file.notify {
            Some(n) => {
                let to = n.to.unwrap_or_default();
                if to.is_empty() {
                    None
                } else {
                    let Some(secret) = n.secret.filter(|s| !s.is_empty()) else {
                        bail!("Notify.Secret must be set when Notify.To is set");
                    };
                    Some(NotifySettings {
                        url: n.url.unwrap_or_else(|| DEFAULT_NOTIFY_URL.to_string()),
                        secret,
                        to,
                    })
                }
            }
            None => None,
        };

        Ok(Self {
            jobs,
            market: file.market.unwrap_or_else(|| "PL".to_string()),
            access_token,
            api_base_url: file
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            api_interval: Duration::from_millis(file.api_interval_ms.unwrap_or(1000)),
            web_interval: Duration::from_millis(file.web_interval_ms.unwrap_or(3000)),
            stream_title_timeout: Duration::from_secs(
                file.stream_title_timeout_secs.unwrap_or(30 * 60),
            ),
            stream_job_timeout: Duration::from_secs(
                file.stream_job_timeout_secs.unwrap_or(6 * 60 * 60),
            ),
            channel_capacity,
            stats_interval: Duration::from_secs(stats_interval_secs),
            notify,
        })
    }

    /// Jobs that should run.
    pub fn active_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.active)
    }
}
