use crate::jobs::Job;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// JSON configuration file. Every setting is optional except the job list.
#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "PascalCase")]
pub struct FileConfig {
    pub jobs: Vec<Job>,

    // Remote service
    pub market: Option<String>,
    pub access_token: Option<String>,
    pub api_base_url: Option<String>,
    pub api_interval_ms: Option<u64>,

    // Sources
    pub web_interval_ms: Option<u64>,
    pub stream_title_timeout_secs: Option<u64>,
    pub stream_job_timeout_secs: Option<u64>,
    pub channel_capacity: Option<usize>,

    pub stats_interval_secs: Option<u64>,
    pub notify: Option<NotifyConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default, rename_all = "PascalCase")]
pub struct NotifyConfig {
    pub url: Option<String>,
    pub secret: Option<String>,
    pub to: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
