//! Song producers.
//!
//! A source turns an external feed into `"Artist - Title"` strings pushed onto
//! a bounded channel. [`SongSource::start`] returns as soon as the background
//! work is spawned; the channel closes when the producer finishes, which is
//! when every clone of the sender has been dropped.

mod html;
mod icy;
mod null;
pub mod pages;
mod remote;
mod web;

pub use icy::{find_stream_title, IcySource};
pub use null::NullSource;
pub use remote::{LikedSource, MergeSource};
pub use web::{PageParser, WebSource};

use crate::playlist::PlaylistService;
use crate::rate_limit::RateLimitedClient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// One event produced by a source.
#[derive(Debug)]
pub enum Song {
    Title(String),
    Error(SourceError),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unknown source type {0:?}")]
    UnknownType(String),

    #[error("Source {0:?} needs access to the streaming service")]
    MissingApi(String),

    #[error("Invalid source url {0:?}: {1}")]
    InvalidUrl(String, String),

    #[error("Invalid date {0:?} in source url: {1}")]
    InvalidDate(String, chrono::ParseError),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {0} failed with status: {1}")]
    Status(String, reqwest::StatusCode),

    #[error("No results for {0:?}")]
    NoResults(String),

    #[error("Date returned for the next page ({next}) is not before current ({current})")]
    StepNotBefore {
        next: chrono::NaiveDate,
        current: chrono::NaiveDate,
    },

    #[error("Title timeout, last title found: {0}")]
    TitleTimeout(String),

    #[error("Job timeout, last title found: {0}")]
    JobTimeout(String),

    #[error("Stream ended, last title found: {0}")]
    StreamEnded(String),

    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

/// Source half of a job definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceJob {
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub source_type: String,
    /// Substrings replaced in every title before it is emitted.
    #[serde(default)]
    pub substr_map: BTreeMap<String, String>,
}

impl SourceJob {
    pub fn apply_substr_map(&self, title: &str) -> String {
        self.substr_map
            .iter()
            .fold(title.to_string(), |t, (from, to)| t.replace(from.as_str(), to))
    }
}

pub trait SongSource: Send + Sync {
    /// Validate `job` and spawn the producer. Must be called from within a
    /// tokio runtime.
    fn start(&self, job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError>;
}

/// Shared resources handed to the source registry.
#[derive(Clone)]
pub struct SourceContext {
    pub web_client: Arc<RateLimitedClient>,
    pub stream_client: reqwest::Client,
    pub playlists: Option<Arc<PlaylistService>>,
    pub title_timeout: Duration,
    pub job_timeout: Duration,
}

/// Build the source registered under `source_type`.
pub fn create(source_type: &str, ctx: &SourceContext) -> Result<Arc<dyn SongSource>, SourceError> {
    let playlists = || {
        ctx.playlists
            .clone()
            .ok_or_else(|| SourceError::MissingApi(source_type.to_string()))
    };

    let source: Arc<dyn SongSource> = match source_type {
        "icy" => Arc::new(IcySource::new(
            ctx.stream_client.clone(),
            ctx.title_timeout,
            ctx.job_timeout,
        )),
        "billboard" => Arc::new(WebSource::new(
            ctx.web_client.clone(),
            Arc::new(pages::Billboard),
        )),
        "billboard_charts" => Arc::new(WebSource::new(
            ctx.web_client.clone(),
            Arc::new(pages::BillboardCharts),
        )),
        "uk_singles" => Arc::new(WebSource::new(
            ctx.web_client.clone(),
            Arc::new(pages::UkSingles),
        )),
        "odsluchane" => Arc::new(WebSource::new(
            ctx.web_client.clone(),
            Arc::new(pages::Odsluchane::new()),
        )),
        "spotify_liked" => Arc::new(LikedSource::new(playlists()?)),
        "spotify_merge" => Arc::new(MergeSource::new(playlists()?)),
        "null" => Arc::new(NullSource),
        other => return Err(SourceError::UnknownType(other.to_string())),
    };
    Ok(source)
}

/// Send titles in order. Returns false once the receiver is gone.
async fn emit_all(songs: &mpsc::Sender<Song>, titles: Vec<String>) -> bool {
    for title in titles {
        if songs.send(Song::Title(title)).await.is_err() {
            return false;
        }
    }
    true
}
