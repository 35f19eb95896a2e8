//! Song consumers.
//!
//! A saver resolves an `"Artist - Title"` string against its target and
//! reports what happened in a [`Status`].

mod not_found;
mod playlist_saver;
mod stdout;

pub use not_found::NotFoundMemo;
pub use playlist_saver::PlaylistSaver;
pub use stdout::StdoutSaver;

use crate::playlist::PlaylistService;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Saver half of a job definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaverJob {
    #[serde(default)]
    pub playlist: String,
    #[serde(default)]
    pub saver_type: String,
}

/// Outcome of one save. Both flags false means the song was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub song_added: bool,
    pub song_exists: bool,
    /// Best candidate, empty when nothing was found.
    pub found_title: String,
    /// 0 to 100.
    pub match_quality: i32,
}

impl Status {
    pub fn is_not_found(&self) -> bool {
        !self.song_added && !self.song_exists
    }
}

/// A [`Status`] plus whether it was answered from local state (playlist cache
/// or not-found memo) without asking the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub status: Status,
    pub cached: bool,
}

/// Two playlist entries that look like the same song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarTrack {
    pub title1: String,
    pub title2: String,
    pub avg_match_ratio: i32,
}

/// Summary of a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanStatus {
    /// Tracks not playable in the configured market.
    pub unavailable: usize,
    /// Unavailable tracks swapped for an available match.
    pub unavailable_replaced: usize,
    /// Unavailable tracks without a title, removed.
    pub unavailable_removed: usize,
    /// Duplicated ids collapsed to a single entry.
    pub duplicates: usize,
    /// Possible duplicates left for a human to review.
    pub similar: Vec<SimilarTrack>,
}

impl fmt::Display for CleanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unavailable:          {}", self.unavailable)?;
        write!(f, "\nUnavailable replaced: {}", self.unavailable_replaced)?;
        write!(f, "\nUnavailable removed:  {}", self.unavailable_removed)?;
        write!(f, "\nRemoved duplicates:   {}", self.duplicates)?;
        for s in &self.similar {
            write!(f, "\n{} {} = {}", s.avg_match_ratio, s.title1, s.title2)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SaverError {
    #[error("Empty song title")]
    EmptyTitle,

    #[error("Unknown saver type {0:?}")]
    UnknownType(String),

    #[error("Saver {0:?} needs access to the streaming service")]
    MissingApi(String),

    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}

#[async_trait]
pub trait SongSaver: Send + Sync {
    /// One-off pass over the target before any song is saved.
    async fn clean(&self, job: &SaverJob) -> Result<CleanStatus, SaverError>;

    async fn save(&self, job: &SaverJob, artist_title: &str) -> Result<SaveReport, SaverError>;
}

/// Shared resources handed to the saver registry.
#[derive(Clone)]
pub struct SaverContext {
    pub playlists: Option<Arc<PlaylistService>>,
    pub market: String,
}

/// Build the saver registered under `saver_type`.
pub fn create(saver_type: &str, ctx: &SaverContext) -> Result<Arc<dyn SongSaver>, SaverError> {
    match saver_type {
        "spotify" => {
            let playlists = ctx
                .playlists
                .clone()
                .ok_or_else(|| SaverError::MissingApi(saver_type.to_string()))?;
            Ok(Arc::new(PlaylistSaver::new(playlists, ctx.market.clone())))
        }
        "stdout" => Ok(Arc::new(StdoutSaver)),
        other => Err(SaverError::UnknownType(other.to_string())),
    }
}
