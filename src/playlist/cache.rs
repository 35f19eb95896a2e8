//! In-memory mirror of remote playlists.
//!
//! Each playlist has its own lock, so work on one playlist never waits for
//! another. The outer map lock is only held long enough to find or create a
//! playlist entry.

use super::models::Track;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cannot {0} a missing track")]
    MissingTrack(&'static str),

    #[error("Track {0:?} was not found in playlist {1}")]
    TrackNotFound(String, String),
}

type TrackList = Arc<RwLock<Vec<Track>>>;

/// Per-playlist ordered track lists. Duplicates are allowed.
#[derive(Default)]
pub struct PlaylistCache {
    playlists: RwLock<HashMap<String, TrackList>>,
}

impl PlaylistCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, playlist_id: &str) -> Option<TrackList> {
        self.playlists
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(playlist_id)
            .cloned()
    }

    fn get_or_create(&self, playlist_id: &str) -> TrackList {
        if let Some(list) = self.find(playlist_id) {
            return list;
        }
        self.playlists
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(playlist_id.to_string())
            .or_default()
            .clone()
    }

    /// True once the playlist holds at least one track.
    pub fn is_cached(&self, playlist_id: &str) -> bool {
        self.find(playlist_id)
            .map(|list| !list.read().unwrap_or_else(PoisonError::into_inner).is_empty())
            .unwrap_or(false)
    }

    /// Copy of the cached tracks, empty for unknown playlists.
    pub fn get(&self, playlist_id: &str) -> Vec<Track> {
        self.find(playlist_id)
            .map(|list| list.read().unwrap_or_else(PoisonError::into_inner).clone())
            .unwrap_or_default()
    }

    pub fn add(&self, playlist_id: &str, track: Option<Track>) -> Result<(), CacheError> {
        let track = track.ok_or(CacheError::MissingTrack("add"))?;
        let list = self.get_or_create(playlist_id);
        list.write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(track);
        Ok(())
    }

    /// Remove every entry with the same id as `track`. Returns how many were
    /// removed.
    pub fn remove(&self, playlist_id: &str, track: Option<&Track>) -> Result<usize, CacheError> {
        let track = track.ok_or(CacheError::MissingTrack("remove"))?;
        let list = self.get_or_create(playlist_id);
        let mut tracks = list.write().unwrap_or_else(PoisonError::into_inner);

        let before = tracks.len();
        tracks.retain(|t| t.id() != track.id());
        let removed = before - tracks.len();
        if removed == 0 {
            return Err(CacheError::TrackNotFound(
                track.to_string(),
                playlist_id.to_string(),
            ));
        }
        Ok(removed)
    }

    pub fn replace_all(&self, playlist_id: &str, tracks: Vec<Track>) {
        let list = self.get_or_create(playlist_id);
        *list.write().unwrap_or_else(PoisonError::into_inner) = tracks;
    }

    /// Replace the first entry with the id of `old`. A missing `new` removes
    /// that single entry.
    pub fn replace(
        &self,
        playlist_id: &str,
        old: Option<&Track>,
        new: Option<Track>,
    ) -> Result<(), CacheError> {
        let old = old.ok_or(CacheError::MissingTrack("replace"))?;
        let list = self.get_or_create(playlist_id);
        let mut tracks = list.write().unwrap_or_else(PoisonError::into_inner);

        let position = tracks
            .iter()
            .position(|t| t.id() == old.id())
            .ok_or_else(|| CacheError::TrackNotFound(old.to_string(), playlist_id.to_string()))?;
        match new {
            Some(new) => tracks[position] = new,
            None => {
                tracks.remove(position);
            }
        }
        Ok(())
    }
}
