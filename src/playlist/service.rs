//! Write-through access to remote playlists.
//!
//! Every mutation is mirrored into the [`PlaylistCache`] once the playlist
//! has been listed, even when that listing was empty. When the remote call fails the local change is undone; a failing
//! undo is only logged since the remote service stays the source of truth.

use super::api::PlaylistApi;
use super::cache::PlaylistCache;
use super::models::{RemoteTrack, Track};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error};

pub struct PlaylistService {
    api: Arc<dyn PlaylistApi>,
    cache: Arc<PlaylistCache>,
    listed: RwLock<HashSet<String>>,
}

impl PlaylistService {
    pub fn new(api: Arc<dyn PlaylistApi>, cache: Arc<PlaylistCache>) -> Self {
        Self {
            api,
            cache,
            listed: RwLock::new(HashSet::new()),
        }
    }

    /// True once the remote playlist was listed into the cache.
    fn is_listed(&self, playlist_id: &str) -> bool {
        self.listed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(playlist_id)
    }

    pub fn cache(&self) -> &PlaylistCache {
        &self.cache
    }

    /// Tracks of a playlist and whether they came from the cache.
    pub async fn list_playlist(&self, playlist_id: &str) -> Result<(Vec<Track>, bool)> {
        if self.cache.is_cached(playlist_id) {
            debug!("Using cached tracks for {}", playlist_id);
            return Ok((self.cache.get(playlist_id), true));
        }
        debug!("No cached tracks for {}, listing remote playlist", playlist_id);
        let tracks = self.refresh(playlist_id).await?;
        Ok((tracks.iter().map(Track::from).collect(), false))
    }

    /// List the remote playlist and replace the cached copy with it.
    pub async fn refresh(&self, playlist_id: &str) -> Result<Vec<RemoteTrack>> {
        let tracks = self.api.list_playlist(playlist_id).await?;
        self.cache
            .replace_all(playlist_id, tracks.iter().map(Track::from).collect());
        self.listed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(playlist_id.to_string());
        Ok(tracks)
    }

    pub async fn list_liked(&self) -> Result<Vec<Track>> {
        Ok(self
            .api
            .list_liked()
            .await?
            .iter()
            .map(Track::from)
            .collect())
    }

    pub async fn find_tracks(&self, query: &str) -> Result<Vec<RemoteTrack>> {
        self.api.search(query).await
    }

    pub async fn add(&self, playlist_id: &str, track: &Track) -> Result<()> {
        // Playlists that were never listed stay uncached.
        let mirrored = self.is_listed(playlist_id);
        if mirrored {
            self.cache.add(playlist_id, Some(track.clone()))?;
        }

        if let Err(e) = self.api.add_to_playlist(playlist_id, track.id()).await {
            if mirrored {
                if let Err(undo) = self.cache.replace(playlist_id, Some(track), None) {
                    error!("Failed to undo cached add of {}: {}", track, undo);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove every occurrence of `track` from the playlist.
    pub async fn remove(&self, playlist_id: &str, track: &Track) -> Result<()> {
        let removed = if self.is_listed(playlist_id) {
            self.cache.remove(playlist_id, Some(track))?
        } else {
            0
        };

        if let Err(e) = self.api.remove_from_playlist(playlist_id, track.id()).await {
            for _ in 0..removed {
                if let Err(undo) = self.cache.add(playlist_id, Some(track.clone())) {
                    error!("Failed to undo cached removal of {}: {}", track, undo);
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Swap `old` for `new`, or drop `old` when there is no replacement.
    pub async fn replace(&self, playlist_id: &str, old: &Track, new: Option<&Track>) -> Result<()> {
        let mirrored = self.is_listed(playlist_id);
        if mirrored {
            self.cache.replace(playlist_id, Some(old), new.cloned())?;
        }

        if let Some(new) = new {
            if let Err(e) = self.api.add_to_playlist(playlist_id, new.id()).await {
                if mirrored {
                    if let Err(undo) = self.cache.replace(playlist_id, Some(new), Some(old.clone())) {
                        error!("Failed to undo cached replacement of {}: {}", old, undo);
                    }
                }
                return Err(e);
            }
        }

        if let Err(e) = self.api.remove_from_playlist(playlist_id, old.id()).await {
            // The remote playlist still holds the old track.
            if mirrored {
                if let Err(undo) = self.cache.add(playlist_id, Some(old.clone())) {
                    error!("Failed to undo cached removal of {}: {}", old, undo);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}
