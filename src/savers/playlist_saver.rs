//! Saver adding matched songs to a remote playlist.

use super::{
    CleanStatus, NotFoundMemo, SaveReport, SaverError, SaverJob, SimilarTrack, SongSaver, Status,
};
use crate::matcher::{self, VALID_MATCH};
use crate::playlist::{PlaylistService, RemoteTrack, Track};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct PlaylistSaver {
    playlists: Arc<PlaylistService>,
    not_found: NotFoundMemo,
    market: String,
}

impl PlaylistSaver {
    pub fn new(playlists: Arc<PlaylistService>, market: impl Into<String>) -> Self {
        Self {
            playlists,
            not_found: NotFoundMemo::new(),
            market: market.into(),
        }
    }

    pub fn not_found(&self) -> &NotFoundMemo {
        &self.not_found
    }

    /// Collapse every duplicated id to a single entry at the end of the
    /// playlist. Returns the number of duplicated ids.
    async fn remove_duplicates(&self, playlist_id: &str) -> Result<usize, SaverError> {
        let tracks = self.playlists.cache().get(playlist_id);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for track in &tracks {
            *counts.entry(track.id()).or_default() += 1;
        }

        let mut handled = HashSet::new();
        for track in &tracks {
            if counts[track.id()] < 2 || !handled.insert(track.id()) {
                continue;
            }
            info!("Removing duplicate {} ({} copies)", track, counts[track.id()]);
            self.playlists.remove(playlist_id, track).await?;
            self.playlists.add(playlist_id, track).await?;
        }
        Ok(handled.len())
    }

    /// Replace or remove tracks that cannot be played in the market.
    async fn fix_unavailable(
        &self,
        playlist_id: &str,
        listing: &[RemoteTrack],
        status: &mut CleanStatus,
    ) -> Result<(), SaverError> {
        let mut seen = HashSet::new();
        for remote in listing {
            if remote.is_available_in(&self.market) || !seen.insert(remote.id.as_str()) {
                continue;
            }
            status.unavailable += 1;
            let old = remote.to_track();
            let title = old.to_string();

            if title.is_empty() {
                info!("Removing unavailable track {} without title", old.id());
                self.playlists.replace(playlist_id, &old, None).await?;
                status.unavailable_removed += 1;
                continue;
            }

            let candidates: Vec<Track> = self
                .playlists
                .find_tracks(&title)
                .await?
                .iter()
                .filter(|c| c.id != remote.id && c.is_available_in(&self.market))
                .map(Track::from)
                .collect();
            match matcher::best_match(&title, &candidates) {
                Some((new, quality)) if quality >= VALID_MATCH => {
                    info!("Replacing unavailable {:?} with {:?} ({})", title, new.to_string(), quality);
                    self.playlists.replace(playlist_id, &old, Some(new)).await?;
                    status.unavailable_replaced += 1;
                }
                _ => debug!("No replacement for unavailable {:?}", title),
            }
        }
        Ok(())
    }
}

/// Pairs of entries scoring as the same song in both directions on average.
fn find_similar(tracks: &[Track]) -> Vec<SimilarTrack> {
    let titled: Vec<(&Track, String)> = tracks
        .iter()
        .map(|t| (t, t.to_string()))
        .filter(|(_, title)| !title.is_empty())
        .collect();

    let mut similar = Vec::new();
    for (i, (first, first_title)) in titled.iter().enumerate() {
        for (second, second_title) in &titled[i + 1..] {
            if first.id() == second.id() {
                continue;
            }
            let ratio =
                (matcher::score(first_title, second) + matcher::score(second_title, first)) / 2;
            if ratio >= VALID_MATCH {
                similar.push(SimilarTrack {
                    title1: first_title.clone(),
                    title2: second_title.clone(),
                    avg_match_ratio: ratio,
                });
            }
        }
    }
    similar
}

#[async_trait]
impl SongSaver for PlaylistSaver {
    async fn clean(&self, job: &SaverJob) -> Result<CleanStatus, SaverError> {
        let playlist_id = job.playlist.as_str();
        let mut status = CleanStatus::default();

        self.playlists.refresh(playlist_id).await?;
        status.duplicates = self.remove_duplicates(playlist_id).await?;

        let listing = self.playlists.refresh(playlist_id).await?;
        self.fix_unavailable(playlist_id, &listing, &mut status)
            .await?;

        status.similar = find_similar(&self.playlists.cache().get(playlist_id));
        Ok(status)
    }

    async fn save(&self, job: &SaverJob, artist_title: &str) -> Result<SaveReport, SaverError> {
        if artist_title.is_empty() {
            return Err(SaverError::EmptyTitle);
        }
        if let Some(status) = self.not_found.get(artist_title) {
            return Ok(SaveReport {
                status,
                cached: true,
            });
        }

        let (tracks, cached) = self.playlists.list_playlist(&job.playlist).await?;
        if let Some((existing, quality)) = matcher::best_match(artist_title, &tracks) {
            if quality >= VALID_MATCH {
                return Ok(SaveReport {
                    status: Status {
                        song_exists: true,
                        found_title: existing.to_string(),
                        match_quality: quality,
                        ..Default::default()
                    },
                    cached,
                });
            }
        }

        let candidates: Vec<Track> = self
            .playlists
            .find_tracks(artist_title)
            .await?
            .iter()
            .map(Track::from)
            .collect();
        let best = matcher::best_match(artist_title, &candidates);

        match best {
            Some((track, quality)) if quality >= VALID_MATCH => {
                self.playlists.add(&job.playlist, track).await?;
                Ok(SaveReport {
                    status: Status {
                        song_added: true,
                        found_title: track.to_string(),
                        match_quality: quality,
                        ..Default::default()
                    },
                    cached: false,
                })
            }
            _ => {
                let status = Status {
                    found_title: best.map(|(t, _)| t.to_string()).unwrap_or_default(),
                    match_quality: best.map(|(_, q)| q).unwrap_or(0),
                    ..Default::default()
                };
                if candidates.is_empty() {
                    warn!("Search returned nothing for {:?}", artist_title);
                }
                self.not_found.insert(artist_title, status.clone());
                Ok(SaveReport {
                    status,
                    cached: false,
                })
            }
        }
    }
}
