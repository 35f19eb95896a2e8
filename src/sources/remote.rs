//! Sources reading from the streaming service itself.

use super::{emit_all, Song, SongSource, SourceError, SourceJob};
use crate::playlist::{PlaylistService, Track};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

fn titles(tracks: Vec<Track>) -> Vec<String> {
    tracks
        .iter()
        .map(Track::to_string)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Every song liked by the authenticated user.
pub struct LikedSource {
    playlists: Arc<PlaylistService>,
}

impl LikedSource {
    pub fn new(playlists: Arc<PlaylistService>) -> Self {
        Self { playlists }
    }
}

impl SongSource for LikedSource {
    fn start(&self, _job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError> {
        let playlists = self.playlists.clone();
        tokio::spawn(async move {
            match playlists.list_liked().await {
                Ok(tracks) => {
                    info!("Found {} liked songs", tracks.len());
                    emit_all(&songs, titles(tracks)).await;
                }
                Err(e) => {
                    let _ = songs.send(Song::Error(e.into())).await;
                }
            }
        });
        Ok(())
    }
}

/// Songs of several playlists, given as `id1|id2|...`.
pub struct MergeSource {
    playlists: Arc<PlaylistService>,
}

impl MergeSource {
    pub fn new(playlists: Arc<PlaylistService>) -> Self {
        Self { playlists }
    }
}

impl SongSource for MergeSource {
    fn start(&self, job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError> {
        let ids: Vec<String> = job
            .source_url
            .split('|')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();
        if ids.is_empty() {
            return Err(SourceError::InvalidUrl(
                job.source_url.clone(),
                "no playlist ids".to_string(),
            ));
        }

        let playlists = self.playlists.clone();
        tokio::spawn(async move {
            for id in ids {
                let event = playlists.list_playlist(&id).await;
                match event {
                    Ok((tracks, _)) => {
                        debug!("Playlist {} has {} songs", id, tracks.len());
                        if !emit_all(&songs, titles(tracks)).await {
                            return;
                        }
                    }
                    Err(e) => {
                        if songs.send(Song::Error(e.into())).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::{PlaylistApi, PlaylistCache, RemoteArtist, RemoteTrack};
    use anyhow::{bail, Result};
    use async_trait::async_trait;

    struct FakeApi;

    fn remote(id: &str, artist: &str, name: &str) -> RemoteTrack {
        RemoteTrack {
            id: id.to_string(),
            name: name.to_string(),
            artists: vec![RemoteArtist {
                id: String::new(),
                name: artist.to_string(),
            }],
            ..Default::default()
        }
    }

    #[async_trait]
    impl PlaylistApi for FakeApi {
        async fn list_playlist(&self, playlist_id: &str) -> Result<Vec<RemoteTrack>> {
            match playlist_id {
                "a" => Ok(vec![remote("1", "A", "One"), remote("2", "", "")]),
                "b" => Ok(vec![remote("3", "B", "Three")]),
                _ => bail!("no such playlist"),
            }
        }

        async fn list_liked(&self) -> Result<Vec<RemoteTrack>> {
            Ok(vec![remote("9", "Liked", "Song")])
        }

        async fn add_to_playlist(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        async fn remove_from_playlist(&self, _: &str, _: &str) -> Result<()> {
            Ok(())
        }

        async fn search(&self, _: &str) -> Result<Vec<RemoteTrack>> {
            Ok(Vec::new())
        }
    }

    fn service() -> Arc<PlaylistService> {
        Arc::new(PlaylistService::new(
            Arc::new(FakeApi),
            Arc::new(PlaylistCache::new()),
        ))
    }

    async fn drain(mut rx: mpsc::Receiver<Song>) -> (Vec<String>, usize) {
        let mut titles = Vec::new();
        let mut errors = 0;
        while let Some(song) = rx.recv().await {
            match song {
                Song::Title(t) => titles.push(t),
                Song::Error(_) => errors += 1,
            }
        }
        (titles, errors)
    }

    #[tokio::test]
    async fn test_merge_lists_playlists_in_order() {
        let (tx, rx) = mpsc::channel(10);
        let job = SourceJob {
            source_url: "a|missing|b".to_string(),
            ..Default::default()
        };

        MergeSource::new(service()).start(&job, tx).unwrap();
        let (titles, errors) = drain(rx).await;

        assert_eq!(titles, vec!["A - One", "B - Three"]);
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_merge_without_ids_fails() {
        let (tx, _rx) = mpsc::channel(10);
        let job = SourceJob {
            source_url: "|".to_string(),
            ..Default::default()
        };
        assert!(MergeSource::new(service()).start(&job, tx).is_err());
    }

    #[tokio::test]
    async fn test_liked() {
        let (tx, rx) = mpsc::channel(10);

        LikedSource::new(service())
            .start(&SourceJob::default(), tx)
            .unwrap();

        assert_eq!(drain(rx).await, (vec!["Liked - Song".to_string()], 0));
    }
}
