//! HTTP client for the Spotify Web API.

use super::api::{PlaylistApi, TokenProvider};
use super::models::RemoteTrack;
use crate::rate_limit::RateLimitedClient;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, trace};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Tokens dropped from search queries, they only confuse the remote search.
const QUERY_NOISE: [&str; 5] = ["&", "feat.", "feat", "vs.", "vs"];

#[derive(Debug, Deserialize)]
struct PagedItems {
    #[serde(default)]
    items: Vec<PagedItem>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagedItem {
    #[serde(default)]
    track: Option<RemoteTrack>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: SearchTracks,
}

#[derive(Debug, Deserialize)]
struct SearchTracks {
    #[serde(default)]
    items: Vec<RemoteTrack>,
}

/// Spotify implementation of [`PlaylistApi`].
pub struct SpotifyClient {
    client: Arc<RateLimitedClient>,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    market: String,
}

impl SpotifyClient {
    pub fn new(
        client: Arc<RateLimitedClient>,
        tokens: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
        market: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            market: market.into(),
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(self.tokens.access_token()?))
    }

    /// Follow `next` links until the last page.
    async fn list_paged(&self, first_url: String) -> Result<Vec<RemoteTrack>> {
        let mut result = Vec::new();
        let mut next_url = Some(first_url);

        while let Some(url) = next_url.take() {
            trace!("Listing page {}", url);
            let request = self.authorized(self.client.get(&url))?;
            let response = self
                .client
                .send(request)
                .await
                .with_context(|| format!("Failed to fetch {}", url))?;
            if response.status() != StatusCode::OK {
                return Err(anyhow!(
                    "Listing request failed with status: {}",
                    response.status()
                ));
            }
            let page: PagedItems = response
                .json()
                .await
                .context("Failed to parse listing response")?;
            result.extend(page.items.into_iter().filter_map(|item| item.track));
            next_url = page.next.filter(|n| !n.is_empty());
        }

        Ok(result)
    }

    fn tracks_url(&self, playlist_id: &str, track_id: &str) -> String {
        format!(
            "{}/playlists/{}/tracks?uris=spotify:track:{}",
            self.base_url, playlist_id, track_id
        )
    }
}

/// Strip the words that make the remote search stricter than needed.
pub fn update_query_string(query: &str) -> String {
    QUERY_NOISE
        .iter()
        .fold(query.to_string(), |q, token| q.replace(token, ""))
}

#[async_trait]
impl PlaylistApi for SpotifyClient {
    async fn list_playlist(&self, playlist_id: &str) -> Result<Vec<RemoteTrack>> {
        let tracks = self
            .list_paged(format!("{}/playlists/{}/tracks", self.base_url, playlist_id))
            .await?;
        debug!("Listed {} tracks of playlist {}", tracks.len(), playlist_id);
        Ok(tracks)
    }

    async fn list_liked(&self) -> Result<Vec<RemoteTrack>> {
        let tracks = self
            .list_paged(format!("{}/me/tracks?limit=50", self.base_url))
            .await?;
        debug!("Listed {} liked tracks", tracks.len());
        Ok(tracks)
    }

    async fn add_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        let url = self.tracks_url(playlist_id, track_id);
        debug!("Add to playlist url: {}", url);
        let request = self.authorized(self.client.post(&url))?;
        let response = self.client.send(request).await?;
        if response.status() != StatusCode::CREATED {
            return Err(anyhow!(
                "Add to playlist failed with status: {}",
                response.status()
            ));
        }
        Ok(())
    }

    async fn remove_from_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        let url = self.tracks_url(playlist_id, track_id);
        debug!("Remove from playlist url: {}", url);
        let body = serde_json::json!({
            "tracks": [{ "uri": format!("spotify:track:{}", track_id) }]
        });
        let request = self.authorized(self.client.delete(&url).json(&body))?;
        let response = self.client.send(request).await?;
        if response.status() != StatusCode::OK {
            return Err(anyhow!(
                "Remove from playlist failed with status: {}",
                response.status()
            ));
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<RemoteTrack>> {
        let url = format!(
            "{}/search?type=track&market={}&limit=50&q={}",
            self.base_url,
            self.market,
            urlencoding::encode(&update_query_string(query))
        );
        debug!("Find tracks url: {}", url);
        let request = self.authorized(self.client.get(&url))?;
        let response = self.client.send(request).await?;
        if response.status() != StatusCode::OK {
            return Err(anyhow!(
                "Search request failed with status: {}",
                response.status()
            ));
        }
        let found: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;
        debug!("Found {} tracks for query {:?}", found.tracks.items.len(), query);
        Ok(found.tracks.items)
    }
}
