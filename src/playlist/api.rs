//! Operations exposed by the remote streaming service.

use super::models::RemoteTrack;
use anyhow::Result;
use async_trait::async_trait;

/// The subset of the streaming-service API used by sources and savers.
///
/// Implementations are expected to go through a rate-limited client.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    /// All tracks of a playlist, following pagination.
    async fn list_playlist(&self, playlist_id: &str) -> Result<Vec<RemoteTrack>>;

    /// All tracks liked by the authenticated user.
    async fn list_liked(&self) -> Result<Vec<RemoteTrack>>;

    async fn add_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()>;

    async fn remove_from_playlist(&self, playlist_id: &str, track_id: &str) -> Result<()>;

    /// Free-text track search in the configured market.
    async fn search(&self, query: &str) -> Result<Vec<RemoteTrack>>;
}

/// Supplies bearer tokens for the remote API.
///
/// Token acquisition and refresh live outside this crate; implementations
/// only hand out the current value.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<String>;
}

/// A token fixed at startup.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            anyhow::bail!("Access token is empty");
        }
        Ok(self.token.clone())
    }
}
