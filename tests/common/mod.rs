//! Common test infrastructure
//!
//! Fake HTTP services and fixture data for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeStreamingService, PLAYLIST_ID, TRACK_1_ID};
//!
//! #[tokio::test]
//! async fn test_listing() {
//!     let service = FakeStreamingService::spawn().await;
//!     service.set_playlist(PLAYLIST_ID, &[TRACK_1_ID]);
//! }
//! ```

mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{billboard_page, icy_stream};
pub use server::{FakeStreamingService, FakeWebServer};

use std::sync::Arc;
use std::time::Duration;
use streaming_playlist_maker::playlist::{
    PlaylistCache, PlaylistService, SpotifyClient, StaticTokenProvider,
};
use streaming_playlist_maker::rate_limit::RateLimitedClient;

/// Client for `service` with a short gate interval.
#[allow(dead_code)]
pub fn spotify_client(service: &FakeStreamingService, token: &str) -> SpotifyClient {
    SpotifyClient::new(
        Arc::new(RateLimitedClient::new(
            reqwest::Client::new(),
            Duration::from_millis(1),
        )),
        Arc::new(StaticTokenProvider::new(token)),
        service.api_url.clone(),
        TEST_MARKET,
    )
}

#[allow(dead_code)]
pub fn playlist_service(service: &FakeStreamingService) -> Arc<PlaylistService> {
    Arc::new(PlaylistService::new(
        Arc::new(spotify_client(service, TEST_TOKEN)),
        Arc::new(PlaylistCache::new()),
    ))
}
