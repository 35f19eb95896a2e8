//! Remote playlist access: track models, the streaming API client and the
//! in-memory playlist cache.

pub mod api;
pub mod cache;
pub mod models;
pub mod service;
pub mod spotify_client;

pub use api::{PlaylistApi, StaticTokenProvider, TokenProvider};
pub use cache::{CacheError, PlaylistCache};
pub use models::{RemoteArtist, RemoteTrack, Track};
pub use service::PlaylistService;
pub use spotify_client::SpotifyClient;
