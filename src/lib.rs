//! Streaming Playlist Maker
//!
//! Collects song titles from radio streams, chart pages and playlists, and
//! files them into streaming-service playlists.

pub mod app;
pub mod config;
pub mod jobs;
pub mod matcher;
pub mod notifications;
pub mod playlist;
pub mod rate_limit;
pub mod savers;
pub mod sources;
pub mod stats;

pub use app::App;
pub use config::{AppConfig, CliConfig, FileConfig};
pub use stats::Statistics;
