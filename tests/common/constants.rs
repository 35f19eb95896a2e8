//! Shared constants for end-to-end tests
//!
//! Test data used by the fake services lives here. When fixture tracks
//! change, update only this file and `fixtures.rs`.

/// Token the fake streaming service accepts.
pub const TEST_TOKEN: &str = "test-token";

/// Market the fake catalog is published in.
pub const TEST_MARKET: &str = "PL";

/// Playlist the ingestion tests write to.
pub const PLAYLIST_ID: &str = "playlist-1";

/// Second playlist, used as a merge source.
pub const OTHER_PLAYLIST_ID: &str = "playlist-2";

// ============================================================================
// Catalog tracks
// ============================================================================

pub const TRACK_1_ID: &str = "track-1";
pub const TRACK_1_ARTIST: &str = "Taylor Swift";
pub const TRACK_1_NAME: &str = "Blank Space";

pub const TRACK_2_ID: &str = "track-2";
pub const TRACK_2_ARTIST: &str = "Dua Lipa";
pub const TRACK_2_NAME: &str = "Levitating";

pub const TRACK_3_ID: &str = "track-3";
pub const TRACK_3_ARTIST: &str = "Daft Punk";
pub const TRACK_3_NAME: &str = "Get Lucky";

/// Same song as track 3, not playable in [`TEST_MARKET`].
pub const TRACK_3_UNAVAILABLE_ID: &str = "track-3-unavailable";

/// Page size of playlist listings, small enough to force pagination.
pub const PAGE_SIZE: usize = 2;

/// Maximum time to wait for a fake server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
