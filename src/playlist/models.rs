//! Track models shared by the cache, the matcher and the remote API client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable identity of a remote song.
///
/// `artist` holds all credited artists joined with `", "`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    id: String,
    title: String,
    artist: String,
}

impl Track {
    pub fn new(id: impl Into<String>, artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }
}

impl fmt::Display for Track {
    /// Renders as `"Artist - Title"`, or nothing when both parts are empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.artist.is_empty() && self.title.is_empty() {
            return Ok(());
        }
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Artist credit as returned by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtist {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Full track record as returned by playlist listings and searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrack {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub popularity: i32,
    #[serde(default)]
    pub artists: Vec<RemoteArtist>,
    #[serde(default)]
    pub available_markets: Vec<String>,
}

impl RemoteTrack {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether the track can be played in `market`. Listings that carry no
    /// market information are treated as available everywhere.
    pub fn is_available_in(&self, market: &str) -> bool {
        self.available_markets.is_empty()
            || self
                .available_markets
                .iter()
                .any(|m| m.eq_ignore_ascii_case(market))
    }

    pub fn to_track(&self) -> Track {
        Track::new(self.id.clone(), self.artist_names(), self.name.clone())
    }
}

impl From<&RemoteTrack> for Track {
    fn from(remote: &RemoteTrack) -> Self {
        remote.to_track()
    }
}
