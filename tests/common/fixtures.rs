//! Test data builders for the fake services

use super::constants::*;
use serde_json::{json, Value};

/// Track JSON as returned by the streaming API.
pub fn remote_track(id: &str, artist: &str, name: &str, markets: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "duration_ms": 200_000,
        "popularity": 50,
        "artists": [{ "id": format!("{}-artist", id), "name": artist }],
        "available_markets": markets,
    })
}

/// Everything the fake service can find or add.
pub fn test_catalog() -> Vec<Value> {
    vec![
        remote_track(TRACK_1_ID, TRACK_1_ARTIST, TRACK_1_NAME, &[TEST_MARKET]),
        remote_track(TRACK_2_ID, TRACK_2_ARTIST, TRACK_2_NAME, &[TEST_MARKET, "DE"]),
        remote_track(TRACK_3_ID, TRACK_3_ARTIST, TRACK_3_NAME, &[TEST_MARKET]),
        remote_track(TRACK_3_UNAVAILABLE_ID, TRACK_3_ARTIST, TRACK_3_NAME, &["US"]),
    ]
}

/// One billboard chart row per `(artist, title)`.
pub fn billboard_page(songs: &[(&str, &str)]) -> String {
    let rows: Vec<String> = songs
        .iter()
        .map(|(artist, title)| {
            format!(
                "<div class=\"chart-list-item\" data-artist=\"{}\" data-title=\"{}\">",
                artist, title
            )
        })
        .collect();
    format!("<html>\n<body>\n{}\n</body>\n</html>\n", rows.join("\n"))
}

/// Raw stream bytes carrying one metadata block per title.
pub fn icy_stream(titles: &[&str]) -> Vec<u8> {
    let mut body = Vec::new();
    for title in titles {
        body.extend_from_slice(b"\x00\x01\x02audio");
        body.extend_from_slice(format!("StreamTitle='{}';", title).as_bytes());
    }
    body
}
