use super::super::web::PageParser;
use super::between;
use chrono::{Datelike, Months, NaiveDate};
use rand::Rng;
use std::time::Duration;
use tracing::trace;

const SEARCH_LINK: &str = "https://open.spotify.com/search/";
/// Newer pages link to the results view.
const RESULTS_PREFIX: &str = "results/";

/// Radio play history listing a search link for every song played.
pub struct Odsluchane {
    initial_delay: Duration,
}

impl Odsluchane {
    /// A single page scrape waits between 30 and 60 seconds before its
    /// request, spreading the load when several jobs read from the same site.
    pub fn new() -> Self {
        Self::with_initial_delay(Duration::from_secs(30))
    }

    pub fn with_initial_delay(initial_delay: Duration) -> Self {
        Self { initial_delay }
    }
}

impl Default for Odsluchane {
    fn default() -> Self {
        Self::new()
    }
}

impl PageParser for Odsluchane {
    fn initial_delay(&self) -> Duration {
        let base = self.initial_delay.as_millis() as u64;
        if base == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(base + rand::rng().random_range(0..base))
    }

    fn find_songs(&self, record: &str) -> Vec<String> {
        let Some(query) = between(record, SEARCH_LINK, "\"") else {
            return Vec::new();
        };
        let query = query.strip_prefix(RESULTS_PREFIX).unwrap_or(query);
        match urlencoding::decode(&query.replace('+', " ")) {
            Ok(song) => {
                trace!("Found song {}", song);
                vec![song.into_owned()]
            }
            Err(_) => Vec::new(),
        }
    }

    fn history_url(&self, base: &str, date: NaiveDate) -> (String, NaiveDate) {
        let url = format!("{}&m={}&y={}", base, date.month(), date.year());
        let previous = date
            .checked_sub_months(Months::new(1))
            .unwrap_or(NaiveDate::MIN);
        (url, previous)
    }
}
