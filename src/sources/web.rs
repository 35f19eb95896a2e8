//! Songs scraped from web pages, once or walking back through history.

use super::{emit_all, Song, SongSource, SourceError, SourceJob};
use crate::rate_limit::RateLimitedClient;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Page-specific extraction rules.
pub trait PageParser: Send + Sync {
    /// Separator between the records passed to [`PageParser::find_songs`].
    fn delimiter(&self) -> &str {
        "\n"
    }

    /// Maximum number of songs taken from one page.
    fn song_limit(&self) -> Option<usize> {
        None
    }

    /// Wait before requesting a single page. History walks start at once.
    fn initial_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// Songs found in a single record.
    fn find_songs(&self, record: &str) -> Vec<String>;

    /// Url of the page published at `date`, and the date of the page before it.
    fn history_url(&self, base: &str, date: NaiveDate) -> (String, NaiveDate);
}

/// Where a web job reads from, parsed from its `SourceUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebTarget {
    Page(String),
    History {
        base: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl WebTarget {
    /// Either a plain url or `base|YYYY-MM-DD|YYYY-MM-DD`.
    pub fn parse(source_url: &str) -> Result<Self, SourceError> {
        let parts: Vec<&str> = source_url.split('|').collect();
        match parts.as_slice() {
            [url] => Ok(Self::Page(url.to_string())),
            [base, start, end] => Ok(Self::History {
                base: base.to_string(),
                start: parse_date(start)?,
                end: parse_date(end)?,
            }),
            _ => Err(SourceError::InvalidUrl(
                source_url.to_string(),
                format!("expected 1 or 3 '|' separated parts, got {}", parts.len()),
            )),
        }
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, SourceError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| SourceError::InvalidDate(text.to_string(), e))
}

pub struct WebSource {
    client: Arc<RateLimitedClient>,
    parser: Arc<dyn PageParser>,
}

impl WebSource {
    pub fn new(client: Arc<RateLimitedClient>, parser: Arc<dyn PageParser>) -> Self {
        Self { client, parser }
    }
}

impl SongSource for WebSource {
    fn start(&self, job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError> {
        let target = WebTarget::parse(&job.source_url)?;
        let scraper = Scraper {
            client: self.client.clone(),
            parser: self.parser.clone(),
        };
        tokio::spawn(async move {
            match target {
                WebTarget::Page(url) => {
                    let delay = scraper.parser.initial_delay();
                    if !delay.is_zero() {
                        debug!("Waiting {:?} before the first request", delay);
                        tokio::time::sleep(delay).await;
                    }
                    scraper.scrape_page(&url, &songs).await
                }
                WebTarget::History { base, start, end } => {
                    scraper.walk_history(&base, start, end, &songs).await
                }
            }
        });
        Ok(())
    }
}

struct Scraper {
    client: Arc<RateLimitedClient>,
    parser: Arc<dyn PageParser>,
}

impl Scraper {
    async fn scrape_page(&self, url: &str, songs: &mpsc::Sender<Song>) {
        info!("Starting web source with url: {}", url);
        match self.find_songs_in_page(url).await {
            Ok(found) => {
                emit_all(songs, found).await;
            }
            Err(e) => {
                let _ = songs.send(Song::Error(e)).await;
            }
        }
    }

    async fn walk_history(
        &self,
        base: &str,
        start: NaiveDate,
        end: NaiveDate,
        songs: &mpsc::Sender<Song>,
    ) {
        info!("Starting history walk {} - {} with url: {}", start, end, base);

        let mut current = end;
        while current >= start {
            let (url, next) = self.parser.history_url(base, current);
            match self.find_songs_in_page(&url).await {
                Ok(found) => {
                    debug!("{} returned {} songs", url, found.len());
                    if !emit_all(songs, found).await {
                        return;
                    }
                }
                Err(e) => {
                    if songs.send(Song::Error(e)).await.is_err() {
                        return;
                    }
                }
            }

            if next >= current {
                let _ = songs
                    .send(Song::Error(SourceError::StepNotBefore { next, current }))
                    .await;
                return;
            }
            current = next;
        }
    }

    async fn find_songs_in_page(&self, url: &str) -> Result<Vec<String>, SourceError> {
        let request_error = |source| SourceError::Request {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .send(self.client.get(url))
            .await
            .map_err(request_error)?;
        if !response.status().is_success() {
            return Err(SourceError::Status(url.to_string(), response.status()));
        }
        let body = response.text().await.map_err(request_error)?;

        let mut result = extract_songs(self.parser.as_ref(), &body);
        if result.is_empty() {
            return Err(SourceError::NoResults(url.to_string()));
        }
        if let Some(limit) = self.parser.song_limit() {
            result.truncate(limit);
        }
        debug!("{} returned {} results", url, result.len());
        Ok(result)
    }
}

/// Run the parser over every record of `body`.
pub fn extract_songs(parser: &dyn PageParser, body: &str) -> Vec<String> {
    body.split(parser.delimiter())
        .flat_map(|record| parser.find_songs(record))
        .collect()
}
