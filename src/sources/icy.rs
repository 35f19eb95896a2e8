//! Titles announced in the in-band metadata of an audio stream.

use super::{Song, SongSource, SourceError, SourceJob};
use chrono::{DateTime, Local};
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace};

const STREAM_TITLE: &[u8] = b"StreamTitle='";

/// Titles this short are station jingles or ids.
const MIN_TITLE_LEN: usize = 6;

/// Extract the title from a `;`-terminated metadata segment such as
/// `StreamTitle='Artist - Title';`.
pub fn find_stream_title(segment: &[u8]) -> Option<String> {
    let start = segment
        .windows(STREAM_TITLE.len())
        .position(|w| w == STREAM_TITLE)?
        + STREAM_TITLE.len();
    // Drop the closing `';`.
    let end = segment.len().checked_sub(2)?;
    if start > end {
        return None;
    }
    Some(String::from_utf8_lossy(&segment[start..end]).into_owned())
}

pub struct IcySource {
    client: reqwest::Client,
    title_timeout: Duration,
    job_timeout: Duration,
}

impl IcySource {
    pub fn new(client: reqwest::Client, title_timeout: Duration, job_timeout: Duration) -> Self {
        Self {
            client,
            title_timeout,
            job_timeout,
        }
    }
}

impl SongSource for IcySource {
    fn start(&self, job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError> {
        reqwest::Url::parse(&job.source_url)
            .map_err(|e| SourceError::InvalidUrl(job.source_url.clone(), e.to_string()))?;

        let listener = StreamListener {
            client: self.client.clone(),
            job: job.clone(),
            title_timeout: self.title_timeout,
            job_timeout: self.job_timeout,
        };
        tokio::spawn(async move {
            let err = listener.listen(&songs).await;
            debug!("Stream {} stopped: {}", listener.job.source_url, err);
            let _ = songs.send(Song::Error(err)).await;
        });
        Ok(())
    }
}

struct StreamListener {
    client: reqwest::Client,
    job: SourceJob,
    title_timeout: Duration,
    job_timeout: Duration,
}

impl StreamListener {
    /// Read the stream until it fails or times out. Always ends with an error.
    async fn listen(&self, songs: &mpsc::Sender<Song>) -> SourceError {
        let url = &self.job.source_url;
        info!("Starting stream {}", url);

        let response = match self
            .client
            .get(url)
            .header("Icy-MetaData", "1")
            .send()
            .await
        {
            Ok(response) => response,
            Err(source) => {
                return SourceError::Request {
                    url: url.clone(),
                    source,
                }
            }
        };
        if !response.status().is_success() {
            return SourceError::Status(url.clone(), response.status());
        }

        self.read_titles(response.bytes_stream(), songs).await
    }

    /// Scan body chunks for metadata segments and send every new title.
    async fn read_titles<S, B>(&self, mut body: S, songs: &mpsc::Sender<Song>) -> SourceError
    where
        S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
        B: AsRef<[u8]>,
    {
        let started = Instant::now();
        let job_deadline = started + self.job_timeout;
        let mut last_title = String::new();
        let mut last_title_at = started;
        let mut last_title_wall = Local::now();
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            let title_deadline = last_title_at + self.title_timeout;
            let deadline = title_deadline.min(job_deadline);

            let chunk = match tokio::time::timeout_at(deadline, body.next()).await {
                Err(_) if deadline == job_deadline => {
                    return SourceError::JobTimeout(last_seen(&last_title_wall))
                }
                Err(_) => return SourceError::TitleTimeout(last_seen(&last_title_wall)),
                Ok(None) => return SourceError::StreamEnded(last_seen(&last_title_wall)),
                Ok(Some(Err(source))) => {
                    return SourceError::Request {
                        url: self.job.source_url.clone(),
                        source,
                    }
                }
                Ok(Some(Ok(chunk))) => chunk,
            };
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|&b| b == b';') {
                let segment: Vec<u8> = buffer.drain(..=pos).collect();
                let Some(title) = find_stream_title(&segment) else {
                    continue;
                };
                if title.is_empty() || title == last_title {
                    continue;
                }
                trace!("New title found: {:?}", title);
                last_title_at = Instant::now();
                last_title_wall = Local::now();
                last_title = title;

                if last_title.len() < MIN_TITLE_LEN {
                    continue;
                }
                let song = self.job.apply_substr_map(&last_title);
                debug!("Song found: {:?}", song);
                if songs.send(Song::Title(song)).await.is_err() {
                    return SourceError::StreamEnded(last_seen(&last_title_wall));
                }
            }

            // Deadlines also hold when every chunk is ready on first poll.
            let now = Instant::now();
            if now >= job_deadline {
                return SourceError::JobTimeout(last_seen(&last_title_wall));
            }
            if now >= last_title_at + self.title_timeout {
                return SourceError::TitleTimeout(last_seen(&last_title_wall));
            }
        }
    }
}

fn last_seen(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
