use super::{Song, SongSource, SourceError, SourceJob};
use tokio::sync::mpsc;

/// Produces nothing. Useful to run only the cleaning pass for a playlist.
pub struct NullSource;

impl SongSource for NullSource {
    fn start(&self, _job: &SourceJob, songs: mpsc::Sender<Song>) -> Result<(), SourceError> {
        drop(songs);
        Ok(())
    }
}
