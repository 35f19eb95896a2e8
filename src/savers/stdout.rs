use super::{CleanStatus, SaveReport, SaverError, SaverJob, SongSaver, Status};
use async_trait::async_trait;
use tracing::info;

/// Logs titles instead of saving them. Every song counts as added.
pub struct StdoutSaver;

#[async_trait]
impl SongSaver for StdoutSaver {
    async fn clean(&self, _job: &SaverJob) -> Result<CleanStatus, SaverError> {
        Ok(CleanStatus::default())
    }

    async fn save(&self, job: &SaverJob, artist_title: &str) -> Result<SaveReport, SaverError> {
        if artist_title.is_empty() {
            return Err(SaverError::EmptyTitle);
        }
        info!("{} <- {:?}", job.playlist, artist_title);
        Ok(SaveReport {
            status: Status {
                song_added: true,
                song_exists: false,
                found_title: "NOTHING WAS SAVED".to_string(),
                match_quality: 0,
            },
            cached: false,
        })
    }
}
