use super::Job;
use crate::savers::{SaveReport, SaverError, SongSaver};
use crate::sources::Song;
use crate::stats::Statistics;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Consume `songs` until the source closes the channel.
///
/// Source errors are counted and skipped. A saver error ends the job, except
/// for a rejected empty title. Dropping the receiver on return stops the source.
pub async fn drain(
    job: &Job,
    saver: &dyn SongSaver,
    stats: &Statistics,
    mut songs: mpsc::Receiver<Song>,
) -> Result<(), SaverError> {
    while let Some(song) = songs.recv().await {
        let title = match song {
            Song::Title(title) => title,
            Song::Error(err) => {
                warn!("[{:>15.15}] source: {}", job.name, err);
                stats.error(&job.name);
                continue;
            }
        };

        match saver.save(&job.saver, &title).await {
            Ok(report) => record(job, stats, &title, &report),
            Err(SaverError::EmptyTitle) => {
                warn!("[{:>15.15}] empty title rejected", job.name);
                stats.error(&job.name);
            }
            Err(err) => {
                stats.error(&job.name);
                return Err(err);
            }
        }
    }
    info!("[{:>15.15}] finished", job.name);
    Ok(())
}

fn record(job: &Job, stats: &Statistics, title: &str, report: &SaveReport) {
    let status = &report.status;
    let (mark, outcome) = if status.song_added {
        stats.added(&job.name);
        ("A", "added")
    } else if status.song_exists {
        stats.exists(&job.name, report.cached);
        ("E", "exists")
    } else {
        stats.not_found(&job.name, report.cached);
        ("N", "not added")
    };
    info!(
        "[{:>15.15}] {} {:3} {:?} -> {:?} {}{}",
        job.name,
        mark,
        status.match_quality,
        title,
        status.found_title,
        outcome,
        if report.cached { " (cached)" } else { "" }
    );
}
