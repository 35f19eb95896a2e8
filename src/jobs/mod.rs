//! Job definitions and the orchestrator that wires sources to savers.
//!
//! Every active job gets one producer (its [`SongSource`]) and one drain task
//! that hands each title to the job's [`SongSaver`]. Savers are cleaned once
//! per distinct target before any title flows.

mod drain;

pub use drain::drain;

use crate::savers::{self, SaverContext, SaverJob, SongSaver};
use crate::sources::{self, SongSource, SourceContext, SourceJob};
use crate::stats::Statistics;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// One ingestion job as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub source: SourceJob,
    #[serde(flatten)]
    pub saver: SaverJob,
}

/// Saver type plus playlist: what a clean pass runs against.
type Target = (String, String);

fn target(job: &Job) -> Target {
    (job.saver.saver_type.clone(), job.saver.playlist.clone())
}

pub struct Orchestrator {
    source_ctx: SourceContext,
    saver_ctx: SaverContext,
    stats: Arc<Statistics>,
    channel_capacity: usize,
}

impl Orchestrator {
    pub fn new(
        source_ctx: SourceContext,
        saver_ctx: SaverContext,
        stats: Arc<Statistics>,
        channel_capacity: usize,
    ) -> Self {
        Self {
            source_ctx,
            saver_ctx,
            stats,
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn stats(&self) -> &Arc<Statistics> {
        &self.stats
    }

    /// Run every active job to completion.
    ///
    /// Jobs whose source or saver cannot be built, whose target failed to
    /// clean, or whose name is already taken are skipped. Other jobs are
    /// unaffected. Returns one line per skipped job.
    pub async fn run(&self, jobs: &[Job]) -> Vec<String> {
        let active: Vec<&Job> = jobs.iter().filter(|j| j.active).collect();
        info!("Starting {} of {} jobs", active.len(), jobs.len());

        let sources = self.build_sources(&active);
        let savers = self.build_savers(&active);
        let mut skipped = Vec::new();

        let mut runnable = Vec::new();
        for job in active {
            if !sources.contains_key(&job.source.source_type) {
                skipped.push(format!(
                    "{}: source {:?} unavailable.",
                    job.name, job.source.source_type
                ));
            } else if !savers.contains_key(&job.saver.saver_type) {
                skipped.push(format!(
                    "{}: saver {:?} unavailable.",
                    job.name, job.saver.saver_type
                ));
            } else {
                runnable.push(job);
            }
        }

        let failed = self.clean_targets(&runnable, &savers).await;

        let mut handles: Vec<JoinHandle<()>> = Vec::new();
        for job in runnable {
            if failed.contains(&target(job)) {
                error!(
                    "[{:>15.15}] skipped, cleaning {:?} failed",
                    job.name, job.saver.playlist
                );
                skipped.push(format!(
                    "{}: cleaning {:?} failed.",
                    job.name, job.saver.playlist
                ));
                continue;
            }
            let (Some(source), Some(saver)) = (
                sources.get(&job.source.source_type),
                savers.get(&job.saver.saver_type),
            ) else {
                continue;
            };
            match self.start_job(job, source.clone(), saver.clone()) {
                Ok(Some(handle)) => handles.push(handle),
                Ok(None) => {}
                Err(problem) => skipped.push(problem),
            }
        }

        for result in join_all(handles).await {
            if let Err(err) = result {
                error!("Job task failed: {}", err);
            }
        }
        skipped
    }

    fn build_sources(&self, jobs: &[&Job]) -> HashMap<String, Arc<dyn SongSource>> {
        let types: BTreeSet<&str> = jobs.iter().map(|j| j.source.source_type.as_str()).collect();
        types
            .into_iter()
            .filter_map(|t| match sources::create(t, &self.source_ctx) {
                Ok(source) => Some((t.to_string(), source)),
                Err(err) => {
                    error!("Cannot create source {:?}: {}", t, err);
                    None
                }
            })
            .collect()
    }

    fn build_savers(&self, jobs: &[&Job]) -> HashMap<String, Arc<dyn SongSaver>> {
        let types: BTreeSet<&str> = jobs.iter().map(|j| j.saver.saver_type.as_str()).collect();
        types
            .into_iter()
            .filter_map(|t| match savers::create(t, &self.saver_ctx) {
                Ok(saver) => Some((t.to_string(), saver)),
                Err(err) => {
                    error!("Cannot create saver {:?}: {}", t, err);
                    None
                }
            })
            .collect()
    }

    /// Clean every distinct target concurrently. Returns the targets that failed.
    async fn clean_targets(
        &self,
        jobs: &[&Job],
        savers: &HashMap<String, Arc<dyn SongSaver>>,
    ) -> HashSet<Target> {
        let targets: BTreeSet<Target> = jobs.iter().map(|j| target(j)).collect();

        let cleans = targets.into_iter().filter_map(|(saver_type, playlist)| {
            let saver = savers.get(&saver_type)?.clone();
            Some(async move {
                let job = SaverJob {
                    playlist: playlist.clone(),
                    saver_type: saver_type.clone(),
                };
                let result = saver.clean(&job).await;
                ((saver_type, playlist), result)
            })
        });

        let mut failed = HashSet::new();
        for ((saver_type, playlist), result) in join_all(cleans).await {
            match result {
                Ok(status) => info!("Cleaned {} {:?}:\n{}", saver_type, playlist, status),
                Err(err) => {
                    error!("Cleaning {} {:?} failed: {}", saver_type, playlist, err);
                    failed.insert((saver_type, playlist));
                }
            }
        }
        failed
    }

    /// Spawn the job's drain task. `Ok(None)` when the source failed to
    /// start; that failure is counted in the job's statistics.
    fn start_job(
        &self,
        job: &Job,
        source: Arc<dyn SongSource>,
        saver: Arc<dyn SongSaver>,
    ) -> Result<Option<JoinHandle<()>>, String> {
        if let Err(err) = self.stats.init(&job.name) {
            error!("Job skipped: {}", err);
            return Err(format!("{}: duplicate job name.", job.name));
        }

        info!(
            "[{:>15.15}] Starting: {} -> {}",
            job.name, job.source.source_type, job.saver.saver_type
        );
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        if let Err(err) = source.start(&job.source, tx) {
            error!("[{:>15.15}] Could not start job: {}", job.name, err);
            self.stats.error(&job.name);
            return Ok(None);
        }

        let job = job.clone();
        let stats = self.stats.clone();
        Ok(Some(tokio::spawn(async move {
            if let Err(err) = drain(&job, saver.as_ref(), &stats, rx).await {
                warn!("[{:>15.15}] stopped: {}", job.name, err);
            }
        })))
    }
}
