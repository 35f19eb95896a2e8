//! Per-job ingestion counters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

/// Share of errors, relative to matched songs, above which a job is flagged.
const MAX_ERROR_PERCENT: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0} already initialized")]
pub struct AlreadyInitialized(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounters {
    pub added: u64,
    pub not_found: u64,
    pub not_found_cached: u64,
    pub exists: u64,
    pub exists_cached: u64,
    pub errors: u64,
}

impl JobCounters {
    fn matched(&self) -> u64 {
        self.added + self.exists + self.exists_cached
    }
}

/// Thread-safe counters keyed by job name.
#[derive(Default)]
pub struct Statistics {
    jobs: Mutex<BTreeMap<String, JobCounters>>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `job`. Fails when the name is already tracked.
    pub fn init(&self, job: &str) -> Result<(), AlreadyInitialized> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(job) {
            return Err(AlreadyInitialized(job.to_string()));
        }
        jobs.insert(job.to_string(), JobCounters::default());
        Ok(())
    }

    fn update(&self, job: &str, f: impl FnOnce(&mut JobCounters)) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        match jobs.get_mut(job) {
            Some(counters) => f(counters),
            None => warn!("Statistics for {} were not initialized", job),
        }
    }

    pub fn added(&self, job: &str) {
        self.update(job, |c| c.added += 1);
    }

    pub fn not_found(&self, job: &str, cached: bool) {
        self.update(job, |c| {
            if cached {
                c.not_found_cached += 1
            } else {
                c.not_found += 1
            }
        });
    }

    pub fn exists(&self, job: &str, cached: bool) {
        self.update(job, |c| {
            if cached {
                c.exists_cached += 1
            } else {
                c.exists += 1
            }
        });
    }

    pub fn error(&self, job: &str) {
        self.update(job, |c| c.errors += 1);
    }

    pub fn get(&self, job: &str) -> Option<JobCounters> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job)
            .copied()
    }

    pub fn snapshot(&self) -> BTreeMap<String, JobCounters> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Jobs that look broken: nothing matched, or too many errors.
    pub fn find_issues(&self) -> Vec<String> {
        let jobs = self.snapshot();
        if jobs.is_empty() {
            return vec!["Zero sources were tracked.".to_string()];
        }

        jobs.iter()
            .filter_map(|(name, c)| {
                let matched = c.matched();
                if matched == 0 {
                    Some(format!("{}: no songs were added or existed before.", name))
                } else if c.errors * 100 / matched > MAX_ERROR_PERCENT {
                    Some(format!("{}: more than {}% of errors.", name, MAX_ERROR_PERCENT))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl fmt::Display for Statistics {
    /// One line per job: added, not found (with the cached share), exists
    /// (with the cached share), errors and total.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, c) in self.snapshot() {
            let not_found = c.not_found + c.not_found_cached;
            let exists = c.exists + c.exists_cached;
            let total = c.added + not_found + exists + c.errors;
            writeln!(
                f,
                "[{:>15.15}] A {:4}, N {:5} (NC {:3}%), E {:5} (EC {:3}%), Error {:3}, total: {:5}.",
                name,
                c.added,
                not_found,
                c.not_found_cached * 100 / not_found.max(1),
                exists,
                c.exists_cached * 100 / exists.max(1),
                c.errors,
                total
            )?;
        }
        Ok(())
    }
}
