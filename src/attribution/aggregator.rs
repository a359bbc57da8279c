use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam::channel;
use tracing::{debug, warn};

use super::error::{BlameError, EngineError};
use super::identity::ContributorKey;
use super::since::format_date;
use super::{AttributionRecord, BlameSource, SkippedPath};
use crate::mailmap::AliasTable;

/// Lines credited to one canonical email.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bucket {
    name: String,
    email: String,
    lines: usize,
}

impl Bucket {
    /// Keep the smallest non-empty spelling seen so the result does not
    /// depend on the order records arrive in.
    fn absorb(&mut self, name: &str, email: &str) {
        let name = name.trim();
        if !name.is_empty() && (self.name.is_empty() || name < self.name.as_str()) {
            self.name = name.to_string();
        }
        if email < self.email.as_str() {
            self.email = email.to_string();
        }
    }
}

/// Per-contributor line counts and their grand total.
///
/// Contributors are bucketed by canonical email, compared case-insensitively,
/// so aliases of one address merge even when their commit names differ.
/// `total` always equals the sum of the buckets. Buckets iterate in
/// ascending email order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContributionTotals {
    buckets: BTreeMap<String, Bucket>,
    total: usize,
}

impl ContributionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `lines` to the canonical identity `name <email>`.
    pub fn add(&mut self, name: &str, email: &str, lines: usize) {
        let email = email.trim();
        let bucket = self
            .buckets
            .entry(email.to_lowercase())
            .or_insert_with(|| Bucket {
                name: String::new(),
                email: email.to_string(),
                lines: 0,
            });
        bucket.absorb(name, email);
        bucket.lines += lines;
        self.total += lines;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContributorKey, usize)> {
        self.buckets
            .values()
            .map(|b| (ContributorKey::new(&b.name, &b.email), b.lines))
    }
}

#[cfg(test)]
impl ContributionTotals {
    pub fn get(&self, key: &ContributorKey) -> usize {
        self.iter()
            .find(|(k, _)| k == key)
            .map(|(_, lines)| lines)
            .unwrap_or(0)
    }
}

/// Totals plus the paths that were skipped while gathering them.
#[derive(Debug)]
pub struct Aggregation {
    pub totals: ContributionTotals,
    pub skipped: Vec<SkippedPath>,
}

enum Message<'p> {
    Record(AttributionRecord),
    Done {
        path: &'p str,
        outcome: Result<(), BlameError>,
    },
}

fn worker_count(jobs: usize, paths: usize) -> usize {
    let jobs = if jobs == 0 {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    } else {
        jobs
    };
    jobs.min(paths).max(1)
}

/// Blame every path at `base` and fold the records committed at or after
/// `since` into per-contributor totals.
///
/// Workers pull paths from a shared queue and stream records back over a
/// channel; the calling thread is the only one that touches the totals.
/// A fatal blame error stops workers from taking new paths and fails the
/// run; any other per-path error skips that path.
pub fn aggregate<B>(
    paths: &[String],
    since: i64,
    base: &str,
    source: &B,
    aliases: &AliasTable,
    jobs: usize,
) -> Result<Aggregation, EngineError>
where
    B: BlameSource + ?Sized,
{
    let mut aggregation = Aggregation {
        totals: ContributionTotals::new(),
        skipped: Vec::new(),
    };
    let mut fatal: Option<BlameError> = None;

    if !paths.is_empty() {
        let workers = worker_count(jobs, paths.len());
        debug!(workers, paths = paths.len(), "starting blame workers");

        let (job_tx, job_rx) = channel::unbounded::<&str>();
        for path in paths {
            // The receiver is alive for the whole scope.
            let _ = job_tx.send(path.as_str());
        }
        drop(job_tx);

        let (tx, rx) = channel::unbounded::<Message<'_>>();
        let stop = AtomicBool::new(false);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let tx = tx.clone();
                let stop = &stop;
                scope.spawn(move || {
                    for path in job_rx.iter() {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let outcome = source.blame(path, base).map(|records| {
                            for record in records {
                                if tx.send(Message::Record(record)).is_err() {
                                    return;
                                }
                            }
                        });
                        if let Err(err) = &outcome
                            && err.is_fatal()
                        {
                            stop.store(true, Ordering::Relaxed);
                        }
                        if tx.send(Message::Done { path, outcome }).is_err() {
                            return;
                        }
                    }
                });
            }
            drop(tx);

            for message in rx.iter() {
                match message {
                    Message::Record(record) => {
                        if fatal.is_none() {
                            fold(&mut aggregation.totals, record, since, aliases);
                        }
                    }
                    Message::Done {
                        path,
                        outcome: Ok(()),
                    } => debug!(path, "blamed"),
                    Message::Done {
                        outcome: Err(err), ..
                    } if err.is_fatal() => {
                        fatal.get_or_insert(err);
                    }
                    Message::Done {
                        path,
                        outcome: Err(err),
                    } => {
                        warn!(path, %err, "skipping path");
                        aggregation.skipped.push(SkippedPath {
                            path: path.to_string(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        });
    }

    if let Some(err) = fatal {
        return Err(EngineError::RepositoryUnavailable(err.to_string()));
    }

    if aggregation.totals.total() == 0 {
        return Err(EngineError::NoAttributableData {
            since: format_date(since),
            paths: paths.len(),
            skipped: aggregation.skipped.len(),
        });
    }

    aggregation.skipped.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(aggregation)
}

fn fold(totals: &mut ContributionTotals, record: AttributionRecord, since: i64, aliases: &AliasTable) {
    if record.commit_time < since || record.lines == 0 {
        return;
    }
    let (name, email) = aliases.canonicalize(&record.name, &record.email);
    totals.add(name, email, record.lines);
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
