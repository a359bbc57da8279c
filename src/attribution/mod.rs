//! Contribution attribution: who owns the lines a branch touches.
//!
//! Blame records for every changed path are gathered in parallel, folded
//! into per-contributor line counts through a single consumer, normalized
//! into ownership fractions and reduced to the top N contributors with a
//! bounded heap.

pub mod aggregator;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod since;
pub mod topn;

#[cfg(test)]
pub(crate) mod testing;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::mailmap::AliasTable;
use aggregator::aggregate;
pub use error::{BlameError, EngineError};
pub use identity::ContributorKey;
use normalize::normalize;
pub use normalize::Stat;
use since::resolve_since;
use topn::select_top_n;

/// One blame hunk (or line) attributed to a contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionRecord {
    pub name: String,
    pub email: String,
    pub lines: usize,
    /// Unix seconds of the commit that last touched these lines.
    pub commit_time: i64,
}

impl AttributionRecord {
    pub fn new(name: &str, email: &str, lines: usize, commit_time: i64) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            lines,
            commit_time,
        }
    }
}

/// Supplier of blame evidence for one path as of a revision.
///
/// Called concurrently from several worker threads.
pub trait BlameSource: Sync {
    fn blame(&self, path: &str, revision: &str) -> Result<Vec<AttributionRecord>, BlameError>;
}

/// A path whose evidence could not be gathered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPath {
    pub path: String,
    pub reason: String,
}

/// Inputs for one engine run.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub paths: &'a [String],
    /// `YYYY-MM-DD`; `None` means six months before the run starts.
    pub since: Option<&'a str>,
    /// Revision blamed for every path.
    pub base: &'a str,
    pub top: usize,
    /// Worker threads; 0 picks the available parallelism.
    pub jobs: usize,
}

/// Ranked reviewers plus diagnostics of the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub stats: Vec<Stat>,
    pub total_lines: usize,
    pub since: i64,
    pub skipped: Vec<SkippedPath>,
}

/// Rank contributors by the share of lines they own across `request.paths`.
pub fn run<B>(
    request: &Request<'_>,
    source: &B,
    aliases: &AliasTable,
) -> Result<Ranking, EngineError>
where
    B: BlameSource + ?Sized,
{
    run_at(request, source, aliases, Utc::now())
}

/// Same as [`run`], with the clock used for the default window supplied.
pub fn run_at<B>(
    request: &Request<'_>,
    source: &B,
    aliases: &AliasTable,
    now: DateTime<Utc>,
) -> Result<Ranking, EngineError>
where
    B: BlameSource + ?Sized,
{
    let since = resolve_since(request.since, now)?;
    debug!(
        paths = request.paths.len(),
        since = %since::format_date(since),
        base = request.base,
        "attributing"
    );

    let aggregation = aggregate(request.paths, since, request.base, source, aliases, request.jobs)?;
    debug!(
        contributors = aggregation.totals.len(),
        lines = aggregation.totals.total(),
        skipped = aggregation.skipped.len(),
        "aggregated"
    );
    let stats = select_top_n(request.top, normalize(&aggregation.totals));

    Ok(Ranking {
        stats,
        total_lines: aggregation.totals.total(),
        since,
        skipped: aggregation.skipped,
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
