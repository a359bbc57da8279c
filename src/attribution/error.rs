use thiserror::Error;

/// Run-level failures of the attribution engine.
///
/// Per-path problems never show up here; they are reported as
/// [`SkippedPath`](super::SkippedPath) entries next to the ranking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed caller input, detected before any blame work starts.
    #[error("invalid --since value {value:?}: {reason}")]
    Configuration { value: String, reason: String },

    /// The blame source could not resolve the base revision or open the repository.
    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(String),

    /// Aggregation finished but no line survived the filters.
    #[error("no attributable lines found since {since} ({skipped} of {paths} paths skipped)")]
    NoAttributableData {
        since: String,
        paths: usize,
        skipped: usize,
    },
}

/// Per-path failure reported by a [`BlameSource`](super::BlameSource).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlameError {
    /// The path does not exist at the requested revision.
    #[error("{path} not found at {revision}")]
    NotFound { path: String, revision: String },

    /// Blame for this path failed; other paths are unaffected.
    #[error("blame {path}: {message}")]
    Failed { path: String, message: String },

    /// The repository itself is unusable. Aborts the whole run.
    #[error("{0}")]
    RepositoryUnavailable(String),
}

impl BlameError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, BlameError::RepositoryUnavailable(_))
    }
}
