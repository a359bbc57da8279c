use std::collections::HashSet;
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use git2::{BlameOptions, Commit, DiffFindOptions, DiffOptions, ErrorCode, Repository};
use tracing::debug;

use crate::attribution::{AttributionRecord, BlameError, BlameSource};
use crate::mailmap;

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or("bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_commit(&self, revision: &str) -> Result<Commit<'_>, Box<dyn Error>> {
        let commit = self
            .repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| format!("cannot resolve base branch {revision:?}: {}", e.message()))?;
        Ok(commit)
    }

    fn head_commit(&self) -> Result<Commit<'_>, Box<dyn Error>> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| format!("cannot resolve HEAD: {}", e.message()))?;
        Ok(head)
    }

    /// Paths changed on `HEAD` since it forked from `base`, as they were
    /// named before the branch (renames report their old path).
    pub fn changed_files(&self, base: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let base_commit = self.resolve_commit(base)?;
        let head = self.head_commit()?;

        let fork = self
            .repo
            .merge_base(base_commit.id(), head.id())
            .unwrap_or_else(|_| base_commit.id());
        let fork_tree = self.repo.find_commit(fork)?.tree()?;
        let head_tree = head.tree()?;

        let mut opts = DiffOptions::new();
        let mut diff =
            self.repo
                .diff_tree_to_tree(Some(&fork_tree), Some(&head_tree), Some(&mut opts))?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        for delta in diff.deltas() {
            let Some(path) = delta.old_file().path().or_else(|| delta.new_file().path()) else {
                continue;
            };
            let path = path.to_string_lossy().into_owned();
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
        debug!(base, fork = %fork, files = paths.len(), "changed files");
        Ok(paths)
    }

    /// Whether `base` has commits that `HEAD` does not contain.
    pub fn branch_behind(&self, base: &str) -> Result<bool, Box<dyn Error>> {
        let base_commit = self.resolve_commit(base)?;
        let head = self.head_commit()?;
        let (_ahead, behind) = self.repo.graph_ahead_behind(head.id(), base_commit.id())?;
        Ok(behind > 0)
    }

    /// Mailmap files in override order: the one named by git config
    /// `mailmap.file`, `~/.mailmap`, then the working tree's own.
    pub fn mailmap_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Ok(config) = self.repo.config()
            && let Ok(path) = config.get_path("mailmap.file")
        {
            files.push(path);
        }
        if let Some(home) = env::var_os("HOME") {
            files.push(PathBuf::from(home).join(".mailmap"));
        }
        files.extend(mailmap::project_files(&self.root));
        files
    }

    pub fn blame_source(&self) -> GitBlameSource {
        GitBlameSource::new(&self.root)
    }
}

/// Blame source backed by libgit2.
///
/// `git2::Repository` cannot be shared between threads, so every call
/// opens its own handle on the working tree.
pub struct GitBlameSource {
    root: PathBuf,
}

impl GitBlameSource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl BlameSource for GitBlameSource {
    fn blame(&self, path: &str, revision: &str) -> Result<Vec<AttributionRecord>, BlameError> {
        let repo = Repository::open(&self.root).map_err(|e| {
            BlameError::RepositoryUnavailable(format!(
                "cannot open {}: {}",
                self.root.display(),
                e.message()
            ))
        })?;

        let commit = repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| {
                BlameError::RepositoryUnavailable(format!(
                    "cannot resolve {revision:?}: {}",
                    e.message()
                ))
            })?;

        let failed = |e: git2::Error| BlameError::Failed {
            path: path.to_string(),
            message: e.message().to_string(),
        };

        let tree = commit.tree().map_err(failed)?;
        match tree.get_path(Path::new(path)) {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(BlameError::NotFound {
                    path: path.to_string(),
                    revision: revision.to_string(),
                });
            }
            Err(e) => return Err(failed(e)),
        }

        let mut opts = BlameOptions::new();
        opts.newest_commit(commit.id());
        let blame = repo
            .blame_file(Path::new(path), Some(&mut opts))
            .map_err(failed)?;

        let mut records = Vec::with_capacity(blame.len());
        for hunk in blame.iter() {
            let sig = hunk.final_signature();
            let commit_time = repo
                .find_commit(hunk.final_commit_id())
                .map(|c| c.time().seconds())
                .unwrap_or_else(|_| sig.when().seconds());
            records.push(AttributionRecord::new(
                sig.name().unwrap_or("unknown"),
                sig.email().unwrap_or("unknown"),
                hunk.lines_in_hunk(),
                commit_time,
            ));
        }
        Ok(records)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
