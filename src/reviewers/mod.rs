//! Reviewer suggestion for the current branch.
//!
//! Finds the files changed since the branch left its base, filters out
//! machine-edited and excluded paths, and ranks contributors by the share
//! of those files' lines they own at the base revision.

mod report;

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::attribution::{self, EngineError, Ranking, Request, since::resolve_since};
use crate::cli::Cli;
use crate::config::Config;
use crate::filter::{PathFilter, split_list};
use crate::git::GitRepo;
use crate::mailmap::AliasTable;
use report::{print_files, print_json, print_report};

pub const DEFAULT_BASE: &str = "master";
pub const DEFAULT_TOP: usize = 3;

/// Command-line flags merged over the project config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base: String,
    pub since: Option<String>,
    pub top: usize,
    pub jobs: usize,
    pub force: bool,
    pub ignore_extensions: Vec<String>,
    pub only_extensions: Vec<String>,
    pub ignore_paths: Vec<String>,
    pub only_paths: Vec<String>,
    pub mailmap: Vec<PathBuf>,
}

impl Settings {
    pub fn merge(config: Config, cli: &Cli) -> Self {
        let extend = |mut from_file: Vec<String>, flag: &Option<String>| {
            if let Some(value) = flag {
                from_file.extend(split_list(value));
            }
            from_file
        };

        let mut mailmap = config.mailmap;
        mailmap.extend(cli.mailmap.iter().cloned());

        Self {
            base: cli
                .base
                .clone()
                .or(config.base)
                .unwrap_or_else(|| DEFAULT_BASE.to_string()),
            since: cli.since.clone().or(config.since),
            top: cli.top.or(config.top).unwrap_or(DEFAULT_TOP),
            jobs: cli.jobs.or(config.jobs).unwrap_or(0),
            force: cli.force,
            ignore_extensions: extend(config.ignore_extensions, &cli.ignore_extension),
            only_extensions: extend(config.only_extensions, &cli.only_extension),
            ignore_paths: extend(config.ignore_paths, &cli.ignore_path),
            only_paths: extend(config.only_paths, &cli.only_path),
            mailmap,
        }
    }

    fn path_filter(&self) -> PathFilter {
        PathFilter::new(
            &self.ignore_extensions,
            &self.only_extensions,
            &self.ignore_paths,
            &self.only_paths,
        )
    }
}

/// What a reviewer search ended with.
#[derive(Debug)]
pub enum Outcome {
    /// The base branch has commits the current branch lacks.
    Behind { base: String },
    /// Nothing changed since the base, or everything was filtered out.
    NoChanges { filtered: usize },
    Ranked { files: Vec<String>, ranking: Ranking },
}

/// Find reviewers for the branch checked out in `path`.
pub fn find_reviewers(path: &Path, cli: &Cli) -> Result<Outcome, Box<dyn Error>> {
    let git_repo =
        GitRepo::open(path).map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let config = Config::load(git_repo.root())?;
    let settings = Settings::merge(config, cli);

    // Reject a bad date before touching history.
    resolve_since(settings.since.as_deref(), Utc::now())?;

    if git_repo.branch_behind(&settings.base)? {
        if !settings.force {
            return Ok(Outcome::Behind {
                base: settings.base,
            });
        }
        info!(base = %settings.base, "branch is behind its base, continuing");
    }

    let changed = git_repo.changed_files(&settings.base)?;
    let total = changed.len();
    let files = settings.path_filter().apply(changed);
    debug!(changed = total, kept = files.len(), "filtered changed files");
    if files.is_empty() {
        return Ok(Outcome::NoChanges { filtered: total });
    }

    let mut mailmaps = git_repo.mailmap_files();
    mailmaps.extend(settings.mailmap.iter().cloned());
    let aliases = AliasTable::load_files(&mailmaps);
    debug!(
        sources = mailmaps.len(),
        empty = aliases.is_empty(),
        "alias table built"
    );

    let request = Request {
        paths: &files,
        since: settings.since.as_deref(),
        base: &settings.base,
        top: settings.top,
        jobs: settings.jobs,
    };
    let source = git_repo.blame_source();
    let ranking = match attribution::run(&request, &source, &aliases) {
        Ok(ranking) => ranking,
        Err(err @ EngineError::NoAttributableData { .. }) => {
            return Err(format!("{err}; try an earlier --since date").into());
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Outcome::Ranked { files, ranking })
}

/// Run the command and print its result.
pub fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let path = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));

    match find_reviewers(&path, cli)? {
        Outcome::Behind { base } => {
            println!("Current branch is behind {base}. Merge up!");
        }
        Outcome::NoChanges { filtered: 0 } => println!("No changes on this branch!"),
        Outcome::NoChanges { filtered } => {
            println!("No reviewable changes on this branch ({filtered} files filtered out).");
        }
        Outcome::Ranked { files, ranking } => {
            if cli.json {
                print_json(&files, &ranking)?;
            } else {
                if cli.show_files {
                    print_files(&files);
                }
                print_report(&ranking);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
