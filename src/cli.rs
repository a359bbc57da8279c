//! CLI argument definitions for the `git-reviewer` command.
//!
//! Values left unset here fall back to `.git-reviewer.toml` and then to
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "git-reviewer",
    version,
    about = "Suggest reviewers for the current branch",
    long_about = "\
Suggest reviewers for the current branch.

Every file changed since the branch forked from its base is blamed as of
the base branch. Lines last touched on or after --since are credited to
their author (after mailmap canonicalization), and the contributors who
own the largest share of those lines are listed as reviewers."
)]
pub struct Cli {
    /// Repository to analyze (default: current directory)
    pub path: Option<PathBuf>,

    /// Branch the current branch will be merged into (default: master)
    #[arg(long)]
    pub base: Option<String>,

    /// Only credit lines committed on or after this date (default: 6 months ago)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub since: Option<String>,

    /// Number of reviewers to suggest (default: 3)
    #[arg(long)]
    pub top: Option<usize>,

    /// Blame worker threads (default: available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Show changed files for reviewing
    #[arg(long)]
    pub show_files: bool,

    /// Show progress and per-file problems
    #[arg(short, long)]
    pub verbose: bool,

    /// Continue even when the branch is behind its base
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Exclude changed paths with these extensions (--ignore-extension svg,png)
    #[arg(long, value_name = "EXTS")]
    pub ignore_extension: Option<String>,

    /// Only consider changed paths with these extensions (--only-extension go,js)
    #[arg(long, value_name = "EXTS")]
    pub only_extension: Option<String>,

    /// Exclude files at or under these paths (--ignore-path main.go,vendor)
    #[arg(long, value_name = "PATHS")]
    pub ignore_path: Option<String>,

    /// Only consider files at or under these paths (--only-path src)
    #[arg(long, value_name = "PATHS")]
    pub only_path: Option<String>,

    /// Additional mailmap file, applied after the standard ones (repeatable)
    #[arg(long = "mailmap", value_name = "FILE")]
    pub mailmap: Vec<PathBuf>,
}
