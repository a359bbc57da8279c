use super::*;
use std::fs;

use clap::Parser;
use git2::Repository;

// Recent enough to survive the default six-month window.
fn recent() -> i64 {
    Utc::now().timestamp() - 86_400
}

fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();
    (dir, repo)
}

fn commit_as(
    repo: &Repository,
    author: (&str, &str),
    files: &[(&str, &str)],
    epoch: i64,
) -> git2::Oid {
    let sig = git2::Signature::new(author.0, author.1, &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "work", &tree, &parents)
        .unwrap()
}

/// Alice owns 7 lines and Bob 3 at `base`; the branch touches both files
/// and adds a new one.
fn scenario_repo() -> (tempfile::TempDir, Repository) {
    let (dir, repo) = create_test_repo();
    let t = recent();
    commit_as(
        &repo,
        ("Alice", "alice@x.com"),
        &[
            ("src/lib.rs", "a1\na2\na3\na4\n"),
            ("src/main.rs", "m1\nm2\nm3\n"),
        ],
        t - 100,
    );
    let base = commit_as(
        &repo,
        ("Bob", "bob@old.com"),
        &[("src/lib.rs", "a1\na2\na3\na4\nb1\nb2\nb3\n")],
        t - 50,
    );
    {
        let commit = repo.find_commit(base).unwrap();
        repo.branch("base", &commit, true).unwrap();
    }

    commit_as(
        &repo,
        ("Carol", "carol@x.com"),
        &[
            ("src/lib.rs", "changed\n"),
            ("src/main.rs", "changed\n"),
            ("src/new.rs", "fresh\n"),
            ("logo.svg", "<svg/>\n"),
        ],
        t,
    );
    (dir, repo)
}

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "git-reviewer".to_string(),
        dir.display().to_string(),
        "--base".to_string(),
        "base".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::parse_from(args)
}

fn ranked(outcome: Outcome) -> (Vec<String>, Ranking) {
    match outcome {
        Outcome::Ranked { files, ranking } => (files, ranking),
        other => panic!("expected a ranking, got {other:?}"),
    }
}

#[test]
fn ranks_owners_of_changed_files() {
    let (dir, _repo) = scenario_repo();
    let (files, ranking) = ranked(find_reviewers(dir.path(), &cli(dir.path(), &[])).unwrap());

    assert!(!files.contains(&"logo.svg".to_string()), "svg is ignored by default");
    assert_eq!(ranking.total_lines, 10);
    assert_eq!(ranking.stats[0].reviewer.as_str(), "Alice <alice@x.com>");
    assert!((ranking.stats[0].score - 0.7).abs() < 1e-9);
    assert_eq!(ranking.stats[1].reviewer.as_str(), "Bob <bob@old.com>");
    assert_eq!(ranking.skipped.len(), 1);
    assert_eq!(ranking.skipped[0].path, "src/new.rs");
}

#[test]
fn top_limits_result() {
    let (dir, _repo) = scenario_repo();
    let (_, ranking) =
        ranked(find_reviewers(dir.path(), &cli(dir.path(), &["--top", "1"])).unwrap());
    assert_eq!(ranking.stats.len(), 1);
}

#[test]
fn project_mailmap_is_applied() {
    let (dir, _repo) = scenario_repo();
    fs::write(
        dir.path().join(".mailmap"),
        "Robert <bob@new.com> <bob@old.com>\n",
    )
    .unwrap();

    let (_, ranking) = ranked(find_reviewers(dir.path(), &cli(dir.path(), &[])).unwrap());
    assert_eq!(ranking.stats[1].reviewer.as_str(), "Robert <bob@new.com>");
}

#[test]
fn config_file_supplies_defaults() {
    let (dir, _repo) = scenario_repo();
    fs::write(
        dir.path().join(".git-reviewer.toml"),
        "base = \"base\"\ntop = 1\nonly_paths = [\"src/main.rs\"]\n",
    )
    .unwrap();

    let cli = Cli::parse_from(["git-reviewer".to_string(), dir.path().display().to_string()]);
    let (files, ranking) = ranked(find_reviewers(dir.path(), &cli).unwrap());
    assert_eq!(files, vec!["src/main.rs".to_string()]);
    assert_eq!(ranking.stats.len(), 1);
    assert_eq!(ranking.stats[0].reviewer.as_str(), "Alice <alice@x.com>");
}

#[test]
fn future_since_is_no_data() {
    let (dir, _repo) = scenario_repo();
    let err = find_reviewers(dir.path(), &cli(dir.path(), &["--since", "2999-01-01"])).unwrap_err();
    assert!(err.to_string().contains("try an earlier --since"), "got: {err}");
}

#[test]
fn malformed_since_is_rejected() {
    let (dir, _repo) = scenario_repo();
    let err = find_reviewers(dir.path(), &cli(dir.path(), &["--since", "01/02/2024"])).unwrap_err();
    assert!(err.to_string().contains("invalid --since"), "got: {err}");
}

#[test]
fn everything_filtered_is_no_changes() {
    let (dir, _repo) = scenario_repo();
    let outcome =
        find_reviewers(dir.path(), &cli(dir.path(), &["--only-extension", "md"])).unwrap();
    assert!(matches!(outcome, Outcome::NoChanges { filtered: 4 }), "got {outcome:?}");
}

#[test]
fn behind_base_stops_unless_forced() {
    let (dir, repo) = create_test_repo();
    let t = recent();
    let first = commit_as(&repo, ("Alice", "alice@x.com"), &[("a.rs", "1\n")], t - 10);
    let second = commit_as(&repo, ("Alice", "alice@x.com"), &[("a.rs", "1\n2\n")], t);
    repo.branch("base", &repo.find_commit(second).unwrap(), true)
        .unwrap();
    repo.branch("topic", &repo.find_commit(first).unwrap(), true)
        .unwrap();
    repo.set_head("refs/heads/topic").unwrap();

    let outcome = find_reviewers(dir.path(), &cli(dir.path(), &[])).unwrap();
    assert!(matches!(outcome, Outcome::Behind { ref base } if base == "base"));

    // Forced: HEAD has nothing the base lacks, so there is nothing to review.
    let outcome = find_reviewers(dir.path(), &cli(dir.path(), &["--force"])).unwrap();
    assert!(matches!(outcome, Outcome::NoChanges { filtered: 0 }), "got {outcome:?}");
}

#[test]
fn run_on_non_git_dir() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("not_a_repo");
    fs::create_dir_all(&sub).unwrap();
    let err = run(&cli(&sub, &[])).unwrap_err();
    assert!(
        err.to_string().contains("not a git repository"),
        "should mention not a git repo, got: {err}"
    );
}

#[test]
fn run_prints_text_and_json() {
    let (dir, _repo) = scenario_repo();
    assert!(run(&cli(dir.path(), &["--show-files"])).is_ok());
    assert!(run(&cli(dir.path(), &["--json"])).is_ok());
}

#[test]
fn settings_merge_prefers_flags() {
    let config = Config {
        base: Some("develop".to_string()),
        top: Some(9),
        ignore_extensions: vec!["png".to_string()],
        ..Config::default()
    };
    let cli = Cli::parse_from([
        "git-reviewer",
        "--top",
        "2",
        "--ignore-extension",
        "gif, bmp",
    ]);

    let settings = Settings::merge(config, &cli);
    assert_eq!(settings.base, "develop");
    assert_eq!(settings.top, 2);
    assert_eq!(settings.jobs, 0);
    assert_eq!(settings.ignore_extensions, vec!["png", "gif", "bmp"]);
}

#[test]
fn settings_defaults() {
    let settings = Settings::merge(Config::default(), &Cli::parse_from(["git-reviewer"]));
    assert_eq!(settings.base, DEFAULT_BASE);
    assert_eq!(settings.top, DEFAULT_TOP);
    assert!(settings.since.is_none());
}
