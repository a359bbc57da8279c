use serde::Serialize;

use crate::attribution::since::format_date;
use crate::attribution::{Ranking, SkippedPath};

pub fn print_files(files: &[String]) {
    println!("Reviewers across the following changed files:");
    for file in files {
        println!("  {file}");
    }
    println!();
}

pub fn print_report(ranking: &Ranking) {
    if ranking.stats.is_empty() {
        println!("No reviewers found.");
        return;
    }

    for stat in &ranking.stats {
        println!("  {:>5.1}%\t{}", stat.percent(), stat.reviewer);
    }

    if !ranking.skipped.is_empty() {
        println!();
        println!(
            "{} of the changed files could not be blamed (new on this branch or unreadable).",
            ranking.skipped.len()
        );
    }
}

#[derive(Serialize)]
struct JsonReviewer<'a> {
    reviewer: &'a str,
    score: f64,
    percent: f64,
    lines: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    since: String,
    total_lines: usize,
    files: &'a [String],
    reviewers: Vec<JsonReviewer<'a>>,
    skipped: &'a [SkippedPath],
}

pub fn print_json(files: &[String], ranking: &Ranking) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&json_report(files, ranking))?);
    Ok(())
}

fn json_report<'a>(files: &'a [String], ranking: &'a Ranking) -> JsonReport<'a> {
    JsonReport {
        since: format_date(ranking.since),
        total_lines: ranking.total_lines,
        files,
        reviewers: ranking
            .stats
            .iter()
            .map(|s| JsonReviewer {
                reviewer: s.reviewer.as_str(),
                score: s.score,
                percent: (s.percent() * 10.0).round() / 10.0,
                lines: s.lines,
            })
            .collect(),
        skipped: &ranking.skipped,
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
