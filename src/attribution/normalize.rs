use serde::Serialize;

use super::aggregator::ContributionTotals;
use super::identity::ContributorKey;

/// A contributor's share of the attributed lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub reviewer: ContributorKey,
    /// Fraction of all attributed lines, in `[0, 1]`.
    pub score: f64,
    pub lines: usize,
}

impl Stat {
    pub fn percent(&self) -> f64 {
        self.score * 100.0
    }
}

/// Turn line counts into ownership fractions of the grand total.
///
/// Stats come out in ascending canonical email order. Empty totals yield no stats.
pub fn normalize(totals: &ContributionTotals) -> Vec<Stat> {
    let total = totals.total();
    if total == 0 {
        return Vec::new();
    }

    totals
        .iter()
        .map(|(reviewer, lines)| Stat {
            reviewer,
            score: lines as f64 / total as f64,
            lines,
        })
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
