use super::*;

use proptest::prelude::*;

fn totals(entries: &[(&str, usize)]) -> ContributionTotals {
    let mut totals = ContributionTotals::new();
    for &(who, lines) in entries {
        totals.add(who, &format!("{}@x.com", who.to_lowercase()), lines);
    }
    totals
}

#[test]
fn scores_are_fractions_of_total() {
    let stats = normalize(&totals(&[("A", 7), ("B", 3)]));
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].reviewer.as_str(), "A <a@x.com>");
    assert!((stats[0].score - 0.7).abs() < 1e-12);
    assert_eq!(stats[0].lines, 7);
    assert!((stats[1].score - 0.3).abs() < 1e-12);
}

#[test]
fn percent_is_score_times_hundred() {
    let stats = normalize(&totals(&[("A", 1), ("B", 3)]));
    assert!((stats[1].percent() - 75.0).abs() < 1e-9);
}

#[test]
fn empty_totals_yield_nothing() {
    assert!(normalize(&ContributionTotals::new()).is_empty());
}

#[test]
fn single_contributor_owns_everything() {
    let stats = normalize(&totals(&[("solo", 42)]));
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].score, 1.0);
}

proptest! {
    #[test]
    fn prop_scores_bounded_and_sum_to_one(
        counts in prop::collection::vec(1usize..10_000, 1..40),
    ) {
        let mut t = ContributionTotals::new();
        for (i, n) in counts.iter().enumerate() {
            t.add("dev", &format!("dev{i}@x.com"), *n);
        }
        let stats = normalize(&t);
        prop_assert_eq!(stats.len(), counts.len());
        for s in &stats {
            prop_assert!((0.0..=1.0).contains(&s.score));
        }
        let sum: f64 = stats.iter().map(|s| s.score).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }
}
