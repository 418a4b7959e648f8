//! Property tests for the suggestion merger/sorter.
//!
//! Verifies the final ordering is a stable, deterministic total order by
//! severity rank.

use chrono::{DateTime, Utc};
use farm_advisory::domain::{Severity, Suggestion};
use farm_advisory::merge::{merge_suggestions, severity_summary};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Critical),
        Just(Severity::Warning),
        Just(Severity::Info),
        Just(Severity::Success),
    ]
}

fn suggestion(id: String, severity: Severity) -> Suggestion {
    Suggestion {
        id,
        severity,
        title: "title".to_string(),
        description: "description".to_string(),
        farm_name: "North Field".to_string(),
        sensor_type: "ph".to_string(),
        value: 6.0,
        unit: "pH".to_string(),
        observed_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        recommended_action: None,
        is_contextual: false,
    }
}

fn suggestion_batch(prefix: &'static str) -> impl Strategy<Value = Vec<Suggestion>> {
    prop::collection::vec(severity(), 0..25).prop_map(move |severities| {
        severities
            .into_iter()
            .enumerate()
            .map(|(i, sev)| suggestion(format!("{}-{}", prefix, i), sev))
            .collect()
    })
}

/// Original concatenation position encoded in the id suffix
fn original_index(suggestion: &Suggestion, rule_count: usize) -> usize {
    let (prefix, n) = suggestion.id.split_once('-').unwrap();
    let n: usize = n.parse().unwrap();
    if prefix == "rule" {
        n
    } else {
        rule_count + n
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: severity ranks are nondecreasing in the merged output
    #[test]
    fn prop_output_sorted_by_rank(
        rule_based in suggestion_batch("rule"),
        contextual in suggestion_batch("ctx"),
    ) {
        let merged = merge_suggestions(rule_based, contextual);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].severity.rank() <= pair[1].severity.rank());
        }
    }

    /// Property: equal severities keep their concatenated input order
    #[test]
    fn prop_sort_is_stable(
        rule_based in suggestion_batch("rule"),
        contextual in suggestion_batch("ctx"),
    ) {
        let rule_count = rule_based.len();
        let merged = merge_suggestions(rule_based, contextual);
        for pair in merged.windows(2) {
            if pair[0].severity == pair[1].severity {
                prop_assert!(
                    original_index(&pair[0], rule_count) < original_index(&pair[1], rule_count)
                );
            }
        }
    }

    /// Property: merging never drops or invents suggestions, and the
    /// summary counts add up
    #[test]
    fn prop_merge_preserves_all_and_counts(
        rule_based in suggestion_batch("rule"),
        contextual in suggestion_batch("ctx"),
    ) {
        let expected_len = rule_based.len() + contextual.len();
        let merged = merge_suggestions(rule_based, contextual);
        prop_assert_eq!(merged.len(), expected_len);

        let summary = severity_summary(&merged);
        prop_assert_eq!(
            summary.critical + summary.warning + summary.info + summary.success,
            expected_len
        );
    }

    /// Property: the merge is deterministic for identical inputs
    #[test]
    fn prop_merge_deterministic(
        rule_based in suggestion_batch("rule"),
        contextual in suggestion_batch("ctx"),
    ) {
        let first = merge_suggestions(rule_based.clone(), contextual.clone());
        let second = merge_suggestions(rule_based, contextual);
        prop_assert_eq!(first, second);
    }
}
