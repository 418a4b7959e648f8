use crate::domain::{Severity, SeveritySummary, Suggestion};

/// Merge rule-based and contextual suggestions into the final ordered list.
///
/// Rule-based entries are concatenated before contextual ones, then the
/// whole list is stably sorted by severity rank. Equal severities keep
/// their relative input order, so the result is deterministic for
/// identical inputs. No deduplication happens across the two sources:
/// surfacing both the rule-based fact and its contextual elaboration is
/// intentional.
pub fn merge_suggestions(
    rule_based: Vec<Suggestion>,
    contextual: Vec<Suggestion>,
) -> Vec<Suggestion> {
    let mut merged = rule_based;
    merged.extend(contextual);
    merged.sort_by_key(|s| s.severity.rank());
    merged
}

/// Counts-by-severity summary the host displays verbatim
pub fn severity_summary(suggestions: &[Suggestion]) -> SeveritySummary {
    let mut summary = SeveritySummary::default();
    for suggestion in suggestions {
        match suggestion.severity {
            Severity::Critical => summary.critical += 1,
            Severity::Warning => summary.warning += 1,
            Severity::Info => summary.info += 1,
            Severity::Success => summary.success += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn suggestion(id: &str, severity: Severity, is_contextual: bool) -> Suggestion {
        Suggestion {
            id: id.to_string(),
            severity,
            title: "title".to_string(),
            description: "description".to_string(),
            farm_name: "North Field".to_string(),
            sensor_type: "ph".to_string(),
            value: 6.0,
            unit: "pH".to_string(),
            observed_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            recommended_action: None,
            is_contextual,
        }
    }

    #[test]
    fn test_sort_by_severity_rank() {
        let merged = merge_suggestions(
            vec![
                suggestion("a", Severity::Success, false),
                suggestion("b", Severity::Critical, false),
                suggestion("c", Severity::Info, false),
                suggestion("d", Severity::Warning, false),
            ],
            vec![],
        );

        let ids: Vec<_> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_within_severity() {
        // [A(warning), B(critical), C(warning)] must come out [B, A, C]
        let merged = merge_suggestions(
            vec![
                suggestion("A", Severity::Warning, false),
                suggestion("B", Severity::Critical, false),
                suggestion("C", Severity::Warning, false),
            ],
            vec![],
        );

        let ids: Vec<_> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_rule_based_precede_contextual_at_equal_severity() {
        let merged = merge_suggestions(
            vec![suggestion("rule", Severity::Warning, false)],
            vec![suggestion("ctx", Severity::Warning, true)],
        );

        assert_eq!(merged[0].id, "rule");
        assert_eq!(merged[1].id, "ctx");
    }

    #[test]
    fn test_no_deduplication_across_sources() {
        // Same subject from both sources: both survive by design
        let merged = merge_suggestions(
            vec![suggestion("rule-ph", Severity::Critical, false)],
            vec![suggestion("ctx-ph", Severity::Critical, true)],
        );

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_severity_summary_counts() {
        let summary = severity_summary(&[
            suggestion("a", Severity::Critical, false),
            suggestion("b", Severity::Critical, true),
            suggestion("c", Severity::Warning, false),
            suggestion("d", Severity::Success, false),
        ]);

        assert_eq!(summary.critical, 2);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.info, 0);
        assert_eq!(summary.success, 1);
    }
}
