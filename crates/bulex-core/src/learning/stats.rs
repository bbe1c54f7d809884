//! Aggregate learning statistics and advisory suggestions.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::record::CorrectionRecord;
use super::rule::RuleStore;
use crate::models::config::LearningConfig;

/// Aggregate statistics over the rule store and correction history.
#[derive(Debug, Clone, Serialize)]
pub struct LearningStats {
    /// Total corrections ever recorded.
    pub total_corrections: usize,

    /// Number of distinct fields that received at least one correction.
    pub fields_learned: usize,

    /// Mean confidence across all corrections (0.0 when there are none).
    pub average_confidence: f64,

    /// Per-field correction counts and mean confidence.
    pub field_statistics: BTreeMap<String, FieldStats>,

    /// Number of rules currently in the store.
    pub total_patterns: usize,

    /// Timestamp of the most recent correction.
    pub last_learning: Option<DateTime<Utc>>,
}

/// Per-field slice of the statistics.
#[derive(Debug, Clone, Serialize)]
pub struct FieldStats {
    pub count: usize,
    pub average_confidence: f64,
}

/// Recompute statistics from current state. Pure read, no caching.
pub fn compute_stats(rules: &RuleStore, history: &[CorrectionRecord]) -> LearningStats {
    let total_corrections = history.len();

    let mut field_statistics: BTreeMap<String, FieldStats> = BTreeMap::new();
    let mut confidence_sum = 0.0;

    for record in history {
        confidence_sum += record.confidence;
        let entry = field_statistics
            .entry(record.field_name.clone())
            .or_insert(FieldStats {
                count: 0,
                average_confidence: 0.0,
            });
        entry.count += 1;
        entry.average_confidence += record.confidence;
    }

    for stats in field_statistics.values_mut() {
        stats.average_confidence /= stats.count as f64;
    }

    LearningStats {
        total_corrections,
        fields_learned: field_statistics.len(),
        average_confidence: confidence_sum / total_corrections.max(1) as f64,
        field_statistics,
        total_patterns: rules.len(),
        last_learning: history.last().map(|r| r.timestamp),
    }
}

/// Derive advisory strings from current state.
///
/// These are heuristics driven by the configured thresholds, not guarantees.
/// `now` is injected so the recency window is testable.
pub fn suggest_improvements(
    rules: &RuleStore,
    history: &[CorrectionRecord],
    config: &LearningConfig,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    let low_confidence = rules
        .rules()
        .iter()
        .filter(|r| r.success_rate < config.low_confidence_threshold)
        .count();
    if low_confidence > 0 {
        suggestions.push(format!(
            "{} pattern(s) have low confidence and need more corrections",
            low_confidence
        ));
    }

    let corrected: std::collections::HashSet<&str> =
        history.iter().map(|r| r.field_name.as_str()).collect();
    let uncorrected: Vec<&str> = rules
        .rules()
        .iter()
        .map(|r| r.field_name.as_str())
        .filter(|f| !corrected.contains(f))
        .collect();
    if !uncorrected.is_empty() {
        suggestions.push(format!(
            "{} field(s) have never been corrected: {}",
            uncorrected.len(),
            uncorrected.join(", ")
        ));
    }

    let window = Duration::days(config.recent_window_days);
    let recent = history
        .iter()
        .filter(|r| now.signed_duration_since(r.timestamp) <= window)
        .count();
    if recent > config.recent_volume_threshold {
        suggestions.push(format!(
            "{} corrections in the last {} days; the rule set is improving quickly",
            recent, config.recent_window_days
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::rule::PatternRule;

    fn record(field: &str, confidence: f64, timestamp: DateTime<Utc>) -> CorrectionRecord {
        CorrectionRecord {
            field_name: field.to_string(),
            document_id: "doc.pdf".to_string(),
            original_value: "old".to_string(),
            corrected_value: "new".to_string(),
            pattern_found: String::new(),
            new_pattern: "new".to_string(),
            confidence,
            timestamp,
            user_feedback: String::new(),
        }
    }

    #[test]
    fn test_stats_empty_state() {
        let stats = compute_stats(&RuleStore::new(), &[]);
        assert_eq!(stats.total_corrections, 0);
        assert_eq!(stats.fields_learned, 0);
        assert_eq!(stats.average_confidence, 0.0);
        assert!(stats.last_learning.is_none());
    }

    #[test]
    fn test_stats_per_field_averages() {
        let now = Utc::now();
        let history = vec![
            record("siret", 1.0, now),
            record("siret", 0.5, now),
            record("net_paid", 0.8, now),
        ];

        let stats = compute_stats(&RuleStore::new(), &history);
        assert_eq!(stats.total_corrections, 3);
        assert_eq!(stats.fields_learned, 2);
        assert!((stats.field_statistics["siret"].average_confidence - 0.75).abs() < 1e-9);
        assert_eq!(stats.field_statistics["net_paid"].count, 1);
        assert_eq!(stats.last_learning, Some(now));
    }

    #[test]
    fn test_suggest_low_confidence_rules() {
        let mut rules = RuleStore::new();
        rules.insert(PatternRule::seed("weak", "x", 0.2));
        rules.insert(PatternRule::seed("strong", "y", 0.9));

        let suggestions =
            suggest_improvements(&rules, &[], &LearningConfig::default(), Utc::now());
        assert!(suggestions.iter().any(|s| s.contains("low confidence")));
    }

    #[test]
    fn test_suggest_uncorrected_fields() {
        let mut rules = RuleStore::new();
        rules.insert(PatternRule::seed("siret", "x", 0.9));
        let history = vec![record("net_paid", 0.9, Utc::now())];

        let suggestions =
            suggest_improvements(&rules, &history, &LearningConfig::default(), Utc::now());
        assert!(suggestions
            .iter()
            .any(|s| s.contains("never been corrected") && s.contains("siret")));
    }

    #[test]
    fn test_suggest_recent_volume() {
        let now = Utc::now();
        let history: Vec<_> = (0..6).map(|_| record("siret", 0.9, now)).collect();

        let suggestions =
            suggest_improvements(&RuleStore::new(), &history, &LearningConfig::default(), now);
        assert!(suggestions
            .iter()
            .any(|s| s.contains("corrections in the last 7 days")));
    }

    #[test]
    fn test_no_volume_signal_outside_window() {
        let now = Utc::now();
        let old = now - Duration::days(30);
        let history: Vec<_> = (0..6).map(|_| record("siret", 0.9, old)).collect();

        let suggestions =
            suggest_improvements(&RuleStore::new(), &history, &LearningConfig::default(), now);
        assert!(!suggestions
            .iter()
            .any(|s| s.contains("corrections in the last")));
    }
}
