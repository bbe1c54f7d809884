//! Extraction rules and the per-field rule store.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A learned or seeded extraction rule for one field.
///
/// Identity is `(field_name, pattern)`; the statistics are mutable and track
/// how the rule has fared against corrections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    /// Field this rule extracts.
    pub field_name: String,

    /// Regex whose first capture group yields the field value.
    pub pattern: String,

    /// Incremented each time this rule wins over its predecessor; tie-break.
    pub priority: u32,

    /// Most recent confidence computed for this rule, in [0, 1].
    pub success_rate: f64,

    /// Number of correction events that referenced this field.
    pub usage_count: u64,

    /// Timestamp of the most recent update.
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
}

impl PatternRule {
    /// Create a seed rule with the given conservative success rate.
    pub fn seed(field_name: &str, pattern: &str, success_rate: f64) -> Self {
        Self {
            field_name: field_name.to_string(),
            pattern: pattern.to_string(),
            priority: 1,
            success_rate,
            usage_count: 0,
            last_used: None,
        }
    }
}

/// Ranking used when several rules exist for one field: success rate first,
/// then priority, then usage count.
fn rank(a: &PatternRule, b: &PatternRule) -> Ordering {
    a.success_rate
        .total_cmp(&b.success_rate)
        .then(a.priority.cmp(&b.priority))
        .then(a.usage_count.cmp(&b.usage_count))
}

/// Holds all extraction rules, at most one live rule per field.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<PatternRule>,
}

impl RuleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from persisted rules.
    pub fn with_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Create a store seeded with the default rule catalog.
    pub fn with_defaults() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Best rule for a field, by `(success_rate, priority, usage_count)`.
    pub fn best_rule(&self, field_name: &str) -> Option<&PatternRule> {
        self.rules
            .iter()
            .filter(|r| r.field_name == field_name)
            .max_by(|a, b| rank(a, b))
    }

    /// Best pattern for a field, or the empty string if none is known.
    pub fn best_pattern(&self, field_name: &str) -> String {
        self.best_rule(field_name)
            .map(|r| r.pattern.clone())
            .unwrap_or_default()
    }

    /// Mutable access to the rule for a field, if one exists.
    pub fn get_mut(&mut self, field_name: &str) -> Option<&mut PatternRule> {
        self.rules.iter_mut().find(|r| r.field_name == field_name)
    }

    /// Insert a new rule.
    pub fn insert(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// All rules in the store.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove rules whose success rate is below `threshold`.
    ///
    /// Returns the number of rules removed. The correction history is not
    /// touched; only the live rule set shrinks.
    pub fn prune_below(&mut self, threshold: f64) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| r.success_rate >= threshold);
        before - self.rules.len()
    }

    /// Best pattern per field, for feeding the parser as overrides.
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for rule in &self.rules {
            let entry = self
                .best_rule(&rule.field_name)
                .expect("field has at least this rule");
            map.insert(entry.field_name.clone(), entry.pattern.clone());
        }
        map
    }
}

/// The default rule catalog: conservative seed patterns for the well-known
/// payslip fields.
pub fn default_rules() -> Vec<PatternRule> {
    vec![
        // Employer
        PatternRule::seed("company_name", r"(?:^|\n)([A-ZÀ-Ÿ][A-ZÀ-Ÿ &]+)\n[0-9]+", 0.8),
        PatternRule::seed("siret", r"Siret\s*:?\s*([0-9]+)", 0.9),
        PatternRule::seed("naf_code", r"Code\s*Naf\s*:?\s*([0-9A-Z]+)", 0.9),
        // Employee
        PatternRule::seed(
            "full_name",
            r"(?:Madame|Monsieur|M\.|Mme)\s+([A-ZÀ-Ÿ][A-ZÀ-Ÿ ]+)",
            0.8,
        ),
        PatternRule::seed("matricule", r"Matricule\s*:?\s*([0-9]+)", 0.9),
        PatternRule::seed("social_security", r"No\s*SS\s*:?\s*([0-9]+)", 0.9),
        // Salary
        PatternRule::seed("gross_salary", r"Salaire\s+brut\s+([0-9\s,]+\.?[0-9]*)", 0.8),
        PatternRule::seed("net_paid", r"Net\s+pay[ée]?\s+([0-9\s,]+\.?[0-9]*)", 0.8),
        // Dates
        PatternRule::seed(
            "start_date",
            r"Entr[ée]e\s*:?\s*([0-9]{2}/[0-9]{2}/[0-9]{4})",
            0.9,
        ),
        PatternRule::seed(
            "payment_date",
            r"Paiement\s+le\s+([0-9]{2}/[0-9]{2}/[0-9]{4})",
            0.9,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_best_pattern_empty_store() {
        let store = RuleStore::new();
        assert_eq!(store.best_pattern("gross_salary"), "");
    }

    #[test]
    fn test_best_rule_selection_order() {
        let mut store = RuleStore::new();
        store.insert(PatternRule {
            field_name: "net_paid".to_string(),
            pattern: "low".to_string(),
            priority: 5,
            success_rate: 0.4,
            usage_count: 100,
            last_used: None,
        });
        store.insert(PatternRule {
            field_name: "net_paid".to_string(),
            pattern: "high".to_string(),
            priority: 1,
            success_rate: 0.9,
            usage_count: 1,
            last_used: None,
        });

        // Success rate dominates priority and usage
        assert_eq!(store.best_pattern("net_paid"), "high");
    }

    #[test]
    fn test_best_rule_tie_broken_by_priority() {
        let mut store = RuleStore::new();
        store.insert(PatternRule {
            field_name: "siret".to_string(),
            pattern: "older".to_string(),
            priority: 1,
            success_rate: 0.9,
            usage_count: 10,
            last_used: None,
        });
        store.insert(PatternRule {
            field_name: "siret".to_string(),
            pattern: "newer".to_string(),
            priority: 3,
            success_rate: 0.9,
            usage_count: 2,
            last_used: None,
        });

        assert_eq!(store.best_pattern("siret"), "newer");
    }

    #[test]
    fn test_best_rule_is_idempotent() {
        let store = RuleStore::with_defaults();
        let first = store.best_pattern("gross_salary");
        let second = store.best_pattern("gross_salary");
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_default_rules_compile() {
        for rule in default_rules() {
            assert!(
                regex::Regex::new(&rule.pattern).is_ok(),
                "seed pattern for {} does not compile",
                rule.field_name
            );
            assert!(rule.success_rate > 0.0 && rule.success_rate <= 1.0);
        }
    }

    #[test]
    fn test_prune_below() {
        let mut store = RuleStore::new();
        store.insert(PatternRule::seed("a", "x", 0.2));
        store.insert(PatternRule::seed("b", "y", 0.8));

        let removed = store.prune_below(0.5);
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.best_pattern("b"), "y");
    }
}
