//! Learning coordinator: the single writer over the rule store.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use super::confidence::ConfidenceScorer;
use super::persistence::{LearningStore, Snapshot};
use super::record::{AuditEntry, CorrectionRecord};
use super::rule::{PatternRule, RuleStore};
use super::stats::{self, LearningStats};
use super::synthesizer::RuleSynthesizer;
use crate::error::{BulexError, Result};
use crate::models::config::LearningConfig;

/// Number of most recent corrections included in an export snapshot.
const EXPORT_RECENT_CORRECTIONS: usize = 10;

/// Orchestrates the learning flow: correction in, synthesized rule out,
/// everything persisted.
///
/// All mutation goes through `&mut self`, which keeps the read-modify-write
/// over rule state single-writer by construction. Hosting this behind a
/// concurrent service requires wrapping the whole system in a mutex or actor.
pub struct LearningSystem {
    store: Box<dyn LearningStore>,
    config: LearningConfig,
    rules: RuleStore,
    history: Vec<CorrectionRecord>,
    audit_log: Vec<AuditEntry>,
    synthesizer: RuleSynthesizer,
    scorer: ConfidenceScorer,
}

impl LearningSystem {
    /// Open a learning system backed by `store`.
    ///
    /// An empty store is seeded with the default rule catalog so the baseline
    /// fields extract out of the box.
    pub fn open(store: Box<dyn LearningStore>, config: LearningConfig) -> Result<Self> {
        let snapshot = store.load()?;

        let rules = if snapshot.rules.is_empty() {
            debug!("no persisted rules, seeding default catalog");
            RuleStore::with_defaults()
        } else {
            RuleStore::with_rules(snapshot.rules)
        };

        Ok(Self {
            store,
            config,
            rules,
            history: snapshot.history,
            audit_log: snapshot.audit_log,
            synthesizer: RuleSynthesizer::new(),
            scorer: ConfidenceScorer::new(),
        })
    }

    /// Learn from a user correction.
    ///
    /// Synthesizes a candidate pattern from the corrected value and its
    /// context, scores it, records the correction, and replaces the stored
    /// rule for the field when the candidate scores strictly higher. A
    /// correction where the corrected value equals the original is still
    /// processed; filtering no-ops is the caller's choice.
    pub fn learn_from_correction(
        &mut self,
        field_name: &str,
        document_id: &str,
        original_value: &str,
        corrected_value: &str,
        raw_text: &str,
        user_feedback: &str,
    ) -> Result<&CorrectionRecord> {
        info!("learning: {} = '{}'", field_name, corrected_value);

        let current_pattern = self.rules.best_pattern(field_name);

        let candidates = self
            .synthesizer
            .synthesize(field_name, corrected_value, raw_text);
        // Most specific candidate first, synthesis guarantees at least one
        let new_pattern = candidates.into_iter().next().unwrap_or_default();

        let confidence = self
            .scorer
            .score(&new_pattern, raw_text, corrected_value.trim());

        let now = Utc::now();
        let record = CorrectionRecord {
            field_name: field_name.to_string(),
            document_id: document_id.to_string(),
            original_value: original_value.to_string(),
            corrected_value: corrected_value.to_string(),
            pattern_found: current_pattern,
            new_pattern: new_pattern.clone(),
            confidence,
            timestamp: now,
            user_feedback: user_feedback.to_string(),
        };

        self.audit_log.push(AuditEntry::from_record(&record));
        self.history.push(record);

        match self.rules.get_mut(field_name) {
            Some(rule) => {
                if confidence > rule.success_rate {
                    debug!(
                        "replacing rule for {} ({:.2} -> {:.2})",
                        field_name, rule.success_rate, confidence
                    );
                    rule.pattern = new_pattern;
                    rule.success_rate = confidence;
                    rule.priority += 1;
                    rule.last_used = Some(now);
                }
                rule.usage_count += 1;
            }
            None => {
                self.rules.insert(PatternRule {
                    field_name: field_name.to_string(),
                    pattern: new_pattern,
                    priority: 1,
                    success_rate: confidence,
                    usage_count: 1,
                    last_used: Some(now),
                });
            }
        }

        self.persist()?;

        info!("learning done, confidence {:.2}", confidence);
        Ok(self.history.last().expect("record just appended"))
    }

    /// Best known pattern for a field, or the empty string.
    pub fn get_best_pattern(&self, field_name: &str) -> String {
        self.rules.best_pattern(field_name)
    }

    /// Best pattern per field, for feeding the parser as overrides.
    pub fn learned_overrides(&self) -> HashMap<String, String> {
        self.rules.overrides()
    }

    /// Aggregate statistics, recomputed from current state.
    pub fn get_learning_stats(&self) -> LearningStats {
        stats::compute_stats(&self.rules, &self.history)
    }

    /// Advisory suggestions derived from current state.
    pub fn suggest_improvements(&self) -> Vec<String> {
        stats::suggest_improvements(&self.rules, &self.history, &self.config, Utc::now())
    }

    /// Remove rules whose success rate is below `threshold` and persist.
    ///
    /// The correction history is untouched; it is immutable log data.
    pub fn prune_weak_rules(&mut self, threshold: f64) -> Result<usize> {
        let removed = self.rules.prune_below(threshold);
        if removed > 0 {
            info!("pruned {} weak rule(s)", removed);
            self.persist()?;
        }
        Ok(removed)
    }

    /// Export a snapshot of learned patterns and statistics to a JSON file.
    pub fn export_learned_patterns(&self, output_path: &Path) -> Result<()> {
        let recent_start = self.history.len().saturating_sub(EXPORT_RECENT_CORRECTIONS);
        let export = json!({
            "timestamp": Utc::now(),
            "statistics": self.get_learning_stats(),
            "patterns": self.rules.rules(),
            "recent_corrections": &self.history[recent_start..],
            "suggestions": self.suggest_improvements(),
        });

        let content = serde_json::to_string_pretty(&export)
            .map_err(|e| BulexError::Config(e.to_string()))?;
        fs::write(output_path, content)?;

        info!("exported learned patterns to {}", output_path.display());
        Ok(())
    }

    /// Full correction history, oldest first.
    pub fn history(&self) -> &[CorrectionRecord] {
        &self.history
    }

    /// Current rule store.
    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    fn persist(&self) -> Result<()> {
        let snapshot = Snapshot {
            rules: self.rules.rules().to_vec(),
            history: self.history.clone(),
            audit_log: self.audit_log.clone(),
        };
        self.store.save(&snapshot)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::persistence::MemoryStore;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "CENTRE DE SANTE SANTOS DUMONT\n\
276277025\n\
RUE SANTOS DUMONT\n\
BULLETIN DE SALAIRE\n\
Siret 87903653100017 Code Naf: 8690F\n\
Matricule: 00027\n\
No SS: 291069720980802\n\
Madame MORGAN MICHALET\n\
Salaire brut 10224.00\n\
Net payé 7142.72\n";

    fn empty_system() -> LearningSystem {
        let store = MemoryStore::with_snapshot(Snapshot {
            // A placeholder rule keeps `open` from seeding the default catalog
            rules: vec![PatternRule::seed("placeholder", "x", 0.1)],
            ..Default::default()
        });
        LearningSystem::open(Box::new(store), LearningConfig::default()).unwrap()
    }

    #[test]
    fn test_new_field_creates_rule_with_cue_pattern() {
        // Scenario: gross_salary has no rule yet and the value sits next to
        // its keyword cue in the text
        let mut system = empty_system();
        system
            .learn_from_correction(
                "gross_salary",
                "test_bulletin.pdf",
                "10224",
                "10224.00",
                SAMPLE,
                "",
            )
            .unwrap();

        let rule = system.rules().best_rule("gross_salary").unwrap();
        assert!(rule.success_rate > 0.0);
        assert_eq!(rule.usage_count, 1);
        assert_eq!(rule.priority, 1);

        let pattern = system.get_best_pattern("gross_salary");
        assert!(pattern.contains("brut") || pattern.contains("Salaire"));
    }

    #[test]
    fn test_weaker_candidate_does_not_replace_rule() {
        let mut system = empty_system();
        system.rules.insert(PatternRule {
            field_name: "company_name".to_string(),
            pattern: "existing".to_string(),
            priority: 2,
            success_rate: 0.8,
            usage_count: 3,
            last_used: None,
        });

        // Value absent from the text: literal fallback scores 0.0 < 0.8
        system
            .learn_from_correction(
                "company_name",
                "doc.pdf",
                "WRONG NAME",
                "NOT IN TEXT",
                SAMPLE,
                "",
            )
            .unwrap();

        let rule = system.rules().best_rule("company_name").unwrap();
        assert_eq!(rule.pattern, "existing");
        assert_eq!(rule.success_rate, 0.8);
        assert_eq!(rule.priority, 2);
        assert_eq!(rule.usage_count, 4);
    }

    #[test]
    fn test_stronger_candidate_replaces_rule() {
        let mut system = empty_system();
        system.rules.insert(PatternRule {
            field_name: "matricule".to_string(),
            pattern: "stale".to_string(),
            priority: 1,
            success_rate: 0.3,
            usage_count: 1,
            last_used: None,
        });

        system
            .learn_from_correction("matricule", "doc.pdf", "27", "00027", SAMPLE, "")
            .unwrap();

        let rule = system.rules().best_rule("matricule").unwrap();
        assert_ne!(rule.pattern, "stale");
        assert!(rule.success_rate > 0.3);
        assert_eq!(rule.priority, 2);
        assert_eq!(rule.usage_count, 2);
        assert!(rule.last_used.is_some());
    }

    #[test]
    fn test_success_rate_never_decreases() {
        let mut system = empty_system();

        system
            .learn_from_correction("net_paid", "a.pdf", "", "7142.72", SAMPLE, "")
            .unwrap();
        let first = system.rules().best_rule("net_paid").unwrap().success_rate;

        // Second correction with a value absent from the text scores 0.0
        system
            .learn_from_correction("net_paid", "b.pdf", "", "9999.99", SAMPLE, "")
            .unwrap();
        let second = system.rules().best_rule("net_paid").unwrap().success_rate;

        assert!(second >= first);
    }

    #[test]
    fn test_empty_raw_text_records_fallback_with_zero_confidence() {
        let mut system = empty_system();
        let record = system
            .learn_from_correction("company_name", "doc.pdf", "", "ACME", "", "")
            .unwrap();

        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.new_pattern, "ACME");
    }

    #[test]
    fn test_history_is_append_only() {
        let mut system = empty_system();
        assert_eq!(system.history().len(), 0);

        for i in 0..4 {
            system
                .learn_from_correction(
                    "gross_salary",
                    &format!("doc{}.pdf", i),
                    "",
                    "10224.00",
                    SAMPLE,
                    "",
                )
                .unwrap();
        }

        assert_eq!(system.history().len(), 4);
    }

    #[test]
    fn test_noop_correction_still_processed() {
        let mut system = empty_system();
        system
            .learn_from_correction("matricule", "doc.pdf", "00027", "00027", SAMPLE, "")
            .unwrap();

        assert_eq!(system.history().len(), 1);
        assert_eq!(system.rules().best_rule("matricule").unwrap().usage_count, 1);
    }

    #[test]
    fn test_best_pattern_idempotent_between_corrections() {
        let mut system = empty_system();
        system
            .learn_from_correction("siret", "doc.pdf", "", "87903653100017", SAMPLE, "")
            .unwrap();

        assert_eq!(system.get_best_pattern("siret"), system.get_best_pattern("siret"));
    }

    #[test]
    fn test_stats_reflect_corrections() {
        let mut system = empty_system();
        system
            .learn_from_correction("gross_salary", "a.pdf", "", "10224.00", SAMPLE, "")
            .unwrap();
        system
            .learn_from_correction("net_paid", "a.pdf", "", "7142.72", SAMPLE, "")
            .unwrap();

        let stats = system.get_learning_stats();
        assert_eq!(stats.total_corrections, 2);
        assert_eq!(stats.fields_learned, 2);
        assert!(stats.average_confidence > 0.0);
        assert!(stats.last_learning.is_some());
    }

    #[test]
    fn test_recent_volume_advisory() {
        // 6 corrections on the same day trip the >5-in-7-days signal
        let mut system = empty_system();
        let fields = [
            "gross_salary",
            "net_paid",
            "siret",
            "matricule",
            "company_name",
            "naf_code",
        ];
        for (i, field) in fields.iter().enumerate() {
            system
                .learn_from_correction(field, &format!("doc{}.pdf", i), "", "10224.00", SAMPLE, "")
                .unwrap();
        }

        let suggestions = system.suggest_improvements();
        assert!(
            suggestions
                .iter()
                .any(|s| s.contains("corrections in the last 7 days")),
            "suggestions were: {:?}",
            suggestions
        );
    }

    #[test]
    fn test_state_survives_reload() {
        let store = MemoryStore::new();
        let snapshot_store: Box<dyn LearningStore> = Box::new(store);

        // MemoryStore is consumed by the system; share state via save/load
        let mut system =
            LearningSystem::open(snapshot_store, LearningConfig::default()).unwrap();
        system
            .learn_from_correction("gross_salary", "doc.pdf", "", "10224.00", SAMPLE, "feedback")
            .unwrap();

        let persisted = system.store.load().unwrap();
        assert!(!persisted.rules.is_empty());
        assert_eq!(persisted.history.len(), 1);
        assert_eq!(persisted.history[0].user_feedback, "feedback");
        assert_eq!(persisted.audit_log.len(), 1);
        assert_eq!(persisted.audit_log[0].field, "gross_salary");
    }

    #[test]
    fn test_prune_weak_rules_keeps_history() {
        let mut system = empty_system();
        system
            .learn_from_correction("company_name", "doc.pdf", "", "NOT IN TEXT", SAMPLE, "")
            .unwrap();

        // The zero-confidence rule just learned is pruned, the record stays
        let removed = system.prune_weak_rules(0.05).unwrap();
        assert!(removed >= 1);
        assert_eq!(system.history().len(), 1);
        assert_eq!(system.get_best_pattern("company_name"), "");
    }

    #[test]
    fn test_export_learned_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let mut system = empty_system();
        system
            .learn_from_correction("gross_salary", "doc.pdf", "", "10224.00", SAMPLE, "")
            .unwrap();
        system.export_learned_patterns(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let export: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(export["statistics"]["total_corrections"].as_u64().unwrap() == 1);
        assert!(export["patterns"].as_array().unwrap().len() >= 1);
        assert_eq!(export["recent_corrections"].as_array().unwrap().len(), 1);
    }
}
