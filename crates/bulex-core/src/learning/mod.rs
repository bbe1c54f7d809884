//! Correction-driven pattern learning.
//!
//! When a user corrects an extracted field, the subsystem inspects the text
//! around the corrected value, synthesizes candidate extraction patterns,
//! scores how reliably the best candidate isolates the value, and replaces the
//! stored rule for that field when the new pattern scores higher. Every
//! correction is appended to an immutable history and mirrored into an audit
//! log.

pub mod confidence;
pub mod coordinator;
pub mod persistence;
pub mod record;
pub mod rule;
pub mod stats;
pub mod synthesizer;

pub use confidence::ConfidenceScorer;
pub use coordinator::LearningSystem;
pub use persistence::{JsonFileStore, LearningStore, MemoryStore, Snapshot};
pub use record::{AuditEntry, CorrectionRecord};
pub use rule::{default_rules, PatternRule, RuleStore};
pub use stats::{FieldStats, LearningStats};
pub use synthesizer::RuleSynthesizer;
