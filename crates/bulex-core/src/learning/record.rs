//! Correction history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted user correction.
///
/// Records are created once and appended to the history; nothing mutates or
/// deletes them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// Field the correction applies to.
    pub field_name: String,

    /// Identifier of the source document.
    pub document_id: String,

    /// Value the extractor produced.
    pub original_value: String,

    /// Value the user asserted as correct.
    pub corrected_value: String,

    /// Pattern that was active before this correction (empty if none).
    pub pattern_found: String,

    /// Pattern synthesized from this correction.
    pub new_pattern: String,

    /// Confidence computed for the new pattern, in [0, 1].
    pub confidence: f64,

    /// When the correction was processed.
    pub timestamp: DateTime<Utc>,

    /// Free-text feedback from the user.
    #[serde(default)]
    pub user_feedback: String,
}

/// Audit-log mirror of a correction, the subset exposed to external consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub field: String,
    pub document: String,
    pub original: String,
    pub corrected: String,
    pub confidence: f64,
    #[serde(default)]
    pub user_feedback: String,
}

impl AuditEntry {
    /// Build the audit mirror of a correction record.
    pub fn from_record(record: &CorrectionRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            field: record.field_name.clone(),
            document: record.document_id.clone(),
            original: record.original_value.clone(),
            corrected: record.corrected_value.clone(),
            confidence: record.confidence,
            user_feedback: record.user_feedback.clone(),
        }
    }
}
