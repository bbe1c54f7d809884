//! Core library for French payslip extraction.
//!
//! This crate provides:
//! - PDF text ingestion (embedded text; scanned pages go through an external OCR step)
//! - French payslip field extraction (SIRET, NIR, salary lines, contributions, dates)
//! - Typed payslip data models
//! - A correction-driven learning subsystem that synthesizes and ranks new
//!   extraction patterns from user corrections

pub mod error;
pub mod learning;
pub mod models;
pub mod payslip;
pub mod pdf;

pub use error::{BulexError, PersistenceError, Result};
pub use learning::{
    ConfidenceScorer, CorrectionRecord, JsonFileStore, LearningStats, LearningStore,
    LearningSystem, MemoryStore, PatternRule, RuleStore, RuleSynthesizer, Snapshot,
};
pub use models::config::BulexConfig;
pub use models::payslip::{Payslip, SalaryElements, SocialContributions};
pub use payslip::{ExtractionResult, PayslipParser, RuleBasedParser, FIELD_CATALOG};
pub use pdf::{PdfContent, PdfExtractor, PdfType};
