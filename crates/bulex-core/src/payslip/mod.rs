//! Payslip field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, PayslipParser, RuleBasedParser};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// The fixed catalog of extractable field names.
///
/// This is the schema the learning subsystem keys its rules on; the names
/// match the sections of [`crate::models::payslip::Payslip`].
pub const FIELD_CATALOG: &[&str] = &[
    // Employer
    "company_name",
    "siret",
    "naf_code",
    "urssaf_number",
    // Employee
    "full_name",
    "matricule",
    "social_security",
    // Salary
    "base_salary",
    "gross_salary",
    "net_before_tax",
    "net_paid",
    "social_net",
    // Dates
    "start_date",
    "payment_date",
    "period",
];
