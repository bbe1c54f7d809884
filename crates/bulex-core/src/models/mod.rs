//! Data models for payslip extraction.

pub mod config;
pub mod payslip;
