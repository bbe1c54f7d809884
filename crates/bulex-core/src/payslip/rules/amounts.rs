//! Amount extraction for French payslips.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    AMOUNT_PATTERN, BASE_SALARY, CSG_DEDUCTIBLE, CSG_NON_DEDUCTIBLE, GROSS_SALARY,
    HEALTH_INSURANCE, NET_BEFORE_TAX, NET_PAID, PENSION_CAPPED, PENSION_UNCAPPED, SOCIAL_NET,
    SOLIDARITY, UNEMPLOYMENT,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::payslip::{SalaryElements, SocialContributions};

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_PATTERN.captures_iter(text) {
            let integer_part = caps[1].replace([' ', '\u{00a0}'], "");
            let decimal_part = &caps[2];

            let amount_str = format!("{}.{}", integer_part, decimal_part);
            if let Ok(amount) = Decimal::from_str(&amount_str) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(amount, 0.8, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract salary elements from payslip text.
pub fn extract_salary_elements(text: &str) -> SalaryElements {
    SalaryElements {
        base_salary: labeled_amount(&BASE_SALARY, text),
        gross_salary: labeled_amount(&GROSS_SALARY, text),
        net_before_tax: labeled_amount(&NET_BEFORE_TAX, text),
        net_paid: labeled_amount(&NET_PAID, text),
        social_net: labeled_amount(&SOCIAL_NET, text),
    }
}

/// Extract social contribution lines from payslip text.
pub fn extract_contributions(text: &str) -> SocialContributions {
    SocialContributions {
        health_insurance: labeled_amount(&HEALTH_INSURANCE, text),
        solidarity_contribution: labeled_amount(&SOLIDARITY, text),
        pension_capped: labeled_amount(&PENSION_CAPPED, text),
        pension_uncapped: labeled_amount(&PENSION_UNCAPPED, text),
        unemployment_insurance: labeled_amount(&UNEMPLOYMENT, text),
        csg_deductible: labeled_amount(&CSG_DEDUCTIBLE, text),
        csg_non_deductible: labeled_amount(&CSG_NON_DEDUCTIBLE, text),
    }
}

/// Apply a labeled amount pattern and parse its first capture group.
pub fn labeled_amount(pattern: &regex::Regex, text: &str) -> Option<Decimal> {
    pattern
        .captures(text)
        .and_then(|caps| parse_french_amount(&caps[1]))
}

/// Parse a French-formatted amount (e.g. "1 234,56", "10 224.00", "10224.00").
///
/// OCR frequently inserts spaces inside digit runs; all whitespace is stripped
/// before parsing. A trailing comma or dot group of two digits is the decimal
/// part.
pub fn parse_french_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else if cleaned.contains(',') && cleaned.contains('.') {
        // Whichever separator comes last is the decimal one
        let comma_pos = cleaned.rfind(',');
        let dot_pos = cleaned.rfind('.');
        match (comma_pos, dot_pos) {
            (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            _ => cleaned,
        }
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Format amount in French style (1 234,56).
pub fn format_french_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let parts: Vec<&str> = s.split('.').collect();

    if parts.len() != 2 {
        return s;
    }

    let integer_part = parts[0];
    let decimal_part = parts[1];

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
