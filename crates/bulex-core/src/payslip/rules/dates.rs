//! Date and pay-period extraction for French payslips.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_FRENCH_LONG, PAYMENT_DATE, PERIOD, START_DATE};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::payslip::PayPeriod;

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // DD/MM/YYYY or DD.MM.YYYY or DD-MM-YYYY
        for caps in DATE_DMY.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = parse_year(&caps[3]);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(date, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // French long format: "15 janvier 2024"
        for caps in DATE_FRENCH_LONG.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = french_month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                if results.iter().any(|r| r.value == date) {
                    continue;
                }

                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(date, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Labeled dates found on a payslip.
#[derive(Debug, Clone, Default)]
pub struct PayslipDates {
    /// Hire date (Entrée).
    pub start_date: Option<ExtractionMatch<NaiveDate>>,
    /// Payment date (Paiement le).
    pub payment_date: Option<ExtractionMatch<NaiveDate>>,
}

/// Extract labeled dates from payslip text.
pub fn extract_payslip_dates(text: &str) -> PayslipDates {
    let mut result = PayslipDates::default();
    let date_extractor = DateExtractor::new();

    if let Some(caps) = START_DATE.captures(text) {
        let date_text = &caps[1];
        if let Some(date) = date_extractor.extract(date_text) {
            result.start_date = Some(ExtractionMatch::new(date.value, 0.95, date_text));
        }
    }

    if let Some(caps) = PAYMENT_DATE.captures(text) {
        let date_text = &caps[1];
        if let Some(date) = date_extractor.extract(date_text) {
            result.payment_date = Some(ExtractionMatch::new(date.value, 0.95, date_text));
        }
    }

    result
}

/// Extract the pay period ("Période MARS 2024").
pub fn extract_period(text: &str) -> PayPeriod {
    let mut period = PayPeriod::default();

    if let Some(caps) = PERIOD.captures(text) {
        let label = caps[1].trim().to_string();
        let mut parts = label.rsplitn(2, ' ');
        let year = parts.next().and_then(|y| y.parse::<i32>().ok());
        let month = parts.next().map(|m| m.to_string());

        period.label = Some(label);
        period.month = month;
        period.year = year;
    }

    period
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn french_month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => 0,
    }
}
