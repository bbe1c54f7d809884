//! Rule-based payslip parser.
//!
//! Static patterns cover the common bulletin layouts; patterns learned from
//! user corrections override the static ones field by field.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::models::payslip::*;

use super::rules::{
    amounts::{extract_contributions, extract_salary_elements, parse_french_amount},
    dates::{extract_payslip_dates, extract_period, DateExtractor},
    identifiers::{
        extract_matricule, extract_naf_code, extract_nir, extract_urssaf, siren_from_siret,
        validate_nir, SiretExtractor,
    },
    patterns::*,
    FieldExtractor,
};
use super::Result;

/// Result of payslip extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted payslip data.
    pub payslip: Payslip,
    /// Raw source text.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for payslip parsing.
pub trait PayslipParser {
    /// Parse payslip fields from raw text.
    fn parse(&self, document_id: &str, text: &str) -> Result<ExtractionResult>;
}

/// Rule-based payslip parser.
pub struct RuleBasedParser {
    /// Whether to validate SIRET checksums.
    validate_siret: bool,
    /// Whether to validate the NIR key.
    validate_nir: bool,
    /// Minimum extractor confidence to accept a field.
    min_confidence: f32,
    /// Learned pattern overrides, field name -> pattern.
    overrides: HashMap<String, String>,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            validate_siret: true,
            validate_nir: true,
            min_confidence: 0.0,
            overrides: HashMap::new(),
        }
    }

    /// Set SIRET validation.
    pub fn with_siret_validation(mut self, validate: bool) -> Self {
        self.validate_siret = validate;
        self
    }

    /// Set NIR key validation. An extracted number failing the key is dropped.
    pub fn with_nir_validation(mut self, validate: bool) -> Self {
        self.validate_nir = validate;
        self
    }

    /// Discard extractor matches whose confidence is below `min`.
    ///
    /// Applies to fields whose extractor reports a confidence (SIRET, labeled
    /// dates); learned overrides and plain labeled patterns are unaffected.
    pub fn with_min_confidence(mut self, min: f32) -> Self {
        self.min_confidence = min;
        self
    }

    /// Supply learned pattern overrides from the rule store.
    ///
    /// An override takes precedence over the static pattern for its field.
    pub fn with_learned_patterns(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Apply the learned override for a field, if any.
    ///
    /// A pattern that fails to compile or does not match is skipped, never an
    /// error; the static pattern then applies.
    fn learned_value(&self, field_name: &str, text: &str) -> Option<String> {
        let pattern = self.overrides.get(field_name)?;

        let re = match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                warn!("learned pattern for {} does not compile: {}", field_name, e);
                return None;
            }
        };

        let caps = re.captures(text)?;
        let value = caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or_else(|| caps.get(0).map(|m| m.as_str()).unwrap_or(""));
        let value = value.trim();

        if value.is_empty() {
            None
        } else {
            debug!("field {} resolved by learned pattern", field_name);
            Some(value.to_string())
        }
    }

    fn learned_amount(&self, field_name: &str, text: &str) -> Option<rust_decimal::Decimal> {
        self.learned_value(field_name, text)
            .and_then(|v| parse_french_amount(&v))
    }

    fn learned_date(&self, field_name: &str, text: &str) -> Option<NaiveDate> {
        let value = self.learned_value(field_name, text)?;
        DateExtractor::new().extract(&value).map(|m| m.value)
    }

    fn extract_employer(&self, text: &str) -> EmployerInfo {
        let mut employer = EmployerInfo::default();

        employer.company_name = self
            .learned_value("company_name", text)
            .or_else(|| COMPANY_NAME.captures(text).map(|c| c[1].trim().to_string()));

        employer.siret = self.learned_value("siret", text).or_else(|| {
            SiretExtractor::new()
                .with_validation(self.validate_siret)
                .extract_all(text)
                .into_iter()
                .find(|m| m.confidence >= self.min_confidence)
                .map(|m| m.value)
        });
        employer.siren = employer.siret.as_deref().and_then(siren_from_siret);

        employer.naf_code = self
            .learned_value("naf_code", text)
            .or_else(|| extract_naf_code(text));
        employer.urssaf_number = self
            .learned_value("urssaf_number", text)
            .or_else(|| extract_urssaf(text));

        employer
    }

    fn extract_employee(&self, text: &str) -> EmployeeInfo {
        let mut employee = EmployeeInfo::default();

        if let Some(caps) = CIVILITY_NAME.captures(text) {
            employee.title = Some(caps[1].to_string());
            employee.full_name = Some(caps[2].trim().to_string());
        }
        if let Some(name) = self.learned_value("full_name", text) {
            employee.full_name = Some(name);
        }

        employee.matricule = self
            .learned_value("matricule", text)
            .or_else(|| extract_matricule(text));

        let nir = self
            .learned_value("social_security", text)
            .or_else(|| extract_nir(text));
        employee.social_security_number = match nir {
            Some(n) if self.validate_nir && !validate_nir(&n) => {
                warn!("dropping social security number with bad key: {}", n);
                None
            }
            other => other,
        };

        employee
    }

    fn extract_employment(&self, text: &str) -> EmploymentDetails {
        let dates = extract_payslip_dates(text);

        EmploymentDetails {
            job_title: JOB_TITLE.captures(text).map(|c| c[1].trim().to_string()),
            start_date: self.learned_date("start_date", text).or(dates
                .start_date
                .filter(|m| m.confidence >= self.min_confidence)
                .map(|m| m.value)),
            seniority: SENIORITY.captures(text).map(|c| c[1].trim().to_string()),
        }
    }

    fn extract_leave(&self, text: &str) -> LeaveBalances {
        // Balances only make sense inside the leave table; a bare "Solde"
        // elsewhere on the slip would be noise
        let section = match LEAVE_SECTION.find(text) {
            Some(m) => m.as_str(),
            None => return LeaveBalances::default(),
        };

        LeaveBalances {
            acquired: LEAVE_ACQUIRED
                .captures(section)
                .and_then(|c| parse_french_amount(&c[1])),
            taken: LEAVE_TAKEN
                .captures(section)
                .and_then(|c| parse_french_amount(&c[1])),
            remaining: LEAVE_REMAINING
                .captures(section)
                .and_then(|c| parse_french_amount(&c[1])),
        }
    }

    fn extract_totals(&self, text: &str) -> Totals {
        Totals {
            ss_ceiling_monthly: SS_CEILING
                .captures(text)
                .and_then(|c| parse_french_amount(&c[1])),
            taxable_net: TAXABLE_NET
                .captures(text)
                .and_then(|c| parse_french_amount(&c[1])),
            employer_charges: EMPLOYER_CHARGES
                .captures(text)
                .and_then(|c| parse_french_amount(&c[1])),
        }
    }

    fn extract_payment(&self, text: &str) -> PaymentInfo {
        let dates = extract_payslip_dates(text);

        PaymentInfo {
            payment_date: self.learned_date("payment_date", text).or(dates
                .payment_date
                .filter(|m| m.confidence >= self.min_confidence)
                .map(|m| m.value)),
            payment_method: PAYMENT_METHOD.captures(text).map(|c| c[1].to_string()),
        }
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PayslipParser for RuleBasedParser {
    fn parse(&self, document_id: &str, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        debug!("parsing payslip {} ({} chars)", document_id, text.len());

        let mut salary = extract_salary_elements(text);
        if let Some(amount) = self.learned_amount("base_salary", text) {
            salary.base_salary = Some(amount);
        }
        if let Some(amount) = self.learned_amount("gross_salary", text) {
            salary.gross_salary = Some(amount);
        }
        if let Some(amount) = self.learned_amount("net_before_tax", text) {
            salary.net_before_tax = Some(amount);
        }
        if let Some(amount) = self.learned_amount("net_paid", text) {
            salary.net_paid = Some(amount);
        }
        if let Some(amount) = self.learned_amount("social_net", text) {
            salary.social_net = Some(amount);
        }

        let payslip = Payslip {
            metadata: ExtractionMetadata {
                document_id: document_id.to_string(),
                extracted_at: Some(Utc::now()),
                warnings: Vec::new(),
            },
            employer: self.extract_employer(text),
            employee: self.extract_employee(text),
            employment: self.extract_employment(text),
            period: extract_period(text),
            salary,
            contributions: extract_contributions(text),
            leave: self.extract_leave(text),
            totals: self.extract_totals(text),
            payment: self.extract_payment(text),
        };

        let warnings = payslip.validate();

        Ok(ExtractionResult {
            payslip,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE: &str = "CENTRE DE SANTE SANTOS DUMONT\n\
276277025\n\
RUE SANTOS DUMONT\n\
BULLETIN DE SALAIRE\n\
27930 GUICHAINVILLE\n\
Siret 35600000000048 Code Naf: 8690F\n\
Matricule: 00027\n\
No SS: 291069720980802\n\
Madame MORGAN MICHALET\n\
Période MARS 2024\n\
Entrée: 01/09/2019\n\
Salaire brut 10224.00\n\
Net payé 7142.72\n\
Paiement le 28/03/2024 par Virement\n";

    #[test]
    fn test_parse_sample_bulletin() {
        let parser = RuleBasedParser::new();
        let result = parser.parse("test_bulletin.pdf", SAMPLE).unwrap();
        let payslip = &result.payslip;

        assert_eq!(
            payslip.employer.company_name.as_deref(),
            Some("CENTRE DE SANTE SANTOS DUMONT")
        );
        assert_eq!(payslip.employer.siret.as_deref(), Some("35600000000048"));
        assert_eq!(payslip.employer.siren.as_deref(), Some("356000000"));
        assert_eq!(payslip.employer.naf_code.as_deref(), Some("8690F"));
        assert_eq!(payslip.employee.matricule.as_deref(), Some("00027"));
        assert_eq!(
            payslip.employee.social_security_number.as_deref(),
            Some("291069720980802")
        );
        assert_eq!(payslip.employee.full_name.as_deref(), Some("MORGAN MICHALET"));
        assert_eq!(payslip.period.label.as_deref(), Some("MARS 2024"));
        assert_eq!(
            payslip.salary.gross_salary,
            Some(Decimal::from_str("10224.00").unwrap())
        );
        assert_eq!(
            payslip.salary.net_paid,
            Some(Decimal::from_str("7142.72").unwrap())
        );
        assert_eq!(payslip.payment.payment_method.as_deref(), Some("Virement"));
    }

    #[test]
    fn test_parse_empty_text() {
        let parser = RuleBasedParser::new();
        let result = parser.parse("empty.pdf", "").unwrap();

        assert!(result.payslip.employer.company_name.is_none());
        assert!(result.payslip.salary.gross_salary.is_none());
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_learned_pattern_overrides_static() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "matricule".to_string(),
            r"Matricule\s*:?\s*0*([0-9]+)".to_string(),
        );

        let parser = RuleBasedParser::new().with_learned_patterns(overrides);
        let result = parser.parse("test.pdf", SAMPLE).unwrap();

        // Learned pattern strips the leading zeros the static one keeps
        assert_eq!(result.payslip.employee.matricule.as_deref(), Some("27"));
    }

    #[test]
    fn test_min_confidence_filters_standalone_siret() {
        // A bare 14-digit run carries lower confidence than a labeled SIRET
        let text = "quelque part 35600000000048 dans le texte";

        let lax = RuleBasedParser::new().parse("t.pdf", text).unwrap();
        assert_eq!(
            lax.payslip.employer.siret.as_deref(),
            Some("35600000000048")
        );

        let strict = RuleBasedParser::new().with_min_confidence(0.8);
        let result = strict.parse("t.pdf", text).unwrap();
        assert!(result.payslip.employer.siret.is_none());
    }

    #[test]
    fn test_invalid_nir_dropped_when_validating() {
        // Key should be 02; 03 fails the mod-97 check
        let text = "No SS: 291069720980803";

        let parser = RuleBasedParser::new();
        let result = parser.parse("t.pdf", text).unwrap();
        assert!(result.payslip.employee.social_security_number.is_none());

        let lax = RuleBasedParser::new().with_nir_validation(false);
        let result = lax.parse("t.pdf", text).unwrap();
        assert_eq!(
            result.payslip.employee.social_security_number.as_deref(),
            Some("291069720980803")
        );
    }

    #[test]
    fn test_learned_nir_with_bad_key_dropped() {
        // A learned override capturing arbitrary digits must not survive
        // key validation
        let mut overrides = HashMap::new();
        overrides.insert(
            "social_security".to_string(),
            r"No SS: ([0-9]+)".to_string(),
        );

        let parser = RuleBasedParser::new().with_learned_patterns(overrides);
        let result = parser.parse("t.pdf", "No SS: 111111111111111").unwrap();
        assert!(result.payslip.employee.social_security_number.is_none());
    }

    #[test]
    fn test_malformed_learned_pattern_falls_back() {
        let mut overrides = HashMap::new();
        overrides.insert("matricule".to_string(), r"Matricule ([0-9".to_string());

        let parser = RuleBasedParser::new().with_learned_patterns(overrides);
        let result = parser.parse("test.pdf", SAMPLE).unwrap();

        assert_eq!(result.payslip.employee.matricule.as_deref(), Some("00027"));
    }
}
