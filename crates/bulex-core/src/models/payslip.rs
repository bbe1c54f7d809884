//! Typed payslip data models.
//!
//! Each section of a French bulletin de salaire gets its own struct with named
//! optional fields; extraction fills in whatever the document yields.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete payslip representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payslip {
    /// Extraction metadata.
    pub metadata: ExtractionMetadata,

    /// Employer identity and registration numbers.
    pub employer: EmployerInfo,

    /// Employee identity.
    pub employee: EmployeeInfo,

    /// Employment details (job, seniority).
    pub employment: EmploymentDetails,

    /// Pay period covered by this payslip.
    pub period: PayPeriod,

    /// Salary components.
    pub salary: SalaryElements,

    /// Social contribution lines.
    pub contributions: SocialContributions,

    /// Paid-leave balances.
    pub leave: LeaveBalances,

    /// Totals and ceilings.
    pub totals: Totals,

    /// Payment details.
    pub payment: PaymentInfo,
}

/// Metadata about the extraction itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Identifier of the source document (usually the file name).
    pub document_id: String,

    /// When extraction ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,

    /// Non-fatal issues encountered during extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Employer identity section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployerInfo {
    /// Full legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Address as a single string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// SIRET establishment number (14 digits).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siret: Option<String>,

    /// SIREN company number (first 9 digits of the SIRET).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub siren: Option<String>,

    /// NAF/APE activity code (e.g. "8690F").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naf_code: Option<String>,

    /// URSSAF or MSA registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urssaf_number: Option<String>,
}

/// Employee identity section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeInfo {
    /// Full name as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Civility ("Madame", "Monsieur", "M.", "Mme").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Internal payroll identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,

    /// Social security number (NIR, 15 digits including the key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<String>,

    /// Address as a single string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Employment details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmploymentDetails {
    /// Job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// Hire date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Seniority as printed (e.g. "3 ans et 2 mois").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
}

/// Pay period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Period label as printed (e.g. "MARS 2024").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Month name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    /// Year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Salary components.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryElements {
    /// Base salary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<Decimal>,

    /// Gross salary (salaire brut).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_salary: Option<Decimal>,

    /// Net before income tax (net à payer avant impôt).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_before_tax: Option<Decimal>,

    /// Net actually paid (net payé).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_paid: Option<Decimal>,

    /// Montant net social.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_net: Option<Decimal>,
}

/// Social contribution lines (employee share).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialContributions {
    /// Maladie-maternité.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_insurance: Option<Decimal>,

    /// Contribution solidarité autonomie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solidarity_contribution: Option<Decimal>,

    /// Vieillesse plafonnée.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension_capped: Option<Decimal>,

    /// Vieillesse déplafonnée.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension_uncapped: Option<Decimal>,

    /// Assurance chômage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unemployment_insurance: Option<Decimal>,

    /// CSG déductible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csg_deductible: Option<Decimal>,

    /// CSG/CRDS non déductible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csg_non_deductible: Option<Decimal>,
}

/// Paid-leave balances in days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveBalances {
    /// Days acquired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquired: Option<Decimal>,

    /// Days taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken: Option<Decimal>,

    /// Remaining balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Decimal>,
}

/// Totals and ceilings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Monthly social security ceiling (plafond S.S.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ss_ceiling_monthly: Option<Decimal>,

    /// Taxable net.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable_net: Option<Decimal>,

    /// Employer-side charges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_charges: Option<Decimal>,
}

/// Payment details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Date the salary was paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,

    /// Payment method ("Virement", "Chèque", "Espèces").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Payslip {
    /// Validate extracted data, returning a list of advisory issues.
    ///
    /// Issues are warnings only; an extraction with issues is still usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.employer.company_name.is_none() {
            issues.push("missing employer name".to_string());
        }

        if let Some(siret) = &self.employer.siret {
            if !crate::payslip::rules::identifiers::validate_siret(siret) {
                issues.push(format!("SIRET checksum failed: {}", siret));
            }
        } else {
            issues.push("missing SIRET".to_string());
        }

        if let Some(siren) = &self.employer.siren {
            if !crate::payslip::rules::identifiers::validate_siren(siren) {
                issues.push(format!("SIREN checksum failed: {}", siren));
            }
        }

        if let Some(nir) = &self.employee.social_security_number {
            if !crate::payslip::rules::identifiers::validate_nir(nir) {
                issues.push(format!("social security number key failed: {}", nir));
            }
        }

        if let (Some(gross), Some(net)) = (self.salary.gross_salary, self.salary.net_paid) {
            if net > gross {
                issues.push(format!("net paid {} exceeds gross salary {}", net, gross));
            }
        }

        if self.salary.gross_salary.is_none() && self.salary.net_paid.is_none() {
            issues.push("no salary amounts extracted".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_net_exceeds_gross() {
        let mut payslip = Payslip::default();
        payslip.employer.company_name = Some("CENTRE DE SANTE".to_string());
        payslip.employer.siret = Some("87903653100017".to_string());
        payslip.salary.gross_salary = Some(Decimal::from_str("1000.00").unwrap());
        payslip.salary.net_paid = Some(Decimal::from_str("1200.00").unwrap());

        let issues = payslip.validate();
        assert!(issues.iter().any(|i| i.contains("exceeds gross")));
    }

    #[test]
    fn test_validate_missing_fields() {
        let payslip = Payslip::default();
        let issues = payslip.validate();
        assert!(issues.iter().any(|i| i.contains("employer name")));
        assert!(issues.iter().any(|i| i.contains("SIRET")));
        assert!(issues.iter().any(|i| i.contains("salary amounts")));
    }

    #[test]
    fn test_validate_siren_checksum() {
        let mut payslip = Payslip::default();
        payslip.employer.siren = Some("356000001".to_string());

        let issues = payslip.validate();
        assert!(issues.iter().any(|i| i.contains("SIREN checksum")));

        payslip.employer.siren = Some("356000000".to_string());
        let issues = payslip.validate();
        assert!(!issues.iter().any(|i| i.contains("SIREN checksum")));
    }

    #[test]
    fn test_validate_nir_key() {
        let mut payslip = Payslip::default();
        // A learned override can capture arbitrary text into this field; the
        // key check must reject it without panicking
        payslip.employee.social_security_number = Some("000000A00000000".to_string());

        let issues = payslip.validate();
        assert!(issues.iter().any(|i| i.contains("social security")));
    }

    #[test]
    fn test_serde_skips_empty_fields() {
        let payslip = Payslip::default();
        let json = serde_json::to_string(&payslip).unwrap();
        assert!(!json.contains("gross_salary"));
        assert!(!json.contains("siret"));
    }
}
