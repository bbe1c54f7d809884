//! Common regex patterns for French payslip extraction.
//!
//! OCR output for payslips routinely injects spaces inside digit runs, so the
//! amount patterns accept interior spaces and the parsers strip them later.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Employer identification
    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?:^|\n)([A-ZÀ-Ÿ][A-ZÀ-Ÿ &]{2,})\n[0-9]"
    ).unwrap();

    pub static ref SIRET_PATTERN: Regex = Regex::new(
        r"(?i)Siret\s*:?\s*([0-9][0-9 ]{12,18}[0-9])"
    ).unwrap();

    pub static ref SIRET_STANDALONE: Regex = Regex::new(
        r"\b([0-9]{14})\b"
    ).unwrap();

    pub static ref NAF_CODE: Regex = Regex::new(
        r"(?i)Code\s*Naf\s*:?\s*([0-9]{2}\.?[0-9]{2}[A-Z])"
    ).unwrap();

    pub static ref URSSAF_NUMBER: Regex = Regex::new(
        r"(?i)Urssaf(?:/Msa)?\s*:?\s*([0-9A-Z]+)"
    ).unwrap();

    // Employee identification
    pub static ref CIVILITY_NAME: Regex = Regex::new(
        r"(Madame|Monsieur|Mme|M\.)\s+([A-ZÀ-Ÿ][A-ZÀ-Ÿ \-]+)"
    ).unwrap();

    pub static ref MATRICULE: Regex = Regex::new(
        r"(?i)Matricule\s*:?\s*([0-9]+)"
    ).unwrap();

    pub static ref NIR_PATTERN: Regex = Regex::new(
        r"(?i)N[oº°]?\s*SS\s*:?\s*([12][0-9AB ]{12,20}[0-9])"
    ).unwrap();

    // Employment
    pub static ref JOB_TITLE: Regex = Regex::new(
        r"(?i)Emploi\s*-?\s*([A-ZÀ-Ÿ][A-ZÀ-Ÿ \-]+)"
    ).unwrap();

    pub static ref SENIORITY: Regex = Regex::new(
        r"(?i)Anciennet[ée]\s*:?\s*([0-9]+\s*ans?(?:\s*et\s*[0-9]+\s*mois)?)"
    ).unwrap();

    // Pay period
    pub static ref PERIOD: Regex = Regex::new(
        r"(?i)P[ée]riode\s+([A-ZÀ-Ÿa-zà-ÿ]+\s+[0-9]{4})"
    ).unwrap();

    // Amounts (French format: 1 234,56 or OCR-style 10224.00, spaces inside digits)
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d{1,3}(?:[\s\u{00a0}]?\d{3})*)[,.](\d{2})\b"
    ).unwrap();

    // Salary elements
    pub static ref BASE_SALARY: Regex = Regex::new(
        r"(?i)Salaire\s+de\s+base[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref GROSS_SALARY: Regex = Regex::new(
        r"(?i)Salaire\s+brut[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref NET_BEFORE_TAX: Regex = Regex::new(
        r"(?i)Net\s+[àa]\s+payer\s+avant\s+imp[ôo]t[^0-9]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref NET_PAID: Regex = Regex::new(
        r"(?i)Net\s+pay[ée]?[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref SOCIAL_NET: Regex = Regex::new(
        r"(?i)Montant\s+net\s+social[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    // Social contributions (employee share)
    pub static ref HEALTH_INSURANCE: Regex = Regex::new(
        r"(?i)Maladie\s+maternit[ée][^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref SOLIDARITY: Regex = Regex::new(
        r"(?i)Contribution\s+Solidarit[ée]\s+Autonomie[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref PENSION_UNCAPPED: Regex = Regex::new(
        r"(?i)Vieillesse\s+d[ée]plafonn[ée]e[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref PENSION_CAPPED: Regex = Regex::new(
        r"(?i)Vieillesse\s+plafonn[ée]e[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref UNEMPLOYMENT: Regex = Regex::new(
        r"(?i)Assurance\s+ch[ôo]mage[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref CSG_DEDUCTIBLE: Regex = Regex::new(
        r"(?i)CSG\s+d[ée]ductible[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref CSG_NON_DEDUCTIBLE: Regex = Regex::new(
        r"(?i)CSG(?:/CRDS)?\s+non\s+d[ée]ductible[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    // Totals
    pub static ref SS_CEILING: Regex = Regex::new(
        r"(?i)Plafond\s+S\.?S\.?[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref TAXABLE_NET: Regex = Regex::new(
        r"(?i)Net\s+imposable[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    pub static ref EMPLOYER_CHARGES: Regex = Regex::new(
        r"(?i)Charges\s+patronales[^0-9\n]*([0-9][0-9\s\u{00a0}]*[,.][0-9]{2})"
    ).unwrap();

    // Leave balances (Acquis / Pris / Solde table)
    pub static ref LEAVE_SECTION: Regex = Regex::new(
        r"(?is)Cong[ée]s.{0,400}?Solde[^0-9]*[0-9]"
    ).unwrap();

    pub static ref LEAVE_ACQUIRED: Regex = Regex::new(
        r"(?i)Acquis[^0-9]*([0-9]+(?:[,.][0-9]+)?)"
    ).unwrap();

    pub static ref LEAVE_TAKEN: Regex = Regex::new(
        r"(?i)Pris[^0-9]*([0-9]+(?:[,.][0-9]+)?)"
    ).unwrap();

    pub static ref LEAVE_REMAINING: Regex = Regex::new(
        r"(?i)Solde[^0-9]*([0-9]+(?:[,.][0-9]+)?)"
    ).unwrap();

    // Dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_FRENCH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(janvier|f[ée]vrier|mars|avril|mai|juin|juillet|ao[ûu]t|septembre|octobre|novembre|d[ée]cembre)\s+(\d{4})"
    ).unwrap();

    pub static ref START_DATE: Regex = Regex::new(
        r"(?i)Entr[ée]e\s*:?\s*([0-9]{2}/[0-9]{2}/[0-9]{4})"
    ).unwrap();

    pub static ref PAYMENT_DATE: Regex = Regex::new(
        r"(?i)Paiement\s+le\s+([0-9]{2}/[0-9]{2}/[0-9]{4})"
    ).unwrap();

    pub static ref PAYMENT_METHOD: Regex = Regex::new(
        r"(?i)par\s+(Ch[èe]que|Virement|Esp[èe]ces)"
    ).unwrap();

    // Address fragments
    pub static ref POSTAL_CODE_CITY: Regex = Regex::new(
        r"\b(\d{5})\s+([A-ZÀ-Ÿ][A-ZÀ-Ÿ \-]+)"
    ).unwrap();
}
