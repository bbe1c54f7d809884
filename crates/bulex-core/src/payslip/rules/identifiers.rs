//! French registration number extraction and validation.
//!
//! Covers the SIRET/SIREN (employer), NAF activity code, payroll matricule,
//! and the NIR social security number with its mod-97 key.

use super::patterns::{MATRICULE, NAF_CODE, NIR_PATTERN, SIRET_PATTERN, SIRET_STANDALONE, URSSAF_NUMBER};
use super::{ExtractionMatch, FieldExtractor};

/// SIRET field extractor.
pub struct SiretExtractor {
    validate: bool,
}

impl SiretExtractor {
    /// Create a new SIRET extractor.
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Set whether to validate SIRET checksums.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for SiretExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SiretExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // Labeled pattern first (higher confidence)
        for caps in SIRET_PATTERN.captures_iter(text) {
            let siret: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();

            if siret.len() == 14 && (!self.validate || validate_siret(&siret)) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(siret, 0.95, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // Standalone 14-digit runs (lower confidence)
        for caps in SIRET_STANDALONE.captures_iter(text) {
            let siret = caps[1].to_string();

            if results.iter().any(|r| r.value == siret) {
                continue;
            }

            if !self.validate || validate_siret(&siret) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(siret, 0.7, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract SIRET from text.
pub fn extract_siret(text: &str) -> Option<String> {
    SiretExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the NAF/APE activity code.
pub fn extract_naf_code(text: &str) -> Option<String> {
    NAF_CODE
        .captures(text)
        .map(|caps| caps[1].replace('.', ""))
}

/// Extract the URSSAF/MSA registration.
pub fn extract_urssaf(text: &str) -> Option<String> {
    URSSAF_NUMBER.captures(text).map(|caps| caps[1].to_string())
}

/// Extract the payroll matricule.
pub fn extract_matricule(text: &str) -> Option<String> {
    MATRICULE.captures(text).map(|caps| caps[1].to_string())
}

/// Extract the social security number (NIR).
pub fn extract_nir(text: &str) -> Option<String> {
    NIR_PATTERN
        .captures(text)
        .map(|caps| caps[1].replace(' ', ""))
}

/// Validate a SIRET (14 digits) using the Luhn algorithm.
pub fn validate_siret(siret: &str) -> bool {
    let digits: Vec<u32> = siret
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 14 {
        return false;
    }

    luhn_checksum(&digits) % 10 == 0
}

/// Validate a SIREN (9 digits) using the Luhn algorithm.
pub fn validate_siren(siren: &str) -> bool {
    let digits: Vec<u32> = siren
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 9 {
        return false;
    }

    luhn_checksum(&digits) % 10 == 0
}

/// Validate a NIR (15 characters) using the mod-97 key.
///
/// Corsican numbers carry 2A/2B in the department slot; per the INSEE rule the
/// letter becomes 0 and 1 000 000 (A) or 2 000 000 (B) is subtracted before
/// the modulo.
pub fn validate_nir(nir: &str) -> bool {
    let cleaned: String = nir
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    if cleaned.len() != 15 {
        return false;
    }

    let (number_part, key_part) = cleaned.split_at(13);
    let key: u64 = match key_part.parse() {
        Ok(k) => k,
        Err(_) => return false,
    };

    let normalized = if number_part.contains('A') {
        number_part.replacen('A', "0", 1)
    } else if number_part.contains('B') {
        number_part.replacen('B', "0", 1)
    } else {
        number_part.to_string()
    };

    let adjustment: u64 = if number_part.contains('A') {
        1_000_000
    } else if number_part.contains('B') {
        2_000_000
    } else {
        0
    };

    // A letter anywhere but the department slot leaves a digit part smaller
    // than the adjustment; that is not a NIR
    let number = match normalized
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_sub(adjustment))
    {
        Some(n) => n,
        None => return false,
    };

    97 - (number % 97) == key
}

/// Derive the SIREN (first 9 digits) from a SIRET.
pub fn siren_from_siret(siret: &str) -> Option<String> {
    let digits: String = siret.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 14 {
        Some(digits[0..9].to_string())
    } else {
        None
    }
}

fn luhn_checksum(digits: &[u32]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum()
}
