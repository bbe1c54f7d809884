//! Candidate pattern synthesis from user corrections.

use tracing::debug;

/// Synthesizes candidate extraction patterns from a corrected value and the
/// raw document text.
///
/// Candidates come from the textual context of each occurrence of the value:
/// keyword cues known for the field, separators on the line, the preceding
/// line when the value stands alone, and a whitespace-tolerant variant for
/// numeric values. The literal escaped value is always the last-resort
/// candidate, so synthesis never returns an empty list and never fails.
pub struct RuleSynthesizer;

impl RuleSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Keyword cues expected near each field on a French payslip.
    fn field_cues(field_name: &str) -> &'static [&'static str] {
        match field_name {
            "company_name" => &["CENTRE", "SOCIETE", "ENTREPRISE", "SAS", "SARL"],
            "siret" => &["Siret", "SIRET"],
            "naf_code" => &["Naf", "NAF", "Code"],
            "matricule" => &["Matricule", "MATRICULE"],
            "social_security" => &["SS", "Sécurité", "sociale"],
            "gross_salary" => &["brut", "BRUT", "Salaire"],
            "net_paid" => &["Net", "NET", "payé"],
            "start_date" => &["Entrée", "ENTREE", "début"],
            "payment_date" => &["Paiement", "PAIEMENT", "versé"],
            _ => &[],
        }
    }

    /// Propose candidate patterns, most specific (longest) first.
    ///
    /// If the corrected value does not occur verbatim in the text — the user
    /// may have typed a normalized value while the source carries OCR noise —
    /// only the literal fallback is returned. That is a precision gap, not an
    /// error.
    pub fn synthesize(
        &self,
        field_name: &str,
        corrected_value: &str,
        raw_text: &str,
    ) -> Vec<String> {
        let value = corrected_value.trim();
        let mut candidates = Vec::new();

        if !value.is_empty() {
            let lines: Vec<&str> = raw_text.split('\n').collect();
            for (i, line) in lines.iter().enumerate() {
                if !line.contains(value) {
                    continue;
                }
                let before = if i > 0 { lines[i - 1].trim() } else { "" };
                candidates.extend(self.context_patterns(field_name, value, line, before));
            }
        }

        // Longest first; length is the specificity proxy
        candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        candidates.dedup();

        let fallback = regex::escape(value);
        if !candidates.contains(&fallback) {
            candidates.push(fallback);
        }

        debug!(
            "synthesized {} candidate(s) for {}",
            candidates.len(),
            field_name
        );
        candidates
    }

    /// Patterns derived from one occurrence of the value and its context.
    fn context_patterns(
        &self,
        field_name: &str,
        value: &str,
        current_line: &str,
        before_line: &str,
    ) -> Vec<String> {
        let mut patterns = Vec::new();
        let escaped = regex::escape(value);
        let line_lower = current_line.to_lowercase();

        // Keyword cue on the same line, capture around the value
        for cue in Self::field_cues(field_name) {
            if line_lower.contains(&cue.to_lowercase()) {
                patterns.push(format!(
                    r"{}\s*:?\s*([^\n]*{}[^\n]*)",
                    regex::escape(cue),
                    escaped
                ));
            }
        }

        // Value after a colon or equals sign, capture to end of line
        if current_line.contains(':') || current_line.contains('=') {
            patterns.push(format!(r"[^\n]*[:=]\s*([^\n]*{}[^\n]*)", escaped));
        }

        // Value alone on its line, anchored on the literal preceding line
        if current_line.trim() == value && !before_line.is_empty() {
            patterns.push(format!(
                "{}\\n\\s*({})",
                regex::escape(before_line),
                escaped
            ));
        }

        // Numeric value: tolerate OCR-injected whitespace inside digit runs
        if value.chars().any(|c| c.is_ascii_digit()) {
            patterns.push(format!("({})", whitespace_tolerant(value)));
        }

        patterns
    }
}

impl Default for RuleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape a value, allowing optional whitespace between consecutive digits.
///
/// Payslip OCR frequently renders "10224.00" as "10 224.00"; this keeps a
/// learned numeric pattern from missing the clean rendering of the same value.
fn whitespace_tolerant(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::new();

    for (i, c) in chars.iter().enumerate() {
        out.push_str(&regex::escape(&c.to_string()));
        let next_is_digit = chars.get(i + 1).map_or(false, |n| n.is_ascii_digit());
        if c.is_ascii_digit() && next_is_digit {
            out.push_str(r"\s?");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_with_keyword_cue() {
        let synth = RuleSynthesizer::new();
        let text = "BULLETIN DE SALAIRE\nSalaire brut 10224.00\nNet payé 7142.72";

        let candidates = synth.synthesize("gross_salary", "10224.00", text);

        assert!(!candidates.is_empty());
        // A cue-based candidate must exist and outrank the literal fallback
        assert!(candidates
            .iter()
            .any(|c| c.contains("brut") || c.contains("Salaire")));
        assert!(candidates[0].len() >= candidates.last().unwrap().len());
    }

    #[test]
    fn test_synthesize_separator_pattern() {
        let synth = RuleSynthesizer::new();
        let text = "Matricule: 00027";

        let candidates = synth.synthesize("matricule", "00027", text);
        assert!(candidates.iter().any(|c| c.contains("[:=]")));
    }

    #[test]
    fn test_synthesize_value_alone_on_line() {
        let synth = RuleSynthesizer::new();
        let text = "Nom de l'employeur\nACME SAS\nRUE DE LA PAIX";

        let candidates = synth.synthesize("company_name", "ACME SAS", text);
        assert!(candidates.iter().any(|c| c.contains("Nom de l'employeur")));
    }

    #[test]
    fn test_synthesize_numeric_whitespace_tolerance() {
        let synth = RuleSynthesizer::new();
        let text = "Salaire brut 10224.00";

        let candidates = synth.synthesize("gross_salary", "10224.00", text);
        let tolerant = candidates.iter().find(|c| c.contains(r"\s?")).unwrap();

        // The tolerant pattern must match both clean and OCR-spaced renderings
        let re = regex::Regex::new(tolerant).unwrap();
        assert!(re.is_match("10224.00"));
        assert!(re.is_match("10 224.00"));
    }

    #[test]
    fn test_synthesize_value_absent_returns_literal_fallback() {
        let synth = RuleSynthesizer::new();
        let candidates = synth.synthesize("company_name", "ACME", "no occurrence here");

        assert_eq!(candidates, vec!["ACME".to_string()]);
    }

    #[test]
    fn test_synthesize_empty_inputs_never_panic() {
        let synth = RuleSynthesizer::new();

        assert!(!synth.synthesize("gross_salary", "", "").is_empty());
        assert!(!synth.synthesize("gross_salary", "10.00", "").is_empty());
        assert!(!synth.synthesize("unknown_field", "", "text").is_empty());
    }

    #[test]
    fn test_candidates_ordered_by_length() {
        let synth = RuleSynthesizer::new();
        let text = "Siret: 35600000000048";

        let candidates = synth.synthesize("siret", "35600000000048", text);
        for pair in candidates.windows(2) {
            // Fallback sits last; everything before it is sorted by length
            if pair[1] != regex::escape("35600000000048") {
                assert!(pair[0].len() >= pair[1].len());
            }
        }
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let synth = RuleSynthesizer::new();
        let candidates = synth.synthesize("net_paid", "1.234,56 (net)", "Net payé 1.234,56 (net)");

        for candidate in &candidates {
            assert!(
                regex::Regex::new(candidate).is_ok(),
                "candidate does not compile: {}",
                candidate
            );
        }
    }
}
