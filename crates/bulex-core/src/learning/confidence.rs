//! Confidence scoring for candidate patterns.

use regex::RegexBuilder;
use tracing::trace;

/// Compiled-pattern size cap; a runaway synthesized pattern scores 0.0
/// instead of exhausting memory at compile time.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Scores how reliably a pattern isolates an expected value in a text.
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score `pattern` against `raw_text`, in [0, 1].
    ///
    /// The score is the fraction of matches whose captured text contains
    /// `expected_value`. Zero matches score 0.0. A pattern that fails to
    /// compile scores 0.0 rather than erroring; a bad candidate must never
    /// abort the learning flow.
    pub fn score(&self, pattern: &str, raw_text: &str, expected_value: &str) -> f64 {
        let re = match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                trace!("candidate pattern does not compile: {}", e);
                return 0.0;
            }
        };

        let mut total = 0usize;
        let mut containing = 0usize;

        for caps in re.captures_iter(raw_text) {
            total += 1;
            let captured = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
                .unwrap_or("");
            if captured.contains(expected_value) {
                containing += 1;
            }
        }

        if total == 0 {
            return 0.0;
        }

        (containing as f64 / total as f64).min(1.0)
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_exact_match_scores_one() {
        let scorer = ConfidenceScorer::new();
        let score = scorer.score(
            r"Salaire brut\s+([0-9.]+)",
            "Salaire brut 10224.00",
            "10224.00",
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_no_match_scores_zero() {
        let scorer = ConfidenceScorer::new();
        assert_eq!(scorer.score("ACME", "", "ACME"), 0.0);
        assert_eq!(scorer.score("xyz", "some text", "xyz"), 0.0);
    }

    #[test]
    fn test_overgeneral_pattern_scores_low() {
        let scorer = ConfidenceScorer::new();
        // Matches every amount-shaped token; only one contains the value
        let text = "100.00\n200.00\n300.00\n10224.00";
        let score = scorer.score(r"([0-9]+\.[0-9]{2})", text, "10224.00");
        assert!(score > 0.0 && score < 0.5, "score was {}", score);
    }

    #[test]
    fn test_malformed_pattern_scores_zero() {
        let scorer = ConfidenceScorer::new();
        assert_eq!(scorer.score("([0-9", "text 123", "123"), 0.0);
        assert_eq!(scorer.score("(?P<broken", "text", "text"), 0.0);
    }

    #[test]
    fn test_score_bounds() {
        let scorer = ConfidenceScorer::new();
        let cases = [
            ("", "", ""),
            ("a", "aaaa", "a"),
            (r"(\d+)", "1 2 3", "2"),
            ("ACME", "ACME ACME", "ACME"),
        ];
        for (pattern, text, expected) in cases {
            let score = scorer.score(pattern, text, expected);
            assert!((0.0..=1.0).contains(&score), "score {} out of bounds", score);
        }
    }

    #[test]
    fn test_whole_match_used_when_no_capture_group() {
        let scorer = ConfidenceScorer::new();
        let score = scorer.score("10224.00", "Salaire brut 10224.00", "10224.00");
        assert_eq!(score, 1.0);
    }
}
