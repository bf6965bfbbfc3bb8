//! Confidence scoring for generated queries.
//!
//! Confidence is a heuristic derived from the validation error count, not a
//! calibrated probability.

/// Starting confidence for a freshly generated query.
pub const BASELINE_CONFIDENCE: f64 = 0.9;

/// Confidence lost per validation error.
pub const ERROR_PENALTY: f64 = 0.1;

/// Confidence never drops below this value.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// Minimum confidence at which the gate attempts execution.
pub const EXECUTE_THRESHOLD: f64 = 0.7;

/// Confidence for a query that produced `error_count` validation errors.
pub fn confidence_for(error_count: usize) -> f64 {
    let score = BASELINE_CONFIDENCE - ERROR_PENALTY * error_count as f64;
    // Round away float noise so 0.9 - 0.2 compares equal to 0.7.
    let score = (score * 1000.0).round() / 1000.0;
    score.max(CONFIDENCE_FLOOR)
}

/// The execution gate: only confident, validated queries may run.
pub fn is_executable(confidence: f64, validated: bool) -> bool {
    validated && confidence >= EXECUTE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0.9 ; "no errors keeps baseline")]
    #[test_case(1, 0.8 ; "one error")]
    #[test_case(2, 0.7 ; "two errors reach threshold")]
    #[test_case(6, 0.3 ; "six errors clamp at floor")]
    #[test_case(40, 0.3 ; "many errors never go below floor")]
    fn test_confidence_for(errors: usize, expected: f64) {
        assert_eq!(confidence_for(errors), expected);
    }

    #[test]
    fn test_two_errors_still_executable_when_validated() {
        assert!(is_executable(confidence_for(2), true));
        assert!(!is_executable(confidence_for(3), true));
    }

    #[test]
    fn test_unvalidated_never_executable() {
        assert!(!is_executable(0.9, false));
    }
}
