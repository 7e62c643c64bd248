//! Result types for evaluation reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Results from evaluating a proposer over a test corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Name/path of the test corpus.
    pub corpus: String,
    /// Total number of cases attempted.
    pub total: u32,
    /// Number of cases proved.
    pub solved: u32,
    /// Fraction solved (solved / total; 0 for an empty corpus).
    pub rate: f64,
    /// Count per outcome category (`success`, `budget-exhausted`,
    /// `timeout-hard`, `not-found`, ...).
    pub counts: BTreeMap<String, u32>,
    /// Average wall-clock seconds per case.
    pub avg_wall_secs: f64,
    /// Median wall-clock seconds per case.
    pub median_wall_secs: f64,
    /// Per-case results.
    pub per_case: Vec<CaseReport>,
}

/// Result for a single test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Test case name.
    pub name: String,
    /// Outcome category slug.
    pub outcome: String,
    /// Wall-clock seconds spent on the case.
    pub wall_secs: f64,
    /// The proof step sequence when proved, empty otherwise.
    #[serde(default)]
    pub proof_steps: Vec<String>,
}

/// Compute the median of a slice of f64 values.
///
/// Returns 0.0 for empty slices.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serde_roundtrip() {
        let mut counts = BTreeMap::new();
        counts.insert("success".to_string(), 2);
        counts.insert("timeout-hard".to_string(), 1);
        let report = EvalReport {
            corpus: "test_theorems/quick".to_string(),
            total: 3,
            solved: 2,
            rate: 2.0 / 3.0,
            counts,
            avg_wall_secs: 4.2,
            median_wall_secs: 3.9,
            per_case: vec![CaseReport {
                name: "quick_test_1".to_string(),
                outcome: "success".to_string(),
                wall_secs: 3.9,
                proof_steps: vec!["by simp".to_string()],
            }],
        };

        let json = serde_json::to_string_pretty(&report).unwrap();
        let loaded: EvalReport = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.total, 3);
        assert_eq!(loaded.solved, 2);
        assert_eq!(loaded.counts["success"], 2);
        assert_eq!(loaded.per_case[0].proof_steps, vec!["by simp"]);
    }

    #[test]
    fn test_median_helper() {
        assert!((median(&mut []) - 0.0).abs() < 1e-9);
        assert!((median(&mut [5.0]) - 5.0).abs() < 1e-9);
        assert!((median(&mut [1.0, 3.0]) - 2.0).abs() < 1e-9);
        assert!((median(&mut [3.0, 1.0, 2.0]) - 2.0).abs() < 1e-9);
        assert!((median(&mut [4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-9);
    }
}
