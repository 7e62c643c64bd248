//! Data types for test-case and extraction corpora.

use std::path::PathBuf;

/// One obligation from a test corpus.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Name of the test, taken from the file stem
    /// (like `"quick_test_name_599"`).
    pub name: String,
    /// Path to the theory file, relative to the archive's `thys/` root.
    pub theory_file: PathBuf,
    /// The lemma statement to prove, as it appears in the theory.
    pub lemma_statement: String,
}

/// Mined proof data for one theory file.
///
/// `transitions` is a flat list of (proof state, proof step) pairs: each
/// lemma contributes `("", statement)`, then one pair per step, ending at
/// the closing step. The mining process leaves noise (definitions,
/// comments), so consumers should treat the pairs as best-effort.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Path to the theory file, relative to the archive's `thys/` root.
    pub theory_file: PathBuf,
    /// Parent directory of `theory_file`.
    pub working_directory: PathBuf,
    /// Lemma statements declared in the theory.
    pub lemma_statements: Vec<String>,
    /// (proof state, proof step) pairs in theory order.
    pub transitions: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_fields() {
        let case = TestCase {
            name: "quick_test_name_1".to_string(),
            theory_file: PathBuf::from("Valuation/Valuation1.thy"),
            lemma_statement: "lemma foo: P".to_string(),
        };
        assert_eq!(case.name, "quick_test_name_1");
        assert_eq!(case.theory_file, PathBuf::from("Valuation/Valuation1.thy"));
    }

    #[test]
    fn extraction_fields() {
        let extraction = Extraction {
            theory_file: PathBuf::from("Valuation/Valuation1.thy"),
            working_directory: PathBuf::from("Valuation"),
            lemma_statements: vec!["lemma foo: P".to_string()],
            transitions: vec![
                (String::new(), "lemma foo: P".to_string()),
                ("goal: P".to_string(), "by simp".to_string()),
            ],
        };
        assert_eq!(extraction.working_directory, PathBuf::from("Valuation"));
        assert_eq!(extraction.transitions.len(), 2);
    }
}
