//! Corpus loaders: directory scanning, shape checks, numeric-aware ordering.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::types::{Extraction, TestCase};

/// Load every test case (`*.json`) from a corpus directory, in
/// numeric-aware filename order.
pub fn load_test_cases(dir: &Path) -> anyhow::Result<Vec<TestCase>> {
    load_matching_test_cases(dir, |_| true)
}

/// Load only the "quick" subset (`quick*.json`) of a corpus directory.
pub fn load_quick_test_cases(dir: &Path) -> anyhow::Result<Vec<TestCase>> {
    load_matching_test_cases(dir, |name| name.starts_with("quick"))
}

fn load_matching_test_cases(
    dir: &Path,
    keep: impl Fn(&str) -> bool,
) -> anyhow::Result<Vec<TestCase>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading test corpus directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(&keep)
        })
        .collect();
    files.sort_by(|a, b| compare_numeric_aware(&a.to_string_lossy(), &b.to_string_lossy()));

    let cases = files
        .iter()
        .map(|path| load_test_case(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::info!(count = cases.len(), dir = %dir.display(), "Loaded test cases");
    Ok(cases)
}

/// A test-case file holds a single `[theory_file, lemma_statement]` pair.
fn load_test_case(path: &Path) -> anyhow::Result<TestCase> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading test case {}", path.display()))?;
    let entries: Vec<(String, String)> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing test case {}", path.display()))?;
    let mut entries = entries.into_iter();
    let Some((thy_file, lemma_statement)) = entries.next() else {
        bail!("test case {} is empty", path.display());
    };
    if entries.next().is_some() {
        bail!(
            "test case {} holds more than one entry",
            path.display()
        );
    }

    let relative = thy_file
        .split_once("/thys/")
        .map(|(_, rest)| rest)
        .with_context(|| format!("test case {}: no /thys/ segment in {thy_file:?}", path.display()))?;

    if !is_plausible_lemma_statement(&lemma_statement) {
        tracing::warn!(
            file = %path.display(),
            statement = %lemma_statement.lines().next().unwrap_or(""),
            "Unusual test case lemma statement"
        );
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(TestCase {
        name,
        theory_file: PathBuf::from(relative),
        lemma_statement,
    })
}

/// Load every extraction file (`**/*.json`) under a directory tree, in
/// path order.
pub fn load_extractions(dir: &Path) -> anyhow::Result<Vec<Extraction>> {
    let mut files = Vec::new();
    collect_json_files(dir, &mut files)
        .with_context(|| format!("walking extraction directory {}", dir.display()))?;
    files.sort();

    let extractions = files
        .iter()
        .map(|path| load_extraction(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::info!(count = extractions.len(), dir = %dir.display(), "Loaded extractions");
    Ok(extractions)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct ExtractionFile {
    file_name: String,
    working_directory: String,
    problem_names: Vec<String>,
    translations: Vec<(String, String)>,
}

fn load_extraction(path: &Path) -> anyhow::Result<Extraction> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading extraction {}", path.display()))?;
    let file: ExtractionFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing extraction {}", path.display()))?;

    let theory_file = file
        .file_name
        .split_once("/thys/")
        .map(|(_, rest)| PathBuf::from(rest))
        .with_context(|| {
            format!(
                "extraction {}: no /thys/ segment in {:?}",
                path.display(),
                file.file_name
            )
        })?;

    let working_directory = file
        .working_directory
        .split_once("/thys/")
        .map(|(_, rest)| PathBuf::from(rest))
        .with_context(|| {
            format!(
                "extraction {}: no /thys/ segment in {:?}",
                path.display(),
                file.working_directory
            )
        })?;

    let parent = theory_file.parent().unwrap_or_else(|| Path::new(""));
    if working_directory != parent {
        bail!(
            "extraction {}: working directory {} does not contain {}",
            path.display(),
            working_directory.display(),
            theory_file.display()
        );
    }

    for statement in &file.problem_names {
        if !is_plausible_lemma_statement(statement) {
            tracing::warn!(
                file = %path.display(),
                statement = %statement.lines().next().unwrap_or(""),
                "Unusual extracted lemma statement"
            );
        }
    }

    Ok(Extraction {
        theory_file,
        working_directory,
        lemma_statements: file.problem_names,
        transitions: file.translations,
    })
}

/// Whether a statement looks like a lemma declaration. Mined corpora carry
/// the occasional definition or comment; those are flagged, not rejected.
fn is_plausible_lemma_statement(statement: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "lemma ", "theorem ", "lemmas ", "lemma\n", "theorem\n", "lemmas\n", "lemma\"", "lemma[",
        "lemma(in ", "lemmas[", "lemmas(in ", "lemmas_with ", "lemmas_with[", "lemma%",
    ];
    PREFIXES.iter().any(|prefix| statement.starts_with(prefix))
}

/// Compare two paths treating digit runs as numbers, so `test_2` sorts
/// before `test_10`.
fn compare_numeric_aware(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (&x, &y) {
                    (Chunk::Number(m), Chunk::Number(n)) => m.cmp(n),
                    (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
                    (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
                    (Chunk::Text(s), Chunk::Text(t)) => s.cmp(t),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Number(u64),
    Text(&'a str),
}

/// Split a string into alternating digit and non-digit runs.
fn chunks(s: &str) -> impl Iterator<Item = Chunk<'_>> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        let digits = bytes[pos].is_ascii_digit();
        while pos < bytes.len() && bytes[pos].is_ascii_digit() == digits {
            pos += 1;
        }
        let run = &s[start..pos];
        if digits {
            // Digit runs too long for u64 fall back to text comparison.
            match run.parse::<u64>() {
                Ok(n) => Some(Chunk::Number(n)),
                Err(_) => Some(Chunk::Text(run)),
            }
        } else {
            Some(Chunk::Text(run))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_test_case(dir: &Path, name: &str, thy: &str, lemma: &str) {
        let body = serde_json::json!([[thy, lemma]]);
        fs::write(dir.join(name), serde_json::to_string(&body).unwrap()).unwrap();
    }

    #[test]
    fn loads_and_orders_test_cases() {
        let dir = tempfile::tempdir().unwrap();
        write_test_case(
            dir.path(),
            "quick_test_10.json",
            "/home/afp/thys/B/B.thy",
            "lemma b: Q",
        );
        write_test_case(
            dir.path(),
            "quick_test_2.json",
            "/home/afp/thys/A/A.thy",
            "lemma a: P",
        );

        let cases = load_test_cases(dir.path()).unwrap();
        assert_eq!(cases.len(), 2);
        // Numeric-aware: 2 before 10.
        assert_eq!(cases[0].name, "quick_test_2");
        assert_eq!(cases[0].theory_file, PathBuf::from("A/A.thy"));
        assert_eq!(cases[0].lemma_statement, "lemma a: P");
        assert_eq!(cases[1].name, "quick_test_10");
    }

    #[test]
    fn quick_filter_drops_full_tests() {
        let dir = tempfile::tempdir().unwrap();
        write_test_case(
            dir.path(),
            "quick_test_1.json",
            "/afp/thys/A/A.thy",
            "lemma a: P",
        );
        write_test_case(
            dir.path(),
            "test_1.json",
            "/afp/thys/B/B.thy",
            "lemma b: Q",
        );

        let quick = load_quick_test_cases(dir.path()).unwrap();
        assert_eq!(quick.len(), 1);
        assert_eq!(quick[0].name, "quick_test_1");

        let all = load_test_cases(dir.path()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn missing_thys_segment_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_test_case(dir.path(), "test_1.json", "/elsewhere/A.thy", "lemma a: P");
        let err = load_test_cases(dir.path()).unwrap_err();
        assert!(err.to_string().contains("/thys/"));
    }

    #[test]
    fn wrong_entry_count_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!([["/afp/thys/A/A.thy", "lemma a"], ["/afp/thys/B/B.thy", "lemma b"]]);
        fs::write(
            dir.path().join("test_1.json"),
            serde_json::to_string(&body).unwrap(),
        )
        .unwrap();
        assert!(load_test_cases(dir.path()).is_err());
    }

    #[test]
    fn loads_extraction_tree() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("Valuation");
        fs::create_dir(&sub).unwrap();
        let body = serde_json::json!({
            "file_name": "/home/mined/afp/thys/Valuation/Valuation1.thy",
            "working_directory": "/home/mined/afp/thys/Valuation",
            "problem_names": ["lemma foo: P"],
            "translations": [
                ["", "lemma foo: P"],
                ["goal: P", "by simp"]
            ]
        });
        fs::write(
            sub.join("Valuation1.json"),
            serde_json::to_string(&body).unwrap(),
        )
        .unwrap();

        let extractions = load_extractions(dir.path()).unwrap();
        assert_eq!(extractions.len(), 1);
        let extraction = &extractions[0];
        assert_eq!(
            extraction.theory_file,
            PathBuf::from("Valuation/Valuation1.thy")
        );
        assert_eq!(extraction.working_directory, PathBuf::from("Valuation"));
        assert_eq!(extraction.transitions.len(), 2);
        assert_eq!(extraction.transitions[1].1, "by simp");
    }

    #[test]
    fn mismatched_working_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({
            "file_name": "/mined/thys/Valuation/Valuation1.thy",
            "working_directory": "/mined/thys/Other",
            "problem_names": [],
            "translations": []
        });
        fs::write(
            dir.path().join("bad.json"),
            serde_json::to_string(&body).unwrap(),
        )
        .unwrap();
        assert!(load_extractions(dir.path()).is_err());
    }

    #[test]
    fn numeric_aware_ordering() {
        let mut names = vec!["test_10", "test_2", "test_1", "quick_test_3"];
        names.sort_by(|a, b| compare_numeric_aware(a, b));
        assert_eq!(names, vec!["quick_test_3", "test_1", "test_2", "test_10"]);
    }

    #[test]
    fn plausible_lemma_prefixes() {
        assert!(is_plausible_lemma_statement("lemma foo: P"));
        assert!(is_plausible_lemma_statement("theorem bar: Q"));
        assert!(is_plausible_lemma_statement("lemma[simp] baz: R"));
        assert!(is_plausible_lemma_statement("lemmas(in ring) r = s"));
        assert!(!is_plausible_lemma_statement("definition d where ..."));
        assert!(!is_plausible_lemma_statement(""));
    }
}
