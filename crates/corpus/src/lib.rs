//! Loading test-case and extraction corpora from disk.
//!
//! A test corpus is a directory of JSON files, one obligation per file;
//! an extraction corpus is a tree of JSON files each pairing proof states
//! with the step the original author took. Both come from mining an
//! archive of formal proofs, so the loaders validate shapes and warn on
//! the noise the mining process leaves behind.
//!
//! # Key types
//!
//! - [`TestCase`] — one obligation to attempt (theory file + lemma statement)
//! - [`Extraction`] — mined (proof state, proof step) pairs from one theory
//! - [`load_test_cases`] / [`load_quick_test_cases`] / [`load_extractions`]

pub mod loader;
pub mod types;

pub use loader::{load_extractions, load_quick_test_cases, load_test_cases};
pub use types::{Extraction, TestCase};
