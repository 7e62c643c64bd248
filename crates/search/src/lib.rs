//! Best-first proof search over a remote checkpoint-based proof engine.
//!
//! Wires together isabelle-client (the engine transport) and proposer (the
//! step model) to search for proofs of individual obligations. Uses
//! trait-based abstraction so the search loop can be tested with mocks
//! (no engine server, no model).
//!
//! # Key types
//!
//! - [`SearchDriver`] — the main search loop
//! - [`SearchConfig`] — configuration loaded from TOML
//! - [`Frontier`] / [`SearchNode`] — the pending-node queue and tree nodes
//! - [`CheckpointName`] — hierarchical engine checkpoint names
//! - [`ProofExecutor`] / [`StepProposer`] — traits at the engine and model seams
//! - [`FailureKind`] / [`classify`] — the closed failure taxonomy
//! - [`Verdict`] / [`SearchOutcome`] — what a search returns

pub mod adapters;
pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod failure;
pub mod frontier;
pub mod mocks;
pub mod node;

pub use checkpoint::CheckpointName;
pub use config::SearchConfig;
pub use driver::{
    ExecutorFailure, NotProvedReason, ProofExecutor, SearchDriver, SearchError, SearchOutcome,
    SearchStats, StepProposer, Verdict,
};
pub use failure::{classify, FailureKind};
pub use frontier::Frontier;
pub use node::{extract_path, extract_step_sequence, Obligation, SearchNode, StepOutcome};
