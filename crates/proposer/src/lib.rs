//! Step-proposal models for proof search.
//!
//! A proposer maps a proof context and a goal description to a ranked list
//! of candidate next steps with costs (lower = more promising). This crate
//! provides the candidate type plus two concrete proposers: a dummy that
//! always requests the engine's automated search, and an HTTP client for an
//! external inference server.
//!
//! # Key types
//!
//! - [`ProposedStep`] — a candidate step with its search cost
//! - [`HammerProposer`] — always proposes the hammer sentinel
//! - [`InferenceProposer`] — HTTP-backed model proposer

pub mod hammer;
pub mod http;
pub mod types;

pub use hammer::HammerProposer;
pub use http::InferenceProposer;
pub use types::{ProposedStep, ProposerConfig};
