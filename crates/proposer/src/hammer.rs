//! Dummy proposer that always requests the engine's automated search.

use crate::types::ProposedStep;

/// Proposer that answers every goal with the hammer sentinel.
///
/// Useful as a model-free baseline: the search degenerates to asking the
/// engine's automated search for a step at every node.
#[derive(Debug, Clone)]
pub struct HammerProposer {
    sentinel: String,
}

impl HammerProposer {
    /// Create a proposer emitting the given sentinel text.
    pub fn new(sentinel: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
        }
    }

    /// The single candidate list this proposer always returns.
    pub fn steps(&self) -> Vec<ProposedStep> {
        vec![ProposedStep {
            text: self.sentinel.clone(),
            cost: 0.1,
        }]
    }
}

impl Default for HammerProposer {
    fn default() -> Self {
        Self::new("normalhammer")
    }
}
