//! Bridges between the search traits and the real transport crates
//! (isabelle-client, proposer).
//!
//! Engine errors are flattened to their message text here so no transport
//! error type reaches the driver; the driver classifies the text.

use std::path::Path;

use async_trait::async_trait;

use isabelle_client::{EngineError, IsabelleSession};
use proposer::{HammerProposer, InferenceProposer, ProposedStep};

use crate::driver::{ExecutorFailure, ProofExecutor, StepProposer};
use crate::node::StepOutcome;

impl From<EngineError> for ExecutorFailure {
    fn from(err: EngineError) -> Self {
        ExecutorFailure(err.to_string())
    }
}

impl From<isabelle_client::StepReply> for StepOutcome {
    fn from(reply: isabelle_client::StepReply) -> Self {
        StepOutcome {
            proved: reply.proof_done,
            goals: reply.proof_goals,
        }
    }
}

// ---------------------------------------------------------------------------
// ProofExecutor for IsabelleSession
// ---------------------------------------------------------------------------

#[async_trait]
impl ProofExecutor for IsabelleSession {
    async fn advance(
        &mut self,
        theory: &Path,
        stop_point: &str,
        inclusive: bool,
        new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure> {
        let reply = self
            .load_theory(theory, stop_point, inclusive, new_checkpoint, false)
            .await?;
        Ok(reply.into())
    }

    async fn apply_step(
        &mut self,
        checkpoint: &str,
        step: &str,
        new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure> {
        let reply = self.execute(checkpoint, step, new_checkpoint).await?;
        Ok(reply.into())
    }

    async fn synthesize_step(
        &mut self,
        checkpoint: &str,
        added_facts: &[String],
        deleted_facts: &[String],
    ) -> Result<String, ExecutorFailure> {
        Ok(self.hammer(checkpoint, added_facts, deleted_facts).await?)
    }

    async fn describe(&mut self, checkpoint: &str) -> Result<String, ExecutorFailure> {
        Ok(self.describe_state(checkpoint).await?)
    }
}

// ---------------------------------------------------------------------------
// StepProposer for the concrete proposers
// ---------------------------------------------------------------------------

#[async_trait]
impl StepProposer for HammerProposer {
    async fn propose(&self, _context: &str, _goals: &str) -> anyhow::Result<Vec<ProposedStep>> {
        Ok(self.steps())
    }
}

#[async_trait]
impl StepProposer for InferenceProposer {
    async fn propose(&self, context: &str, goals: &str) -> anyhow::Result<Vec<ProposedStep>> {
        self.request_steps(context, goals).await
    }
}
