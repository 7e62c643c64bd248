//! Mock implementations of the executor and proposer traits for testing
//! the search loop without an engine server or a model.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use proposer::ProposedStep;

use crate::driver::{ExecutorFailure, ProofExecutor, StepProposer};
use crate::node::StepOutcome;

/// Convenience constructor for a `ProposedStep`.
pub fn make_step(text: &str, cost: f64) -> ProposedStep {
    ProposedStep {
        text: text.to_string(),
        cost,
    }
}

// ---------------------------------------------------------------------------
// MockProposer
// ---------------------------------------------------------------------------

/// Mock proposer returning canned candidates keyed by exact goal text.
pub struct MockProposer {
    responses: HashMap<String, Vec<ProposedStep>>,
    default_responses: Vec<ProposedStep>,
    propose_calls: AtomicU32,
}

impl Default for MockProposer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProposer {
    /// Create an empty mock proposer: every goal gets no candidates.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_responses: Vec::new(),
            propose_calls: AtomicU32::new(0),
        }
    }

    /// Add a canned response for an exact goal-text match.
    pub fn add_response(&mut self, goals: &str, steps: Vec<ProposedStep>) {
        self.responses.insert(goals.to_string(), steps);
    }

    /// Candidates returned for any goal without an exact match.
    pub fn set_default(&mut self, steps: Vec<ProposedStep>) {
        self.default_responses = steps;
    }

    /// Number of `propose` calls made so far.
    pub fn propose_calls(&self) -> u32 {
        self.propose_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StepProposer for MockProposer {
    async fn propose(&self, _context: &str, goals: &str) -> anyhow::Result<Vec<ProposedStep>> {
        self.propose_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(steps) = self.responses.get(goals) {
            return Ok(steps.clone());
        }
        Ok(self.default_responses.clone())
    }
}

// ---------------------------------------------------------------------------
// MockExecutor
// ---------------------------------------------------------------------------

/// Mock executor with canned responses keyed by `(checkpoint, step)`.
///
/// Steps without a canned response fail with a `Transition not found`
/// message (what the real engine reports for an unknown transition),
/// unless a default outcome is installed.
pub struct MockExecutor {
    advance_result: Result<StepOutcome, String>,
    step_results: HashMap<(String, String), Result<StepOutcome, String>>,
    hammer_results: HashMap<String, Result<String, String>>,
    default_step: Option<StepOutcome>,
    progress_default: bool,
    progress_counter: u64,
    /// Number of `advance` calls made.
    pub advance_calls: u32,
    /// Number of `apply_step` calls made.
    pub apply_calls: u32,
    /// Number of `synthesize_step` calls made.
    pub synthesize_calls: u32,
}

impl MockExecutor {
    /// Create a mock whose `advance` reports an open proof with the given goals.
    pub fn new(initial_goals: &str) -> Self {
        Self {
            advance_result: Ok(StepOutcome {
                proved: false,
                goals: initial_goals.to_string(),
            }),
            step_results: HashMap::new(),
            hammer_results: HashMap::new(),
            default_step: None,
            progress_default: false,
            progress_counter: 0,
            advance_calls: 0,
            apply_calls: 0,
            synthesize_calls: 0,
        }
    }

    /// Override what `advance` reports.
    pub fn set_advance(&mut self, proved: bool, goals: &str) {
        self.advance_result = Ok(StepOutcome {
            proved,
            goals: goals.to_string(),
        });
    }

    /// Make `advance` fail with the given engine message.
    pub fn fail_advance(&mut self, message: &str) {
        self.advance_result = Err(message.to_string());
    }

    /// Add a canned outcome for applying `step` at `checkpoint`.
    pub fn add_step(&mut self, checkpoint: &str, step: &str, proved: bool, goals: &str) {
        self.step_results.insert(
            (checkpoint.to_string(), step.to_string()),
            Ok(StepOutcome {
                proved,
                goals: goals.to_string(),
            }),
        );
    }

    /// Make applying `step` at `checkpoint` fail with the given message.
    pub fn fail_step(&mut self, checkpoint: &str, step: &str, message: &str) {
        self.step_results.insert(
            (checkpoint.to_string(), step.to_string()),
            Err(message.to_string()),
        );
    }

    /// Add a canned synthesized step for `checkpoint`.
    pub fn add_hammer(&mut self, checkpoint: &str, step: &str) {
        self.hammer_results
            .insert(checkpoint.to_string(), Ok(step.to_string()));
    }

    /// Make synthesis at `checkpoint` fail with the given message.
    pub fn fail_hammer(&mut self, checkpoint: &str, message: &str) {
        self.hammer_results
            .insert(checkpoint.to_string(), Err(message.to_string()));
    }

    /// Outcome returned for any `(checkpoint, step)` without a canned entry.
    pub fn set_default_step(&mut self, proved: bool, goals: &str) {
        self.default_step = Some(StepOutcome {
            proved,
            goals: goals.to_string(),
        });
    }

    /// Make every un-canned step "progress" to a fresh, never-repeating goal,
    /// so only the search budgets can terminate the search.
    pub fn set_progress_default(&mut self) {
        self.progress_default = true;
    }
}

#[async_trait]
impl ProofExecutor for MockExecutor {
    async fn advance(
        &mut self,
        _theory: &Path,
        _stop_point: &str,
        _inclusive: bool,
        _new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure> {
        self.advance_calls += 1;
        self.advance_result.clone().map_err(ExecutorFailure)
    }

    async fn apply_step(
        &mut self,
        checkpoint: &str,
        step: &str,
        _new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure> {
        self.apply_calls += 1;
        let key = (checkpoint.to_string(), step.to_string());
        if let Some(result) = self.step_results.get(&key) {
            return result.clone().map_err(ExecutorFailure);
        }
        if self.progress_default {
            self.progress_counter += 1;
            return Ok(StepOutcome {
                proved: false,
                goals: format!("goal: {}", self.progress_counter),
            });
        }
        if let Some(outcome) = &self.default_step {
            return Ok(outcome.clone());
        }
        Err(ExecutorFailure(format!(
            "Transition not found: no canned step '{step}' at {checkpoint}"
        )))
    }

    async fn synthesize_step(
        &mut self,
        checkpoint: &str,
        _added_facts: &[String],
        _deleted_facts: &[String],
    ) -> Result<String, ExecutorFailure> {
        self.synthesize_calls += 1;
        match self.hammer_results.get(checkpoint) {
            Some(result) => result.clone().map_err(ExecutorFailure),
            None => Err(ExecutorFailure(format!(
                "Transition not found: no canned hammer at {checkpoint}"
            ))),
        }
    }

    async fn describe(&mut self, checkpoint: &str) -> Result<String, ExecutorFailure> {
        Ok(format!("checkpoint {checkpoint}"))
    }
}
