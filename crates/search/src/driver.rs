//! Best-first search driver: pop the cheapest node, propose candidate
//! steps, apply each against the engine, enqueue the survivors.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use proposer::ProposedStep;

use crate::checkpoint::CheckpointName;
use crate::config::SearchConfig;
use crate::failure::{classify, FailureKind};
use crate::frontier::Frontier;
use crate::node::{extract_step_sequence, Obligation, SearchNode, StepOutcome};

/// Opaque failure signal from a proof executor.
///
/// Carries only the engine's message text; the driver classifies it with
/// [`classify`]. Adapters flatten their transport error types into this so
/// no transport type ever crosses into the search loop.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ExecutorFailure(pub String);

/// Errors that abort a search instead of producing a verdict.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Initializing the obligation failed; nothing was searched.
    #[error("failed to initialize obligation ({kind}): {message}")]
    Setup {
        /// Classified category of the setup failure.
        kind: FailureKind,
        /// The engine's message text.
        message: String,
    },
    /// Error from the step proposer.
    #[error("proposer error: {0}")]
    Proposer(#[source] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Stateful remote proof engine, addressed through named checkpoints.
///
/// Every call references one existing checkpoint and (for the two
/// state-advancing operations) produces a new one under a caller-chosen
/// name. Checkpoints are additive: a failed call never retracts previously
/// created checkpoints.
#[async_trait]
pub trait ProofExecutor: Send {
    /// Load the theory in `theory` up to `stop_point` (including it when
    /// `inclusive`), storing the resulting state as `new_checkpoint`.
    async fn advance(
        &mut self,
        theory: &Path,
        stop_point: &str,
        inclusive: bool,
        new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure>;

    /// Apply a proof step against `checkpoint`, storing the resulting state
    /// as `new_checkpoint`.
    async fn apply_step(
        &mut self,
        checkpoint: &str,
        step: &str,
        new_checkpoint: &str,
    ) -> Result<StepOutcome, ExecutorFailure>;

    /// Ask the engine's automated search to synthesize a likely-successful
    /// step at `checkpoint`. The returned text is applied like any other
    /// step; it creates no checkpoint by itself.
    async fn synthesize_step(
        &mut self,
        checkpoint: &str,
        added_facts: &[String],
        deleted_facts: &[String],
    ) -> Result<String, ExecutorFailure>;

    /// Human-readable description of a checkpoint. Diagnostic only; the
    /// search loop never calls this.
    async fn describe(&mut self, checkpoint: &str) -> Result<String, ExecutorFailure>;
}

/// Model that proposes candidate next steps for a goal state.
#[async_trait]
pub trait StepProposer: Send + Sync {
    /// Return candidate steps for the given context (the step that produced
    /// the current state) and goal description, best first. Costs must be
    /// non-negative. An empty list abandons the branch.
    async fn propose(&self, context: &str, goals: &str) -> anyhow::Result<Vec<ProposedStep>>;
}

// ---------------------------------------------------------------------------
// Verdict and outcome
// ---------------------------------------------------------------------------

/// Why a search ended without a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotProvedReason {
    /// The expansion budget or wall-clock deadline ran out with work still
    /// pending in the frontier.
    BudgetExhausted,
    /// The frontier emptied: every branch failed or stagnated. Carries the
    /// most specific failure classification observed during the search
    /// (`Unknown` when every branch merely stagnated).
    Failure(FailureKind),
}

/// Final answer of one search invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A complete proof was found.
    Proved,
    /// No proof was found.
    NotProved(NotProvedReason),
}

impl Verdict {
    /// Whether the obligation was discharged.
    pub fn is_proved(&self) -> bool {
        matches!(self, Verdict::Proved)
    }
}

/// Counters from a single search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Number of nodes removed from the frontier and expanded.
    pub nodes_expanded: u32,
    /// Number of steps sent to the engine for application.
    pub steps_attempted: u32,
    /// Number of engine calls that failed (application or synthesis).
    pub step_failures: u32,
    /// Number of accepted steps discarded because they left the goals unchanged.
    pub stagnant_steps: u32,
    /// Number of automated-search synthesis requests issued.
    pub hammer_calls: u32,
    /// Number of children dropped because the frontier was full.
    pub dropped_nodes: u32,
    /// Maximum frontier size observed between iterations.
    pub peak_frontier_size: usize,
    /// Cumulative wall time in ms spent in executor calls.
    pub total_execute_time_ms: u64,
    /// Cumulative wall time in ms spent in proposer calls.
    pub total_propose_time_ms: u64,
}

/// Result of searching for a proof of a single obligation.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Name of the obligation that was searched.
    pub obligation: String,
    /// Final verdict.
    pub verdict: Verdict,
    /// Step sequence discharging the obligation; empty unless proved.
    pub proof_steps: Vec<String>,
    /// Wall-clock time in milliseconds for the search.
    pub wall_time_ms: u64,
    /// Detailed search counters.
    pub stats: SearchStats,
}

// ---------------------------------------------------------------------------
// SearchDriver
// ---------------------------------------------------------------------------

/// Best-first proof search driver.
///
/// Discharges one obligation against one live executor session, using one
/// step proposer, within an expansion-count budget, a wall-clock deadline,
/// and a frontier-capacity bound. One instance is reusable across
/// obligations; all per-search state lives in [`search_one`].
///
/// [`search_one`]: SearchDriver::search_one
#[derive(Debug, Clone)]
pub struct SearchDriver {
    config: SearchConfig,
}

impl SearchDriver {
    /// Create a new driver with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        config.validate();
        Self { config }
    }

    /// The driver's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for a proof of `obligation`.
    ///
    /// Setup failures (the obligation cannot be initialized) are returned
    /// as `Err`; everything after a successful initialization produces a
    /// [`SearchOutcome`]. Per-candidate engine failures are classified and
    /// swallowed so one bad candidate cannot abort an otherwise-healthy
    /// search.
    pub async fn search_one(
        &self,
        executor: &mut dyn ProofExecutor,
        proposer: &dyn StepProposer,
        obligation: &Obligation,
    ) -> Result<SearchOutcome, SearchError> {
        let start = Instant::now();
        let deadline = Duration::from_secs(self.config.max_wall_secs);
        let mut stats = SearchStats::default();

        // Initialize: load the theory up to and including the obligation.
        let root_checkpoint = CheckpointName::root();
        let init = executor
            .advance(
                &obligation.theory_path,
                &obligation.statement,
                true,
                root_checkpoint.as_str(),
            )
            .await
            .map_err(|failure| SearchError::Setup {
                kind: classify(&failure.0),
                message: failure.0,
            })?;

        if init.proved {
            return Err(SearchError::Setup {
                kind: FailureKind::Unknown,
                message: "obligation reported proved before any step was applied".to_string(),
            });
        }
        if init.goals.is_empty() {
            return Err(SearchError::Setup {
                kind: FailureKind::Unknown,
                message: "obligation produced no goal description".to_string(),
            });
        }

        tracing::info!(
            obligation = %obligation.name,
            theory = %obligation.theory_path.display(),
            "Initialized obligation"
        );

        // Seed the frontier with the root node: cost 0, the obligation
        // statement standing in as the step that produced the state.
        let mut arena = vec![SearchNode {
            cost: 0.0,
            last_step: obligation.statement.clone(),
            goals: init.goals,
            checkpoint: root_checkpoint,
            parent: None,
        }];
        let mut frontier = Frontier::new(self.config.max_frontier);
        if !frontier.push(0.0, 0) {
            stats.dropped_nodes += 1;
            tracing::warn!("frontier capacity is zero; root node dropped");
        }
        stats.peak_frontier_size = frontier.len();

        let mut expansions_left = self.config.max_expansions;
        let mut observed_failure: Option<FailureKind> = None;

        loop {
            if frontier.is_empty() || expansions_left == 0 || start.elapsed() >= deadline {
                break;
            }
            expansions_left -= 1;
            let Some(node_index) = frontier.pop() else {
                break;
            };
            stats.nodes_expanded += 1;

            let (parent_cost, parent_step, parent_goals, parent_checkpoint) = {
                let node = &arena[node_index];
                (
                    node.cost,
                    node.last_step.clone(),
                    node.goals.clone(),
                    node.checkpoint.clone(),
                )
            };

            tracing::debug!(
                checkpoint = %parent_checkpoint,
                cost = parent_cost,
                frontier = frontier.len(),
                "Expanding node"
            );

            let propose_start = Instant::now();
            let candidates = proposer
                .propose(&parent_step, &parent_goals)
                .await
                .map_err(SearchError::Proposer)?;
            stats.total_propose_time_ms += propose_start.elapsed().as_millis() as u64;

            if candidates.is_empty() {
                tracing::debug!(checkpoint = %parent_checkpoint, "No candidates; branch abandoned");
                continue;
            }

            for (index, candidate) in candidates.iter().enumerate() {
                let child_checkpoint = parent_checkpoint.child(index);

                // The hammer sentinel asks the engine to synthesize the
                // actual step first; a synthesis failure only loses this
                // candidate.
                let effective_step = if candidate.text.trim() == self.config.hammer_step {
                    stats.hammer_calls += 1;
                    let synth_start = Instant::now();
                    let synthesized = executor
                        .synthesize_step(
                            parent_checkpoint.as_str(),
                            &self.config.hammer_added_facts,
                            &self.config.hammer_deleted_facts,
                        )
                        .await;
                    stats.total_execute_time_ms += synth_start.elapsed().as_millis() as u64;
                    match synthesized {
                        Ok(step) => step,
                        Err(failure) => {
                            let kind = classify(&failure.0);
                            note_failure(&mut observed_failure, kind);
                            stats.step_failures += 1;
                            tracing::debug!(
                                checkpoint = %parent_checkpoint,
                                kind = %kind,
                                error = %failure.0,
                                "Hammer synthesis failed"
                            );
                            continue;
                        }
                    }
                } else {
                    candidate.text.clone()
                };

                stats.steps_attempted += 1;
                let apply_start = Instant::now();
                let applied = executor
                    .apply_step(
                        parent_checkpoint.as_str(),
                        &effective_step,
                        child_checkpoint.as_str(),
                    )
                    .await;
                stats.total_execute_time_ms += apply_start.elapsed().as_millis() as u64;

                let outcome = match applied {
                    Ok(outcome) => outcome,
                    Err(failure) => {
                        let kind = classify(&failure.0);
                        note_failure(&mut observed_failure, kind);
                        stats.step_failures += 1;
                        tracing::debug!(
                            step = %effective_step,
                            kind = %kind,
                            error = %failure.0,
                            "Step application failed"
                        );
                        continue;
                    }
                };

                // Stagnation guard: an accepted step that leaves the goals
                // unchanged cannot make progress and would recurse forever
                // on a no-op.
                if outcome.goals == parent_goals {
                    stats.stagnant_steps += 1;
                    tracing::debug!(step = %effective_step, "Goals unchanged; candidate discarded");
                    continue;
                }

                if outcome.proved {
                    arena.push(SearchNode {
                        cost: parent_cost + candidate.cost,
                        last_step: effective_step,
                        goals: outcome.goals,
                        checkpoint: child_checkpoint,
                        parent: Some(node_index),
                    });
                    let proof_steps = extract_step_sequence(&arena, arena.len() - 1);
                    let wall_time_ms = start.elapsed().as_millis() as u64;

                    tracing::info!(
                        obligation = %obligation.name,
                        steps = proof_steps.len(),
                        nodes = stats.nodes_expanded,
                        time_ms = wall_time_ms,
                        "Proof found"
                    );

                    return Ok(SearchOutcome {
                        obligation: obligation.name.clone(),
                        verdict: Verdict::Proved,
                        proof_steps,
                        wall_time_ms,
                        stats,
                    });
                }

                let child_index = arena.len();
                arena.push(SearchNode {
                    cost: parent_cost + candidate.cost,
                    last_step: effective_step,
                    goals: outcome.goals,
                    checkpoint: child_checkpoint.clone(),
                    parent: Some(node_index),
                });
                if frontier.push(parent_cost + candidate.cost, child_index) {
                    stats.peak_frontier_size = stats.peak_frontier_size.max(frontier.len());
                } else {
                    stats.dropped_nodes += 1;
                    tracing::debug!(
                        checkpoint = %child_checkpoint,
                        "Frontier full; candidate dropped"
                    );
                }
            }
        }

        // Terminal without a proof: an emptied frontier means every branch
        // failed or stagnated; otherwise a budget ran out with work pending.
        let reason = if frontier.is_empty() {
            NotProvedReason::Failure(observed_failure.unwrap_or(FailureKind::Unknown))
        } else {
            NotProvedReason::BudgetExhausted
        };
        let wall_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            obligation = %obligation.name,
            nodes = stats.nodes_expanded,
            pending = frontier.len(),
            time_ms = wall_time_ms,
            reason = ?reason,
            "Search exhausted without proof"
        );

        Ok(SearchOutcome {
            obligation: obligation.name.clone(),
            verdict: Verdict::NotProved(reason),
            proof_steps: Vec::new(),
            wall_time_ms,
            stats,
        })
    }
}

/// Record a classified failure, keeping the most specific kind observed:
/// a specific category is never displaced by `Unknown`.
fn note_failure(observed: &mut Option<FailureKind>, kind: FailureKind) {
    match observed {
        None => *observed = Some(kind),
        Some(FailureKind::Unknown) if kind != FailureKind::Unknown => *observed = Some(kind),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{make_step, MockExecutor, MockProposer};
    use std::path::PathBuf;

    fn obligation() -> Obligation {
        Obligation {
            name: "foo".to_string(),
            theory_path: PathBuf::from("Foo/Foo.thy"),
            statement: "lemma foo: P".to_string(),
        }
    }

    #[tokio::test]
    async fn one_step_proof() {
        let mut executor = MockExecutor::new("goal: P");
        executor.add_step("s", "by simp", true, "");

        let mut proposer = MockProposer::new();
        proposer.add_response("goal: P", vec![make_step("by simp", 0.1)]);

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert!(outcome.verdict.is_proved());
        assert_eq!(outcome.proof_steps, vec!["by simp"]);
        assert_eq!(outcome.stats.nodes_expanded, 1);
    }

    #[tokio::test]
    async fn two_step_proof_follows_costs() {
        let mut executor = MockExecutor::new("goal: P");
        executor.add_step("s", "apply (induct xs)", false, "goal: Q");
        executor.add_step("s.0", "by simp_all", true, "");

        let mut proposer = MockProposer::new();
        proposer.add_response("goal: P", vec![make_step("apply (induct xs)", 0.2)]);
        proposer.add_response("goal: Q", vec![make_step("by simp_all", 0.1)]);

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert!(outcome.verdict.is_proved());
        assert_eq!(outcome.proof_steps, vec!["apply (induct xs)", "by simp_all"]);
    }

    #[tokio::test]
    async fn setup_already_proved_is_an_error() {
        let mut executor = MockExecutor::new("");
        executor.set_advance(true, "");
        let proposer = MockProposer::new();

        let driver = SearchDriver::new(SearchConfig::default());
        let err = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Setup { .. }));
    }

    #[tokio::test]
    async fn setup_engine_failure_is_classified() {
        let mut executor = MockExecutor::new("goal: P");
        executor.fail_advance("java.nio.file.NoSuchFileException: Foo.thy");
        let proposer = MockProposer::new();

        let driver = SearchDriver::new(SearchConfig::default());
        let err = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap_err();

        match err {
            SearchError::Setup { kind, .. } => assert_eq!(kind, FailureKind::NoSuchFile),
            other => panic!("expected setup error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hammer_sentinel_synthesizes_then_applies() {
        let mut executor = MockExecutor::new("goal: P");
        executor.add_hammer("s", "by (simp add: prime_nat_iff)");
        executor.add_step("s", "by (simp add: prime_nat_iff)", true, "");

        let mut proposer = MockProposer::new();
        proposer.add_response("goal: P", vec![make_step("normalhammer", 0.1)]);

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert!(outcome.verdict.is_proved());
        assert_eq!(outcome.proof_steps, vec!["by (simp add: prime_nat_iff)"]);
        assert_eq!(outcome.stats.hammer_calls, 1);
    }

    #[tokio::test]
    async fn hammer_failure_skips_candidate_only() {
        let mut executor = MockExecutor::new("goal: P");
        executor.fail_hammer("s", "Sledgehammer timeout: Hard timeout exceeded");
        executor.add_step("s", "by auto", true, "");

        let mut proposer = MockProposer::new();
        proposer.add_response(
            "goal: P",
            vec![make_step("normalhammer", 0.1), make_step("by auto", 0.3)],
        );

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        // The failed hammer candidate is skipped; the sibling still proves.
        assert!(outcome.verdict.is_proved());
        assert_eq!(outcome.stats.step_failures, 1);
    }

    #[tokio::test]
    async fn stagnant_candidates_empty_the_frontier() {
        let mut executor = MockExecutor::new("goal: P");
        // Accepted but goal-preserving: the stagnation guard must discard it.
        executor.set_default_step(false, "goal: P");

        let mut proposer = MockProposer::new();
        proposer.set_default(vec![make_step("skip_step", 0.1)]);

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert_eq!(
            outcome.verdict,
            Verdict::NotProved(NotProvedReason::Failure(FailureKind::Unknown))
        );
        assert_eq!(outcome.stats.nodes_expanded, 1);
        assert_eq!(outcome.stats.stagnant_steps, 1);
    }

    #[tokio::test]
    async fn most_specific_failure_is_reported() {
        let mut executor = MockExecutor::new("goal: P");
        executor.fail_step("s", "step_a", "some unrecognized engine complaint");
        executor.fail_step("s", "step_b", "IsabelleMLException: Timeout");

        let mut proposer = MockProposer::new();
        proposer.add_response(
            "goal: P",
            vec![make_step("step_a", 0.1), make_step("step_b", 0.2)],
        );

        let driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        // Unknown observed first, then a specific kind: the specific one wins.
        assert_eq!(
            outcome.verdict,
            Verdict::NotProved(NotProvedReason::Failure(FailureKind::ExecutionTimeout))
        );
    }

    #[tokio::test]
    async fn zero_deadline_exhausts_before_any_expansion() {
        let mut executor = MockExecutor::new("goal: P");
        executor.set_default_step(false, "goal: Q");
        let mut proposer = MockProposer::new();
        proposer.set_default(vec![make_step("by auto", 0.1)]);

        let config = SearchConfig {
            max_wall_secs: 0,
            ..SearchConfig::default()
        };
        let driver = SearchDriver::new(config);
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert_eq!(
            outcome.verdict,
            Verdict::NotProved(NotProvedReason::BudgetExhausted)
        );
        assert_eq!(outcome.stats.nodes_expanded, 0);
        assert_eq!(executor.apply_calls, 0);
    }

    #[tokio::test]
    async fn expansion_budget_is_respected() {
        let mut executor = MockExecutor::new("goal: 0");
        // Every step makes "progress" to a fresh goal, so only the budget
        // can stop the search.
        executor.set_progress_default();

        let mut proposer = MockProposer::new();
        proposer.set_default(vec![make_step("step", 0.1)]);

        let config = SearchConfig {
            max_expansions: 5,
            ..SearchConfig::default()
        };
        let driver = SearchDriver::new(config);
        let outcome = driver
            .search_one(&mut executor, &proposer, &obligation())
            .await
            .unwrap();

        assert_eq!(
            outcome.verdict,
            Verdict::NotProved(NotProvedReason::BudgetExhausted)
        );
        assert_eq!(outcome.stats.nodes_expanded, 5);
    }

    #[tokio::test]
    async fn note_failure_prefers_specific_kinds() {
        let mut observed = None;
        note_failure(&mut observed, FailureKind::Unknown);
        assert_eq!(observed, Some(FailureKind::Unknown));
        note_failure(&mut observed, FailureKind::TimeoutSoft);
        assert_eq!(observed, Some(FailureKind::TimeoutSoft));
        // A later kind never displaces an earlier specific one.
        note_failure(&mut observed, FailureKind::NotFound);
        assert_eq!(observed, Some(FailureKind::TimeoutSoft));
    }
}
