//! Command implementations: batch evaluation over a corpus and
//! single-obligation proving.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use clap::ValueEnum;

use corpus::TestCase;
use isabelle_client::{IsabelleSession, SessionConfig};
use proposer::{HammerProposer, InferenceProposer, ProposerConfig};
use search::{
    classify, NotProvedReason, Obligation, SearchDriver, SearchError, SearchOutcome, StepProposer,
    Verdict,
};

use crate::config::{build_session_config, load_prover_toml};
use crate::results::{median, CaseReport, EvalReport};

/// Which step proposer to run the search with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProposerKind {
    /// Always ask the engine's automated search (model-free baseline).
    Hammer,
    /// An external inference server.
    Http,
}

impl std::fmt::Display for ProposerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Hammer => "hammer",
            Self::Http => "http",
        })
    }
}

/// Arguments for the `eval` subcommand.
pub struct EvalArgs {
    pub config: PathBuf,
    pub tests: PathBuf,
    pub quick: bool,
    pub theory_root: PathBuf,
    pub proposer: ProposerKind,
    pub server_url: Option<String>,
    pub engine_url: Option<String>,
    pub output: Option<PathBuf>,
    pub max_cases: Option<usize>,
}

/// Arguments for the `prove` subcommand.
pub struct ProveArgs {
    pub config: PathBuf,
    pub theory: PathBuf,
    pub lemma: String,
    pub proposer: ProposerKind,
    pub server_url: Option<String>,
    pub engine_url: Option<String>,
}

fn build_proposer(
    kind: ProposerKind,
    server_url: Option<&str>,
    hammer_step: &str,
) -> anyhow::Result<Box<dyn StepProposer>> {
    match kind {
        ProposerKind::Hammer => Ok(Box::new(HammerProposer::new(hammer_step))),
        ProposerKind::Http => {
            let url = server_url
                .ok_or_else(|| anyhow::anyhow!("--server-url is required with --proposer http"))?;
            Ok(Box::new(InferenceProposer::new(ProposerConfig::new(url))?))
        }
    }
}

/// Outcome category slug for a finished search.
fn verdict_slug(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Proved => "success".to_string(),
        Verdict::NotProved(NotProvedReason::BudgetExhausted) => "budget-exhausted".to_string(),
        Verdict::NotProved(NotProvedReason::Failure(kind)) => kind.to_string(),
    }
}

/// Run the search for one test case inside a fresh engine session.
///
/// Every exceptional exit is folded into an outcome category so the
/// evaluation loop always tallies something.
async fn run_case(
    driver: &SearchDriver,
    proposer: &dyn StepProposer,
    session_config: &SessionConfig,
    theory_root: &std::path::Path,
    case: &TestCase,
) -> (String, Vec<String>) {
    let theory_path = theory_root.join(&case.theory_file);

    let mut session =
        match IsabelleSession::connect_for_theory(session_config.clone(), &theory_path).await {
            Ok(session) => session,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(case = %case.name, error = %message, "Session open failed");
                return (classify(&message).to_string(), Vec::new());
            }
        };

    let obligation = Obligation {
        name: case.name.clone(),
        theory_path,
        statement: case.lemma_statement.clone(),
    };
    let result = driver.search_one(&mut session, proposer, &obligation).await;

    if let Err(err) = session.close().await {
        tracing::warn!(case = %case.name, error = %err, "Failed to close session");
    }

    match result {
        Ok(outcome) => (verdict_slug(&outcome.verdict), outcome.proof_steps),
        Err(SearchError::Setup { kind, message }) => {
            tracing::warn!(case = %case.name, error = %message, "Setup failed");
            (kind.to_string(), Vec::new())
        }
        Err(SearchError::Proposer(err)) => {
            let message = err.to_string();
            tracing::warn!(case = %case.name, error = %message, "Proposer failed");
            (classify(&message).to_string(), Vec::new())
        }
    }
}

/// Run the driver over every case in a test corpus and tally outcomes.
pub async fn run_eval(args: EvalArgs) -> anyhow::Result<()> {
    let config = load_prover_toml(&args.config)?;
    let session_config = build_session_config(&config.session, args.engine_url.as_deref());
    let proposer = build_proposer(
        args.proposer,
        args.server_url.as_deref(),
        &config.search.hammer_step,
    )?;
    let driver = SearchDriver::new(config.search);

    let mut cases = if args.quick {
        corpus::load_quick_test_cases(&args.tests)?
    } else {
        corpus::load_test_cases(&args.tests)?
    };
    if let Some(max) = args.max_cases {
        cases.truncate(max);
    }

    let total = cases.len();
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut per_case = Vec::with_capacity(total);

    for (done, case) in cases.iter().enumerate() {
        tracing::info!(
            case = %case.name,
            theory = %case.theory_file.display(),
            "Starting test case"
        );
        let started = Instant::now();
        let (outcome, proof_steps) = run_case(
            &driver,
            proposer.as_ref(),
            &session_config,
            &args.theory_root,
            case,
        )
        .await;
        let wall_secs = started.elapsed().as_secs_f64();

        *counts.entry(outcome.clone()).or_insert(0) += 1;
        tracing::info!(
            case = %case.name,
            outcome = %outcome,
            done = done + 1,
            total,
            tally = ?counts,
            "Test case finished"
        );
        per_case.push(CaseReport {
            name: case.name.clone(),
            outcome,
            wall_secs,
            proof_steps,
        });
    }

    let solved = counts.get("success").copied().unwrap_or(0);
    let mut wall_times: Vec<f64> = per_case.iter().map(|c| c.wall_secs).collect();
    let avg_wall_secs = if wall_times.is_empty() {
        0.0
    } else {
        wall_times.iter().sum::<f64>() / wall_times.len() as f64
    };
    let report = EvalReport {
        corpus: args.tests.display().to_string(),
        total: total as u32,
        solved,
        rate: if total == 0 {
            0.0
        } else {
            f64::from(solved) / total as f64
        },
        counts,
        avg_wall_secs,
        median_wall_secs: median(&mut wall_times),
        per_case,
    };

    tracing::info!(
        total = report.total,
        solved = report.solved,
        rate = report.rate,
        tally = ?report.counts,
        "Evaluation finished"
    );

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "Wrote evaluation report");
    }

    Ok(())
}

/// Search for a proof of a single lemma and print the result.
pub async fn run_prove(args: ProveArgs) -> anyhow::Result<()> {
    let config = load_prover_toml(&args.config)?;
    let session_config = build_session_config(&config.session, args.engine_url.as_deref());
    let proposer = build_proposer(
        args.proposer,
        args.server_url.as_deref(),
        &config.search.hammer_step,
    )?;
    let driver = SearchDriver::new(config.search);

    let mut session =
        IsabelleSession::connect_for_theory(session_config, &args.theory).await?;
    let obligation = Obligation {
        name: args
            .lemma
            .lines()
            .next()
            .unwrap_or("obligation")
            .to_string(),
        theory_path: args.theory.clone(),
        statement: args.lemma.clone(),
    };
    let result = driver
        .search_one(&mut session, proposer.as_ref(), &obligation)
        .await;
    if let Err(err) = session.close().await {
        tracing::warn!(error = %err, "Failed to close session");
    }
    let outcome: SearchOutcome = result?;

    match &outcome.verdict {
        Verdict::Proved => {
            println!("proved in {} steps:", outcome.proof_steps.len());
            for step in &outcome.proof_steps {
                println!("  {step}");
            }
        }
        verdict => {
            println!("not proved: {}", verdict_slug(verdict));
        }
    }
    println!(
        "expanded {} nodes in {} ms",
        outcome.stats.nodes_expanded, outcome.wall_time_ms
    );

    Ok(())
}
