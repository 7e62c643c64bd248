mod config;
mod pipeline;
pub mod results;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipeline::{EvalArgs, ProposerKind, ProveArgs};

/// isar-prover: best-first proof search against a remote Isabelle engine.
#[derive(Parser)]
#[command(name = "isar-prover", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands for batch evaluation and single-obligation proving.
#[derive(Subcommand)]
enum Command {
    /// Evaluate a proposer over a test corpus.
    Eval {
        /// Path to the prover config TOML file.
        #[arg(long, default_value = "configs/search.toml")]
        config: PathBuf,
        /// Directory of test-case JSON files.
        #[arg(long)]
        tests: PathBuf,
        /// Only run the "quick" subset of the corpus.
        #[arg(long)]
        quick: bool,
        /// Server-side root the corpus theory paths are relative to.
        #[arg(long, default_value = "/afp/thys")]
        theory_root: PathBuf,
        /// Which step proposer to use.
        #[arg(long, value_enum, default_value_t = ProposerKind::Hammer)]
        proposer: ProposerKind,
        /// URL of the inference server (required with --proposer http).
        #[arg(long)]
        server_url: Option<String>,
        /// Override the engine server URL from the config file.
        #[arg(long)]
        engine_url: Option<String>,
        /// Path to write the JSON evaluation report.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Maximum number of cases to run (truncates the corpus).
        #[arg(long)]
        max_cases: Option<usize>,
    },
    /// Search for a proof of a single lemma.
    Prove {
        /// Path to the prover config TOML file.
        #[arg(long, default_value = "configs/search.toml")]
        config: PathBuf,
        /// Path to the theory file on the engine server.
        #[arg(long)]
        theory: PathBuf,
        /// The lemma statement as it appears in the theory.
        #[arg(long)]
        lemma: String,
        /// Which step proposer to use.
        #[arg(long, value_enum, default_value_t = ProposerKind::Hammer)]
        proposer: ProposerKind,
        /// URL of the inference server (required with --proposer http).
        #[arg(long)]
        server_url: Option<String>,
        /// Override the engine server URL from the config file.
        #[arg(long)]
        engine_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Eval {
            config,
            tests,
            quick,
            theory_root,
            proposer,
            server_url,
            engine_url,
            output,
            max_cases,
        } => {
            pipeline::run_eval(EvalArgs {
                config,
                tests,
                quick,
                theory_root,
                proposer,
                server_url,
                engine_url,
                output,
                max_cases,
            })
            .await
        }
        Command::Prove {
            config,
            theory,
            lemma,
            proposer,
            server_url,
            engine_url,
        } => {
            pipeline::run_prove(ProveArgs {
                config,
                theory,
                lemma,
                proposer,
                server_url,
                engine_url,
            })
            .await
        }
    }
}
