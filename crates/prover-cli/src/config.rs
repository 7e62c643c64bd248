//! TOML config loading for the prover CLI.
//!
//! Deserializes `configs/search.toml` which has `[search]` and `[session]`
//! sections, then merges with CLI overrides.

use std::path::Path;

use isabelle_client::SessionConfig;
use search::SearchConfig;
use serde::Deserialize;

/// Top-level structure matching `configs/search.toml`.
#[derive(Debug, Deserialize)]
pub struct ProverToml {
    /// Search algorithm parameters.
    #[serde(default)]
    pub search: SearchConfig,
    /// Engine session overrides.
    #[serde(default)]
    pub session: SessionOverrides,
}

/// Optional overrides for [`SessionConfig`] fields.
#[derive(Debug, Default, Deserialize)]
pub struct SessionOverrides {
    /// Base URL of the engine server.
    pub base_url: Option<String>,
    /// Working directory for session-root resolution.
    pub working_dir: Option<std::path::PathBuf>,
    /// Engine-side timeout in seconds for a single step execution.
    pub step_timeout_secs: Option<u64>,
}

/// Load and deserialize a `ProverToml` from a TOML file.
pub fn load_prover_toml(path: &Path) -> anyhow::Result<ProverToml> {
    let contents = std::fs::read_to_string(path)?;
    let config: ProverToml = toml::from_str(&contents)?;
    tracing::info!(path = %path.display(), "Loaded prover config");
    Ok(config)
}

/// Build a `SessionConfig` from defaults, TOML overrides, and the CLI flag.
///
/// Priority chain: crate defaults < TOML values < CLI `--engine-url`.
pub fn build_session_config(
    overrides: &SessionOverrides,
    engine_url_cli: Option<&str>,
) -> SessionConfig {
    let mut config = SessionConfig::default();

    if let Some(url) = &overrides.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &overrides.working_dir {
        config.working_dir = dir.clone();
    }
    if let Some(secs) = overrides.step_timeout_secs {
        config.step_timeout_secs = secs;
    }

    // CLI override takes highest priority
    if let Some(url) = engine_url_cli {
        config.base_url = url.to_string();
    }

    config
}
