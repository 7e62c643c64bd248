//! Configuration and data types for the proposer crate.

use serde::Deserialize;

/// A candidate proof step proposed for a goal state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedStep {
    /// The step text, ready to send to the engine (or the hammer sentinel).
    pub text: String,
    /// Non-negative partial search cost; lower is more promising. Behaves
    /// like a negative log-likelihood and accumulates along a search path.
    pub cost: f64,
}

/// Configuration for an HTTP-backed proposer.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposerConfig {
    /// Base URL of the inference server (e.g., "http://localhost:30000").
    pub server_url: String,
    /// Sampling temperature. Defaults to 1.2.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum number of candidates requested per call. Defaults to 32.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_temperature() -> f64 {
    1.2
}
fn default_max_candidates() -> usize {
    32
}

impl ProposerConfig {
    /// Create a config with the given server URL and defaults.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            temperature: default_temperature(),
            max_candidates: default_max_candidates(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposed_step() {
        let step = ProposedStep {
            text: "by simp".to_string(),
            cost: 0.1,
        };
        assert_eq!(step.text, "by simp");
        assert!((step.cost - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_config_defaults() {
        let cfg = ProposerConfig::new("http://localhost:30000");
        assert_eq!(cfg.server_url, "http://localhost:30000");
        assert!((cfg.temperature - 1.2).abs() < 1e-9);
        assert_eq!(cfg.max_candidates, 32);
    }

    #[test]
    fn test_config_deserialize() {
        let json = r#"{
            "server_url": "http://inference:8080",
            "temperature": 0.7
        }"#;
        let cfg: ProposerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.server_url, "http://inference:8080");
        assert!((cfg.temperature - 0.7).abs() < 1e-9);
        // Default
        assert_eq!(cfg.max_candidates, 32);
    }
}
