/// Search configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchConfig {
    /// Maximum number of frontier nodes to expand before giving up.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u32,

    /// Maximum number of pending nodes held in the frontier.
    #[serde(default = "default_max_frontier")]
    pub max_frontier: usize,

    /// Maximum wall-clock seconds per obligation. Zero means the search
    /// initializes the obligation and immediately reports budget exhaustion.
    #[serde(default = "default_max_wall_secs")]
    pub max_wall_secs: u64,

    /// Sentinel step text that requests automated search: when the proposer
    /// emits it, the engine synthesizes the actual step to apply.
    #[serde(default = "default_hammer_step")]
    pub hammer_step: String,

    /// Extra facts handed to the engine when synthesizing a step.
    #[serde(default)]
    pub hammer_added_facts: Vec<String>,

    /// Facts withheld from the engine when synthesizing a step.
    #[serde(default)]
    pub hammer_deleted_facts: Vec<String>,
}

fn default_max_expansions() -> u32 {
    128
}
fn default_max_frontier() -> usize {
    256
}
fn default_max_wall_secs() -> u64 {
    500
}
fn default_hammer_step() -> String {
    "normalhammer".to_string()
}

impl SearchConfig {
    /// Log a warning for budgets under which no search can make progress.
    pub fn validate(&self) {
        if self.max_expansions == 0 {
            tracing::warn!("max_expansions = 0; every search will exhaust its budget immediately");
        }
        if self.max_frontier == 0 {
            tracing::warn!("max_frontier = 0; the root node cannot be enqueued");
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: default_max_expansions(),
            max_frontier: default_max_frontier(),
            max_wall_secs: default_max_wall_secs(),
            hammer_step: default_hammer_step(),
            hammer_added_facts: Vec::new(),
            hammer_deleted_facts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.max_expansions, 128);
        assert_eq!(cfg.max_frontier, 256);
        assert_eq!(cfg.max_wall_secs, 500);
        assert_eq!(cfg.hammer_step, "normalhammer");
        assert!(cfg.hammer_added_facts.is_empty());
        assert!(cfg.hammer_deleted_facts.is_empty());
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
            max_expansions = 32
            max_wall_secs = 60
        "#;
        let cfg: SearchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.max_expansions, 32);
        assert_eq!(cfg.max_wall_secs, 60);
        // Defaults for unspecified fields
        assert_eq!(cfg.max_frontier, 256);
        assert_eq!(cfg.hammer_step, "normalhammer");
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r#"
            max_expansions = 64
            max_frontier = 128
            max_wall_secs = 300
            hammer_step = "sledgehammer"
            hammer_deleted_facts = ["prime_gt_1_nat"]
        "#;
        let cfg: SearchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.max_expansions, 64);
        assert_eq!(cfg.max_frontier, 128);
        assert_eq!(cfg.max_wall_secs, 300);
        assert_eq!(cfg.hammer_step, "sledgehammer");
        assert_eq!(cfg.hammer_deleted_facts, vec!["prime_gt_1_nat"]);
    }

    #[test]
    fn test_validate_degenerate_budgets() {
        // Should log warnings but never panic.
        let cfg = SearchConfig {
            max_expansions: 0,
            max_frontier: 0,
            ..Default::default()
        };
        cfg.validate();
    }
}
