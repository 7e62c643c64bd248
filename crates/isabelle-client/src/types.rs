use std::path::PathBuf;

/// Errors that can occur while talking to the engine server.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine reported an error for an otherwise well-formed request
    /// (unknown checkpoint, failed step, internal timeout, ...). The
    /// message is the engine's free text, with its traceback appended when
    /// one was supplied.
    #[error("engine error: {message}")]
    Server {
        /// The engine's error text.
        message: String,
    },

    /// HTTP transport failure (connection refused, non-2xx status, ...).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something this client cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Configuration for connecting to an engine server.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SessionConfig {
    /// Base URL of the engine server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Working directory for session-root resolution on the server side.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Engine-side timeout in seconds for a single step execution.
    /// Zero leaves the engine's own default in force.
    #[serde(default)]
    pub step_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:17000".to_string()
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("/home/isabelle/")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            working_dir: default_working_dir(),
            step_timeout_secs: 0,
        }
    }
}
