//! Wire types for the engine server's JSON-over-HTTP API.
//!
//! Every endpoint takes a camelCase JSON body and answers with either a
//! typed reply or an error envelope `{"error": ..., "traceback": ...}`.
//! [`parse_reply`] performs the envelope check before deserializing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::EngineError;

// --- Request payloads ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenSessionPayload {
    pub session_name: String,
    pub session_roots: Vec<String>,
    pub working_dir: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenSessionForTheoryPayload {
    pub theory_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewTheoryPayload {
    pub theory_name: String,
    pub new_state_name: String,
    pub imports: Vec<String>,
    pub master_dir: String,
    pub only_import_from_session_heap: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoadTheoryPayload {
    pub theory_path: String,
    pub until: String,
    pub inclusive: bool,
    pub new_state_name: String,
    pub init_only: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecutePayload {
    pub state_name: String,
    pub isar_code: String,
    pub new_state_name: String,
    pub timeout: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HammerPayload {
    pub state_name: String,
    pub added_facts: Vec<String>,
    pub deleted_facts: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StateNamePayload {
    pub state_name: String,
}

// --- Replies ---

/// Reply to a state-advancing call (`loadTheory`, `execute`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReply {
    /// Whether the proof is complete after this transition.
    pub proof_done: bool,
    /// Pretty-printed remaining goals (empty when the proof is done).
    pub proof_goals: String,
}

/// Reply carrying a checkpoint description.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DescribeReply {
    pub description: String,
}

/// Reply to a `hammer` call: the synthesized proof step.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HammerReply {
    pub proof: String,
}

/// Acknowledgement reply for calls without a data payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AckReply {
    pub success: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorReply {
    error: String,
    #[serde(default)]
    traceback: Option<String>,
}

impl ErrorReply {
    fn into_message(self) -> String {
        match self.traceback {
            Some(traceback) if !traceback.is_empty() => {
                format!("{}\nTraceback:\n{}", self.error, traceback)
            }
            _ => self.error,
        }
    }
}

/// Interpret a server reply: error envelopes become [`EngineError::Server`],
/// anything else must deserialize as `T`.
pub(crate) fn parse_reply<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, EngineError> {
    if value.get("error").is_some() {
        let err: ErrorReply = serde_json::from_value(value)
            .map_err(|e| EngineError::Protocol(format!("malformed error reply: {e}")))?;
        return Err(EngineError::Server {
            message: err.into_message(),
        });
    }
    serde_json::from_value(value)
        .map_err(|e| EngineError::Protocol(format!("unexpected reply shape: {e}")))
}
