use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::protocol::{
    parse_reply, AckReply, DescribeReply, ExecutePayload, HammerPayload, HammerReply,
    LoadTheoryPayload, NewTheoryPayload, OpenSessionForTheoryPayload, OpenSessionPayload,
    StateNamePayload, StepReply,
};
use crate::types::{EngineError, SessionConfig};

/// A live session with the engine server.
///
/// A session owns one engine-side workspace of named checkpoints. It is
/// opened either for a named prebuilt session image or for a single theory
/// file (the server picks an image covering the theory's imports), and must
/// be [`close`]d when done so the server can release the workspace.
///
/// Checkpoints are additive: a failed call never retracts previously
/// created checkpoints.
///
/// [`close`]: IsabelleSession::close
pub struct IsabelleSession {
    client: Client,
    base_url: Url,
    config: SessionConfig,
}

impl IsabelleSession {
    /// Open a session for a named prebuilt session image (e.g. `"HOL"`).
    pub async fn connect(
        config: SessionConfig,
        session_name: &str,
        session_roots: &[PathBuf],
    ) -> Result<Self, EngineError> {
        let session = Self::build(config)?;
        let ack: AckReply = session
            .post(
                "openIsabelleSession",
                &OpenSessionPayload {
                    session_name: session_name.to_string(),
                    session_roots: session_roots
                        .iter()
                        .map(|p| p.to_string_lossy().into_owned())
                        .collect(),
                    working_dir: session.config.working_dir.to_string_lossy().into_owned(),
                },
            )
            .await?;
        session.expect_ack(&ack, "success")?;
        tracing::info!(session = session_name, "Engine session opened");
        Ok(session)
    }

    /// Open a session able to load the given theory file.
    pub async fn connect_for_theory(
        config: SessionConfig,
        theory_path: &Path,
    ) -> Result<Self, EngineError> {
        let session = Self::build(config)?;
        let ack: AckReply = session
            .post(
                "openIsabelleSessionForTheory",
                &OpenSessionForTheoryPayload {
                    theory_path: theory_path.to_string_lossy().into_owned(),
                },
            )
            .await?;
        session.expect_ack(&ack, "success")?;
        tracing::info!(theory = %theory_path.display(), "Engine session opened");
        Ok(session)
    }

    fn build(config: SessionConfig) -> Result<Self, EngineError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| EngineError::Protocol(format!("invalid base URL: {e}")))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            config,
        })
    }

    /// POST a JSON body to an endpoint and interpret the reply.
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &impl Serialize,
    ) -> Result<T, EngineError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| EngineError::Protocol(format!("invalid endpoint {endpoint}: {e}")))?;
        tracing::debug!(url = %url, "Engine request");

        let value: serde_json::Value = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_reply(value)
    }

    fn expect_ack(&self, ack: &AckReply, expected: &str) -> Result<(), EngineError> {
        if ack.success == expected {
            Ok(())
        } else {
            Err(EngineError::Protocol(format!(
                "unexpected acknowledgement: {:?}",
                ack.success
            )))
        }
    }

    /// Start a fresh theory with the given imports, storing the initial
    /// state as `new_state_name`.
    pub async fn new_theory(
        &self,
        theory_name: &str,
        new_state_name: &str,
        imports: &[String],
        only_import_from_session_heap: bool,
    ) -> Result<(), EngineError> {
        let ack: AckReply = self
            .post(
                "newTheory",
                &NewTheoryPayload {
                    theory_name: theory_name.to_string(),
                    new_state_name: new_state_name.to_string(),
                    imports: imports.to_vec(),
                    master_dir: self.config.working_dir.to_string_lossy().into_owned(),
                    only_import_from_session_heap,
                },
            )
            .await?;
        self.expect_ack(&ack, "success")
    }

    /// Load a theory file up to `until` (including it when `inclusive`),
    /// storing the resulting state as `new_state_name`. With `init_only`
    /// the theory is merely initialized and `until` is ignored.
    pub async fn load_theory(
        &self,
        theory_path: &Path,
        until: &str,
        inclusive: bool,
        new_state_name: &str,
        init_only: bool,
    ) -> Result<StepReply, EngineError> {
        self.post(
            "loadTheory",
            &LoadTheoryPayload {
                theory_path: theory_path.to_string_lossy().into_owned(),
                until: until.to_string(),
                inclusive,
                new_state_name: new_state_name.to_string(),
                init_only,
            },
        )
        .await
    }

    /// Execute Isar code against `state_name`, storing the resulting state
    /// as `new_state_name`.
    pub async fn execute(
        &self,
        state_name: &str,
        isar_code: &str,
        new_state_name: &str,
    ) -> Result<StepReply, EngineError> {
        self.post(
            "execute",
            &ExecutePayload {
                state_name: state_name.to_string(),
                isar_code: isar_code.to_string(),
                new_state_name: new_state_name.to_string(),
                timeout: self.config.step_timeout_secs,
            },
        )
        .await
    }

    /// Ask the engine's automated search for a proof step at `state_name`.
    pub async fn hammer(
        &self,
        state_name: &str,
        added_facts: &[String],
        deleted_facts: &[String],
    ) -> Result<String, EngineError> {
        let reply: HammerReply = self
            .post(
                "hammer",
                &HammerPayload {
                    state_name: state_name.to_string(),
                    added_facts: added_facts.to_vec(),
                    deleted_facts: deleted_facts.to_vec(),
                },
            )
            .await?;
        Ok(reply.proof)
    }

    /// Human-readable description of a stored state. Diagnostic only.
    pub async fn describe_state(&self, state_name: &str) -> Result<String, EngineError> {
        let reply: DescribeReply = self
            .post(
                "describeState",
                &StateNamePayload {
                    state_name: state_name.to_string(),
                },
            )
            .await?;
        Ok(reply.description)
    }

    /// Drop a stored state on the server.
    pub async fn forget_state(&self, state_name: &str) -> Result<(), EngineError> {
        let ack: AckReply = self
            .post(
                "forgetState",
                &StateNamePayload {
                    state_name: state_name.to_string(),
                },
            )
            .await?;
        self.expect_ack(&ack, "success")
    }

    /// Drop all stored states on the server.
    pub async fn forget_all_states(&self) -> Result<(), EngineError> {
        let ack: AckReply = self
            .post("forgetAllStates", &serde_json::json!({}))
            .await?;
        self.expect_ack(&ack, "success")
    }

    /// Close the session, releasing the engine-side workspace.
    pub async fn close(self) -> Result<(), EngineError> {
        let ack: AckReply = self
            .post("closeIsabelleSession", &serde_json::json!({}))
            .await?;
        self.expect_ack(&ack, "Closed")?;
        tracing::info!("Engine session closed");
        Ok(())
    }
}
