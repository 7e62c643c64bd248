//! HTTP client for an external step-proposal inference server.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::{ProposedStep, ProposerConfig};

/// HTTP-backed proposer.
///
/// Posts the proof context and goal description to the server's `/propose`
/// endpoint and expects a ranked candidate list back. The server owns
/// sampling; this client only forwards the tuning knobs from
/// [`ProposerConfig`].
#[derive(Debug, Clone)]
pub struct InferenceProposer {
    client: Client,
    base_url: Url,
    config: ProposerConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposeRequest<'a> {
    context: &'a str,
    proof_state: &'a str,
    max_candidates: usize,
    temperature: f64,
}

#[derive(Deserialize)]
struct ProposeReply {
    candidates: Vec<CandidateWire>,
}

#[derive(Deserialize)]
struct CandidateWire {
    step: String,
    cost: f64,
}

impl InferenceProposer {
    /// Create a proposer for the server named in `config`.
    pub fn new(config: ProposerConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.server_url)?;
        Ok(Self {
            client: Client::new(),
            base_url,
            config,
        })
    }

    /// Request candidate steps for the given context and goal description.
    ///
    /// Candidates come back in server order (best first); costs are taken
    /// as-is.
    pub async fn request_steps(
        &self,
        context: &str,
        goals: &str,
    ) -> anyhow::Result<Vec<ProposedStep>> {
        let url = self.base_url.join("propose")?;
        tracing::debug!(url = %url, "Requesting step candidates");

        let reply: ProposeReply = self
            .client
            .post(url)
            .json(&ProposeRequest {
                context,
                proof_state: goals,
                max_candidates: self.config.max_candidates,
                temperature: self.config.temperature,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let steps: Vec<ProposedStep> = reply
            .candidates
            .into_iter()
            .map(|c| ProposedStep {
                text: c.step,
                cost: c.cost,
            })
            .collect();
        tracing::debug!(count = steps.len(), "Received step candidates");
        Ok(steps)
    }
}
