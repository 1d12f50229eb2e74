use crate::advice::AdvisorResponse;
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::llm::client::GeminiClient;
use crate::llm::prompts::{build_user_prompt, SYSTEM_PROMPT_ADVISOR};
use crate::llm::types::Content;
use crate::strategy::{AdvisoryProvider, AdvisoryRequest};
use log::info;
use std::time::Duration;

/// Gemini-backed advisory provider. Returns raw model text; the
/// [`crate::AdvisoryChain`] parses, validates and falls back.
pub struct GeminiAdvisor {
    client: GeminiClient,
    model: String,
    system_prompt: String,
}

impl GeminiAdvisor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Result<Self> {
        let schema = AdvisorResponse::schema_as_json()?;
        Ok(Self {
            client,
            model: model.into(),
            system_prompt: format!("{}\n{}", SYSTEM_PROMPT_ADVISOR, schema),
        })
    }

    /// Builds the client from `GEMINI_API_KEY` with the configured model and
    /// timeout.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let client = GeminiClient::from_env()?
            .with_timeout(Duration::from_secs(config.timeout_secs))?;
        Self::new(client, config.model.clone())
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

impl AdvisoryProvider for GeminiAdvisor {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &AdvisoryRequest<'_>) -> Result<String> {
        let scenario_json = serde_json::to_string_pretty(request.scenario)?;
        let summary_json = serde_json::to_string_pretty(&request.forecast.summary)?;
        let baseline_json = serde_json::to_string_pretty(&request.heuristic())?;

        let user_prompt = build_user_prompt(
            &scenario_json,
            &summary_json,
            &baseline_json,
            request.preferences.emergency_fund_months,
        );

        info!("Requesting advice from Gemini model '{}'", self.model);
        self.client
            .generate_content(&self.model, &self.system_prompt, vec![Content::user(user_prompt)])
            .await
    }
}
