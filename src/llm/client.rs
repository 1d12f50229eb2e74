use crate::error::{ForecastError, Result};
use crate::llm::types::*;
use reqwest::Client;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Reads `GEMINI_API_KEY` from the environment.
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").map_err(|_| ForecastError::ValidationError {
                field: "GEMINI_API_KEY".to_string(),
                details: "environment variable is not set".to_string(),
            })?;
        Ok(Self::new(api_key))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) async fn generate_content(
        &self,
        model: &str,
        system_prompt: &str,
        messages: Vec<Content>,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: messages,
            system_instruction: Some(Content::user(system_prompt)),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: Some(0.2),
            },
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(ForecastError::ProviderFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        first_candidate_text(body)
    }
}

/// Text of the first part of the first candidate.
pub(crate) fn first_candidate_text(body: GenerateContentResponse) -> Result<String> {
    let candidate = body
        .candidates
        .ok_or_else(|| ForecastError::ProviderFailed("No candidates returned".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::ProviderFailed("Empty candidates list".to_string()))?;

    let content = candidate.content.ok_or_else(|| {
        ForecastError::ProviderFailed(format!(
            "Candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    match content.parts.into_iter().next() {
        Some(Part::Text { text }) => Ok(text),
        None => Err(ForecastError::ProviderFailed(
            "No parts in content".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    fn provider_failure(result: Result<String>) -> String {
        match result {
            Err(ForecastError::ProviderFailed(details)) => details,
            other => panic!("expected a provider failure, got {:?}", other),
        }
    }

    #[test]
    fn test_extracts_first_candidate_text() {
        let body = parse(
            r#"{
                "candidates": [
                    { "content": { "role": "model", "parts": [ { "text": "{\"insights\": []}" }, { "text": "ignored" } ] }, "finishReason": "STOP" },
                    { "content": { "role": "model", "parts": [ { "text": "second" } ] } }
                ],
                "usageMetadata": { "totalTokenCount": 42 }
            }"#,
        );
        assert_eq!(first_candidate_text(body).unwrap(), "{\"insights\": []}");
    }

    #[test]
    fn test_missing_or_empty_candidates() {
        let details = provider_failure(first_candidate_text(parse(r#"{}"#)));
        assert_eq!(details, "No candidates returned");

        let details = provider_failure(first_candidate_text(parse(r#"{ "candidates": [] }"#)));
        assert_eq!(details, "Empty candidates list");
    }

    #[test]
    fn test_blocked_candidate_and_empty_parts() {
        let blocked = parse(r#"{ "candidates": [ { "finishReason": "SAFETY" } ] }"#);
        let details = provider_failure(first_candidate_text(blocked));
        assert!(details.contains("SAFETY"));

        let empty = parse(r#"{ "candidates": [ { "content": { "parts": [] } } ] }"#);
        assert_eq!(
            provider_failure(first_candidate_text(empty)),
            "No parts in content"
        );
    }

    #[test]
    fn test_request_wire_format() {
        let payload = GenerateContentRequest {
            contents: vec![Content::user("hello")],
            system_instruction: Some(Content::user("be brief")),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: None,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["generationConfig"].get("temperature").is_none());
    }
}
