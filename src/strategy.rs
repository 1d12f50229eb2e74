//! Advisory orchestration: an optional external provider in front of the
//! heuristic advisor.
//!
//! The chain never fails. Provider errors, malformed text and schema
//! violations are all logged and answered with the heuristic result.
//! Those fallbacks are never cached; provider answers and heuristic-only
//! results are.

use crate::advice::AdvisorResponse;
use crate::advisor::{run_heuristic_advisor, AdvisorPreferences};
use crate::cache::{input_hash, AdvisoryCache};
use crate::error::Result;
use crate::schema::{ForecastResult, ScenarioInput};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct AdvisoryRequest<'a> {
    pub scenario: &'a ScenarioInput,
    pub forecast: &'a ForecastResult,
    pub preferences: &'a AdvisorPreferences,
}

impl<'a> AdvisoryRequest<'a> {
    pub fn new(
        scenario: &'a ScenarioInput,
        forecast: &'a ForecastResult,
        preferences: &'a AdvisorPreferences,
    ) -> Self {
        Self {
            scenario,
            forecast,
            preferences,
        }
    }

    pub fn heuristic(&self) -> AdvisorResponse {
        run_heuristic_advisor(self.scenario, self.forecast, self.preferences)
    }
}

/// An external source of advice, typically a language model.
///
/// Implementations return the raw response text; parsing and validation are
/// done by [`AdvisoryChain`] so every provider is held to the same contract.
#[allow(async_fn_in_trait)]
pub trait AdvisoryProvider {
    fn name(&self) -> &str;

    async fn complete(&self, request: &AdvisoryRequest<'_>) -> Result<String>;
}

/// Placeholder provider for heuristic-only chains. Always declines.
pub struct NoProvider;

impl AdvisoryProvider for NoProvider {
    fn name(&self) -> &str {
        "none"
    }

    async fn complete(&self, _request: &AdvisoryRequest<'_>) -> Result<String> {
        Err(crate::error::ForecastError::ProviderFailed(
            "no advisory provider configured".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum AdvisorySource {
    Heuristic,
    Provider(String),
    Cache,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryOutcome {
    pub response: AdvisorResponse,
    pub source: AdvisorySource,
    /// Empty when the request could not be hashed.
    pub input_hash: String,
}

pub struct AdvisoryChain<P = NoProvider> {
    provider: Option<P>,
    cache: Option<Arc<AdvisoryCache>>,
}

impl AdvisoryChain<NoProvider> {
    pub fn heuristic_only() -> Self {
        Self {
            provider: None,
            cache: None,
        }
    }
}

impl<P: AdvisoryProvider> AdvisoryChain<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<AdvisoryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Produces advice for the request. Always returns a schema-valid
    /// response.
    pub async fn advise(&self, request: &AdvisoryRequest<'_>) -> AdvisoryOutcome {
        let key = match input_hash(request.scenario, request.forecast, request.preferences) {
            Ok(key) => key,
            Err(e) => {
                warn!("Could not hash advisory input, caching disabled for this call: {}", e);
                String::new()
            }
        };

        if let (Some(cache), false) = (&self.cache, key.is_empty()) {
            if let Some(response) = cache.get(&key) {
                return AdvisoryOutcome {
                    response,
                    source: AdvisorySource::Cache,
                    input_hash: key,
                };
            }
        }

        // Fallbacks after a provider failure stay out of the cache.
        let (response, source, cacheable) = match &self.provider {
            Some(provider) => match Self::ask_provider(provider, request).await {
                Ok(response) => {
                    info!("Advice produced by provider '{}'", provider.name());
                    (
                        response,
                        AdvisorySource::Provider(provider.name().to_string()),
                        true,
                    )
                }
                Err(e) => {
                    warn!(
                        "Advisory provider '{}' failed, falling back to heuristic advisor: {}",
                        provider.name(),
                        e
                    );
                    (request.heuristic(), AdvisorySource::Heuristic, false)
                }
            },
            None => {
                debug!("No advisory provider configured, using heuristic advisor");
                (request.heuristic(), AdvisorySource::Heuristic, true)
            }
        };

        if let (Some(cache), false, true) = (&self.cache, key.is_empty(), cacheable) {
            cache.insert(key.clone(), response.clone());
        }

        AdvisoryOutcome {
            response,
            source,
            input_hash: key,
        }
    }

    async fn ask_provider(provider: &P, request: &AdvisoryRequest<'_>) -> Result<AdvisorResponse> {
        let text = provider.complete(request).await?;
        AdvisorResponse::parse_strict(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_forecast;
    use crate::error::ForecastError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: std::result::Result<String, String>,
        failures_before_reply: usize,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                failures_before_reply: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                failures_before_reply: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_then_replying(failures: usize, text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                failures_before_reply: failures,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AdvisoryProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: &AdvisoryRequest<'_>) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_reply {
                return Err(ForecastError::ProviderFailed("unavailable".to_string()));
            }
            self.reply.clone().map_err(ForecastError::ProviderFailed)
        }
    }

    const VALID_REPLY: &str = r#"{
        "insights": [ { "title": "From the model", "rationale": "ok", "impact": 10.0, "confidence": "low" } ],
        "alerts": [],
        "actions": []
    }"#;

    fn scenario() -> ScenarioInput {
        ScenarioInput::new("USD", 6, 2500.0)
    }

    #[tokio::test]
    async fn test_provider_response_is_used_when_valid() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let chain = AdvisoryChain::new(ScriptedProvider::replying(VALID_REPLY));
        let outcome = chain.advise(&request).await;
        assert_eq!(outcome.source, AdvisorySource::Provider("scripted".to_string()));
        assert_eq!(outcome.response.insights[0].title, "From the model");
    }

    #[tokio::test]
    async fn test_falls_back_on_provider_error() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let chain = AdvisoryChain::new(ScriptedProvider::failing("timeout"));
        let outcome = chain.advise(&request).await;
        assert_eq!(outcome.source, AdvisorySource::Heuristic);
        assert_eq!(outcome.response, request.heuristic());
    }

    #[tokio::test]
    async fn test_falls_back_on_malformed_or_invalid_text() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        for reply in [
            "Sure! Here is some advice.",
            r#"{ "insights": [], "alerts": [], "actions": [] }"#,
            r#"{ "insights": [ { "title": "x", "rationale": "y", "impact": 1, "confidence": "certain" } ], "alerts": [], "actions": [] }"#,
        ] {
            let chain = AdvisoryChain::new(ScriptedProvider::replying(reply));
            let outcome = chain.advise(&request).await;
            assert_eq!(outcome.source, AdvisorySource::Heuristic);
            assert!(outcome.response.validate().is_ok());
        }
    }

    #[tokio::test]
    async fn test_cache_short_circuits_provider() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let cache = Arc::new(AdvisoryCache::default());
        let chain = AdvisoryChain::new(ScriptedProvider::replying(VALID_REPLY))
            .with_cache(Arc::clone(&cache));

        let first = chain.advise(&request).await;
        let second = chain.advise(&request).await;

        assert_eq!(second.source, AdvisorySource::Cache);
        assert_eq!(first.response, second.response);
        assert_eq!(first.input_hash, second.input_hash);
        assert_eq!(chain.provider.as_ref().unwrap().calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_retried_after_failed_call() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let cache = Arc::new(AdvisoryCache::default());
        let chain = AdvisoryChain::new(ScriptedProvider::failing_then_replying(1, VALID_REPLY))
            .with_cache(Arc::clone(&cache));

        let first = chain.advise(&request).await;
        assert_eq!(first.source, AdvisorySource::Heuristic);
        assert!(cache.is_empty());

        let second = chain.advise(&request).await;
        assert_eq!(second.source, AdvisorySource::Provider("scripted".to_string()));
        assert_eq!(second.response.insights[0].title, "From the model");

        let third = chain.advise(&request).await;
        assert_eq!(third.source, AdvisorySource::Cache);
        assert_eq!(third.response, second.response);

        let provider = chain.provider.as_ref().unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_reply_is_not_cached() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let cache = Arc::new(AdvisoryCache::default());
        let chain = AdvisoryChain::new(ScriptedProvider::replying("not json"))
            .with_cache(Arc::clone(&cache));

        for _ in 0..2 {
            assert_eq!(chain.advise(&request).await.source, AdvisorySource::Heuristic);
        }
        assert!(cache.is_empty());
        assert_eq!(chain.provider.as_ref().unwrap().calls(), 2);
    }

    #[tokio::test]
    async fn test_heuristic_only_chain() {
        let scenario = scenario();
        let forecast = compute_forecast(&scenario);
        let prefs = AdvisorPreferences::default();
        let request = AdvisoryRequest::new(&scenario, &forecast, &prefs);

        let outcome = AdvisoryChain::heuristic_only().advise(&request).await;
        assert_eq!(outcome.source, AdvisorySource::Heuristic);
        assert!(!outcome.input_hash.is_empty());
    }
}
