use crate::advisor::{AdvisorPreferences, DEFAULT_EMERGENCY_FUND_MONTHS};
use crate::cache::{AdvisoryCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS};
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Heuristic,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "gemini" => Ok(Self::Gemini),
            other => Err(ForecastError::ValidationError {
                field: "ADVISOR_PROVIDER".to_string(),
                details: format!("unknown provider '{}', expected heuristic or gemini", other),
            }),
        }
    }
}

/// Settings for the advisory layer. The forecast engine takes no
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub timeout_secs: u64,
    pub cache_capacity: usize,
    pub cache_ttl_secs: i64,
    pub emergency_fund_months: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Heuristic,
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            emergency_fund_months: DEFAULT_EMERGENCY_FUND_MONTHS,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(provider) = lookup("ADVISOR_PROVIDER") {
            config.provider = provider.parse()?;
        }
        if let Some(model) = lookup("ADVISOR_MODEL") {
            config.model = model;
        }
        if let Some(value) = lookup("ADVISOR_TIMEOUT_SECS") {
            config.timeout_secs = parse_var("ADVISOR_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("ADVISOR_CACHE_CAPACITY") {
            config.cache_capacity = parse_var("ADVISOR_CACHE_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("ADVISOR_CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_var("ADVISOR_CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("ADVISOR_EMERGENCY_FUND_MONTHS") {
            config.emergency_fund_months = parse_var("ADVISOR_EMERGENCY_FUND_MONTHS", &value)?;
        }

        Ok(config)
    }

    pub fn preferences(&self) -> AdvisorPreferences {
        AdvisorPreferences {
            emergency_fund_months: self.emergency_fund_months,
        }
    }

    pub fn build_cache(&self) -> AdvisoryCache {
        AdvisoryCache::new(
            self.cache_capacity,
            chrono::Duration::seconds(self.cache_ttl_secs),
        )
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ForecastError::ValidationError {
            field: key.to_string(),
            details: format!("cannot parse '{}': {}", value, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AdvisorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.provider, ProviderKind::Heuristic);
        assert_eq!(config.preferences().emergency_fund_months, 6.0);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = AdvisorConfig::from_lookup(lookup_from(&[
            ("ADVISOR_PROVIDER", "Gemini"),
            ("ADVISOR_MODEL", "gemini-2.5-pro"),
            ("ADVISOR_TIMEOUT_SECS", "5"),
            ("ADVISOR_CACHE_CAPACITY", "10"),
            ("ADVISOR_EMERGENCY_FUND_MONTHS", "4.5"),
        ]))
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.emergency_fund_months, 4.5);
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = AdvisorConfig::from_lookup(lookup_from(&[("ADVISOR_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        match err {
            ForecastError::ValidationError { field, .. } => {
                assert_eq!(field, "ADVISOR_TIMEOUT_SECS")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(AdvisorConfig::from_lookup(lookup_from(&[("ADVISOR_PROVIDER", "oracle")])).is_err());
    }

    #[test]
    fn test_partial_json_config() {
        let config = AdvisorConfig::from_json_str(r#"{ "provider": "gemini", "cacheCapacity": 8 }"#)
            .unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
