//! The advisory response contract.
//!
//! Every advisory strategy, rule-based or model-backed, has to produce an
//! [`AdvisorResponse`] that passes [`AdvisorResponse::validate`]. Parsing is
//! strict: unknown fields and unknown enum spellings are rejected.

use crate::error::{ForecastError, Result};
use crate::schema::DebtStrategy;
use crate::utils::is_rounded;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const MIN_INSIGHTS: usize = 1;
pub const MAX_INSIGHTS: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Med,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    #[schemars(description = "Cash shortfall or thin buffer")]
    Cash,
    #[schemars(description = "Interest cost or repayment risk")]
    Debt,
    #[schemars(description = "Housing cost or month-over-month expense spike")]
    Rent,
    #[schemars(description = "Currency exposure")]
    Fx,
    #[schemars(description = "Investment allocation or contribution issue")]
    Portfolio,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    SetDebtStrategy,
    AdjustExpense,
    AdjustContribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Insight {
    pub title: String,
    pub rationale: String,

    #[schemars(description = "Signed monetary impact, rounded to 2 decimals")]
    pub impact: f64,

    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,

    #[schemars(description = "0-based month index the alert refers to")]
    pub month: u32,
}

/// One edit to the scenario that an action proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionChange {
    pub kind: ChangeKind,

    #[schemars(description = "Id of the debt, expense or investment being changed")]
    pub target_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "New strategy; required for setDebtStrategy")]
    pub strategy: Option<DebtStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Signed monthly amount change; required for adjustExpense and adjustContribution")]
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectedOutcome {
    pub net_worth_delta: f64,
    pub min_cash_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SuggestedAction {
    pub id: String,
    pub label: String,
    pub changes: Vec<ActionChange>,
    pub expected_outcome: ExpectedOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdvisorResponse {
    #[schemars(length(min = 1, max = 6))]
    pub insights: Vec<Insight>,
    pub alerts: Vec<Alert>,
    pub actions: Vec<SuggestedAction>,
}

impl AdvisorResponse {
    /// Parses provider output strictly and validates it against the contract.
    ///
    /// Tolerates a single surrounding markdown code fence, which models often
    /// emit even when asked for bare JSON.
    pub fn parse_strict(text: &str) -> Result<Self> {
        let body = strip_code_fence(text);
        let response: AdvisorResponse = serde_json::from_str(body)
            .map_err(|e| ForecastError::MalformedAdvisorResponse(e.to_string()))?;
        response.validate()?;
        Ok(response)
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.insights.len();
        if !(MIN_INSIGHTS..=MAX_INSIGHTS).contains(&count) {
            return Err(violation(format!(
                "expected {}-{} insights, got {}",
                MIN_INSIGHTS, MAX_INSIGHTS, count
            )));
        }

        for (idx, insight) in self.insights.iter().enumerate() {
            require_text(&insight.title, || format!("insights[{}].title", idx))?;
            require_text(&insight.rationale, || format!("insights[{}].rationale", idx))?;
            require_amount(insight.impact, || format!("insights[{}].impact", idx))?;
        }

        for (idx, alert) in self.alerts.iter().enumerate() {
            require_text(&alert.message, || format!("alerts[{}].message", idx))?;
        }

        for (idx, action) in self.actions.iter().enumerate() {
            require_text(&action.id, || format!("actions[{}].id", idx))?;
            require_text(&action.label, || format!("actions[{}].label", idx))?;
            require_amount(action.expected_outcome.net_worth_delta, || {
                format!("actions[{}].expectedOutcome.netWorthDelta", idx)
            })?;
            require_amount(action.expected_outcome.min_cash_delta, || {
                format!("actions[{}].expectedOutcome.minCashDelta", idx)
            })?;

            for (cidx, change) in action.changes.iter().enumerate() {
                let path = || format!("actions[{}].changes[{}]", idx, cidx);
                require_text(&change.target_id, || format!("{}.targetId", path()))?;
                match change.kind {
                    ChangeKind::SetDebtStrategy if change.strategy.is_none() => {
                        return Err(violation(format!(
                            "{}: setDebtStrategy requires a strategy",
                            path()
                        )));
                    }
                    ChangeKind::AdjustExpense | ChangeKind::AdjustContribution => match change.delta
                    {
                        Some(delta) => require_amount(delta, || format!("{}.delta", path()))?,
                        None => {
                            return Err(violation(format!(
                                "{}: {:?} requires a delta",
                                path(),
                                change.kind
                            )))
                        }
                    },
                    _ => {}
                }
            }
        }

        Ok(())
    }

    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AdvisorResponse)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::json_schema())
    }
}

fn violation(details: String) -> ForecastError {
    ForecastError::AdvisorSchemaViolation(details)
}

fn require_text(value: &str, path: impl Fn() -> String) -> Result<()> {
    if value.trim().is_empty() {
        return Err(violation(format!("{} must not be empty", path())));
    }
    Ok(())
}

fn require_amount(value: f64, path: impl Fn() -> String) -> Result<()> {
    if !is_rounded(value) {
        return Err(violation(format!(
            "{} must be a finite amount with at most 2 decimals, got {}",
            path(),
            value
        )));
    }
    Ok(())
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "insights": [
                { "title": "Net worth", "rationale": "Grows steadily", "impact": 1200.5, "confidence": "high" }
            ],
            "alerts": [ { "type": "fx", "message": "EUR exposure", "month": 3 } ],
            "actions": [
                {
                    "id": "aggressive-debt",
                    "label": "Pay debt faster",
                    "changes": [ { "kind": "setDebtStrategy", "targetId": "d1", "strategy": "aggressive" } ],
                    "expectedOutcome": { "netWorthDelta": 40.0, "minCashDelta": -30.0 }
                }
            ]
        }"#
    }

    #[test]
    fn test_parse_valid_response() {
        let response = AdvisorResponse::parse_strict(minimal_json()).unwrap();
        assert_eq!(response.insights.len(), 1);
        assert_eq!(response.insights[0].confidence, Confidence::High);
        assert_eq!(response.alerts[0].alert_type, AlertType::Fx);
        assert_eq!(
            response.actions[0].changes[0].strategy,
            Some(DebtStrategy::Aggressive)
        );
    }

    #[test]
    fn test_parse_tolerates_code_fence() {
        let fenced = format!("```json\n{}\n```", minimal_json());
        assert!(AdvisorResponse::parse_strict(&fenced).is_ok());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = minimal_json().replace(r#""confidence": "high""#, r#""confidence": "high", "score": 9"#);
        let err = AdvisorResponse::parse_strict(&json).unwrap_err();
        assert!(matches!(err, ForecastError::MalformedAdvisorResponse(_)));
    }

    #[test]
    fn test_out_of_range_enums_are_rejected() {
        let json = minimal_json().replace(r#""confidence": "high""#, r#""confidence": "medium""#);
        assert!(matches!(
            AdvisorResponse::parse_strict(&json),
            Err(ForecastError::MalformedAdvisorResponse(_))
        ));

        let json = minimal_json().replace(r#""type": "fx""#, r#""type": "tax""#);
        assert!(AdvisorResponse::parse_strict(&json).is_err());
    }

    #[test]
    fn test_insight_bounds() {
        let empty = r#"{ "insights": [], "alerts": [], "actions": [] }"#;
        assert!(matches!(
            AdvisorResponse::parse_strict(empty),
            Err(ForecastError::AdvisorSchemaViolation(_))
        ));

        let insight = Insight {
            title: "t".to_string(),
            rationale: "r".to_string(),
            impact: 1.0,
            confidence: Confidence::Low,
        };
        let response = AdvisorResponse {
            insights: vec![insight; 7],
            alerts: vec![],
            actions: vec![],
        };
        assert!(response.validate().is_err());
    }

    #[test]
    fn test_unrounded_impact_is_rejected() {
        let json = minimal_json().replace("1200.5", "1200.555");
        assert!(matches!(
            AdvisorResponse::parse_strict(&json),
            Err(ForecastError::AdvisorSchemaViolation(_))
        ));
    }

    #[test]
    fn test_change_kind_requires_payload() {
        let json = minimal_json().replace(r#", "strategy": "aggressive""#, "");
        assert!(AdvisorResponse::parse_strict(&json).is_err());

        let json = minimal_json().replace(
            r#""kind": "setDebtStrategy", "targetId": "d1", "strategy": "aggressive""#,
            r#""kind": "adjustExpense", "targetId": "e1""#,
        );
        assert!(AdvisorResponse::parse_strict(&json).is_err());
    }

    #[test]
    fn test_schema_lists_wire_spellings() {
        let schema = AdvisorResponse::schema_as_json().unwrap();
        assert!(schema.contains("expectedOutcome"));
        assert!(schema.contains("\"med\""));
        assert!(schema.contains("\"portfolio\""));
        assert!(schema.contains("setDebtStrategy"));
    }
}
