//! # Financial Forecast
//!
//! A deterministic month-by-month personal finance simulation with a
//! rule-based advisor on top.
//!
//! ## Core Concepts
//!
//! - **Scenario**: incomes, expenses, debts, investments, one-time events and goals for one run
//! - **Snapshot**: the simulated cash, debt, investment and net worth position at the close of a month
//! - **Forecast**: every snapshot for the horizon plus a summary and goal progress
//! - **Advice**: insights, alerts and suggested actions derived from a scenario and its forecast
//! - **Rounding**: every monetary figure is rounded to 2 decimals as soon as it is computed
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_forecast::*;
//!
//! let mut scenario = ScenarioInput::new("USD", 60, 100_000.0);
//! scenario.incomes.push(IncomeInput {
//!     id: "salary".to_string(),
//!     label: "Salary".to_string(),
//!     amount: 20_000.0,
//!     start_month: 0,
//!     end_month: None,
//!     growth_rate: 0.0,
//! });
//! scenario.expenses.push(ExpenseInput {
//!     id: "living".to_string(),
//!     label: "Living costs".to_string(),
//!     amount: 10_000.0,
//!     category: ExpenseCategory::Fixed,
//!     start_month: 0,
//!     end_month: None,
//!     growth_rate: 0.0,
//!     is_one_time: false,
//! });
//!
//! let forecast = process_scenario(&scenario).unwrap();
//! assert_eq!(forecast.snapshots[0].cash, 110_000.0);
//!
//! let advice = run_heuristic_advisor(&scenario, &forecast, &AdvisorPreferences::default());
//! ```

pub mod advice;
pub mod advisor;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod schema;
pub mod strategy;
pub mod utils;
pub mod validation;

#[cfg(feature = "gemini")]
pub mod llm;

pub use advice::*;
pub use advisor::{
    has_interest_bearing_debt, rough_annual_interest, run_heuristic_advisor, AdvisorPreferences,
};
pub use cache::{input_hash, AdvisoryCache};
pub use config::{AdvisorConfig, ProviderKind};
pub use engine::{compute_forecast, service_debt, DebtPayment, DebtState, ForecastEngine};
pub use error::{ForecastError, Result};
pub use export::*;
pub use schema::*;
pub use strategy::*;
pub use utils::*;
pub use validation::validate_scenario;

use log::{debug, info};

pub struct ForecastProcessor;

impl ForecastProcessor {
    /// Validates the scenario and runs the simulation.
    pub fn process(scenario: &ScenarioInput) -> Result<ForecastResult> {
        validate_scenario(scenario)?;

        info!(
            "Forecasting {} months in {} starting from {}",
            scenario.months,
            scenario.currency,
            format_money(scenario.initial_cash, &scenario.currency)
        );
        debug!(
            "Scenario contains {} incomes, {} expenses, {} debts, {} investments, {} events and {} goals",
            scenario.incomes.len(),
            scenario.expenses.len(),
            scenario.debts.len(),
            scenario.investments.len(),
            scenario.one_time_events.len(),
            scenario.goals.len()
        );

        let result = compute_forecast(scenario);

        debug!(
            "Forecast finished: end cash {}, end net worth {}, {} negative-cash months",
            result.summary.end_cash,
            result.summary.end_net_worth,
            result.summary.negative_cash_months.len()
        );

        Ok(result)
    }

    /// Validates, forecasts and runs the heuristic advisor.
    pub fn process_with_advice(
        scenario: &ScenarioInput,
        preferences: &AdvisorPreferences,
    ) -> Result<(ForecastResult, AdvisorResponse)> {
        let forecast = Self::process(scenario)?;
        let advice = run_heuristic_advisor(scenario, &forecast, preferences);
        debug!(
            "Heuristic advisor produced {} insights, {} alerts and {} actions",
            advice.insights.len(),
            advice.alerts.len(),
            advice.actions.len()
        );
        Ok((forecast, advice))
    }

    /// Parses a JSON scenario body, validates it and runs the simulation.
    pub fn process_json(json: &str) -> Result<ForecastResult> {
        let scenario = ScenarioInput::from_json_str(json)?;
        Self::process(&scenario)
    }
}

pub fn process_scenario(scenario: &ScenarioInput) -> Result<ForecastResult> {
    ForecastProcessor::process(scenario)
}
