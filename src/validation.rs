use crate::error::{ForecastError, Result};
use crate::schema::ScenarioInput;
use std::collections::HashSet;

pub const MAX_MONTHS: u32 = 360;

const MIN_RATE: f64 = -100.0;
const MAX_RATE: f64 = 1000.0;

/// Boundary validation for a scenario. The engine itself never calls this;
/// callers run it before handing a scenario to [`crate::compute_forecast`].
pub fn validate_scenario(scenario: &ScenarioInput) -> Result<()> {
    validate_currency(&scenario.currency)?;

    if scenario.months == 0 || scenario.months > MAX_MONTHS {
        return Err(ForecastError::InvalidHorizon(scenario.months));
    }

    non_negative("initialCash", scenario.initial_cash)?;
    rate_in("inflationRate", scenario.inflation_rate, MIN_RATE, MAX_RATE)?;
    rate_in("taxRate", scenario.tax_rate, 0.0, 100.0)?;

    unique_ids("incomes", scenario.incomes.iter().map(|i| i.id.as_str()))?;
    for (idx, income) in scenario.incomes.iter().enumerate() {
        let field = |name: &str| format!("incomes[{}].{}", idx, name);
        non_negative(&field("amount"), income.amount)?;
        rate_in(&field("growthRate"), income.growth_rate, MIN_RATE, MAX_RATE)?;
        month_window(&field("endMonth"), income.start_month, income.end_month)?;
    }

    unique_ids("expenses", scenario.expenses.iter().map(|e| e.id.as_str()))?;
    for (idx, expense) in scenario.expenses.iter().enumerate() {
        let field = |name: &str| format!("expenses[{}].{}", idx, name);
        non_negative(&field("amount"), expense.amount)?;
        rate_in(&field("growthRate"), expense.growth_rate, MIN_RATE, MAX_RATE)?;
        month_window(&field("endMonth"), expense.start_month, expense.end_month)?;
    }

    unique_ids("debts", scenario.debts.iter().map(|d| d.id.as_str()))?;
    for (idx, debt) in scenario.debts.iter().enumerate() {
        let field = |name: &str| format!("debts[{}].{}", idx, name);
        non_negative(&field("balance"), debt.balance)?;
        non_negative(&field("minPayment"), debt.min_payment)?;
        rate_in(&field("annualRate"), debt.annual_rate, 0.0, MAX_RATE)?;
    }

    unique_ids(
        "investments",
        scenario.investments.iter().map(|i| i.id.as_str()),
    )?;
    for (idx, investment) in scenario.investments.iter().enumerate() {
        let field = |name: &str| format!("investments[{}].{}", idx, name);
        non_negative(&field("currentValue"), investment.current_value)?;
        non_negative(&field("monthlyContribution"), investment.monthly_contribution)?;
        rate_in(
            &field("expectedAnnualReturn"),
            investment.expected_annual_return,
            MIN_RATE,
            MAX_RATE,
        )?;
    }

    unique_ids(
        "oneTimeEvents",
        scenario.one_time_events.iter().map(|e| e.id.as_str()),
    )?;
    for (idx, event) in scenario.one_time_events.iter().enumerate() {
        finite(&format!("oneTimeEvents[{}].amount", idx), event.amount)?;
    }

    unique_ids("goals", scenario.goals.iter().map(|g| g.id.as_str()))?;
    for (idx, goal) in scenario.goals.iter().enumerate() {
        non_negative(&format!("goals[{}].targetAmount", idx), goal.target_amount)?;
    }

    Ok(())
}

pub fn validate_currency(currency: &str) -> Result<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ForecastError::InvalidCurrency(currency.to_string()));
    }
    Ok(())
}

fn invalid(field: &str, details: String) -> ForecastError {
    ForecastError::ValidationError {
        field: field.to_string(),
        details,
    }
}

fn finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(field, format!("must be a finite number, got {}", value)));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(())
}

fn rate_in(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(invalid(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

fn month_window(field: &str, start: u32, end: Option<u32>) -> Result<()> {
    match end {
        Some(end) if end < start => Err(invalid(
            field,
            format!("end month {} is before start month {}", end, start),
        )),
        _ => Ok(()),
    }
}

fn unique_ids<'a>(list: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, id) in ids.enumerate() {
        if id.trim().is_empty() {
            return Err(invalid(
                &format!("{}[{}].id", list, idx),
                "must not be empty".to_string(),
            ));
        }
        if !seen.insert(id) {
            return Err(invalid(
                &format!("{}[{}].id", list, idx),
                format!("duplicate id '{}'", id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn valid() -> ScenarioInput {
        let mut scenario = ScenarioInput::new("USD", 12, 1000.0);
        scenario.incomes.push(IncomeInput {
            id: "salary".to_string(),
            label: "Salary".to_string(),
            amount: 3000.0,
            start_month: 0,
            end_month: Some(11),
            growth_rate: 3.0,
        });
        scenario.one_time_events.push(OneTimeEvent {
            id: "repair".to_string(),
            label: "Roof repair".to_string(),
            amount: -4000.0,
            month: 5,
        });
        scenario
    }

    #[test]
    fn test_valid_scenario_passes() {
        assert!(validate_scenario(&valid()).is_ok());
    }

    #[test]
    fn test_horizon_bounds() {
        let mut scenario = valid();
        scenario.months = 0;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ForecastError::InvalidHorizon(0))
        ));
        scenario.months = 361;
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ForecastError::InvalidHorizon(361))
        ));
        scenario.months = 360;
        assert!(validate_scenario(&scenario).is_ok());
    }

    #[test]
    fn test_currency_format() {
        assert!(validate_currency("EUR").is_ok());
        assert!(validate_currency("eur").is_err());
        assert!(validate_currency("EURO").is_err());
        assert!(validate_currency("").is_err());
    }

    #[test]
    fn test_negative_initial_cash_rejected() {
        let mut scenario = valid();
        scenario.initial_cash = -1.0;
        match validate_scenario(&scenario) {
            Err(ForecastError::ValidationError { field, .. }) => assert_eq!(field, "initialCash"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut scenario = valid();
        scenario.incomes[0].start_month = 6;
        scenario.incomes[0].end_month = Some(2);
        match validate_scenario(&scenario) {
            Err(ForecastError::ValidationError { field, .. }) => {
                assert_eq!(field, "incomes[0].endMonth")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut scenario = valid();
        let duplicate = scenario.incomes[0].clone();
        scenario.incomes.push(duplicate);
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn test_tax_rate_bounds_and_nan() {
        let mut scenario = valid();
        scenario.tax_rate = 101.0;
        assert!(validate_scenario(&scenario).is_err());
        scenario.tax_rate = f64::NAN;
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn test_debt_rate_cannot_be_negative() {
        let mut scenario = valid();
        scenario.debts.push(DebtInput {
            id: "loan".to_string(),
            label: "Loan".to_string(),
            balance: 1000.0,
            annual_rate: -1.0,
            min_payment: 50.0,
            strategy: DebtStrategy::Min,
        });
        match validate_scenario(&scenario) {
            Err(ForecastError::ValidationError { field, .. }) => {
                assert_eq!(field, "debts[0].annualRate")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        // Growth-style rates may go negative.
        scenario.debts[0].annual_rate = 0.0;
        scenario.incomes[0].growth_rate = -50.0;
        scenario.inflation_rate = -2.0;
        assert!(validate_scenario(&scenario).is_ok());
    }
}
