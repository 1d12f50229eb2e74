use crate::advice::*;
use crate::schema::*;
use crate::utils::{format_money, round2};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMERGENCY_FUND_MONTHS: f64 = 6.0;

const MAX_CASH_ALERTS: usize = 5;
const EXPENSE_SPIKE_THRESHOLD: f64 = 0.2;
const DISCRETIONARY_CUT: f64 = 0.15;
const CONTRIBUTION_BOOST: f64 = 0.1;
const AGGRESSIVE_INTEREST_SAVING: f64 = 0.4;
const AGGRESSIVE_MIN_CASH_DRAG: f64 = 0.3;
const INVESTMENT_GROWTH_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorPreferences {
    /// Target emergency buffer in months of average expenses.
    #[serde(default = "default_emergency_fund_months")]
    pub emergency_fund_months: f64,
}

fn default_emergency_fund_months() -> f64 {
    DEFAULT_EMERGENCY_FUND_MONTHS
}

impl Default for AdvisorPreferences {
    fn default() -> Self {
        Self {
            emergency_fund_months: DEFAULT_EMERGENCY_FUND_MONTHS,
        }
    }
}

/// Rough annual interest across all debts (`Σ balance × APR`), used as a
/// cheap proxy instead of the simulated interest.
pub fn rough_annual_interest(scenario: &ScenarioInput) -> f64 {
    round2(
        scenario
            .debts
            .iter()
            .map(|d| d.balance * d.annual_rate / 100.0)
            .sum(),
    )
}

/// True when any debt has both a positive balance and a positive rate, however
/// small the resulting rough interest.
pub fn has_interest_bearing_debt(scenario: &ScenarioInput) -> bool {
    scenario
        .debts
        .iter()
        .any(|d| d.balance > 0.0 && d.annual_rate > 0.0)
}

/// Rule-based advisor. Deterministic and total; its output always satisfies
/// [`AdvisorResponse::validate`].
pub fn run_heuristic_advisor(
    scenario: &ScenarioInput,
    forecast: &ForecastResult,
    preferences: &AdvisorPreferences,
) -> AdvisorResponse {
    let rough_interest = rough_annual_interest(scenario);

    let mut insights = build_insights(scenario, forecast, rough_interest);
    insights.truncate(MAX_INSIGHTS);

    AdvisorResponse {
        insights,
        alerts: build_alerts(scenario, forecast, preferences, rough_interest),
        actions: build_actions(scenario, forecast, rough_interest),
    }
}

fn build_alerts(
    scenario: &ScenarioInput,
    forecast: &ForecastResult,
    preferences: &AdvisorPreferences,
    rough_interest: f64,
) -> Vec<Alert> {
    let currency = scenario.currency.as_str();
    let snapshots = &forecast.snapshots;
    let summary = &forecast.summary;
    let mut alerts = Vec::new();

    for &month in summary.negative_cash_months.iter().take(MAX_CASH_ALERTS) {
        let cash = snapshots
            .get(month as usize)
            .map(|s| s.cash)
            .unwrap_or(summary.min_cash);
        alerts.push(Alert {
            alert_type: AlertType::Cash,
            message: format!(
                "Cash drops to {} in month {}",
                format_money(cash, currency),
                month + 1
            ),
            month,
        });
    }

    let spike = snapshots.windows(2).find(|pair| {
        let (prev, cur) = (pair[0].total_expenses, pair[1].total_expenses);
        cur - prev > prev * EXPENSE_SPIKE_THRESHOLD
    });
    if let Some(pair) = spike {
        let (prev, cur) = (&pair[0], &pair[1]);
        alerts.push(Alert {
            alert_type: AlertType::Rent,
            message: format!(
                "Expenses jump from {} to {} in month {}",
                format_money(prev.total_expenses, currency),
                format_money(cur.total_expenses, currency),
                cur.month + 1
            ),
            month: cur.month,
        });
    }

    if has_interest_bearing_debt(scenario) {
        alerts.push(Alert {
            alert_type: AlertType::Debt,
            message: format!(
                "Debts cost roughly {} in interest per year",
                format_money(rough_interest, currency)
            ),
            month: 0,
        });
    }

    let head = &snapshots[..snapshots.len().min(3)];
    if !head.is_empty() {
        let avg_expenses = head.iter().map(|s| s.total_expenses).sum::<f64>() / head.len() as f64;
        let target = round2(preferences.emergency_fund_months * avg_expenses);
        if summary.end_cash < target {
            alerts.push(Alert {
                alert_type: AlertType::Cash,
                message: format!(
                    "Ending cash of {} is below a {}-month emergency fund of {}",
                    format_money(summary.end_cash, currency),
                    preferences.emergency_fund_months,
                    format_money(target, currency)
                ),
                month: snapshots.len().saturating_sub(1) as u32,
            });
        }
    }

    alerts
}

fn build_insights(
    scenario: &ScenarioInput,
    forecast: &ForecastResult,
    rough_interest: f64,
) -> Vec<Insight> {
    let currency = scenario.currency.as_str();
    let summary = &forecast.summary;
    let mut insights = Vec::new();

    insights.push(Insight {
        title: "Projected net worth".to_string(),
        rationale: format!(
            "After {} months your net worth is projected at {}.",
            scenario.months,
            format_money(summary.end_net_worth, currency)
        ),
        impact: summary.end_net_worth,
        confidence: Confidence::High,
    });

    if !scenario.debts.is_empty() {
        if let Some(month) = summary.debt_free_month {
            insights.push(Insight {
                title: "Debt-free within the horizon".to_string(),
                rationale: format!(
                    "All debts are paid off by month {}, removing roughly {} of yearly interest.",
                    month + 1,
                    format_money(rough_interest, currency)
                ),
                impact: rough_interest,
                confidence: Confidence::Med,
            });
        }
    }

    let negative = summary.negative_cash_months.len();
    if negative > 0 {
        insights.push(Insight {
            title: "Cash shortfall".to_string(),
            rationale: format!(
                "Cash is negative in {} of {} months, bottoming out at {} in month {}.",
                negative,
                scenario.months,
                format_money(summary.min_cash, currency),
                summary.min_cash_month + 1
            ),
            impact: summary.min_cash,
            confidence: Confidence::High,
        });
    }

    if !scenario.investments.is_empty() {
        let monthly: f64 = round2(
            scenario
                .investments
                .iter()
                .map(|i| i.monthly_contribution)
                .sum(),
        );
        insights.push(Insight {
            title: "Investment trajectory".to_string(),
            rationale: format!(
                "Contributing {} per month grows your portfolio to {}.",
                format_money(monthly, currency),
                format_money(summary.end_investment_value, currency)
            ),
            impact: summary.end_investment_value,
            confidence: Confidence::Med,
        });
    }

    if insights.len() < 3 {
        insights.push(Insight {
            title: "Cash flow stable".to_string(),
            rationale: format!(
                "Your lowest projected cash balance is {} in month {}.",
                format_money(summary.min_cash, currency),
                summary.min_cash_month + 1
            ),
            impact: summary.min_cash,
            confidence: Confidence::Med,
        });
    }

    insights
}

fn build_actions(
    scenario: &ScenarioInput,
    forecast: &ForecastResult,
    rough_interest: f64,
) -> Vec<SuggestedAction> {
    let months = scenario.months as f64;
    let mut actions = Vec::new();

    let total_debt = scenario.total_initial_debt();
    let not_all_aggressive = scenario
        .debts
        .iter()
        .any(|d| d.strategy != DebtStrategy::Aggressive);
    if total_debt > 0.0 && not_all_aggressive {
        let first_min = scenario.debts.first().map_or(0.0, |d| d.min_payment);
        actions.push(SuggestedAction {
            id: "aggressive-debt".to_string(),
            label: "Switch all debts to aggressive repayment".to_string(),
            changes: scenario
                .debts
                .iter()
                .map(|d| ActionChange {
                    kind: ChangeKind::SetDebtStrategy,
                    target_id: d.id.clone(),
                    strategy: Some(DebtStrategy::Aggressive),
                    delta: None,
                })
                .collect(),
            expected_outcome: ExpectedOutcome {
                net_worth_delta: round2(rough_interest * AGGRESSIVE_INTEREST_SAVING),
                min_cash_delta: round2(-first_min * AGGRESSIVE_MIN_CASH_DRAG),
            },
        });
    }

    let discretionary: Vec<&ExpenseInput> = scenario
        .expenses
        .iter()
        .filter(|e| e.category == ExpenseCategory::Discretionary)
        .collect();
    if !discretionary.is_empty() && !forecast.summary.negative_cash_months.is_empty() {
        let changes: Vec<ActionChange> = discretionary
            .iter()
            .map(|e| ActionChange {
                kind: ChangeKind::AdjustExpense,
                target_id: e.id.clone(),
                strategy: None,
                delta: Some(-round2(e.amount * DISCRETIONARY_CUT)),
            })
            .collect();
        let cut = round2(changes.iter().filter_map(|c| c.delta).map(|d| -d).sum());
        actions.push(SuggestedAction {
            id: "reduce-discretionary".to_string(),
            label: "Cut discretionary spending by 15%".to_string(),
            changes,
            expected_outcome: ExpectedOutcome {
                net_worth_delta: round2(cut * months),
                min_cash_delta: cut,
            },
        });
    }

    if let Some(first) = scenario.investments.first() {
        let increase = round2(first.monthly_contribution * CONTRIBUTION_BOOST);
        actions.push(SuggestedAction {
            id: "boost-investments".to_string(),
            label: format!("Raise contributions to {} by 10%", first.label),
            changes: vec![ActionChange {
                kind: ChangeKind::AdjustContribution,
                target_id: first.id.clone(),
                strategy: None,
                delta: Some(increase),
            }],
            expected_outcome: ExpectedOutcome {
                net_worth_delta: round2(increase * months * INVESTMENT_GROWTH_FACTOR),
                min_cash_delta: -increase,
            },
        });
    }

    actions
}
