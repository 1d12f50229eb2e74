use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    #[schemars(description = "Non-negotiable recurring costs (insurance, utilities, subscriptions)")]
    #[default]
    Fixed,

    #[schemars(description = "Optional spending that can be cut back (dining, entertainment, travel)")]
    Discretionary,

    #[schemars(description = "Housing rent or mortgage-like occupancy cost")]
    Rent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DebtStrategy {
    #[schemars(description = "Pay only the minimum payment each month")]
    #[default]
    Min,

    #[schemars(
        description = "Pay the minimum plus 30% of the month's non-negative pre-debt cash surplus"
    )]
    Aggressive,

    #[schemars(description = "Pay off the whole balance plus accrued interest in the first month")]
    Instant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[schemars(description = "Tracked against simulated cash")]
    Savings,

    #[schemars(description = "Tracked against simulated net worth")]
    NetWorth,

    #[schemars(description = "Tracked against the total value of all investments")]
    Investment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomeInput {
    pub id: String,
    pub label: String,

    #[schemars(description = "Gross monthly amount before tax")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "First 0-based month the income is received")]
    pub start_month: u32,

    #[serde(default)]
    #[schemars(description = "Last 0-based month the income is received (inclusive). Omit for open-ended income.")]
    pub end_month: Option<u32>,

    #[serde(default)]
    #[schemars(
        description = "Annual growth in percent, applied once per elapsed year (floor(month / 12))"
    )]
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub id: String,
    pub label: String,
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "Only used by the advisor; the simulation treats all categories alike")]
    pub category: ExpenseCategory,

    #[serde(default)]
    pub start_month: u32,

    #[serde(default)]
    pub end_month: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Annual growth in percent, stepped yearly like income growth")]
    pub growth_rate: f64,

    #[serde(default)]
    #[schemars(description = "If true the expense is charged only in its start month")]
    pub is_one_time: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebtInput {
    pub id: String,
    pub label: String,

    #[schemars(description = "Outstanding balance at month 0")]
    pub balance: f64,

    #[schemars(description = "Annual percentage rate; interest accrues monthly at rate / 12")]
    pub annual_rate: f64,

    pub min_payment: f64,

    #[serde(default)]
    pub strategy: DebtStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInput {
    pub id: String,
    pub label: String,
    pub current_value: f64,

    #[serde(default)]
    pub monthly_contribution: f64,

    #[serde(default)]
    #[schemars(description = "Expected annual return in percent, compounded monthly at rate / 12")]
    pub expected_annual_return: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeEvent {
    pub id: String,
    pub label: String,

    #[schemars(description = "Signed amount: positive is an inflow, negative an outflow")]
    pub amount: f64,

    #[schemars(description = "0-based month the event fires in")]
    pub month: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: String,
    pub label: String,
    pub target_amount: f64,
    pub target_month: u32,

    #[serde(rename = "type")]
    pub goal_type: GoalType,
}

/// The complete description of one forecast run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    #[schemars(description = "Three-letter display currency code, e.g. USD")]
    pub currency: String,

    #[schemars(description = "Forecast horizon in months (1-360)")]
    pub months: u32,

    pub initial_cash: f64,

    #[serde(default)]
    pub incomes: Vec<IncomeInput>,

    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,

    #[serde(default)]
    pub debts: Vec<DebtInput>,

    #[serde(default)]
    pub investments: Vec<InvestmentInput>,

    #[serde(default)]
    #[schemars(description = "Annual inflation in percent, compounded monthly onto expenses")]
    pub inflation_rate: f64,

    #[serde(default)]
    #[schemars(description = "Flat effective tax rate in percent applied to gross income")]
    pub tax_rate: f64,

    #[serde(default)]
    pub one_time_events: Vec<OneTimeEvent>,

    #[serde(default)]
    pub goals: Vec<FinancialGoal>,
}

impl ScenarioInput {
    /// An empty scenario with no line items and inert optional fields.
    pub fn new(currency: impl Into<String>, months: u32, initial_cash: f64) -> Self {
        Self {
            currency: currency.into(),
            months,
            initial_cash,
            incomes: Vec::new(),
            expenses: Vec::new(),
            debts: Vec::new(),
            investments: Vec::new(),
            inflation_rate: 0.0,
            tax_rate: 0.0,
            one_time_events: Vec::new(),
            goals: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn total_initial_debt(&self) -> f64 {
        self.debts.iter().map(|d| d.balance).sum()
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ScenarioInput)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

impl IncomeInput {
    pub fn is_active(&self, month: u32) -> bool {
        month >= self.start_month && self.end_month.map_or(true, |end| month <= end)
    }
}

impl ExpenseInput {
    pub fn is_active(&self, month: u32) -> bool {
        if self.is_one_time {
            return month == self.start_month;
        }
        month >= self.start_month && self.end_month.map_or(true, |end| month <= end)
    }
}

/// Simulated state at the close of one month. Field names double as CSV
/// column headers, so they must stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthSnapshot {
    pub month: u32,
    pub cash: f64,
    pub net_worth: f64,
    pub total_debt: f64,
    pub total_investments: f64,
    /// Income net of tax.
    pub total_income: f64,
    /// Expenses after inflation.
    pub total_expenses: f64,
    pub total_debt_payment: f64,
    pub total_investment_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub end_cash: f64,
    pub end_net_worth: f64,
    pub min_cash: f64,
    pub min_cash_month: u32,
    pub negative_cash_months: Vec<u32>,
    pub debt_free_month: Option<u32>,
    pub total_interest_paid: f64,
    pub end_investment_value: f64,
    pub total_tax_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub label: String,

    #[serde(rename = "type")]
    pub goal_type: GoalType,

    pub target_amount: f64,
    pub target_month: u32,

    /// First month the metric reached the target; never cleared afterwards.
    pub achieved_month: Option<u32>,

    /// Metric value at `min(targetMonth, months - 1)`.
    pub current_value: f64,

    pub progress_pct: f64,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub snapshots: Vec<MonthSnapshot>,
    pub summary: ForecastSummary,
    pub goal_progress: Vec<GoalProgress>,
}
