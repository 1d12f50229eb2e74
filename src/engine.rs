use crate::schema::*;
use crate::utils::{growth_multiplier, inflation_multiplier, monthly_rate, round2};

/// Share of the month's non-negative pre-debt cash that an aggressive debt
/// adds on top of its minimum payment.
pub const AGGRESSIVE_SURPLUS_SHARE: f64 = 0.3;

/// Running state of one debt, owned by the simulation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtState {
    pub balance: f64,
    pub paid_off: bool,
}

/// Outcome of servicing a single debt for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebtPayment {
    pub interest: f64,
    pub payment: f64,
    pub new_balance: f64,
}

/// Accrues one month of interest on `balance` and applies the payment the
/// strategy calls for.
///
/// `extra_cash` is the month's shared, non-negative pre-debt cash. It is not
/// reduced by earlier debts: every aggressive debt sizes its payment from the
/// same figure.
pub fn service_debt(
    balance: f64,
    annual_rate: f64,
    min_payment: f64,
    strategy: DebtStrategy,
    extra_cash: f64,
) -> DebtPayment {
    let interest = round2(balance * monthly_rate(annual_rate));
    let owed = round2(balance + interest);

    let payment = match strategy {
        DebtStrategy::Instant => owed,
        DebtStrategy::Aggressive => {
            let surplus = (extra_cash * AGGRESSIVE_SURPLUS_SHARE).max(0.0);
            owed.min(round2(min_payment + surplus))
        }
        DebtStrategy::Min => owed.min(min_payment),
    };
    let payment = round2(payment);

    DebtPayment {
        interest,
        payment,
        new_balance: round2((balance + interest - payment).max(0.0)),
    }
}

/// Steps a scenario forward one month at a time.
///
/// Debt and investment state is index-aligned with the scenario's input
/// vectors and lives only as long as the engine.
pub struct ForecastEngine<'a> {
    scenario: &'a ScenarioInput,
    cash: f64,
    debts: Vec<DebtState>,
    investments: Vec<f64>,
    had_debt: bool,
    min_cash: Option<(f64, u32)>,
    negative_cash_months: Vec<u32>,
    debt_free_month: Option<u32>,
    total_interest_paid: f64,
    total_tax_paid: f64,
    goal_achieved: Vec<Option<u32>>,
    snapshots: Vec<MonthSnapshot>,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(scenario: &'a ScenarioInput) -> Self {
        let debts: Vec<DebtState> = scenario
            .debts
            .iter()
            .map(|d| DebtState {
                balance: d.balance,
                paid_off: d.balance <= 0.0,
            })
            .collect();

        Self {
            scenario,
            cash: round2(scenario.initial_cash),
            had_debt: scenario.total_initial_debt() > 0.0,
            debts,
            investments: scenario.investments.iter().map(|i| i.current_value).collect(),
            min_cash: None,
            negative_cash_months: Vec::new(),
            debt_free_month: None,
            total_interest_paid: 0.0,
            total_tax_paid: 0.0,
            goal_achieved: vec![None; scenario.goals.len()],
            snapshots: Vec::with_capacity(scenario.months as usize),
        }
    }

    fn gross_income(&self, month: u32) -> f64 {
        let total: f64 = self
            .scenario
            .incomes
            .iter()
            .filter(|income| income.is_active(month))
            .map(|income| round2(income.amount * growth_multiplier(income.growth_rate, month)))
            .sum();
        round2(total)
    }

    fn expenses(&self, month: u32) -> f64 {
        let inflation = inflation_multiplier(self.scenario.inflation_rate, month);
        let total: f64 = self
            .scenario
            .expenses
            .iter()
            .filter(|expense| expense.is_active(month))
            .map(|expense| {
                let grown = round2(expense.amount * growth_multiplier(expense.growth_rate, month));
                round2(grown * inflation)
            })
            .sum();
        round2(total)
    }

    fn one_time_net(&self, month: u32) -> f64 {
        let total: f64 = self
            .scenario
            .one_time_events
            .iter()
            .filter(|event| event.month == month)
            .map(|event| event.amount)
            .sum();
        round2(total)
    }

    /// Simulates month `month` and appends its snapshot.
    pub fn step(&mut self, month: u32) -> &MonthSnapshot {
        let scenario = self.scenario;

        let gross_income = self.gross_income(month);
        let tax = round2(gross_income * scenario.tax_rate / 100.0);
        let net_income = round2(gross_income - tax);
        self.total_tax_paid = round2(self.total_tax_paid + tax);

        let total_expenses = self.expenses(month);
        let one_time_net = self.one_time_net(month);

        let pre_debt_cash = round2(self.cash + net_income - total_expenses + one_time_net);
        let extra_cash = pre_debt_cash.max(0.0);

        let mut total_debt_payment = 0.0;
        let mut month_interest = 0.0;
        for (input, state) in scenario.debts.iter().zip(self.debts.iter_mut()) {
            let outcome = service_debt(
                state.balance,
                input.annual_rate,
                input.min_payment,
                input.strategy,
                extra_cash,
            );
            state.balance = outcome.new_balance;
            if state.balance <= 0.0 {
                state.paid_off = true;
            }
            total_debt_payment = round2(total_debt_payment + outcome.payment);
            month_interest = round2(month_interest + outcome.interest);
        }
        self.total_interest_paid = round2(self.total_interest_paid + month_interest);

        let mut total_contribution = 0.0;
        for (input, value) in scenario.investments.iter().zip(self.investments.iter_mut()) {
            let growth = 1.0 + monthly_rate(input.expected_annual_return);
            *value = round2(*value * growth + input.monthly_contribution);
            total_contribution = round2(total_contribution + input.monthly_contribution);
        }

        self.cash = round2(pre_debt_cash - total_debt_payment - total_contribution);
        match self.min_cash {
            Some((min, _)) if self.cash >= min => {}
            _ => self.min_cash = Some((self.cash, month)),
        }
        if self.cash < 0.0 {
            self.negative_cash_months.push(month);
        }

        let total_investments = round2(self.investments.iter().sum());
        let total_debt = round2(self.debts.iter().map(|d| d.balance).sum());
        let net_worth = round2(self.cash + total_investments - total_debt);

        if self.had_debt && self.debt_free_month.is_none() && total_debt == 0.0 {
            self.debt_free_month = Some(month);
        }

        for (goal, achieved) in scenario.goals.iter().zip(self.goal_achieved.iter_mut()) {
            if achieved.is_some() {
                continue;
            }
            let metric = match goal.goal_type {
                GoalType::Savings => self.cash,
                GoalType::NetWorth => net_worth,
                GoalType::Investment => total_investments,
            };
            if metric >= goal.target_amount {
                *achieved = Some(month);
            }
        }

        self.snapshots.push(MonthSnapshot {
            month,
            cash: self.cash,
            net_worth,
            total_debt,
            total_investments,
            total_income: net_income,
            total_expenses,
            total_debt_payment,
            total_investment_contribution: total_contribution,
        });
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn run(mut self) -> ForecastResult {
        for month in 0..self.scenario.months {
            self.step(month);
        }
        self.finish()
    }

    fn finish(self) -> ForecastResult {
        let scenario = self.scenario;
        let initial_investments = round2(scenario.investments.iter().map(|i| i.current_value).sum());
        let initial_debt = round2(scenario.total_initial_debt());

        let (end_cash, end_net_worth, end_investment_value) = match self.snapshots.last() {
            Some(last) => (last.cash, last.net_worth, last.total_investments),
            None => (
                self.cash,
                round2(self.cash + initial_investments - initial_debt),
                initial_investments,
            ),
        };
        let (min_cash, min_cash_month) = self.min_cash.unwrap_or((self.cash, 0));

        let goal_progress = scenario
            .goals
            .iter()
            .zip(self.goal_achieved.iter())
            .map(|(goal, achieved)| {
                let current_value = self
                    .snapshots
                    .get(goal.target_month.min(scenario.months.saturating_sub(1)) as usize)
                    .map(|snap| match goal.goal_type {
                        GoalType::Savings => snap.cash,
                        GoalType::NetWorth => snap.net_worth,
                        GoalType::Investment => snap.total_investments,
                    })
                    .unwrap_or(0.0);

                let progress_pct = if goal.target_amount <= 0.0 {
                    100.0
                } else {
                    round2((current_value / goal.target_amount * 100.0).clamp(0.0, 100.0))
                };

                GoalProgress {
                    goal_id: goal.id.clone(),
                    label: goal.label.clone(),
                    goal_type: goal.goal_type,
                    target_amount: goal.target_amount,
                    target_month: goal.target_month,
                    achieved_month: *achieved,
                    current_value,
                    progress_pct,
                    on_track: achieved.is_some_and(|m| m <= goal.target_month),
                }
            })
            .collect();

        ForecastResult {
            summary: ForecastSummary {
                end_cash,
                end_net_worth,
                min_cash,
                min_cash_month,
                negative_cash_months: self.negative_cash_months,
                debt_free_month: self.debt_free_month,
                total_interest_paid: self.total_interest_paid,
                end_investment_value,
                total_tax_paid: self.total_tax_paid,
            },
            snapshots: self.snapshots,
            goal_progress,
        }
    }
}

/// Projects a scenario month by month. Pure and total: the input is assumed
/// to have passed boundary validation already.
pub fn compute_forecast(scenario: &ScenarioInput) -> ForecastResult {
    ForecastEngine::new(scenario).run()
}
