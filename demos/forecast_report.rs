use financial_forecast::*;

fn seed_scenario() -> ScenarioInput {
    let mut scenario = ScenarioInput::new("USD", 12, 5000.0);
    scenario.incomes.push(IncomeInput {
        id: "salary".to_string(),
        label: "Salary".to_string(),
        amount: 10_000.0,
        start_month: 0,
        end_month: None,
        growth_rate: 3.0,
    });
    scenario.expenses.push(ExpenseInput {
        id: "rent".to_string(),
        label: "Rent".to_string(),
        amount: 7000.0,
        category: ExpenseCategory::Rent,
        start_month: 0,
        end_month: None,
        growth_rate: 0.0,
        is_one_time: false,
    });
    scenario.expenses.push(ExpenseInput {
        id: "entertainment".to_string(),
        label: "Entertainment".to_string(),
        amount: 5000.0,
        category: ExpenseCategory::Discretionary,
        start_month: 0,
        end_month: None,
        growth_rate: 0.0,
        is_one_time: false,
    });
    scenario.debts.push(DebtInput {
        id: "student-loan".to_string(),
        label: "Student loan".to_string(),
        balance: 50_000.0,
        annual_rate: 8.0,
        min_payment: 1200.0,
        strategy: DebtStrategy::Min,
    });
    scenario.investments.push(InvestmentInput {
        id: "brokerage".to_string(),
        label: "Brokerage".to_string(),
        current_value: 20_000.0,
        monthly_contribution: 500.0,
        expected_annual_return: 8.0,
    });
    scenario.one_time_events.push(OneTimeEvent {
        id: "bonus".to_string(),
        label: "Year-end bonus".to_string(),
        amount: 8000.0,
        month: 11,
    });
    scenario.goals.push(FinancialGoal {
        id: "portfolio".to_string(),
        label: "Portfolio of 25k".to_string(),
        target_amount: 25_000.0,
        target_month: 11,
        goal_type: GoalType::Investment,
    });
    scenario
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Pass a scenario file to forecast it instead of the built-in one.
    let scenario = match std::env::args().nth(1) {
        Some(path) => ScenarioInput::from_json_str(&std::fs::read_to_string(path)?)?,
        None => seed_scenario(),
    };
    let currency = scenario.currency.clone();

    let (forecast, advice) =
        ForecastProcessor::process_with_advice(&scenario, &AdvisorPreferences::default())?;

    println!("📈 Monthly Forecast ({} months, {})", scenario.months, currency);
    println!("═══════════════════════════════════════════════════════════════");
    println!(
        "{:>5} {:>18} {:>18} {:>18} {:>18}",
        "Month", "Cash", "Debt", "Investments", "Net worth"
    );
    for snap in &forecast.snapshots {
        println!(
            "{:>5} {:>18} {:>18} {:>18} {:>18}",
            snap.month + 1,
            format_money(snap.cash, &currency),
            format_money(snap.total_debt, &currency),
            format_money(snap.total_investments, &currency),
            format_money(snap.net_worth, &currency)
        );
    }

    let summary = &forecast.summary;
    println!("\n📊 Summary");
    println!("   End cash:        {}", format_money(summary.end_cash, &currency));
    println!("   End net worth:   {}", format_money(summary.end_net_worth, &currency));
    println!(
        "   Lowest cash:     {} (month {})",
        format_money(summary.min_cash, &currency),
        summary.min_cash_month + 1
    );
    println!("   Interest paid:   {}", format_money(summary.total_interest_paid, &currency));
    match summary.debt_free_month {
        Some(month) => println!("   Debt-free:       month {}", month + 1),
        None => println!("   Debt-free:       not within the horizon"),
    }
    for goal in &forecast.goal_progress {
        println!(
            "   Goal '{}': {:.2}% {}",
            goal.label,
            goal.progress_pct,
            if goal.on_track { "✅" } else { "⚠️" }
        );
    }

    println!("\n💡 Advice");
    println!("{}", serde_json::to_string_pretty(&advice)?);

    println!("\n📄 CSV");
    print!("{}", snapshots_to_csv_string(&forecast.snapshots)?);

    Ok(())
}
