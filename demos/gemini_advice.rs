use dotenv::dotenv;
use financial_forecast::llm::GeminiAdvisor;
use financial_forecast::*;
use std::error::Error;
use std::sync::Arc;

fn scenario(label: &str, initial_cash: f64, discretionary: f64) -> (String, ScenarioInput) {
    let mut scenario = ScenarioInput::new("USD", 24, initial_cash);
    scenario.incomes.push(IncomeInput {
        id: "salary".to_string(),
        label: "Salary".to_string(),
        amount: 6500.0,
        start_month: 0,
        end_month: None,
        growth_rate: 2.0,
    });
    scenario.expenses.push(ExpenseInput {
        id: "rent".to_string(),
        label: "Rent".to_string(),
        amount: 2400.0,
        category: ExpenseCategory::Rent,
        start_month: 0,
        end_month: None,
        growth_rate: 4.0,
        is_one_time: false,
    });
    scenario.expenses.push(ExpenseInput {
        id: "lifestyle".to_string(),
        label: "Lifestyle".to_string(),
        amount: discretionary,
        category: ExpenseCategory::Discretionary,
        start_month: 0,
        end_month: None,
        growth_rate: 0.0,
        is_one_time: false,
    });
    scenario.debts.push(DebtInput {
        id: "card".to_string(),
        label: "Credit card".to_string(),
        balance: 9000.0,
        annual_rate: 22.0,
        min_payment: 250.0,
        strategy: DebtStrategy::Min,
    });
    scenario.investments.push(InvestmentInput {
        id: "retirement".to_string(),
        label: "Retirement".to_string(),
        current_value: 15_000.0,
        monthly_contribution: 400.0,
        expected_annual_return: 6.0,
    });
    scenario.tax_rate = 22.0;
    scenario.inflation_rate = 3.0;
    (label.to_string(), scenario)
}

async fn advise_all<P: AdvisoryProvider>(
    chain: &AdvisoryChain<P>,
    preferences: &AdvisorPreferences,
    scenarios: &[(String, ScenarioInput)],
) -> std::result::Result<(), Box<dyn Error>> {
    let forecasts = scenarios
        .iter()
        .map(|(_, s)| process_scenario(s))
        .collect::<Result<Vec<_>>>()?;

    let requests: Vec<AdvisoryRequest> = scenarios
        .iter()
        .zip(forecasts.iter())
        .map(|((_, s), f)| AdvisoryRequest::new(s, f, preferences))
        .collect();

    let outcomes =
        futures::future::join_all(requests.iter().map(|request| chain.advise(request))).await;

    for ((label, _), outcome) in scenarios.iter().zip(outcomes) {
        println!("═══════════════════════════════════════════════════════════════");
        println!("🧾 {} (source: {:?})", label, outcome.source);
        for insight in &outcome.response.insights {
            println!("   💡 {} [{:?}] {}", insight.title, insight.confidence, insight.rationale);
        }
        for alert in &outcome.response.alerts {
            println!("   ⚠️  {:?} month {}: {}", alert.alert_type, alert.month + 1, alert.message);
        }
        for action in &outcome.response.actions {
            println!(
                "   👉 {} (net worth {:+.2}, min cash {:+.2})",
                action.label,
                action.expected_outcome.net_worth_delta,
                action.expected_outcome.min_cash_delta
            );
        }
    }

    // A second pass over the same inputs is served from the cache.
    let repeat = chain.advise(&requests[0]).await;
    println!("\n🔁 Repeat request served by {:?}", repeat.source);

    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let config = AdvisorConfig::from_env()?;
    let preferences = config.preferences();
    let cache = Arc::new(config.build_cache());

    let scenarios = vec![
        scenario("Frugal", 12_000.0, 600.0),
        scenario("Comfortable", 4000.0, 1500.0),
        scenario("Overstretched", 500.0, 2800.0),
    ];

    println!("🤖 Advisor provider: {:?}, model: {}", config.provider, config.model);

    match config.provider {
        ProviderKind::Gemini => {
            let chain = AdvisoryChain::new(GeminiAdvisor::from_config(&config)?).with_cache(cache);
            advise_all(&chain, &preferences, &scenarios).await
        }
        ProviderKind::Heuristic => {
            let chain = AdvisoryChain::heuristic_only().with_cache(cache);
            advise_all(&chain, &preferences, &scenarios).await
        }
    }
}
