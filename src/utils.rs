/// Rounds a monetary value to two decimal places.
///
/// Every figure the engine stores or compares goes through this first, so
/// downstream consumers can rely on exact equality after rounding.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole years elapsed at a 0-based month index.
pub fn years_elapsed(month: u32) -> i32 {
    (month / 12) as i32
}

/// Yearly-stepped growth factor for a line item: `(1 + rate/100)^floor(month/12)`.
pub fn growth_multiplier(annual_rate_pct: f64, month: u32) -> f64 {
    (1.0 + annual_rate_pct / 100.0).powi(years_elapsed(month))
}

/// Monthly-compounded inflation factor: `(1 + rate/100/12)^month`.
pub fn inflation_multiplier(annual_rate_pct: f64, month: u32) -> f64 {
    (1.0 + annual_rate_pct / 100.0 / 12.0).powi(month as i32)
}

/// Converts an annual percentage into a monthly fraction.
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

/// Formats an amount with thousands separators and two decimals, prefixed
/// by the currency code (e.g. `USD -1,234.50`).
pub fn format_money(amount: f64, currency: &str) -> String {
    let rounded = round2(amount);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{} {}{}.{}", currency, sign, grouped, cents)
}

/// True when `value` carries no more than two decimal digits.
pub fn is_rounded(value: f64) -> bool {
    value.is_finite() && (round2(value) - value).abs() < 1e-9
}
