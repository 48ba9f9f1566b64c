//! Display formatting for prices, magnitudes and percentage changes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Magnitude-suffixed number: `1_500_000.0` becomes `"1.50M"`. Values under a
/// thousand are written out with grouping and at most three decimals.
pub fn format_number(num: f64) -> String {
    for (scale, suffix) in SUFFIXES {
        if num >= scale {
            return format!("{:.2}{}", num / scale, suffix);
        }
    }

    format_plain(num)
}

pub fn format_percentage(percent: Option<f64>) -> String {
    match percent {
        Some(p) if p != 0.0 && !p.is_nan() => format!("{p:.2}%"),
        _ => "0.00%".to_string(),
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn format_dominance(dominance: f64) -> String {
    format!("{dominance:.2}%")
}

fn format_plain(num: f64) -> String {
    if num.is_nan() {
        return "NaN".to_string();
    }
    if num.is_infinite() {
        return if num > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = format!("{:.3}", num.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if num < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
