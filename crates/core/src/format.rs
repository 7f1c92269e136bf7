//! Display formatting for analysis fields.
//!
//! Every function here is total: a missing or non-finite input renders as [`NA`].

use crate::domain::Suggestion;

pub const NA: &str = "N/A";

/// Five score bands plus a bucket for missing scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
    Unknown,
}

/// Presentation tier for suggestions and price direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl ScoreTier {
    pub fn tier(self) -> Tier {
        match self {
            ScoreTier::StrongPositive | ScoreTier::Positive => Tier::Positive,
            ScoreTier::Neutral => Tier::Neutral,
            ScoreTier::Negative | ScoreTier::StrongNegative => Tier::Negative,
            ScoreTier::Unknown => Tier::Unknown,
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub fn format_currency(value: Option<f64>, symbol: &str, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{}{symbol}{}", sign(v), group_fixed(v.abs(), decimals)),
        None => NA.to_string(),
    }
}

/// Shorthand for the dashboard's default `$` with two decimals.
pub fn format_price(value: Option<f64>) -> String {
    format_currency(value, "$", 2)
}

pub fn format_market_cap(value: Option<f64>) -> String {
    let Some(v) = finite(value).filter(|v| *v != 0.0) else {
        return NA.to_string();
    };

    let m = v.abs();
    let (scaled, suffix) = if m >= 1e12 {
        (m / 1e12, "T")
    } else if m >= 1e9 {
        (m / 1e9, "B")
    } else if m >= 1e6 {
        (m / 1e6, "M")
    } else if m >= 1e3 {
        (m / 1e3, "K")
    } else {
        (m, "")
    };
    format!("{}${scaled:.2}{suffix}", sign(v))
}

fn sign(v: f64) -> &'static str {
    if v < 0.0 {
        "-"
    } else {
        ""
    }
}

/// Grouped integer part, at most three fraction digits, trailing zeros dropped.
pub fn format_number(value: Option<f64>) -> String {
    let Some(v) = finite(value) else {
        return NA.to_string();
    };

    let s = group_fixed(v, 3);
    match s.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{frac}")
            }
        }
        None => s,
    }
}

/// Already-a-percent values such as `percentChange`.
pub fn format_percent_change(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) if v > 0.0 => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => NA.to_string(),
    }
}

/// Fractions such as dividend yield or analyst upside: `0.0052` -> `0.52%`.
pub fn format_fraction_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NA.to_string(),
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{v:.2}"),
        None => NA.to_string(),
    }
}

pub fn format_score(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.0}", v.round()),
        None => NA.to_string(),
    }
}

pub fn format_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NA.to_string(),
    }
}

pub fn classify_score(score: Option<f64>) -> ScoreTier {
    match finite(score) {
        Some(s) if s >= 85.0 => ScoreTier::StrongPositive,
        Some(s) if s >= 70.0 => ScoreTier::Positive,
        Some(s) if s >= 50.0 => ScoreTier::Neutral,
        Some(s) if s >= 30.0 => ScoreTier::Negative,
        Some(_) => ScoreTier::StrongNegative,
        None => ScoreTier::Unknown,
    }
}

pub fn classify_suggestion(suggestion: &Suggestion) -> Tier {
    match suggestion {
        Suggestion::StrongBuy | Suggestion::Buy => Tier::Positive,
        Suggestion::Hold | Suggestion::Neutral => Tier::Neutral,
        Suggestion::Sell | Suggestion::StrongSell => Tier::Negative,
        Suggestion::DataUnavailable | Suggestion::AnalysisError | Suggestion::Other(_) => {
            Tier::Unknown
        }
    }
}

pub fn classify_price_direction(percent_change: Option<f64>) -> Tier {
    match finite(percent_change) {
        Some(v) if v > 0.0 => Tier::Positive,
        Some(v) if v < 0.0 => Tier::Negative,
        Some(_) => Tier::Neutral,
        None => Tier::Unknown,
    }
}

fn group_fixed(v: f64, decimals: usize) -> String {
    let fixed = format!("{v:.decimals$}");
    let (sign, body) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    out.push_str(&group_digits(int_part));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_integer_part_only() {
        assert_eq!(format_currency(Some(1234567.891), "$", 2), "$1,234,567.89");
        assert_eq!(format_currency(Some(999.5), "$", 2), "$999.50");
        assert_eq!(format_currency(Some(0.0), "$", 2), "$0.00");
        assert_eq!(format_currency(Some(1234.56789), "€", 4), "€1,234.5679");
        assert_eq!(format_currency(Some(1000.0), "$", 0), "$1,000");
        assert_eq!(format_currency(Some(-1234.5), "$", 2), "-$1,234.50");
    }

    #[test]
    fn currency_rejects_gaps() {
        assert_eq!(format_currency(None, "$", 2), NA);
        assert_eq!(format_currency(Some(f64::NAN), "$", 2), NA);
        assert_eq!(format_currency(Some(f64::INFINITY), "$", 2), NA);
    }

    #[test]
    fn market_cap_magnitudes() {
        assert_eq!(format_market_cap(Some(1_500_000_000_000.0)), "$1.50T");
        assert_eq!(format_market_cap(Some(2_300_000.0)), "$2.30M");
        assert_eq!(format_market_cap(Some(45_600_000_000.0)), "$45.60B");
        assert_eq!(format_market_cap(Some(12_340.0)), "$12.34K");
        assert_eq!(format_market_cap(Some(512.0)), "$512.00");
        assert_eq!(format_market_cap(Some(0.0)), NA);
        assert_eq!(format_market_cap(None), NA);
        assert_eq!(format_market_cap(Some(-5_000_000.0)), "-$5.00M");
    }

    #[test]
    fn number_uses_locale_style_grouping() {
        assert_eq!(format_number(Some(1234567.0)), "1,234,567");
        assert_eq!(format_number(Some(1234.5)), "1,234.5");
        assert_eq!(format_number(Some(0.12345)), "0.123");
        assert_eq!(format_number(Some(164000.0)), "164,000");
        assert_eq!(format_number(None), NA);
    }

    #[test]
    fn percent_helpers() {
        assert_eq!(format_percent_change(Some(1.234)), "+1.23%");
        assert_eq!(format_percent_change(Some(-0.5)), "-0.50%");
        assert_eq!(format_percent_change(Some(0.0)), "0.00%");
        assert_eq!(format_fraction_percent(Some(0.0052)), "0.52%");
        assert_eq!(format_fraction_percent(None), NA);
        assert_eq!(format_score(Some(74.6)), "75");
        assert_eq!(format_text(Some("  ")), NA);
    }

    #[test]
    fn score_tiers() {
        assert_eq!(classify_score(Some(85.0)), ScoreTier::StrongPositive);
        assert_eq!(classify_score(Some(84.9)), ScoreTier::Positive);
        assert_eq!(classify_score(Some(70.0)), ScoreTier::Positive);
        assert_eq!(classify_score(Some(50.0)), ScoreTier::Neutral);
        assert_eq!(classify_score(Some(30.0)), ScoreTier::Negative);
        assert_eq!(classify_score(Some(29.0)), ScoreTier::StrongNegative);
        assert_eq!(classify_score(None), ScoreTier::Unknown);
        assert_eq!(classify_score(Some(f64::NAN)), ScoreTier::Unknown);
    }

    #[test]
    fn suggestion_and_direction_tiers() {
        assert_eq!(classify_suggestion(&Suggestion::StrongBuy), Tier::Positive);
        assert_eq!(classify_suggestion(&Suggestion::Hold), Tier::Neutral);
        assert_eq!(classify_suggestion(&Suggestion::StrongSell), Tier::Negative);
        assert_eq!(classify_suggestion(&Suggestion::from("Moon")), Tier::Unknown);
        assert_eq!(classify_suggestion(&Suggestion::AnalysisError), Tier::Unknown);

        assert_eq!(classify_price_direction(Some(0.1)), Tier::Positive);
        assert_eq!(classify_price_direction(Some(-2.0)), Tier::Negative);
        assert_eq!(classify_price_direction(Some(0.0)), Tier::Neutral);
        assert_eq!(classify_price_direction(None), Tier::Unknown);
    }
}
