use crate::domain::lenient;
use crate::domain::ticker::Ticker;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// One analysed stock as returned by `GET /stock_data`.
///
/// Every numeric field is optional: the backend passes through whatever its market data
/// source had, and gaps are rendered as `N/A` rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    #[serde(default)]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub company_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub percent_change: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub open_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub day_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub day_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub full_time_employees: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub weburl: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ipo: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub pe_ratio: Option<f64>,
    #[serde(default, rename = "forwardPE", deserialize_with = "lenient::number")]
    pub forward_pe: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub ex_dividend_date: Option<String>,
    #[serde(default, rename = "52WeekHigh", deserialize_with = "lenient::number")]
    pub week52_high: Option<f64>,
    #[serde(default, rename = "52WeekLow", deserialize_with = "lenient::number")]
    pub week52_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub beta: Option<f64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub analyst_recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub analyst_target_price: Option<f64>,
    /// Fraction, not percent: `0.12` means 12% upside to the mean target.
    #[serde(default, deserialize_with = "lenient::number")]
    pub analyst_upside: Option<f64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub business_summary: Option<String>,

    #[serde(default)]
    pub score_breakdown: ScoreBreakdown,
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "suggestion_field")]
    pub suggestion: Suggestion,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub reasons: Vec<String>,

    #[serde(default, deserialize_with = "history_field")]
    pub historical_data: Vec<PricePoint>,

    /// Non-fatal backend warnings delivered next to a successful payload.
    #[serde(skip)]
    pub warnings: Vec<String>,
    /// Set only on sentinel records synthesised for a failed fetch.
    #[serde(skip)]
    pub error: Option<String>,
}

impl StockAnalysis {
    /// Stand-in record for a ticker whose analysis could not be fetched.
    pub fn sentinel(ticker: &Ticker, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            ticker: ticker.as_str().to_string(),
            suggestion: Suggestion::AnalysisError,
            reasons: vec![message.clone()],
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn technical_score(&self) -> Option<f64> {
        self.score_breakdown.technical_analysis
    }

    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    #[serde(default, deserialize_with = "lenient::number")]
    pub analyst_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub analyst_upside: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub financial_analysis: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub technical_analysis: Option<f64>,
}

impl ScoreBreakdown {
    pub fn entries(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("Analyst Rating", self.analyst_rating),
            ("Analyst Upside", self.analyst_upside),
            ("Financial Analysis", self.financial_analysis),
            ("Technical Analysis", self.technical_analysis),
        ]
    }
}

/// One daily bar. The backend sends full OHLCV records keyed `Date`/`Close`; the compact
/// `{date, closingPrice}` form is accepted too.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PricePoint {
    #[serde(default, alias = "Date", deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(
        default,
        rename = "closingPrice",
        alias = "Close",
        alias = "close",
        deserialize_with = "lenient::number"
    )]
    pub close: Option<f64>,
    #[serde(default, alias = "Open", deserialize_with = "lenient::number")]
    pub open: Option<f64>,
    #[serde(default, alias = "High", deserialize_with = "lenient::number")]
    pub high: Option<f64>,
    #[serde(default, alias = "Low", deserialize_with = "lenient::number")]
    pub low: Option<f64>,
    #[serde(default, alias = "Volume", deserialize_with = "lenient::number")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: &str, close: f64) -> Self {
        Self {
            date: Some(date.to_string()),
            close: Some(close),
            ..Default::default()
        }
    }

    /// Accepts `YYYY-MM-DD` as well as ISO timestamps that start with one.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Suggestion {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
    Neutral,
    #[default]
    DataUnavailable,
    AnalysisError,
    Other(String),
}

impl Suggestion {
    pub fn label(&self) -> &str {
        match self {
            Suggestion::StrongBuy => "Strong Buy",
            Suggestion::Buy => "Buy",
            Suggestion::Hold => "Hold",
            Suggestion::Sell => "Sell",
            Suggestion::StrongSell => "Strong Sell",
            Suggestion::Neutral => "Neutral",
            Suggestion::DataUnavailable => "Data Unavailable",
            Suggestion::AnalysisError => "Analysis Error",
            Suggestion::Other(s) => s,
        }
    }
}

impl From<&str> for Suggestion {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Strong Buy" => Suggestion::StrongBuy,
            "Buy" => Suggestion::Buy,
            "Hold" => Suggestion::Hold,
            "Sell" => Suggestion::Sell,
            "Strong Sell" => Suggestion::StrongSell,
            "Neutral" => Suggestion::Neutral,
            "Data Unavailable" => Suggestion::DataUnavailable,
            "Analysis Error" => Suggestion::AnalysisError,
            other => Suggestion::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn suggestion_field<'de, D>(de: D) -> Result<Suggestion, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::text(de)?
        .map(|s| Suggestion::from(s.as_str()))
        .unwrap_or_default())
}

fn history_field<'de, D>(de: D) -> Result<Vec<PricePoint>, D::Error>
where
    D: Deserializer<'de>,
{
    // A malformed history must not sink the whole record.
    let v = Option::<serde_json::Value>::deserialize(de)?;
    let Some(serde_json::Value::Array(items)) = v else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<PricePoint>(item).ok())
        .collect())
}
