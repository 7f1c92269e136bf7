//! Response envelopes of the analysis backend.

use crate::domain::analysis::StockAnalysis;
use crate::domain::lenient;
use crate::domain::ticker::Ticker;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDataEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stock_data: Option<StockAnalysis>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub error: Option<String>,
    /// Warnings on success, per-step failures on error.
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub detailed_errors: Vec<String>,
}

/// Why an envelope could not be turned into an analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub message: String,
    pub details: Vec<String>,
}

impl StockDataEnvelope {
    pub fn into_analysis(self, requested: &Ticker) -> Result<StockAnalysis, Rejection> {
        match (self.success, self.stock_data) {
            (true, Some(mut data)) => {
                if data.ticker.trim().is_empty() {
                    data.ticker = requested.as_str().to_string();
                }
                data.warnings = self.errors;
                Ok(data)
            }
            (true, None) => Err(Rejection {
                message: format!("No analysis data returned for {requested}."),
                details: Vec::new(),
            }),
            (false, _) => {
                let mut details = self.detailed_errors;
                if details.is_empty() {
                    details = self.errors;
                }
                Err(Rejection {
                    message: self
                        .error
                        .unwrap_or_else(|| format!("Failed to fetch data for {requested}.")),
                    details,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultStocks {
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub index_funds: Vec<String>,
}

impl DefaultStocks {
    pub fn company_tickers(&self) -> Vec<Ticker> {
        parse_tickers(&self.companies)
    }

    pub fn index_fund_tickers(&self) -> Vec<Ticker> {
        parse_tickers(&self.index_funds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickerBody<'a> {
    pub ticker: &'a str,
}

/// Blank entries are skipped; the backend never validates what it stored.
pub fn parse_tickers(raw: &[String]) -> Vec<Ticker> {
    raw.iter()
        .filter_map(|s| match Ticker::parse(s) {
            Ok(t) => Some(t),
            Err(err) => {
                tracing::warn!(raw = %s, error = %err, "skipping invalid ticker from backend");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aapl() -> Ticker {
        Ticker::parse("AAPL").unwrap()
    }

    #[test]
    fn success_envelope_attaches_warnings() {
        let env: StockDataEnvelope = serde_json::from_value(json!({
            "success": true,
            "stockData": {"companyName": "Apple Inc.", "overallScore": 70},
            "errors": ["No historical data found for AAPL."]
        }))
        .unwrap();

        let a = env.into_analysis(&aapl()).unwrap();
        assert_eq!(a.ticker, "AAPL");
        assert_eq!(a.warnings, vec!["No historical data found for AAPL.".to_string()]);
    }

    #[test]
    fn logical_failure_keeps_server_message() {
        let env: StockDataEnvelope = serde_json::from_value(json!({
            "success": false,
            "error": "Failed to retrieve data for AAPL.",
            "detailedErrors": ["rate limit"]
        }))
        .unwrap();

        let rej = env.into_analysis(&aapl()).unwrap_err();
        assert_eq!(rej.message, "Failed to retrieve data for AAPL.");
        assert_eq!(rej.details, vec!["rate limit".to_string()]);
    }

    #[test]
    fn success_without_payload_is_rejected() {
        let env: StockDataEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(env.into_analysis(&aapl()).is_err());
    }

    #[test]
    fn default_stocks_skip_blank_entries() {
        let d: DefaultStocks = serde_json::from_value(json!({
            "companies": ["aapl", " ", "MSFT"],
            "index_funds": ["SPY"]
        }))
        .unwrap();
        let names: Vec<_> = d.company_tickers().into_iter().map(String::from).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);
        assert_eq!(d.index_fund_tickers().len(), 1);
    }
}
