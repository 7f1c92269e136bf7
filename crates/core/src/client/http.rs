use crate::client::{FetchError, StockApi};
use crate::config::Settings;
use crate::domain::contract::{parse_tickers, DefaultStocks, MessageBody, StockDataEnvelope, TickerBody};
use crate::domain::{StockAnalysis, Ticker};
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

const WATCHLIST_PATH: &str = "/watchlist";
const DEFAULT_STOCKS_PATH: &str = "/default_stocks";
const STOCK_DATA_PATH: &str = "/stock_data";

/// JSON-over-HTTP client for the analysis backend. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpStockApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStockApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build backend http client")?;

        Ok(Self::with_client(http, settings.api_base_url()))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Sends the request and sorts the reply into a JSON body or a classified error.
    async fn call(&self, operation: &'static str, req: reqwest::RequestBuilder) -> Result<Value, FetchError> {
        let res = req
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| FetchError::transport(operation, format!("Network error: {err}")))?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            FetchError::transport(operation, format!("Failed to read response: {err}"))
                .with_status(status.as_u16())
        })?;
        let body = serde_json::from_str::<Value>(&text).ok();

        if !status.is_success() {
            let err = match body.as_ref().and_then(error_message) {
                Some(message) => FetchError::logical(operation, message)
                    .with_details(detail_list(body.as_ref())),
                None => FetchError::transport(operation, format!("HTTP error! status: {status}")),
            };
            return Err(err.with_status(status.as_u16()));
        }

        body.ok_or_else(|| {
            FetchError::transport(operation, "Backend returned a non-JSON response")
                .with_status(status.as_u16())
        })
    }

    async fn watchlist_change(
        &self,
        operation: &'static str,
        req: reqwest::RequestBuilder,
    ) -> Result<String, FetchError> {
        let body = self.call(operation, req).await?;
        let parsed = serde_json::from_value::<MessageBody>(body).map_err(|err| {
            FetchError::transport(operation, format!("Unexpected response: {err}"))
        })?;

        match (parsed.message, parsed.error) {
            (_, Some(error)) => Err(FetchError::logical(operation, error)),
            (Some(message), None) => Ok(message),
            (None, None) => Ok("Watchlist updated.".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl StockApi for HttpStockApi {
    async fn get_watchlist(&self) -> Result<Vec<Ticker>, FetchError> {
        const OP: &str = "get_watchlist";
        let body = self.call(OP, self.http.get(self.url(WATCHLIST_PATH))).await?;
        if let Some(message) = error_message(&body) {
            return Err(FetchError::logical(OP, message));
        }

        let raw = serde_json::from_value::<Vec<String>>(body)
            .map_err(|err| FetchError::transport(OP, format!("Unexpected watchlist response: {err}")))?;
        Ok(parse_tickers(&raw))
    }

    async fn add_to_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError> {
        let req = self
            .http
            .post(self.url(WATCHLIST_PATH))
            .json(&TickerBody { ticker: ticker.as_str() });
        self.watchlist_change("add_to_watchlist", req).await
    }

    async fn remove_from_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError> {
        let req = self
            .http
            .delete(self.url(WATCHLIST_PATH))
            .json(&TickerBody { ticker: ticker.as_str() });
        self.watchlist_change("remove_from_watchlist", req).await
    }

    async fn fetch_default_stocks(&self) -> Result<DefaultStocks, FetchError> {
        const OP: &str = "get_default_stocks";
        let body = self.call(OP, self.http.get(self.url(DEFAULT_STOCKS_PATH))).await?;
        if let Some(message) = error_message(&body) {
            return Err(FetchError::logical(OP, message));
        }

        serde_json::from_value::<DefaultStocks>(body)
            .map_err(|err| FetchError::transport(OP, format!("Unexpected default stocks response: {err}")))
    }

    async fn fetch_stock_analysis(&self, ticker: &Ticker) -> Result<StockAnalysis, FetchError> {
        const OP: &str = "get_stock_analysis";
        let req = self
            .http
            .get(self.url(STOCK_DATA_PATH))
            .query(&[("ticker", ticker.as_str())]);
        let body = self.call(OP, req).await?;

        let envelope = serde_json::from_value::<StockDataEnvelope>(body)
            .map_err(|err| FetchError::transport(OP, format!("Unexpected stock data response: {err}")))?;

        envelope
            .into_analysis(ticker)
            .map_err(|rej| FetchError::logical(OP, rej.message).with_details(rej.details))
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn detail_list(body: Option<&Value>) -> Vec<String> {
    body.and_then(|b| b.get("detailedErrors"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FetchErrorKind;
    use crate::domain::Suggestion;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn client(base_url: String) -> HttpStockApi {
        HttpStockApi::with_client(reqwest::Client::new(), base_url)
    }

    async fn stock_data(Query(q): Query<HashMap<String, String>>) -> (StatusCode, String) {
        match q.get("ticker").map(String::as_str) {
            Some("AAPL") => (
                StatusCode::OK,
                json!({
                    "success": true,
                    "stockData": {
                        "ticker": "AAPL",
                        "companyName": "Apple Inc.",
                        "overallScore": 88,
                        "suggestion": "Strong Buy",
                        "scoreBreakdown": {"technicalAnalysis": 90}
                    },
                    "errors": null
                })
                .to_string(),
            ),
            Some("BAD") => (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "error": "Failed to retrieve data for BAD.",
                    "detailedErrors": ["No info data found for BAD"]
                })
                .to_string(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>".to_string()),
        }
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/watchlist",
                get(|| async { Json(json!(["AAPL", "msft"])) })
                    .post(|Json(body): Json<Value>| async move {
                        let ticker = body["ticker"].as_str().unwrap_or_default().to_string();
                        Json(json!({"message": format!("{ticker} added to watchlist successfully.")}))
                    })
                    .delete(|Json(body): Json<Value>| async move {
                        let ticker = body["ticker"].as_str().unwrap_or_default().to_string();
                        (
                            StatusCode::NOT_FOUND,
                            Json(json!({"error": format!("{ticker} not found in watchlist.")})),
                        )
                    }),
            )
            .route(
                "/api/default_stocks",
                get(|| async {
                    Json(json!({"companies": ["AAPL", "GOOGL"], "index_funds": ["SPY", "QQQ"]}))
                }),
            )
            .route("/api/stock_data", get(stock_data))
    }

    #[tokio::test]
    async fn reads_watchlist_and_defaults() {
        let api = client(spawn_backend(backend()).await);

        let watchlist = api.get_watchlist().await.unwrap();
        let names: Vec<&str> = watchlist.iter().map(Ticker::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);

        let (defaults, err) = api.get_default_stocks().await;
        assert!(err.is_none());
        assert_eq!(defaults.companies, vec!["AAPL", "GOOGL"]);
        assert_eq!(defaults.index_funds, vec!["SPY", "QQQ"]);
    }

    #[tokio::test]
    async fn add_returns_server_message() {
        let api = client(spawn_backend(backend()).await);
        let msg = api
            .add_to_watchlist(&Ticker::parse("nvda").unwrap())
            .await
            .unwrap();
        assert_eq!(msg, "NVDA added to watchlist successfully.");
    }

    #[tokio::test]
    async fn remove_missing_ticker_is_logical_error() {
        let api = client(spawn_backend(backend()).await);
        let err = api
            .remove_from_watchlist(&Ticker::parse("ZZZ").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Logical);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.operation, "remove_from_watchlist");
        assert_eq!(err.message, "ZZZ not found in watchlist.");
    }

    #[tokio::test]
    async fn analysis_success_and_failures_never_throw() {
        let api = client(spawn_backend(backend()).await);

        let ok = api.get_stock_analysis(&Ticker::parse("AAPL").unwrap()).await;
        assert!(!ok.is_error());
        assert_eq!(ok.suggestion, Suggestion::StrongBuy);
        assert_eq!(ok.technical_score(), Some(90.0));

        let logical = api.get_stock_analysis(&Ticker::parse("BAD").unwrap()).await;
        assert!(logical.is_error());
        assert_eq!(logical.ticker, "BAD");
        assert_eq!(logical.reasons, vec!["Failed to retrieve data for BAD.".to_string()]);

        let err = api
            .fetch_stock_analysis(&Ticker::parse("BAD").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.details, vec!["No info data found for BAD".to_string()]);

        let transport = api
            .fetch_stock_analysis(&Ticker::parse("HTML").unwrap())
            .await
            .unwrap_err();
        assert_eq!(transport.kind, FetchErrorKind::Transport);
        assert_eq!(transport.operation, "get_stock_analysis");
        assert_eq!(transport.status, Some(500));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let api = client("http://127.0.0.1:1/api".to_string());
        let err = api.get_watchlist().await.unwrap_err();
        assert!(err.is_transport());

        let sentinel = api.get_stock_analysis(&Ticker::parse("AAPL").unwrap()).await;
        assert!(sentinel.is_error());
        assert_eq!(sentinel.overall_score, None);

        let (defaults, err) = api.get_default_stocks().await;
        assert!(defaults.companies.is_empty());
        assert!(err.is_some());
    }

    #[test]
    fn joins_base_url_without_double_slash() {
        let api = client("http://localhost:5002/api/".to_string());
        assert_eq!(api.url(WATCHLIST_PATH), "http://localhost:5002/api/watchlist");
    }
}
