//! In-memory backend used by unit tests.

use crate::client::{FetchError, StockApi};
use crate::domain::contract::DefaultStocks;
use crate::domain::{StockAnalysis, Ticker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

#[derive(Default)]
pub struct FakeApi {
    pub watchlist: Mutex<Vec<String>>,
    pub watchlist_down: bool,
    pub defaults: Option<DefaultStocks>,
    pub analyses: HashMap<String, StockAnalysis>,
    pub analysis_calls: Mutex<Vec<String>>,
    /// When set, every analysis fetch parks here until the barrier fills.
    pub barrier: Option<Arc<Barrier>>,
}

impl FakeApi {
    pub fn new(watchlist: &[&str], companies: &[&str]) -> Self {
        Self {
            watchlist: Mutex::new(watchlist.iter().map(|s| s.to_string()).collect()),
            defaults: Some(DefaultStocks {
                companies: companies.iter().map(|s| s.to_string()).collect(),
                index_funds: vec!["SPY".to_string()],
            }),
            ..Default::default()
        }
    }

    pub fn with_analysis(mut self, ticker: &str, overall: Option<f64>, technical: Option<f64>) -> Self {
        let mut a = StockAnalysis {
            ticker: ticker.to_string(),
            company_name: Some(format!("{ticker} Corp")),
            current_price: Some(100.0),
            percent_change: Some(1.0),
            overall_score: overall,
            ..Default::default()
        };
        a.score_breakdown.technical_analysis = technical;
        self.analyses.insert(ticker.to_string(), a);
        self
    }

    pub fn watchlist_snapshot(&self) -> Vec<String> {
        self.watchlist.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl StockApi for FakeApi {
    async fn get_watchlist(&self) -> Result<Vec<Ticker>, FetchError> {
        if self.watchlist_down {
            return Err(FetchError::transport("get_watchlist", "Network error: connection refused"));
        }
        let raw = self.watchlist.lock().unwrap().clone();
        Ok(raw.iter().filter_map(|s| Ticker::parse(s).ok()).collect())
    }

    async fn add_to_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError> {
        let mut list = self.watchlist.lock().unwrap();
        if list.iter().any(|t| t == ticker.as_str()) {
            return Err(FetchError::logical("add_to_watchlist", format!("{ticker} is already in the watchlist."))
                .with_status(409));
        }
        list.push(ticker.as_str().to_string());
        Ok(format!("{ticker} added to watchlist successfully."))
    }

    async fn remove_from_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError> {
        let mut list = self.watchlist.lock().unwrap();
        let Some(pos) = list.iter().position(|t| t == ticker.as_str()) else {
            return Err(FetchError::logical("remove_from_watchlist", format!("{ticker} not found in watchlist."))
                .with_status(404));
        };
        list.remove(pos);
        Ok(format!("{ticker} removed from watchlist successfully."))
    }

    async fn fetch_default_stocks(&self) -> Result<DefaultStocks, FetchError> {
        self.defaults
            .clone()
            .ok_or_else(|| FetchError::transport("get_default_stocks", "HTTP error! status: 500"))
    }

    async fn fetch_stock_analysis(&self, ticker: &Ticker) -> Result<StockAnalysis, FetchError> {
        self.analysis_calls.lock().unwrap().push(ticker.as_str().to_string());
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        self.analyses
            .get(ticker.as_str())
            .cloned()
            .ok_or_else(|| FetchError::logical("get_stock_analysis", format!("Failed to retrieve data for {ticker}.")))
    }
}
