pub mod error;
pub mod http;

pub use error::{FetchError, FetchErrorKind};
pub use http::HttpStockApi;

use crate::domain::contract::DefaultStocks;
use crate::domain::{StockAnalysis, Ticker};

/// Everything the dashboard needs from the analysis backend.
///
/// Implementors only provide the fallible calls. The provided methods encode the
/// degradation rules: a failed default list becomes empty, and a failed analysis becomes
/// a sentinel record so a batch of them can be joined without short-circuiting.
#[async_trait::async_trait]
pub trait StockApi: Send + Sync {
    async fn get_watchlist(&self) -> Result<Vec<Ticker>, FetchError>;

    async fn add_to_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError>;

    async fn remove_from_watchlist(&self, ticker: &Ticker) -> Result<String, FetchError>;

    async fn fetch_default_stocks(&self) -> Result<DefaultStocks, FetchError>;

    async fn fetch_stock_analysis(&self, ticker: &Ticker) -> Result<StockAnalysis, FetchError>;

    async fn get_default_stocks(&self) -> (DefaultStocks, Option<FetchError>) {
        match self.fetch_default_stocks().await {
            Ok(defaults) => (defaults, None),
            Err(err) => {
                tracing::warn!(operation = err.operation, error = %err, "default stock list unavailable; continuing without it");
                (DefaultStocks::default(), Some(err))
            }
        }
    }

    async fn get_stock_analysis(&self, ticker: &Ticker) -> StockAnalysis {
        match self.fetch_stock_analysis(ticker).await {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::warn!(%ticker, operation = err.operation, kind = ?err.kind, error = %err, "analysis fetch failed");
                StockAnalysis::sentinel(ticker, err.message)
            }
        }
    }
}
