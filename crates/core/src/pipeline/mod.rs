//! Full-refresh pipeline: watchlist + defaults -> per-ticker analyses -> buckets.

pub mod classify;

pub use classify::{classify, request_set};

use crate::client::{FetchError, StockApi};
use crate::domain::contract::DefaultStocks;
use crate::domain::{Buckets, Ticker};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStage {
    Idle,
    FetchingWatchlist,
    FetchingAnalyses,
    Classifying,
    Done,
}

impl RefreshStage {
    pub fn is_busy(self) -> bool {
        !matches!(self, RefreshStage::Idle | RefreshStage::Done)
    }

    pub fn label(self) -> &'static str {
        match self {
            RefreshStage::Idle => "idle",
            RefreshStage::FetchingWatchlist => "loading watchlist",
            RefreshStage::FetchingAnalyses => "analyzing stocks",
            RefreshStage::Classifying => "ranking picks",
            RefreshStage::Done => "up to date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub generation: u64,
    pub watchlist: Vec<Ticker>,
    pub default_stocks: DefaultStocks,
    pub requested: Vec<Ticker>,
    pub buckets: Buckets,
    /// Propagated failure of the watchlist read; the refresh still completed.
    pub watchlist_error: Option<FetchError>,
    pub default_stocks_error: Option<FetchError>,
}

impl RefreshReport {
    pub fn errors(&self) -> impl Iterator<Item = &FetchError> {
        self.watchlist_error
            .iter()
            .chain(self.default_stocks_error.iter())
    }
}

/// Runs refresh cycles against a [`StockApi`].
///
/// Each cycle takes a fresh generation number. Cycles are not serialized, so callers
/// that render asynchronously should drop reports for which [`Pipeline::is_current`]
/// is false.
pub struct Pipeline<A: ?Sized> {
    api: Arc<A>,
    generation: Arc<AtomicU64>,
    stage: Arc<watch::Sender<RefreshStage>>,
}

impl<A: ?Sized> Clone for Pipeline<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            generation: Arc::clone(&self.generation),
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<A: StockApi + ?Sized> Pipeline<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (stage, _) = watch::channel(RefreshStage::Idle);
        Self {
            api,
            generation: Arc::new(AtomicU64::new(0)),
            stage: Arc::new(stage),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshStage> {
        self.stage.subscribe()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn enter(&self, generation: u64, stage: RefreshStage) {
        tracing::debug!(generation, stage = stage.label(), "refresh stage");
        self.stage.send_replace(stage);
    }

    pub async fn refresh(&self) -> RefreshReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.enter(generation, RefreshStage::FetchingWatchlist);
        let (watchlist, (default_stocks, default_stocks_error)) =
            tokio::join!(self.api.get_watchlist(), self.api.get_default_stocks());

        let (watchlist, watchlist_error) = match watchlist {
            Ok(list) => (list, None),
            Err(err) => {
                tracing::error!(generation, error = %err, "watchlist fetch failed");
                (Vec::new(), Some(err))
            }
        };

        let requested = request_set(&watchlist, &default_stocks.company_tickers());

        self.enter(generation, RefreshStage::FetchingAnalyses);
        let results = join_all(requested.iter().map(|t| self.api.get_stock_analysis(t))).await;

        self.enter(generation, RefreshStage::Classifying);
        let buckets = classify(results);

        self.enter(generation, RefreshStage::Done);
        tracing::info!(
            generation,
            requested = requested.len(),
            all = buckets.all.len(),
            long_term = buckets.long_term.len(),
            short_term = buckets.short_term.len(),
            "refresh complete"
        );

        RefreshReport {
            generation,
            watchlist,
            default_stocks,
            requested,
            buckets,
            watchlist_error,
            default_stocks_error,
        }
    }
}
