//! Wires the API client, the refresh pipeline and a [`DashboardView`] together.
//!
//! The free functions are the building blocks the TUI uses from its own event loop;
//! [`Dashboard`] strings them together for sequential callers (CLI subcommands, tests).

use crate::client::{FetchError, StockApi};
use crate::domain::{StockAnalysis, Ticker, TickerError};
use crate::pipeline::{Pipeline, RefreshReport};
use crate::view::{Banner, ChartSeries, DashboardView};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum ActionError {
    InvalidTicker(TickerError),
    Fetch(FetchError),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::InvalidTicker(err) => write!(f, "{err}"),
            ActionError::Fetch(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ActionError {}

impl From<TickerError> for ActionError {
    fn from(err: TickerError) -> Self {
        ActionError::InvalidTicker(err)
    }
}

impl From<FetchError> for ActionError {
    fn from(err: FetchError) -> Self {
        ActionError::Fetch(err)
    }
}

impl ActionError {
    pub fn banner(&self, what: &str) -> Banner {
        match self {
            ActionError::InvalidTicker(err) => Banner::error(err.to_string()),
            ActionError::Fetch(err) => Banner::fetch_failed(what, err),
        }
    }
}

/// Pushes a finished refresh into the view. Returns false, without touching the view,
/// when a newer refresh has started since this one.
pub fn apply_refresh<A, V>(pipeline: &Pipeline<A>, view: &mut V, report: &RefreshReport) -> bool
where
    A: StockApi + ?Sized,
    V: DashboardView + ?Sized,
{
    if !pipeline.is_current(report.generation) {
        tracing::debug!(generation = report.generation, "dropping stale refresh");
        return false;
    }

    view.render_tables(&report.buckets);
    view.render_watchlist(&report.watchlist, &report.default_stocks);
    if let Some(err) = &report.watchlist_error {
        view.show_banner(Banner::fetch_failed("load watchlist", err));
    }
    if let Some(err) = &report.default_stocks_error {
        view.show_banner(Banner::fetch_failed("load default stocks", err));
    }
    view.set_busy(false);
    true
}

pub fn apply_detail<V: DashboardView + ?Sized>(view: &mut V, stock: &StockAnalysis) {
    view.render_detail(stock);
    view.render_chart(&ChartSeries::from_history(&stock.ticker, &stock.historical_data));
}

pub async fn submit_add<A: StockApi + ?Sized>(api: &A, input: &str) -> Result<(Ticker, String), ActionError> {
    let ticker = Ticker::parse(input)?;
    let message = api.add_to_watchlist(&ticker).await?;
    tracing::info!(%ticker, "added to watchlist");
    Ok((ticker, message))
}

pub async fn submit_remove<A: StockApi + ?Sized>(api: &A, ticker: &Ticker) -> Result<String, ActionError> {
    let message = api.remove_from_watchlist(ticker).await?;
    tracing::info!(%ticker, "removed from watchlist");
    Ok(message)
}

pub struct Dashboard<A: ?Sized, V> {
    pipeline: Pipeline<A>,
    view: V,
    watchlist: Vec<Ticker>,
}

impl<A, V> Dashboard<A, V>
where
    A: StockApi + ?Sized,
    V: DashboardView,
{
    pub fn new(api: Arc<A>, view: V) -> Self {
        Self {
            pipeline: Pipeline::new(api),
            view,
            watchlist: Vec::new(),
        }
    }

    pub fn pipeline(&self) -> &Pipeline<A> {
        &self.pipeline
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn watchlist(&self) -> &[Ticker] {
        &self.watchlist
    }

    pub async fn refresh(&mut self) {
        self.view.set_busy(true);
        let report = self.pipeline.refresh().await;
        if apply_refresh(&self.pipeline, &mut self.view, &report) {
            self.watchlist = report.watchlist;
        }
    }

    /// Adds the ticker and, on success, reruns the whole pipeline.
    pub async fn add_ticker(&mut self, input: &str) -> Result<Ticker, ActionError> {
        match submit_add(self.pipeline.api().as_ref(), input).await {
            Ok((ticker, message)) => {
                self.view.show_banner(Banner::info(message));
                self.refresh().await;
                Ok(ticker)
            }
            Err(err) => {
                tracing::warn!(input, error = %err, "add to watchlist failed");
                self.view.show_banner(err.banner("add stock"));
                Err(err)
            }
        }
    }

    pub async fn remove_ticker(&mut self, ticker: &Ticker) -> Result<(), ActionError> {
        match submit_remove(self.pipeline.api().as_ref(), ticker).await {
            Ok(message) => {
                self.view.show_banner(Banner::info(message));
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%ticker, error = %err, "remove from watchlist failed");
                self.view.show_banner(err.banner("remove stock"));
                Err(err)
            }
        }
    }

    /// Always fetches a fresh analysis; table rows are not reused.
    pub async fn open_detail(&mut self, ticker: &Ticker) -> StockAnalysis {
        let stock = self.pipeline.api().get_stock_analysis(ticker).await;
        apply_detail(&mut self.view, &stock);
        stock
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
    }
}
