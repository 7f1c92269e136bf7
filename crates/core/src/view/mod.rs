//! Presentation capability and the view models both renderers draw from.
//!
//! Nothing in here touches a terminal. Renderers implement [`DashboardView`] and turn
//! [`ResultTables`], [`DetailPanel`] and [`ChartPanel`] into pixels or text.

pub mod chart;
pub mod detail;
pub mod table;

pub use chart::{ChartPanel, ChartSeries, ChartState, PlotData};
pub use detail::{DetailLine, DetailPanel, DetailSection, Tone};
pub use table::{ResultTables, TableRow, COLUMNS};

use crate::client::FetchError;
use crate::domain::contract::DefaultStocks;
use crate::domain::{Buckets, StockAnalysis, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Info,
    Error,
}

/// Dismissible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            message: message.into(),
        }
    }

    pub fn fetch_failed(what: &str, err: &FetchError) -> Self {
        Self::error(format!("Failed to {what}: {err}"))
    }

    pub fn is_error(&self) -> bool {
        self.level == BannerLevel::Error
    }
}

pub trait DashboardView {
    /// Replaces all three result tables. Never appends.
    fn render_tables(&mut self, buckets: &Buckets);

    fn render_watchlist(&mut self, watchlist: &[Ticker], defaults: &DefaultStocks);

    fn render_detail(&mut self, stock: &StockAnalysis);

    fn render_chart(&mut self, series: &ChartSeries);

    fn close_detail(&mut self);

    fn show_banner(&mut self, banner: Banner);

    fn set_busy(&mut self, _busy: bool) {}
}
