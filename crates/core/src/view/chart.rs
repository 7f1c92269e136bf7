use crate::domain::PricePoint;
use chrono::NaiveDate;

/// Closing prices in ascending date order. Points without a usable date or price are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub ticker: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl ChartSeries {
    pub fn from_history(ticker: &str, history: &[PricePoint]) -> Self {
        let mut points: Vec<(NaiveDate, f64)> = history
            .iter()
            .filter_map(|p| Some((p.parsed_date()?, p.close.filter(|c| c.is_finite())?)))
            .collect();
        points.sort_by_key(|(date, _)| *date);

        Self {
            ticker: ticker.to_string(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, c)| *c)
    }
}

/// Ready-to-draw line data: x is days since the first point.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub ticker: String,
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub low: f64,
    pub high: f64,
    pub last: f64,
}

impl PlotData {
    fn build(series: &ChartSeries) -> Option<Self> {
        let (start, _) = *series.points.first()?;
        let (end, last) = *series.points.last()?;

        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|(d, c)| ((*d - start).num_days() as f64, *c))
            .collect();

        let low = series.closes().fold(f64::INFINITY, f64::min);
        let high = series.closes().fold(f64::NEG_INFINITY, f64::max);
        let pad = if high > low { (high - low) * 0.05 } else { low.abs().max(1.0) * 0.02 };
        let span = (end - start).num_days().max(1) as f64;

        Some(Self {
            ticker: series.ticker.clone(),
            points,
            x_bounds: [0.0, span],
            y_bounds: [low - pad, high + pad],
            start,
            end,
            low,
            high,
            last,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChartState {
    #[default]
    Unmounted,
    /// Detail is open but there is no price history to draw.
    Placeholder { ticker: String },
    Plot(PlotData),
}

/// Owner of the single price chart in the detail view.
///
/// `mount` always tears down the previous chart first, so at most one chart exists.
#[derive(Debug, Default)]
pub struct ChartPanel {
    state: ChartState,
}

impl ChartPanel {
    pub fn mount(&mut self, series: &ChartSeries) {
        self.unmount();
        self.state = match PlotData::build(series) {
            Some(plot) => ChartState::Plot(plot),
            None => ChartState::Placeholder {
                ticker: series.ticker.clone(),
            },
        };
        tracing::debug!(ticker = %series.ticker, points = series.points.len(), "chart mounted");
    }

    /// Returns whether a chart was actually torn down.
    pub fn unmount(&mut self) -> bool {
        let was_mounted = self.is_mounted();
        if was_mounted {
            tracing::debug!("chart unmounted");
        }
        self.state = ChartState::Unmounted;
        was_mounted
    }

    pub fn is_mounted(&self) -> bool {
        !matches!(self.state, ChartState::Unmounted)
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }
}
