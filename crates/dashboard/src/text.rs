//! Plain-text renderer for the one-shot subcommands.

use stockpick_core::domain::contract::DefaultStocks;
use stockpick_core::domain::{Buckets, RecommendationBucket, StockAnalysis, Ticker};
use stockpick_core::format;
use stockpick_core::view::{
    Banner, ChartPanel, ChartSeries, ChartState, DashboardView, DetailPanel, PlotData, ResultTables, TableRow,
    COLUMNS,
};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 60;

#[derive(Debug, Default)]
pub struct TextView {
    tables: ResultTables,
    watchlist: Vec<Ticker>,
    index_funds: Vec<Ticker>,
    banners: Vec<Banner>,
    detail: Option<DetailPanel>,
    chart: ChartPanel,
}

impl DashboardView for TextView {
    fn render_tables(&mut self, buckets: &Buckets) {
        self.tables = ResultTables::from_buckets(buckets);
    }

    fn render_watchlist(&mut self, watchlist: &[Ticker], defaults: &DefaultStocks) {
        self.watchlist = watchlist.to_vec();
        self.index_funds = defaults.index_fund_tickers();
    }

    fn render_detail(&mut self, stock: &StockAnalysis) {
        self.detail = Some(DetailPanel::from_analysis(stock));
    }

    fn render_chart(&mut self, series: &ChartSeries) {
        self.chart.mount(series);
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.chart.unmount();
    }

    fn show_banner(&mut self, banner: Banner) {
        self.banners.push(banner);
    }
}

impl TextView {
    pub fn has_errors(&self) -> bool {
        self.banners.iter().any(Banner::is_error)
    }

    pub fn banners(&self) -> String {
        let mut out = String::new();
        for b in &self.banners {
            let tag = if b.is_error() { "error" } else { "info" };
            out.push_str(&format!("[{tag}] {}\n", b.message));
        }
        out
    }

    pub fn report(&self) -> String {
        let mut out = self.banners();
        if !out.is_empty() {
            out.push('\n');
        }

        let watchlist = if self.watchlist.is_empty() {
            "(empty)".to_string()
        } else {
            self.watchlist.iter().map(Ticker::as_str).collect::<Vec<_>>().join(", ")
        };
        out.push_str(&format!("Watchlist: {watchlist}\n"));
        if !self.index_funds.is_empty() {
            let funds: Vec<&str> = self.index_funds.iter().map(Ticker::as_str).collect();
            out.push_str(&format!("Index funds: {}\n", funds.join(", ")));
        }

        for bucket in RecommendationBucket::ALL {
            out.push('\n');
            out.push_str(&format!("== {} ==\n", bucket.title()));
            let rows = self.tables.rows(bucket);
            if rows.is_empty() {
                out.push_str(bucket.empty_message());
                out.push('\n');
            } else {
                out.push_str(&table(rows));
            }
        }
        out
    }

    pub fn detail(&self) -> String {
        let Some(panel) = &self.detail else {
            return String::new();
        };

        let mut out = format!("{}\n", panel.title);
        if let Some(err) = &panel.error {
            out.push_str(&format!("Error: {err}\n"));
        }

        let width = panel
            .sections
            .iter()
            .flat_map(|s| s.lines.iter())
            .map(|l| l.label.len())
            .max()
            .unwrap_or(0);
        for section in &panel.sections {
            out.push_str(&format!("\n[{}]\n", section.title));
            for line in &section.lines {
                out.push_str(&format!("  {:<width$}  {}\n", line.label, line.value));
            }
        }

        if !panel.reasons.is_empty() {
            out.push_str("\n[Reasons]\n");
            for r in &panel.reasons {
                out.push_str(&format!("  - {r}\n"));
            }
        }
        out.push_str(&format!("\n[Business Summary]\n  {}\n", panel.summary));
        if !panel.warnings.is_empty() {
            out.push_str("\n[Warnings]\n");
            for w in &panel.warnings {
                out.push_str(&format!("  - {w}\n"));
            }
        }

        out.push_str("\n[Price History]\n");
        out.push_str(&chart(self.chart.state()));
        out
    }
}

fn table(rows: &[TableRow]) -> String {
    let mut widths = COLUMNS.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 6]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(COLUMNS);
    for row in rows {
        out.push_str(&line(row.cells()));
    }
    out
}

fn chart(state: &ChartState) -> String {
    match state {
        ChartState::Unmounted => String::new(),
        ChartState::Placeholder { .. } => "  No historical data available\n".to_string(),
        ChartState::Plot(plot) => format!(
            "  {} to {} ({} points)  low {}  high {}  last {}\n  {}\n",
            plot.start,
            plot.end,
            plot.points.len(),
            format::format_price(Some(plot.low)),
            format::format_price(Some(plot.high)),
            format::format_price(Some(plot.last)),
            sparkline(plot)
        ),
    }
}

fn sparkline(plot: &PlotData) -> String {
    let skip = plot.points.len().saturating_sub(SPARK_WIDTH);
    let range = plot.high - plot.low;
    plot.points
        .iter()
        .skip(skip)
        .map(|(_, y)| {
            if range <= 0.0 {
                return SPARK[SPARK.len() / 2];
            }
            let idx = ((y - plot.low) / range * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}
