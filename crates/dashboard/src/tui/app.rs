use crossterm::event::KeyCode;
use ratatui::widgets::{ListState, TableState};
use stockpick_core::domain::contract::DefaultStocks;
use stockpick_core::domain::{Buckets, RecommendationBucket, StockAnalysis, Ticker};
use stockpick_core::pipeline::RefreshStage;
use stockpick_core::view::{Banner, ChartPanel, ChartSeries, DashboardView, DetailPanel, ResultTables};

/// Everything the terminal currently shows. Rebuilt from scratch on every render call.
#[derive(Debug, Default)]
pub struct TuiView {
    pub tables: ResultTables,
    pub watchlist: Vec<Ticker>,
    pub index_funds: Vec<Ticker>,
    pub detail: Option<DetailPanel>,
    pub chart: ChartPanel,
    pub banner: Option<Banner>,
    pub busy: bool,
}

impl DashboardView for TuiView {
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

    /// Only the latest banner is kept.
    fn show_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tables,
    Watchlist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddTicker(String),
    ConfirmRemove(Ticker),
    /// Waiting for the analysis of this ticker to arrive.
    LoadingDetail(Ticker),
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    Add(String),
    Remove(Ticker),
    OpenDetail(Ticker),
}

pub struct App {
    pub view: TuiView,
    pub mode: InputMode,
    pub active: RecommendationBucket,
    pub focus: Focus,
    pub table_state: TableState,
    pub watchlist_state: ListState,
    pub stage: RefreshStage,
    pub last_refreshed: Option<chrono::DateTime<chrono::Local>>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            view: TuiView::default(),
            mode: InputMode::Normal,
            active: RecommendationBucket::All,
            focus: Focus::Tables,
            table_state: TableState::default().with_selected(Some(0)),
            watchlist_state: ListState::default().with_selected(Some(0)),
            stage: RefreshStage::Idle,
            last_refreshed: None,
        }
    }
}

impl App {
    pub fn switch_table(&mut self, bucket: RecommendationBucket) {
        self.active = bucket;
        self.focus = Focus::Tables;
        self.table_state.select(Some(0));
    }

    fn next_table(&mut self) {
        let idx = RecommendationBucket::ALL
            .iter()
            .position(|b| *b == self.active)
            .unwrap_or(0);
        self.switch_table(RecommendationBucket::ALL[(idx + 1) % RecommendationBucket::ALL.len()]);
    }

    fn move_selection(&mut self, delta: isize) {
        let (len, selected) = match self.focus {
            Focus::Tables => (self.view.tables.rows(self.active).len(), self.table_state.selected()),
            Focus::Watchlist => (self.view.watchlist.len(), self.watchlist_state.selected()),
        };
        if len == 0 {
            return;
        }
        let current = selected.unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        match self.focus {
            Focus::Tables => self.table_state.select(Some(next)),
            Focus::Watchlist => self.watchlist_state.select(Some(next)),
        }
    }

    pub fn selected_row_ticker(&self) -> Option<Ticker> {
        let rows = self.view.tables.rows(self.active);
        let row = rows.get(self.table_state.selected()?)?;
        Ticker::parse(&row.ticker).ok()
    }

    pub fn selected_watchlist_ticker(&self) -> Option<Ticker> {
        self.view.watchlist.get(self.watchlist_state.selected()?).cloned()
    }

    fn selected_ticker(&self) -> Option<Ticker> {
        match self.focus {
            Focus::Tables => self.selected_row_ticker(),
            Focus::Watchlist => self.selected_watchlist_ticker(),
        }
    }

    /// Keeps selections inside the (possibly shrunk) lists after a refresh.
    pub fn clamp_selection(&mut self) {
        let rows = self.view.tables.rows(self.active).len();
        self.table_state.select(clamped(self.table_state.selected(), rows));
        let items = self.view.watchlist.len();
        self.watchlist_state.select(clamped(self.watchlist_state.selected(), items));
    }

    pub fn on_key(&mut self, key: KeyCode) -> Action {
        match &mut self.mode {
            InputMode::Normal => self.on_normal_key(key),
            InputMode::AddTicker(input) => match key {
                KeyCode::Enter => {
                    let input = std::mem::take(input);
                    self.mode = InputMode::Normal;
                    Action::Add(input)
                }
                KeyCode::Esc => {
                    self.mode = InputMode::Normal;
                    Action::None
                }
                KeyCode::Backspace => {
                    input.pop();
                    Action::None
                }
                KeyCode::Char(c) => {
                    input.push(c.to_ascii_uppercase());
                    Action::None
                }
                _ => Action::None,
            },
            InputMode::ConfirmRemove(ticker) => {
                let ticker = ticker.clone();
                self.mode = InputMode::Normal;
                match key {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Action::Remove(ticker),
                    _ => Action::None,
                }
            }
            InputMode::LoadingDetail(_) | InputMode::Detail => match key {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.mode = InputMode::Normal;
                    self.view.close_detail();
                    Action::None
                }
                _ => Action::None,
            },
        }
    }

    fn on_normal_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Tab => {
                self.next_table();
                Action::None
            }
            KeyCode::Char('1') => {
                self.switch_table(RecommendationBucket::All);
                Action::None
            }
            KeyCode::Char('2') => {
                self.switch_table(RecommendationBucket::LongTerm);
                Action::None
            }
            KeyCode::Char('3') => {
                self.switch_table(RecommendationBucket::ShortTerm);
                Action::None
            }
            KeyCode::Left => {
                self.focus = Focus::Tables;
                Action::None
            }
            KeyCode::Right | KeyCode::Char('w') => {
                self.focus = Focus::Watchlist;
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Action::None
            }
            KeyCode::Enter => match self.selected_ticker() {
                Some(ticker) => {
                    self.mode = InputMode::LoadingDetail(ticker.clone());
                    Action::OpenDetail(ticker)
                }
                None => Action::None,
            },
            KeyCode::Char('a') => {
                self.mode = InputMode::AddTicker(String::new());
                Action::None
            }
            KeyCode::Char('d') => {
                if let Some(ticker) = self.selected_ticker() {
                    self.mode = InputMode::ConfirmRemove(ticker);
                }
                Action::None
            }
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('x') | KeyCode::Esc => {
                self.view.banner = None;
                Action::None
            }
            _ => Action::None,
        }
    }

    /// A detail result only lands if the user is still waiting for that ticker.
    pub fn accepts_detail(&self, ticker: &str) -> bool {
        matches!(&self.mode, InputMode::LoadingDetail(t) if t.as_str() == ticker)
    }
}

fn clamped(selected: Option<usize>, len: usize) -> Option<usize> {
    match (selected, len) {
        (_, 0) => None,
        (None, _) => Some(0),
        (Some(i), len) => Some(i.min(len - 1)),
    }
}
