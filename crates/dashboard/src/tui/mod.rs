//! Full-screen terminal dashboard.
//!
//! Network work runs on tokio tasks and terminal input on a plain thread; both report back
//! over one mpsc channel, so the draw loop only ever awaits that channel.

mod app;
mod ui;

use anyhow::Context;
use app::{Action, App, InputMode};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use stockpick_core::client::StockApi;
use stockpick_core::dashboard::{self, ActionError};
use stockpick_core::domain::{StockAnalysis, Ticker};
use stockpick_core::pipeline::{Pipeline, RefreshReport};
use stockpick_core::view::{Banner, DashboardView};
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

enum AppEvent {
    Key(KeyCode),
    /// No input within one tick; redraw so the stage indicator stays live.
    Tick,
    InputFailed(io::Error),
    Refreshed(RefreshReport),
    Added(Result<(Ticker, String), ActionError>),
    Removed(Ticker, Result<String, ActionError>),
    Detail(StockAnalysis),
}

struct Runner<A: ?Sized> {
    pipeline: Pipeline<A>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl<A: StockApi + ?Sized + 'static> Runner<A> {
    fn start_refresh(&self, app: &mut App) {
        app.view.set_busy(true);
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let report = pipeline.refresh().await;
            let _ = tx.send(AppEvent::Refreshed(report));
        });
    }

    fn start_add(&self, input: String) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = dashboard::submit_add(pipeline.api().as_ref(), &input).await;
            let _ = tx.send(AppEvent::Added(result));
        });
    }

    fn start_remove(&self, ticker: Ticker) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = dashboard::submit_remove(pipeline.api().as_ref(), &ticker).await;
            let _ = tx.send(AppEvent::Removed(ticker, result));
        });
    }

    fn start_detail(&self, ticker: Ticker) {
        let pipeline = self.pipeline.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let stock = pipeline.api().get_stock_analysis(&ticker).await;
            let _ = tx.send(AppEvent::Detail(stock));
        });
    }

    fn dispatch(&self, app: &mut App, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Refresh => {
                if !app.view.busy {
                    self.start_refresh(app);
                }
            }
            Action::Add(input) => self.start_add(input),
            Action::Remove(ticker) => self.start_remove(ticker),
            Action::OpenDetail(ticker) => self.start_detail(ticker),
            Action::None => {}
        }
        true
    }

    /// Returns `Ok(false)` once the user asks to quit.
    fn handle(&self, app: &mut App, event: AppEvent) -> anyhow::Result<bool> {
        match event {
            AppEvent::Key(code) => {
                let action = app.on_key(code);
                return Ok(self.dispatch(app, action));
            }
            AppEvent::Tick => {}
            AppEvent::InputFailed(err) => return Err(err).context("read terminal input"),
            AppEvent::Refreshed(report) => {
                if dashboard::apply_refresh(&self.pipeline, &mut app.view, &report) {
                    app.last_refreshed = Some(chrono::Local::now());
                    app.clamp_selection();
                }
            }
            AppEvent::Added(Ok((_, message))) | AppEvent::Removed(_, Ok(message)) => {
                app.view.show_banner(Banner::info(message));
                self.start_refresh(app);
            }
            AppEvent::Added(Err(err)) => {
                tracing::warn!(error = %err, "add to watchlist failed");
                app.view.show_banner(err.banner("add stock"));
            }
            AppEvent::Removed(ticker, Err(err)) => {
                tracing::warn!(%ticker, error = %err, "remove from watchlist failed");
                app.view.show_banner(err.banner("remove stock"));
            }
            AppEvent::Detail(stock) => {
                if app.accepts_detail(&stock.ticker) {
                    dashboard::apply_detail(&mut app.view, &stock);
                    app.mode = InputMode::Detail;
                } else {
                    tracing::debug!(ticker = %stock.ticker, "detail closed before analysis arrived");
                }
            }
        }
        Ok(true)
    }
}

/// Blocking crossterm reads live on their own thread. It exits once the receiver is gone.
fn spawn_input(tx: mpsc::UnboundedSender<AppEvent>) {
    thread::spawn(move || loop {
        let event = match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key.code),
                Ok(_) => continue,
                Err(err) => AppEvent::InputFailed(err),
            },
            Ok(false) => AppEvent::Tick,
            Err(err) => AppEvent::InputFailed(err),
        };
        let failed = matches!(event, AppEvent::InputFailed(_));
        if tx.send(event).is_err() || failed {
            return;
        }
    });
}

pub async fn run<A: StockApi + ?Sized + 'static>(api: Arc<A>) -> anyhow::Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B, A>(terminal: &mut Terminal<B>, api: Arc<A>) -> anyhow::Result<()>
where
    B: ratatui::backend::Backend,
    A: StockApi + ?Sized + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input(tx.clone());
    let runner = Runner {
        pipeline: Pipeline::new(api),
        tx,
    };
    let stage = runner.pipeline.subscribe();
    let mut app = App::default();

    runner.start_refresh(&mut app);
    terminal.draw(|f| ui::draw(f, &mut app))?;

    while let Some(event) = rx.recv().await {
        if !runner.handle(&mut app, event)? {
            tracing::info!("quit");
            return Ok(());
        }
        app.stage = *stage.borrow();
        terminal.draw(|f| ui::draw(f, &mut app))?;
    }
    Ok(())
}
