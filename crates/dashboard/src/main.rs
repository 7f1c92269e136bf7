use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use stockpick_core::client::HttpStockApi;
use stockpick_core::config::Settings;
use stockpick_core::dashboard::Dashboard;
use stockpick_core::domain::Ticker;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod text;
mod tui;

use text::TextView;

#[derive(Debug, Parser)]
#[command(name = "stockpick", about = "Watchlist and stock pick dashboard for the analysis backend")]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:5002/api. Overrides STOCKPICK_API_BASE_URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive dashboard (default).
    Tui,
    /// Analyze everything once and print the three pick tables.
    Report,
    /// Add a ticker to the watchlist, then print the refreshed tables.
    Add { ticker: String },
    /// Remove a ticker from the watchlist.
    Remove {
        ticker: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the full analysis of one ticker.
    Show { ticker: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Tui);

    let settings = Settings::from_env()?.with_api_base_url(args.api_base_url);
    let _sentry_guard = init_sentry(&settings);
    init_tracing(&settings, matches!(command, Command::Tui))?;

    let api = Arc::new(HttpStockApi::from_settings(&settings)?);
    tracing::info!(base_url = api.base_url(), "using analysis backend");

    let result = match command {
        Command::Tui => tui::run(api).await,
        Command::Report => report(api).await,
        Command::Add { ticker } => add(api, &ticker).await,
        Command::Remove { ticker, yes } => remove(api, &ticker, yes).await,
        Command::Show { ticker } => show(api, &ticker).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "command failed");
    }
    result
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

/// The TUI owns stdout, so its logs go to `STOCKPICK_LOG_FILE` or nowhere.
fn init_tracing(settings: &Settings, tui: bool) -> anyhow::Result<()> {
    let (writer, ansi) = match settings.log_file.as_deref() {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {path}"))?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
        None if tui => (BoxMakeWriter::new(io::sink), false),
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(ansi))
        .with(sentry_tracing::layer())
        .init();
    Ok(())
}

async fn report(api: Arc<HttpStockApi>) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(api, TextView::default());
    dashboard.refresh().await;
    print!("{}", dashboard.view().report());

    if dashboard.view().has_errors() {
        anyhow::bail!("refresh completed with errors");
    }
    Ok(())
}

async fn add(api: Arc<HttpStockApi>, input: &str) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(api, TextView::default());
    match dashboard.add_ticker(input).await {
        Ok(_) => {
            print!("{}", dashboard.view().report());
            Ok(())
        }
        Err(err) => {
            eprint!("{}", dashboard.view().banners());
            Err(err).context("add to watchlist")
        }
    }
}

async fn remove(api: Arc<HttpStockApi>, input: &str, yes: bool) -> anyhow::Result<()> {
    let ticker = Ticker::parse(input)?;
    if !yes && !confirm(&format!("Remove {ticker} from your watchlist? [y/N] "))? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut dashboard = Dashboard::new(api, TextView::default());
    match dashboard.remove_ticker(&ticker).await {
        Ok(()) => {
            print!("{}", dashboard.view().report());
            Ok(())
        }
        Err(err) => {
            eprint!("{}", dashboard.view().banners());
            Err(err).context("remove from watchlist")
        }
    }
}

async fn show(api: Arc<HttpStockApi>, input: &str) -> anyhow::Result<()> {
    let ticker = Ticker::parse(input)?;
    let mut dashboard = Dashboard::new(api, TextView::default());
    let stock = dashboard.open_detail(&ticker).await;
    print!("{}", dashboard.view().detail());
    dashboard.close_detail();

    if let Some(err) = stock.error {
        anyhow::bail!("analysis of {ticker} failed: {err}");
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_defaults_to_tui() {
        let args = Args::try_parse_from(["stockpick"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.api_base_url.is_none());
    }

    #[test]
    fn remove_takes_yes_flag_and_global_url() {
        let args = Args::try_parse_from([
            "stockpick",
            "remove",
            "aapl",
            "--yes",
            "--api-base-url",
            "http://10.0.0.2:5002/api",
        ])
        .unwrap();
        assert_eq!(args.api_base_url.as_deref(), Some("http://10.0.0.2:5002/api"));
        match args.command {
            Some(Command::Remove { ticker, yes }) => {
                assert_eq!(ticker, "aapl");
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_requires_a_ticker() {
        assert!(Args::try_parse_from(["stockpick", "add"]).is_err());
    }
}
