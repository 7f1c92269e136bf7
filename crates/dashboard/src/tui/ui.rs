use super::app::{App, Focus, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use stockpick_core::domain::RecommendationBucket;
use stockpick_core::format::{self, ScoreTier, Tier};
use stockpick_core::view::{BannerLevel, ChartState, DetailPanel, PlotData, TableRow, Tone, COLUMNS};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(if app.view.banner.is_some() { 3 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(24)])
        .split(chunks[1]);

    render_tabs(f, app, chunks[0]);
    render_table(f, app, body[0]);
    render_watchlist(f, app, body[1]);
    render_banner(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    match &app.mode {
        InputMode::AddTicker(input) => render_add_dialog(f, input),
        InputMode::ConfirmRemove(ticker) => render_remove_dialog(f, ticker.as_str()),
        InputMode::LoadingDetail(ticker) => render_loading(f, ticker.as_str()),
        InputMode::Detail => render_detail(f, app),
        InputMode::Normal => {}
    }
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Positive => Color::Green,
        Tier::Negative => Color::Red,
        Tier::Neutral => Color::Yellow,
        Tier::Unknown => Color::Gray,
    }
}

fn score_color(tier: ScoreTier) -> Color {
    match tier {
        ScoreTier::StrongPositive => Color::LightGreen,
        ScoreTier::Positive => Color::Green,
        ScoreTier::Neutral => Color::Yellow,
        ScoreTier::Negative => Color::Red,
        ScoreTier::StrongNegative => Color::LightRed,
        ScoreTier::Unknown => Color::Gray,
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Plain => Style::default(),
        Tone::Tier(t) => Style::default().fg(tier_color(t)),
        Tone::Score(s) => Style::default().fg(score_color(s)).bold(),
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = RecommendationBucket::ALL
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let count = app.view.tables.rows(*b).len();
            Line::from(format!(" {}:{} ({count}) ", i + 1, b.title()))
        })
        .collect();
    let selected = RecommendationBucket::ALL
        .iter()
        .position(|b| *b == app.active)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title(" Stock Picks "))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn table_row(row: &TableRow) -> Row<'static> {
    let base = if row.is_error {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(row.ticker.clone()).style(base.bold()),
        Cell::from(row.company.clone()).style(base),
        Cell::from(row.price.clone()).style(base),
        Cell::from(row.change.clone()).style(Style::default().fg(tier_color(row.change_tier))),
        Cell::from(row.score.clone()).style(Style::default().fg(score_color(row.score_tier)).bold()),
        Cell::from(row.suggestion.clone()).style(Style::default().fg(tier_color(row.suggestion_tier))),
    ])
}

fn render_table(f: &mut Frame, app: &mut App, area: Rect) {
    let border = if app.focus == Focus::Tables { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.active.title()))
        .border_style(Style::default().fg(border));

    let rows = app.view.tables.rows(app.active);
    if rows.is_empty() {
        let text = if app.view.busy { "Loading..." } else { app.active.empty_message() };
        let empty = Paragraph::new(format!("  {text}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(COLUMNS.to_vec())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);
    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(16),
    ];
    let table = Table::new(rows.iter().map(table_row).collect::<Vec<_>>(), widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_watchlist(f: &mut Frame, app: &mut App, area: Rect) {
    let border = if app.focus == Focus::Watchlist { Color::Cyan } else { Color::DarkGray };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(app.view.index_funds.len() as u16 + 2)])
        .split(area);

    let items: Vec<ListItem> = if app.view.watchlist.is_empty() {
        vec![ListItem::new("(empty)").style(Style::default().fg(Color::DarkGray))]
    } else {
        app.view
            .watchlist
            .iter()
            .map(|t| ListItem::new(format!("{t}  [d]")))
            .collect()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Watchlist ")
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut app.watchlist_state);

    if !app.view.index_funds.is_empty() {
        let funds: Vec<Line> = app.view.index_funds.iter().map(|t| Line::from(t.as_str())).collect();
        let para = Paragraph::new(funds)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title(" Index Funds "));
        f.render_widget(para, chunks[1]);
    }
}

fn render_banner(f: &mut Frame, app: &App, area: Rect) {
    let Some(banner) = &app.view.banner else {
        return;
    };
    let (color, title) = match banner.level {
        BannerLevel::Info => (Color::Green, " Info "),
        BannerLevel::Error => (Color::Red, " Error "),
    };
    let para = Paragraph::new(format!(" {}  (x to dismiss)", banner.message))
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(title).border_style(Style::default().fg(color)));
    f.render_widget(para, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let status = if app.view.busy || app.stage.is_busy() {
        Span::styled(format!(" {}... ", app.stage.label()), Style::default().fg(Color::Yellow))
    } else {
        match app.last_refreshed {
            Some(at) => Span::styled(format!(" Updated {} ", at.format("%H:%M:%S")), Style::default().fg(Color::DarkGray)),
            None => Span::raw(" "),
        }
    };
    let help = Span::styled(
        "q quit | Tab/1-3 table | ←/→ focus | ↑/↓ select | Enter detail | a add | d remove | r analyze all",
        Style::default().fg(Color::DarkGray),
    );
    f.render_widget(Paragraph::new(Line::from(vec![status, help])), area);
}

fn render_add_dialog(f: &mut Frame, input: &str) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Ticker: "),
            Span::styled(format!("{input}█"), Style::default().fg(Color::Yellow).bold()),
        ]),
        Line::from(""),
        Line::from("  Enter=Add, Esc=Cancel").style(Style::default().fg(Color::DarkGray)),
    ];
    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add to Watchlist ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(para, area);
}

fn render_remove_dialog(f: &mut Frame, ticker: &str) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(format!("  Remove {ticker} from your watchlist?")),
        Line::from(""),
        Line::from("  Press Y to confirm, any key to cancel").style(Style::default().fg(Color::DarkGray)),
    ];
    let para = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Remove ")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(para, area);
}

fn render_loading(f: &mut Frame, ticker: &str) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);
    let para = Paragraph::new(format!("\n  Analyzing {ticker}..."))
        .block(Block::default().borders(Borders::ALL).title(" Detail "));
    f.render_widget(para, area);
}

fn detail_lines(panel: &DetailPanel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(err) = &panel.error {
        lines.push(Line::from(format!(" Error: {err}")).style(Style::default().fg(Color::Red).bold()));
        lines.push(Line::from(""));
    }

    for section in &panel.sections {
        lines.push(Line::from(format!(" {}", section.title)).style(Style::default().fg(Color::Yellow).bold()));
        for l in &section.lines {
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<18}", l.label), Style::default().fg(Color::Gray)),
                Span::styled(l.value.clone(), tone_style(l.tone)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if !panel.reasons.is_empty() {
        lines.push(Line::from(" Reasons").style(Style::default().fg(Color::Yellow).bold()));
        for r in &panel.reasons {
            lines.push(Line::from(format!("   - {r}")));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(" Business Summary").style(Style::default().fg(Color::Yellow).bold()));
    lines.push(Line::from(format!("   {}", panel.summary)));

    if !panel.warnings.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(" Warnings").style(Style::default().fg(Color::Yellow).bold()));
        for w in &panel.warnings {
            lines.push(Line::from(format!("   - {w}")).style(Style::default().fg(Color::DarkGray)));
        }
    }
    lines
}

fn render_detail(f: &mut Frame, app: &App) {
    let area = centered_rect(90, 90, f.area());
    f.render_widget(Clear, area);

    let Some(panel) = &app.view.detail else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", panel.title))
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .margin(1)
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(chunks[1]);

    let info = Paragraph::new(detail_lines(panel)).wrap(Wrap { trim: false });
    f.render_widget(info, chunks[0]);

    render_chart(f, app.view.chart.state(), right[0]);

    let footer = Paragraph::new("  Press Esc or Enter to close").style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, right[1]);
}

fn render_chart(f: &mut Frame, state: &ChartState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Price History ");
    match state {
        ChartState::Plot(plot) => f.render_widget(price_chart(plot, block), area),
        ChartState::Placeholder { .. } | ChartState::Unmounted => {
            let no_data = Paragraph::new("  No historical data available")
                .block(block)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(no_data, area);
        }
    }
}

fn price_chart<'a>(plot: &'a PlotData, block: Block<'a>) -> Chart<'a> {
    let color = if plot.last >= plot.points.first().map(|(_, y)| *y).unwrap_or(plot.last) {
        Color::Green
    } else {
        Color::Red
    };

    let datasets = vec![Dataset::default()
        .name(plot.ticker.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&plot.points)];

    Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(plot.x_bounds)
                .labels(vec![
                    Span::raw(plot.start.format("%Y-%m-%d").to_string()),
                    Span::raw(plot.end.format("%Y-%m-%d").to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(plot.y_bounds)
                .labels(vec![
                    Span::raw(format::format_price(Some(plot.y_bounds[0]))),
                    Span::raw(format::format_price(Some(plot.y_bounds[1]))),
                ]),
        )
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
