use crate::domain::StockAnalysis;
use crate::format::{self, ScoreTier, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Tier(Tier),
    Score(ScoreTier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSection {
    pub title: &'static str,
    pub lines: Vec<DetailLine>,
}

/// Every field of one analysis, formatted and grouped for the detail modal.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub ticker: String,
    pub title: String,
    pub error: Option<String>,
    pub sections: Vec<DetailSection>,
    pub reasons: Vec<String>,
    pub summary: String,
    pub warnings: Vec<String>,
}

fn line(label: &'static str, value: String) -> DetailLine {
    DetailLine {
        label,
        value,
        tone: Tone::Plain,
    }
}

fn toned(label: &'static str, value: String, tone: Tone) -> DetailLine {
    DetailLine { label, value, tone }
}

fn range(low: Option<f64>, high: Option<f64>) -> String {
    match (low, high) {
        (None, None) => format::NA.to_string(),
        _ => format!("{} - {}", format::format_price(low), format::format_price(high)),
    }
}

/// Backend reasons use markdown emphasis; the terminal has no use for it.
fn clean_reason(reason: &str) -> String {
    reason.replace("**", "").trim().to_string()
}

impl DetailPanel {
    pub fn from_analysis(a: &StockAnalysis) -> Self {
        let direction = format::classify_price_direction(a.percent_change);
        let change = match (a.price_change, a.percent_change) {
            (None, None) => format::NA.to_string(),
            (abs, pct) => format!(
                "{} ({})",
                format::format_price(abs),
                format::format_percent_change(pct)
            ),
        };

        let price = DetailSection {
            title: "Price",
            lines: vec![
                toned("Current Price", format::format_price(a.current_price), Tone::Tier(direction)),
                toned("Change", change, Tone::Tier(direction)),
                line("Open", format::format_price(a.open_price)),
                line("Previous Close", format::format_price(a.previous_close)),
                line("Day Range", range(a.day_low, a.day_high)),
                line("52-Week Range", range(a.week52_low, a.week52_high)),
                line("Volume", format::format_number(a.volume)),
                line("Market Cap", format::format_market_cap(a.market_cap)),
                line("Currency", format::format_text(a.currency.as_deref())),
            ],
        };

        let company = DetailSection {
            title: "Company",
            lines: vec![
                line("Sector", format::format_text(a.sector.as_deref())),
                line("Industry", format::format_text(a.industry.as_deref())),
                line("Employees", format::format_number(a.full_time_employees)),
                line("Website", format::format_text(a.weburl.as_deref())),
                line("IPO Date", format::format_text(a.ipo.as_deref())),
            ],
        };

        let valuation = DetailSection {
            title: "Valuation",
            lines: vec![
                line("P/E Ratio", format::format_ratio(a.pe_ratio)),
                line("Forward P/E", format::format_ratio(a.forward_pe)),
                line("Dividend Yield", format::format_fraction_percent(a.dividend_yield)),
                line("Ex-Dividend Date", format::format_text(a.ex_dividend_date.as_deref())),
                line("Beta", format::format_ratio(a.beta)),
            ],
        };

        let upside_tier = format::classify_price_direction(a.analyst_upside);
        let analysts = DetailSection {
            title: "Analysts",
            lines: vec![
                line("Recommendation", format::format_text(a.analyst_recommendation.as_deref())),
                line("Target Price", format::format_price(a.analyst_target_price)),
                toned("Upside", format::format_fraction_percent(a.analyst_upside), Tone::Tier(upside_tier)),
            ],
        };

        let mut score_lines = vec![
            toned(
                "Overall Score",
                format::format_score(a.overall_score),
                Tone::Score(format::classify_score(a.overall_score)),
            ),
            toned(
                "Suggestion",
                a.suggestion.label().to_string(),
                Tone::Tier(format::classify_suggestion(&a.suggestion)),
            ),
        ];
        for (label, value) in a.score_breakdown.entries() {
            score_lines.push(toned(
                label,
                format::format_score(value),
                Tone::Score(format::classify_score(value)),
            ));
        }
        let scores = DetailSection {
            title: "Scores",
            lines: score_lines,
        };

        let title = match a.company_name.as_deref() {
            Some(name) => format!("{} - {}", a.ticker, name),
            None => a.ticker.clone(),
        };

        Self {
            ticker: a.ticker.clone(),
            title,
            error: a.error.clone(),
            sections: vec![price, company, valuation, analysts, scores],
            reasons: a.reasons.iter().map(|r| clean_reason(r)).collect(),
            summary: format::format_text(a.business_summary.as_deref()),
            warnings: a.warnings.clone(),
        }
    }

    pub fn section(&self, title: &str) -> Option<&DetailSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn value(&self, section: &str, label: &str) -> Option<&str> {
        self.section(section)?
            .lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Suggestion, Ticker};

    #[test]
    fn formats_every_group() {
        let mut a = StockAnalysis {
            ticker: "MSFT".to_string(),
            company_name: Some("Microsoft".to_string()),
            current_price: Some(410.25),
            price_change: Some(-2.5),
            percent_change: Some(-0.61),
            day_low: Some(405.0),
            day_high: Some(412.0),
            volume: Some(21_500_000.0),
            market_cap: Some(3.05e12),
            dividend_yield: Some(0.0072),
            analyst_upside: Some(0.1),
            overall_score: Some(68.0),
            suggestion: Suggestion::Hold,
            reasons: vec!["**Overall Recommendation: Hold** - balanced".to_string()],
            ..Default::default()
        };
        a.score_breakdown.technical_analysis = Some(90.0);

        let panel = DetailPanel::from_analysis(&a);
        assert_eq!(panel.title, "MSFT - Microsoft");
        assert_eq!(panel.value("Price", "Change"), Some("-$2.50 (-0.61%)"));
        assert_eq!(panel.value("Price", "Day Range"), Some("$405.00 - $412.00"));
        assert_eq!(panel.value("Price", "Volume"), Some("21,500,000"));
        assert_eq!(panel.value("Price", "Market Cap"), Some("$3.05T"));
        assert_eq!(panel.value("Valuation", "Dividend Yield"), Some("0.72%"));
        assert_eq!(panel.value("Valuation", "Beta"), Some("N/A"));
        assert_eq!(panel.value("Analysts", "Upside"), Some("10.00%"));
        assert_eq!(panel.value("Scores", "Technical Analysis"), Some("90"));
        assert_eq!(panel.value("Scores", "Analyst Rating"), Some("N/A"));
        assert_eq!(panel.reasons, vec!["Overall Recommendation: Hold - balanced".to_string()]);
        assert_eq!(panel.summary, "N/A");
    }

    #[test]
    fn sentinel_panel_surfaces_error() {
        let t = Ticker::parse("oops").unwrap();
        let panel = DetailPanel::from_analysis(&StockAnalysis::sentinel(&t, "Network error"));
        assert_eq!(panel.title, "OOPS");
        assert_eq!(panel.error.as_deref(), Some("Network error"));
        assert_eq!(panel.value("Price", "Current Price"), Some("N/A"));
        assert_eq!(panel.value("Price", "Day Range"), Some("N/A"));
        assert_eq!(panel.value("Scores", "Suggestion"), Some("Analysis Error"));
    }
}
