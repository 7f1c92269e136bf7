use crate::domain::{Buckets, StockAnalysis, Ticker};
use std::collections::HashSet;

pub const LONG_TERM_MIN_SCORE: f64 = 70.0;
pub const SHORT_TERM_MIN_SCORE: f64 = 60.0;
pub const SHORT_TERM_MIN_TECHNICAL: f64 = 70.0;

/// Watchlist first, then defaults; first occurrence wins.
pub fn request_set(watchlist: &[Ticker], defaults: &[Ticker]) -> Vec<Ticker> {
    let mut seen = HashSet::with_capacity(watchlist.len() + defaults.len());
    watchlist
        .iter()
        .chain(defaults)
        .filter(|t| seen.insert(t.as_str().to_string()))
        .cloned()
        .collect()
}

fn numeric(v: Option<f64>) -> Option<f64> {
    v.filter(|n| n.is_finite())
}

pub fn is_long_term(a: &StockAnalysis) -> bool {
    !a.is_error() && numeric(a.overall_score).is_some_and(|s| s >= LONG_TERM_MIN_SCORE)
}

pub fn is_short_term(a: &StockAnalysis) -> bool {
    !a.is_error()
        && numeric(a.overall_score).is_some_and(|s| s >= SHORT_TERM_MIN_SCORE)
        && numeric(a.technical_score()).is_some_and(|t| t >= SHORT_TERM_MIN_TECHNICAL)
}

/// Descending by overall score; missing scores sink to the end. Stable for ties.
pub fn sort_by_score_desc(items: &mut [StockAnalysis]) {
    items.sort_by(|a, b| score_key(b).total_cmp(&score_key(a)));
}

fn score_key(a: &StockAnalysis) -> f64 {
    numeric(a.overall_score).unwrap_or(f64::NEG_INFINITY)
}

/// `all` keeps the input order, error records included.
pub fn classify(results: Vec<StockAnalysis>) -> Buckets {
    let mut long_term: Vec<_> = results.iter().filter(|a| is_long_term(a)).cloned().collect();
    let mut short_term: Vec<_> = results.iter().filter(|a| is_short_term(a)).cloned().collect();
    sort_by_score_desc(&mut long_term);
    sort_by_score_desc(&mut short_term);

    Buckets {
        all: results,
        long_term,
        short_term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    fn scored(ticker: &str, overall: Option<f64>, technical: Option<f64>) -> StockAnalysis {
        let mut a = StockAnalysis {
            ticker: ticker.to_string(),
            overall_score: overall,
            ..Default::default()
        };
        a.score_breakdown.technical_analysis = technical;
        a
    }

    fn tickers(items: &[StockAnalysis]) -> Vec<&str> {
        items.iter().map(|a| a.ticker.as_str()).collect()
    }

    #[test]
    fn request_set_is_ordered_union() {
        let set = request_set(&[t("AAPL"), t("TSLA")], &[t("MSFT"), t("AAPL"), t("GOOGL")]);
        let names: Vec<&str> = set.iter().map(Ticker::as_str).collect();
        assert_eq!(names, vec!["AAPL", "TSLA", "MSFT", "GOOGL"]);
        assert!(request_set(&[], &[]).is_empty());
    }

    #[test]
    fn long_term_only_needs_overall_score() {
        let b = classify(vec![scored("A", Some(75.0), None)]);
        assert_eq!(tickers(&b.long_term), vec!["A"]);
        assert!(b.short_term.is_empty());
    }

    #[test]
    fn short_term_needs_technical_strength() {
        let b = classify(vec![scored("B", Some(65.0), Some(80.0))]);
        assert!(b.long_term.is_empty());
        assert_eq!(tickers(&b.short_term), vec!["B"]);

        let b = classify(vec![scored("C", Some(65.0), Some(69.9))]);
        assert!(b.short_term.is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let b = classify(vec![scored("E", Some(70.0), Some(70.0)), scored("F", Some(60.0), Some(70.0))]);
        assert_eq!(tickers(&b.long_term), vec!["E"]);
        assert_eq!(tickers(&b.short_term), vec!["E", "F"]);
    }

    #[test]
    fn error_records_never_qualify() {
        let mut bad = scored("ERR", Some(99.0), Some(99.0));
        bad.error = Some("Analysis failed".to_string());

        let b = classify(vec![bad]);
        assert_eq!(b.all.len(), 1);
        assert!(b.long_term.is_empty());
        assert!(b.short_term.is_empty());
    }

    #[test]
    fn buckets_sort_descending_and_all_keeps_order() {
        let b = classify(vec![
            scored("LOW", Some(72.0), Some(90.0)),
            scored("NONE", None, None),
            scored("HIGH", Some(95.0), Some(75.0)),
            scored("MID", Some(80.0), Some(71.0)),
        ]);

        assert_eq!(tickers(&b.all), vec!["LOW", "NONE", "HIGH", "MID"]);
        assert_eq!(tickers(&b.long_term), vec!["HIGH", "MID", "LOW"]);
        assert_eq!(tickers(&b.short_term), vec!["HIGH", "MID", "LOW"]);
    }

    #[test]
    fn missing_scores_sort_last() {
        let mut items = vec![
            scored("NONE", None, None),
            scored("NAN", Some(f64::NAN), None),
            scored("TEN", Some(10.0), None),
        ];
        sort_by_score_desc(&mut items);
        assert_eq!(tickers(&items), vec!["TEN", "NONE", "NAN"]);
    }
}
