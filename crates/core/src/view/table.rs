use crate::domain::{Buckets, RecommendationBucket, StockAnalysis};
use crate::format::{self, ScoreTier, Tier};

pub const COLUMNS: [&str; 6] = ["Ticker", "Company", "Price", "Change", "Score", "Suggestion"];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub ticker: String,
    pub company: String,
    pub price: String,
    pub change: String,
    pub change_tier: Tier,
    pub score: String,
    pub score_tier: ScoreTier,
    pub suggestion: String,
    pub suggestion_tier: Tier,
    pub is_error: bool,
}

impl From<&StockAnalysis> for TableRow {
    fn from(a: &StockAnalysis) -> Self {
        Self {
            ticker: a.ticker.clone(),
            company: a.display_name().to_string(),
            price: format::format_price(a.current_price),
            change: format::format_percent_change(a.percent_change),
            change_tier: format::classify_price_direction(a.percent_change),
            score: format::format_score(a.overall_score),
            score_tier: format::classify_score(a.overall_score),
            suggestion: a.suggestion.label().to_string(),
            suggestion_tier: format::classify_suggestion(&a.suggestion),
            is_error: a.is_error(),
        }
    }
}

impl TableRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.ticker,
            &self.company,
            &self.price,
            &self.change,
            &self.score,
            &self.suggestion,
        ]
    }
}

/// Rows for the three result tables, rebuilt wholesale from a [`Buckets`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTables {
    pub all: Vec<TableRow>,
    pub long_term: Vec<TableRow>,
    pub short_term: Vec<TableRow>,
}

impl ResultTables {
    pub fn from_buckets(buckets: &Buckets) -> Self {
        let rows = |items: &[StockAnalysis]| items.iter().map(TableRow::from).collect::<Vec<_>>();
        Self {
            all: rows(&buckets.all),
            long_term: rows(&buckets.long_term),
            short_term: rows(&buckets.short_term),
        }
    }

    pub fn rows(&self, bucket: RecommendationBucket) -> &[TableRow] {
        match bucket {
            RecommendationBucket::All => &self.all,
            RecommendationBucket::LongTerm => &self.long_term,
            RecommendationBucket::ShortTerm => &self.short_term,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
