use crate::domain::analysis::StockAnalysis;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationBucket {
    All,
    LongTerm,
    ShortTerm,
}

impl RecommendationBucket {
    pub const ALL: [RecommendationBucket; 3] = [
        RecommendationBucket::All,
        RecommendationBucket::LongTerm,
        RecommendationBucket::ShortTerm,
    ];

    pub fn title(self) -> &'static str {
        match self {
            RecommendationBucket::All => "All Analyzed Stocks",
            RecommendationBucket::LongTerm => "Long-Term Picks",
            RecommendationBucket::ShortTerm => "Short-Term Picks",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            RecommendationBucket::All => "No stocks analyzed yet.",
            RecommendationBucket::LongTerm => "No long-term picks at the moment.",
            RecommendationBucket::ShortTerm => "No short-term picks at the moment.",
        }
    }
}

impl fmt::Display for RecommendationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Result of one full refresh. Recomputed from scratch every time, never patched.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    pub all: Vec<StockAnalysis>,
    pub long_term: Vec<StockAnalysis>,
    pub short_term: Vec<StockAnalysis>,
}

impl Buckets {
    pub fn get(&self, bucket: RecommendationBucket) -> &[StockAnalysis] {
        match bucket {
            RecommendationBucket::All => &self.all,
            RecommendationBucket::LongTerm => &self.long_term,
            RecommendationBucket::ShortTerm => &self.short_term,
        }
    }
}
