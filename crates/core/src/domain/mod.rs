pub mod analysis;
pub mod contract;
pub mod lenient;
pub mod recommendation;
pub mod ticker;

pub use analysis::{PricePoint, ScoreBreakdown, StockAnalysis, Suggestion};
pub use recommendation::{Buckets, RecommendationBucket};
pub use ticker::{Ticker, TickerError};
