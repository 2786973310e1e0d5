// Core algorithm exports
pub mod filters;
pub mod format;
pub mod jitter;
pub mod reasons;
pub mod recommender;
pub mod scoring;

pub use filters::{is_recommendable, matches_status};
pub use format::format_price;
pub use jitter::{FixedJitter, JitterSource, RandomJitter};
pub use reasons::{assign_category, generate_reasons};
pub use recommender::{RecommendationResult, Recommender};
pub use scoring::{calculate_listing_score, days_since_listed, ScoreBreakdown};
