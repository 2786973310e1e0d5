//! Estate Recs - listing recommendation service for the marketplace
//!
//! This library provides the recommendation scorer used by the marketplace
//! front end: it scores catalog listings against a user's preference
//! profile, explains and classifies each score, and returns a capped,
//! ranked list that never repeats a listing the user already saved.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{FixedJitter, JitterSource, RandomJitter, Recommender, format_price};
pub use models::{Listing, ListingCategory, Recommendation, RecommendationCategory, ScoringRules, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let recommender = Recommender::default();
        assert_eq!(recommender.rules().max_results, 12);
        assert_eq!(format_price(1_000.0), "$1,000");
    }
}
