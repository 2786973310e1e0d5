use crate::core::scoring::meets_bedroom_minimum;
use crate::models::{Listing, ListingCategory, RecommendationCategory, ScoringRules, UserProfile};

pub const REASON_EXCELLENT_MATCH: &str = "Excellent match for your preferences";
pub const REASON_GOOD_FIT: &str = "Good fit based on your search history";
pub const REASON_WITHIN_BUDGET: &str = "Within your budget range";
pub const REASON_MEETS_SPACE: &str = "Meets your space requirements";
pub const REASON_NEWLY_LISTED: &str = "Newly listed property";
pub const REASON_POPULAR_TYPE: &str = "Popular property type";

const MAX_REASONS: usize = 3;

/// Build the human-readable reasons for a recommendation
///
/// Works from the final score and the raw listing/profile fields. Checks
/// run in a fixed order and the list is cut to three entries.
pub fn generate_reasons(
    listing: &Listing,
    profile: Option<&UserProfile>,
    score: f64,
    days_listed: i64,
    rules: &ScoringRules,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(MAX_REASONS);

    if score >= 70.0 {
        reasons.push(REASON_EXCELLENT_MATCH);
    } else if score >= 50.0 {
        reasons.push(REASON_GOOD_FIT);
    }

    // No upper bound means every price fits
    let within_budget = match profile.and_then(|p| p.budget_max) {
        Some(max) => listing.valid_price().is_some_and(|price| price <= max),
        None => true,
    };
    if within_budget {
        reasons.push(REASON_WITHIN_BUDGET);
    }

    let meets_space = profile
        .and_then(|p| meets_bedroom_minimum(listing, p))
        .unwrap_or(true);
    if meets_space {
        reasons.push(REASON_MEETS_SPACE);
    }

    if days_listed <= rules.new_listing_days {
        reasons.push(REASON_NEWLY_LISTED);
    }

    if listing.category == ListingCategory::House {
        reasons.push(REASON_POPULAR_TYPE);
    }

    reasons
        .into_iter()
        .take(MAX_REASONS)
        .map(str::to_string)
        .collect()
}

/// Assign a single category label; first matching rule wins
pub fn assign_category(score: f64, days_listed: i64, rules: &ScoringRules) -> RecommendationCategory {
    if score >= 80.0 {
        RecommendationCategory::BudgetMatch
    } else if score >= 60.0 {
        RecommendationCategory::LocationPreference
    } else if days_listed <= rules.recency_days {
        RecommendationCategory::Trending
    } else {
        RecommendationCategory::SimilarViews
    }
}
