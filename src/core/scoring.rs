use crate::core::jitter::JitterSource;
use crate::models::{Listing, ScoringRules, UserProfile};
use chrono::{DateTime, Utc};

/// Per-rule contributions behind a listing score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub budget: f64,
    pub location: f64,
    pub category: f64,
    pub bedrooms: f64,
    pub recency: f64,
    pub jitter: f64,
    /// Sum of the above, clamped to [0, 100]
    pub total: f64,
}

/// Whole days since the listing was created, floored
///
/// Listings stamped in the future count as listed today.
#[inline]
pub fn days_since_listed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(created_at).num_days().max(0)
}

/// Calculate a relevance score (0-100) for a listing
///
/// Scoring rules:
/// ```text
/// budget      +30 price within [min, max], else +15 within tolerance of the midpoint
/// location    +25 city in preferred locations
/// category    +20 category in preferred categories
/// bedrooms    +10 bedrooms >= minimum
/// recency     +15 listed within the recency window
/// jitter      [0, max_jitter)
/// ```
/// A missing profile skips every preference rule.
pub fn calculate_listing_score(
    listing: &Listing,
    profile: Option<&UserProfile>,
    rules: &ScoringRules,
    days_listed: i64,
    jitter: &mut dyn JitterSource,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    if let Some(profile) = profile {
        breakdown.budget = budget_score(listing, profile, rules);

        if profile.preferred_locations.contains(&listing.city) {
            breakdown.location = rules.location;
        }

        if profile.preferred_categories.contains(&listing.category) {
            breakdown.category = rules.category;
        }

        if meets_bedroom_minimum(listing, profile) == Some(true) {
            breakdown.bedrooms = rules.bedrooms;
        }
    }

    if days_listed <= rules.recency_days {
        breakdown.recency = rules.recency;
    }

    breakdown.jitter = jitter.sample(rules.max_jitter);

    let raw = breakdown.budget
        + breakdown.location
        + breakdown.category
        + breakdown.bedrooms
        + breakdown.recency
        + breakdown.jitter;

    breakdown.total = clamp_score(raw);
    breakdown
}

/// Budget fit: in-range and near-midpoint bonuses are mutually exclusive
#[inline]
fn budget_score(listing: &Listing, profile: &UserProfile, rules: &ScoringRules) -> f64 {
    let (Some(price), Some((min, max))) = (listing.valid_price(), profile.budget_range()) else {
        return 0.0;
    };

    if price >= min && price <= max {
        return rules.budget_in_range;
    }

    let midpoint = (min + max) / 2.0;
    if (price - midpoint).abs() <= rules.budget_near_tolerance {
        rules.budget_near_range
    } else {
        0.0
    }
}

/// `None` when the profile sets no minimum. A listing without a bedroom
/// count never meets a minimum.
#[inline]
pub(crate) fn meets_bedroom_minimum(listing: &Listing, profile: &UserProfile) -> Option<bool> {
    profile
        .min_bedrooms
        .map(|min| listing.bedrooms.is_some_and(|beds| beds >= min))
}

#[inline]
fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}
