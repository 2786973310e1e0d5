use crate::core::{
    filters::is_recommendable,
    format::format_price,
    jitter::{JitterSource, RandomJitter},
    reasons::{assign_category, generate_reasons},
    scoring::{calculate_listing_score, days_since_listed},
};
use crate::models::{Listing, Recommendation, ScoringRules, UserProfile};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Result of the recommendation pass
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub total_candidates: usize,
}

/// Recommendation orchestrator - scores, explains, classifies and ranks listings
///
/// # Pipeline Stages
/// 1. Drop saved, duplicate and id-less listings
/// 2. Score each listing independently
/// 3. Attach reasons and a category
/// 4. Stable sort by score, cap the list
#[derive(Debug, Clone)]
pub struct Recommender {
    rules: ScoringRules,
}

impl Recommender {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Score and rank with entropy-seeded jitter at the current time
    pub fn score_and_rank(
        &self,
        listings: Vec<Listing>,
        profile: Option<&UserProfile>,
        saved: &HashSet<String>,
    ) -> Vec<Recommendation> {
        let mut jitter = RandomJitter::from_entropy();
        self.recommend(listings, profile, saved, Utc::now(), &mut jitter)
            .recommendations
    }

    /// Produce ranked recommendations for a user
    ///
    /// # Arguments
    /// * `listings` - Catalog listings to consider
    /// * `profile` - The user's preferences, `None` for anonymous users
    /// * `saved` - Ids of listings the user already saved
    /// * `now` - Reference time for listing age
    /// * `jitter` - Source of the tie-breaking addend
    ///
    /// # Returns
    /// At most `max_results` recommendations, best first
    pub fn recommend(
        &self,
        listings: Vec<Listing>,
        profile: Option<&UserProfile>,
        saved: &HashSet<String>,
        now: DateTime<Utc>,
        jitter: &mut dyn JitterSource,
    ) -> RecommendationResult {
        let total_candidates = listings.len();
        let mut seen_ids: HashSet<String> = HashSet::with_capacity(listings.len());

        let mut recommendations: Vec<Recommendation> = listings
            .into_iter()
            // Stage 1: eligibility and dedup (first occurrence wins)
            .filter(|listing| is_recommendable(listing, saved))
            .filter(|listing| seen_ids.insert(listing.id.clone()))
            // Stage 2 & 3: score and explain
            .map(|listing| {
                let days_listed = days_since_listed(listing.created_at, now);
                let breakdown =
                    calculate_listing_score(&listing, profile, &self.rules, days_listed, jitter);
                let score = breakdown.total;

                Recommendation {
                    reasons: generate_reasons(&listing, profile, score, days_listed, &self.rules),
                    category: assign_category(score, days_listed, &self.rules),
                    formatted_price: format_price(listing.price),
                    days_listed,
                    score,
                    listing,
                }
            })
            .collect();

        // Stable: equal scores keep catalog order
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        recommendations.truncate(self.rules.max_results);

        tracing::debug!(
            "Ranked {} recommendations from {} candidates",
            recommendations.len(),
            total_candidates
        );

        RecommendationResult {
            recommendations,
            total_candidates,
        }
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::jitter::FixedJitter;
    use crate::models::{ListingCategory, RecommendationCategory};
    use chrono::Duration;

    fn create_listing(id: &str, price: f64, city: &str, age_days: i64, now: DateTime<Utc>) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            price,
            city: city.to_string(),
            state: None,
            bedrooms: Some(3),
            bathrooms: Some(2.0),
            area_sqft: None,
            category: ListingCategory::House,
            images: vec![],
            status: Some("active".to_string()),
            created_at: now - Duration::days(age_days),
        }
    }

    fn create_profile() -> UserProfile {
        UserProfile {
            user_id: Some("current_user".to_string()),
            budget_min: Some(400_000.0),
            budget_max: Some(500_000.0),
            preferred_locations: ["Miami".to_string()].into_iter().collect(),
            preferred_categories: Default::default(),
            min_bedrooms: Some(3),
        }
    }

    #[test]
    fn test_recommend_sorted_by_score() {
        let recommender = Recommender::with_default_rules();
        let now = Utc::now();
        let profile = create_profile();

        let listings = vec![
            create_listing("far", 900_000.0, "Denver", 30, now),
            create_listing("best", 450_000.0, "Miami", 0, now),
            create_listing("mid", 450_000.0, "Denver", 30, now),
        ];

        let result = recommender.recommend(
            listings,
            Some(&profile),
            &HashSet::new(),
            now,
            &mut FixedJitter::none(),
        );

        let ids: Vec<&str> = result.recommendations.iter().map(|r| r.listing.id.as_str()).collect();
        assert_eq!(ids, vec!["best", "mid", "far"]);
        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.recommendations[0].score, 80.0);
        assert_eq!(result.recommendations[0].category, RecommendationCategory::BudgetMatch);
        assert_eq!(result.recommendations[0].formatted_price, "$450,000");
    }

    #[test]
    fn test_saved_listings_excluded() {
        let recommender = Recommender::with_default_rules();
        let now = Utc::now();
        let saved: HashSet<String> = ["best".to_string()].into_iter().collect();

        let listings = vec![
            create_listing("best", 450_000.0, "Miami", 0, now),
            create_listing("other", 450_000.0, "Denver", 0, now),
        ];

        let result = recommender.recommend(
            listings,
            Some(&create_profile()),
            &saved,
            now,
            &mut FixedJitter::none(),
        );

        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].listing.id, "other");
    }

    #[test]
    fn test_respects_cap() {
        let recommender = Recommender::with_default_rules();
        let now = Utc::now();

        let listings: Vec<Listing> = (0..30)
            .map(|i| create_listing(&i.to_string(), 450_000.0, "Miami", i, now))
            .collect();

        let recs = recommender.score_and_rank(listings, Some(&create_profile()), &HashSet::new());

        assert_eq!(recs.len(), 12);
    }

    #[test]
    fn test_duplicates_removed() {
        let recommender = Recommender::with_default_rules();
        let now = Utc::now();

        let listings = vec![
            create_listing("dup", 450_000.0, "Miami", 0, now),
            create_listing("dup", 450_000.0, "Miami", 0, now),
        ];

        let result = recommender.recommend(listings, None, &HashSet::new(), now, &mut FixedJitter::none());

        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let recommender = Recommender::with_default_rules();
        let now = Utc::now();

        let listings = vec![
            create_listing("a", 1.0, "Denver", 30, now),
            create_listing("b", 1.0, "Denver", 30, now),
            create_listing("c", 1.0, "Denver", 30, now),
        ];

        let result = recommender.recommend(listings, None, &HashSet::new(), now, &mut FixedJitter::none());

        let ids: Vec<&str> = result.recommendations.iter().map(|r| r.listing.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
