// Integration tests for Estate Recs

use estate_recs::core::{FixedJitter, RandomJitter, Recommender};
use estate_recs::models::{Listing, ListingCategory, RecommendationCategory, UserProfile};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

fn create_test_listing(
    id: &str,
    price: f64,
    city: &str,
    bedrooms: Option<u32>,
    category: ListingCategory,
    created_at: DateTime<Utc>,
) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("Listing {}", id),
        price,
        city: city.to_string(),
        state: Some("FL".to_string()),
        bedrooms,
        bathrooms: Some(2.0),
        area_sqft: Some(1800.0),
        category,
        images: vec![format!("{}.jpg", id)],
        status: Some("active".to_string()),
        created_at,
    }
}

fn create_miami_profile() -> UserProfile {
    UserProfile {
        user_id: Some("current_user".to_string()),
        budget_min: Some(400_000.0),
        budget_max: Some(500_000.0),
        preferred_locations: ["Miami".to_string()].into_iter().collect(),
        preferred_categories: HashSet::new(),
        min_bedrooms: Some(3),
    }
}

#[test]
fn test_integration_miami_scenario() {
    let recommender = Recommender::with_default_rules();
    let now = Utc::now();
    let listing = create_test_listing("miami", 450_000.0, "Miami", Some(3), ListingCategory::House, now);

    let result = recommender.recommend(
        vec![listing],
        Some(&create_miami_profile()),
        &HashSet::new(),
        now,
        &mut FixedJitter::none(),
    );

    let rec = &result.recommendations[0];
    assert_eq!(rec.score, 80.0);
    assert_eq!(rec.category, RecommendationCategory::BudgetMatch);
    assert_eq!(
        rec.reasons,
        vec![
            "Excellent match for your preferences",
            "Within your budget range",
            "Meets your space requirements",
        ]
    );
    assert_eq!(rec.days_listed, 0);
}

#[test]
fn test_integration_anonymous_user() {
    let recommender = Recommender::with_default_rules();
    let now = Utc::now();

    let listings = vec![
        create_test_listing("new", 450_000.0, "Miami", Some(3), ListingCategory::Condo, now - Duration::days(2)),
        create_test_listing("old", 450_000.0, "Miami", Some(3), ListingCategory::Condo, now - Duration::days(20)),
    ];

    let result = recommender.recommend(listings, None, &HashSet::new(), now, &mut FixedJitter::none());

    assert_eq!(result.recommendations.len(), 2);

    let new = &result.recommendations[0];
    assert_eq!(new.listing.id, "new");
    assert_eq!(new.score, 15.0);
    assert_eq!(new.category, RecommendationCategory::Trending);

    let old = &result.recommendations[1];
    assert_eq!(old.score, 0.0);
    assert_eq!(old.category, RecommendationCategory::SimilarViews);
    assert_eq!(old.reasons, vec!["Within your budget range", "Meets your space requirements"]);
}

#[test]
fn test_deterministic_without_jitter() {
    let recommender = Recommender::with_default_rules();
    let now = Utc::now();
    let profile = create_miami_profile();

    let listings: Vec<Listing> = (0..15)
        .map(|i| {
            create_test_listing(
                &i.to_string(),
                380_000.0 + (i as f64 * 10_000.0),
                if i % 2 == 0 { "Miami" } else { "Tampa" },
                Some(2 + (i % 3) as u32),
                ListingCategory::House,
                now - Duration::days(i),
            )
        })
        .collect();

    let run = |listings: Vec<Listing>| {
        recommender
            .recommend(listings, Some(&profile), &HashSet::new(), now, &mut FixedJitter::none())
            .recommendations
            .into_iter()
            .map(|r| (r.listing.id, r.score, r.category))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(listings.clone()), run(listings));
}

#[test]
fn test_seeded_jitter_reproducible() {
    let recommender = Recommender::with_default_rules();
    let now = Utc::now();

    let listings: Vec<Listing> = (0..10)
        .map(|i| create_test_listing(&i.to_string(), 1.0, "Denver", None, ListingCategory::Land, now))
        .collect();

    let run = |seed: u64, listings: Vec<Listing>| {
        recommender
            .recommend(listings, None, &HashSet::new(), now, &mut RandomJitter::seeded(seed))
            .recommendations
            .into_iter()
            .map(|r| r.listing.id)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(7, listings.clone()), run(7, listings));
}

#[test]
fn test_saved_never_recommended_and_capped() {
    let recommender = Recommender::with_default_rules();
    let now = Utc::now();
    let profile = create_miami_profile();

    let listings: Vec<Listing> = (0..40)
        .map(|i| create_test_listing(&i.to_string(), 450_000.0, "Miami", Some(3), ListingCategory::House, now))
        .collect();

    let saved: HashSet<String> = (0..40).step_by(2).map(|i: i32| i.to_string()).collect();

    let recs = recommender.score_and_rank(listings, Some(&profile), &saved);

    assert_eq!(recs.len(), 12);
    for rec in &recs {
        assert!(!saved.contains(&rec.listing.id));
        assert!(rec.reasons.len() <= 3);
    }

    for pair in recs.windows(2) {
        assert!(pair[0].score >= pair[1].score, "Recommendations not sorted by score");
    }
}
