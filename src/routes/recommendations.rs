use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{matches_status, RandomJitter, Recommender};
use crate::models::{
    ErrorResponse, HealthResponse, InteractionResponse, Listing, ListingSource,
    RecommendationsRequest, RecommendationsResponse, RemoveSavedRequest, SaveListingRequest,
    InteractionsQuery, SavedListingsResponse, SavedQuery, UserProfile,
};
use crate::services::{CacheError, CacheKey, CacheManager, CatalogClient, CatalogError, PostgresClient};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;

/// How the catalog is queried for recommendation candidates
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    pub listing_status: String,
    pub fetch_limit: usize,
    pub default_source: ListingSource,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub recommender: Recommender,
    pub query: CatalogQuery,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(get_recommendations))
        .route("/saved", web::post().to(save_listing))
        .route("/saved", web::delete().to(remove_saved))
        .route("/saved", web::get().to(get_saved_listings))
        .route("/interactions", web::get().to(get_interactions))
        .route("/interactions", web::delete().to(clear_interactions))
        .route("/interactions/stats", web::get().to(get_interaction_stats));
}

fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: Some(state.cache.stats()),
    })
}

/// Cached value, `None` on a miss; other cache failures are logged and count as misses
async fn read_cached<T: DeserializeOwned>(cache: &CacheManager, key: &str) -> Option<T> {
    match cache.get::<T>(key).await {
        Ok(value) => Some(value),
        Err(CacheError::CacheMiss(_)) => None,
        Err(e) => {
            tracing::warn!("Cache read failed for {}, treating as miss: {}", key, e);
            None
        }
    }
}

/// Catalog snapshot, served from cache when fresh
async fn load_listings(
    state: &AppState,
    source: ListingSource,
) -> Result<Vec<Listing>, CatalogError> {
    let status = &state.query.listing_status;
    let key = CacheKey::listings(source, status, state.query.fetch_limit);

    if let Some(listings) = read_cached::<Vec<Listing>>(&state.cache, &key).await {
        return Ok(listings);
    }

    let listings = state
        .catalog
        .fetch_listings(source, status, state.query.fetch_limit)
        .await?;

    if let Err(e) = state.cache.set(&key, &listings).await {
        tracing::warn!("Failed to cache listings: {}", e);
    }

    Ok(listings)
}

/// User profile, served from cache when fresh
async fn load_profile(state: &AppState, user_id: &str) -> Result<Option<UserProfile>, CatalogError> {
    let key = CacheKey::profile(user_id);

    if let Some(profile) = read_cached::<UserProfile>(&state.cache, &key).await {
        return Ok(Some(profile));
    }

    let profile = state.catalog.fetch_profile(user_id).await?;

    if let Some(profile) = &profile {
        if let Err(e) = state.cache.set(&key, profile).await {
            tracing::warn!("Failed to cache profile: {}", e);
        }
    }

    Ok(profile)
}

async fn invalidate_cached(state: &AppState, source: ListingSource, user_id: Option<&str>) {
    let mut keys = vec![CacheKey::listings(source, &state.query.listing_status, state.query.fetch_limit)];
    if let Some(user_id) = user_id {
        keys.push(CacheKey::profile(user_id));
    }

    for key in keys {
        if let Err(e) = state.cache.delete(&key).await {
            tracing::warn!("Failed to invalidate cache key {}: {}", key, e);
        }
    }
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "source": "properties|businesses",
///   "seed": 42,
///   "refresh": false
/// }
/// ```
async fn get_recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendations request: {:?}", errors);
        return validation_error(errors.to_string());
    }

    let source = req.source.unwrap_or(state.query.default_source);

    if req.refresh {
        invalidate_cached(&state, source, req.user_id.as_deref()).await;
    }

    let listings = match load_listings(&state, source).await {
        Ok(listings) => listings,
        Err(e) => {
            tracing::error!("Failed to load {} listings: {}", source.as_str(), e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to load listings".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    // Rows cached or returned without the status filter applied
    let listings: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| matches_status(listing, &state.query.listing_status))
        .collect();

    let (profile, saved) = match req.user_id.as_deref() {
        Some(user_id) => {
            let profile = match load_profile(&state, user_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!("Failed to fetch profile for {}, scoring without it: {}", user_id, e);
                    None
                }
            };

            let saved = match state.postgres.get_saved_listing_ids(user_id).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!("Failed to fetch saved listings for {}, proceeding without filtering: {}", user_id, e);
                    HashSet::new()
                }
            };

            (profile, saved)
        }
        None => (None, HashSet::new()),
    };

    let mut jitter = match req.seed {
        Some(seed) => RandomJitter::seeded(seed),
        None => RandomJitter::from_entropy(),
    };

    let result = state.recommender.recommend(
        listings,
        profile.as_ref(),
        &saved,
        chrono::Utc::now(),
        &mut jitter,
    );

    tracing::info!(
        "Returning {} recommendations for {} (from {} candidates)",
        result.recommendations.len(),
        req.user_id.as_deref().unwrap_or("anonymous"),
        result.total_candidates
    );

    HttpResponse::Ok().json(RecommendationsResponse {
        recommendations: result.recommendations,
        total_candidates: result.total_candidates,
        generated_at: chrono::Utc::now(),
    })
}

/// Save a listing (or record a view/dismissal)
///
/// POST /api/v1/saved
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "listingId": "string",
///   "interaction": "saved|viewed|dismissed"
/// }
/// ```
async fn save_listing(
    state: web::Data<AppState>,
    req: web::Json<SaveListingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    match state
        .postgres
        .record_interaction(&req.user_id, &req.listing_id, req.interaction)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(InteractionResponse {
            success: true,
            request_id: uuid::Uuid::new_v4().to_string(),
        }),
        Err(e) => {
            tracing::error!("Failed to record interaction: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record interaction".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Remove a saved listing
///
/// DELETE /api/v1/saved
async fn remove_saved(
    state: web::Data<AppState>,
    req: web::Json<RemoveSavedRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    match state.postgres.remove_interaction(&req.user_id, &req.listing_id).await {
        Ok(removed) => {
            tracing::debug!("Removed {} -> {}: {}", req.user_id, req.listing_id, removed);
            HttpResponse::Ok().json(InteractionResponse {
                success: removed,
                request_id: uuid::Uuid::new_v4().to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to remove interaction: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to remove interaction".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Get saved listings for a user
///
/// GET /api/v1/saved?userId={userId}
async fn get_saved_listings(
    state: web::Data<AppState>,
    query: web::Query<SavedQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }

    match state.postgres.get_saved_listing_ids(&query.user_id).await {
        Ok(saved) => {
            let mut saved_listings: Vec<String> = saved.into_iter().collect();
            saved_listings.sort();

            HttpResponse::Ok().json(SavedListingsResponse {
                user_id: query.user_id.clone(),
                count: saved_listings.len(),
                saved_listings,
            })
        }
        Err(e) => {
            tracing::error!("Failed to fetch saved listings for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch saved listings".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Interaction history for a user, newest first
///
/// GET /api/v1/interactions?userId={userId}&limit=50&offset=0
async fn get_interactions(
    state: web::Data<AppState>,
    query: web::Query<InteractionsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }

    match state
        .postgres
        .get_interactions_paginated(&query.user_id, query.limit, query.offset)
        .await
    {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => {
            tracing::error!("Failed to fetch interactions for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interactions".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Forget every interaction of a user
///
/// DELETE /api/v1/interactions?userId={userId}
async fn clear_interactions(
    state: web::Data<AppState>,
    query: web::Query<SavedQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }

    match state.postgres.clear_interactions(&query.user_id).await {
        Ok(cleared) => HttpResponse::Ok().json(serde_json::json!({
            "userId": query.user_id,
            "cleared": cleared,
        })),
        Err(e) => {
            tracing::error!("Failed to clear interactions for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to clear interactions".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Interaction counts for a user
///
/// GET /api/v1/interactions/stats?userId={userId}
async fn get_interaction_stats(
    state: web::Data<AppState>,
    query: web::Query<SavedQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }

    match state.postgres.get_interaction_stats(&query.user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            tracing::error!("Failed to fetch interaction stats for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch interaction stats".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
