use crate::models::InteractionType;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Record of a user's interaction with a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: String,
    pub listing_id: String,
    pub interaction: InteractionType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// PostgreSQL client for saved-listing tracking
///
/// The saved set is what keeps already-saved listings out of a user's
/// recommendations. Views and dismissals are kept for analytics only.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool; migrations are left to the caller
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Record a user's interaction with a listing
    ///
    /// A user has one interaction per listing; a newer one replaces it.
    pub async fn record_interaction(
        &self,
        user_id: &str,
        listing_id: &str,
        interaction: InteractionType,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO listing_interactions (user_id, listing_id, interaction, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, listing_id)
            DO UPDATE SET
                interaction = EXCLUDED.interaction,
                created_at = EXCLUDED.created_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(listing_id)
            .bind(interaction)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded interaction: {} -> {} ({:?})",
            user_id,
            listing_id,
            interaction
        );

        Ok(())
    }

    /// Get the ids of all listings the user has saved
    pub async fn get_saved_listing_ids(&self, user_id: &str) -> Result<HashSet<String>, PostgresError> {
        let query = r#"
            SELECT listing_id
            FROM listing_interactions
            WHERE user_id = $1 AND interaction = 'saved'
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let saved: HashSet<String> = rows.iter().map(|row| row.get("listing_id")).collect();

        tracing::debug!("User {} has saved {} listings", user_id, saved.len());

        Ok(saved)
    }

    /// Get a user's interactions, newest first
    pub async fn get_interactions_paginated(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<InteractionRecord>, PostgresError> {
        let query = r#"
            SELECT user_id, listing_id, interaction, created_at
            FROM listing_interactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
        "#;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(|row| InteractionRecord {
                user_id: row.get("user_id"),
                listing_id: row.get("listing_id"),
                interaction: row.get("interaction"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(records)
    }

    /// Remove a user's interaction with a listing (e.g. unsave)
    pub async fn remove_interaction(
        &self,
        user_id: &str,
        listing_id: &str,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM listing_interactions
            WHERE user_id = $1 AND listing_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear all interactions for a user
    pub async fn clear_interactions(&self, user_id: &str) -> Result<u64, PostgresError> {
        let query = r#"
            DELETE FROM listing_interactions
            WHERE user_id = $1
        "#;

        let result = sqlx::query(query).bind(user_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} interactions for user {}",
            result.rows_affected(),
            user_id
        );

        Ok(result.rows_affected())
    }

    /// Get interaction counts for a user
    pub async fn get_interaction_stats(&self, user_id: &str) -> Result<InteractionStats, PostgresError> {
        let query = r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE interaction = 'saved') as saved,
                COUNT(*) FILTER (WHERE interaction = 'viewed') as viewed,
                COUNT(*) FILTER (WHERE interaction = 'dismissed') as dismissed,
                MAX(created_at) as last_interaction_at
            FROM listing_interactions
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;

        Ok(InteractionStats {
            user_id: user_id.to_string(),
            total: row.get("total"),
            saved: row.get("saved"),
            viewed: row.get("viewed"),
            dismissed: row.get("dismissed"),
            last_interaction_at: row.get("last_interaction_at"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Interaction counts for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionStats {
    pub user_id: String,
    pub total: i64,
    pub saved: i64,
    pub viewed: i64,
    pub dismissed: i64,
    pub last_interaction_at: Option<chrono::DateTime<chrono::Utc>>,
}
