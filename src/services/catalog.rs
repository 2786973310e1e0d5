use crate::models::{Listing, ListingSource, UserProfile};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the marketplace backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the marketplace backend
#[derive(Debug, Clone)]
pub struct CatalogTables {
    pub properties: String,
    pub businesses: String,
    pub profiles: String,
}

impl CatalogTables {
    fn listings(&self, source: ListingSource) -> &str {
        match source {
            ListingSource::Properties => &self.properties,
            ListingSource::Businesses => &self.businesses,
        }
    }
}

/// REST client for the marketplace backend
///
/// Talks to a PostgREST-style API:
/// - Fetching listings by status with a row cap
/// - Fetching a user's investment profile
pub struct CatalogClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: CatalogTables,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(
        base_url: String,
        api_key: String,
        timeout_secs: u64,
        tables: CatalogTables,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn get_rows(&self, url: &str) -> Result<Vec<Value>, CatalogError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Backend request failed: {} - {}", status, body);
            return Err(CatalogError::ApiError(format!("Request failed: {}", status)));
        }

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(CatalogError::InvalidResponse("Expected an array of rows".into())),
        }
    }

    /// Fetch listings with the given status, newest first
    ///
    /// Rows that cannot be parsed as listings are skipped.
    pub async fn fetch_listings(
        &self,
        source: ListingSource,
        status: &str,
        limit: usize,
    ) -> Result<Vec<Listing>, CatalogError> {
        let url = format!(
            "{}?select=*&status=eq.{}&order=created_at.desc&limit={}",
            self.table_url(self.tables.listings(source)),
            urlencoding::encode(status),
            limit
        );

        tracing::debug!("Fetching listings from: {}", url);

        let rows = self.get_rows(&url).await?;
        let total = rows.len();

        let listings: Vec<Listing> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Listing>(row) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::debug!("Skipping malformed {} row: {}", source.as_str(), e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Fetched {} {} listings ({} rows)",
            listings.len(),
            source.as_str(),
            total
        );

        Ok(listings)
    }

    /// Fetch a user's preference profile, `None` if the user has none
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CatalogError> {
        let url = format!(
            "{}?select=*&user_id=eq.{}&limit=1",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let rows = self.get_rows(&url).await?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        serde_json::from_value(row)
            .map(Some)
            .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse profile: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_tables() -> CatalogTables {
        CatalogTables {
            properties: "properties".to_string(),
            businesses: "businesses".to_string(),
            profiles: "investor_profiles".to_string(),
        }
    }

    #[test]
    fn test_catalog_client_creation() {
        let client = CatalogClient::new(
            "https://backend.test/".to_string(),
            "test_key".to_string(),
            10,
            create_tables(),
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.table_url("properties"), "https://backend.test/rest/v1/properties");
    }

    #[test]
    fn test_table_for_source() {
        let tables = create_tables();
        assert_eq!(tables.listings(ListingSource::Properties), "properties");
        assert_eq!(tables.listings(ListingSource::Businesses), "businesses");
    }
}
