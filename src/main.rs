use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use estate_recs::config::{LogFormat, Settings};
use estate_recs::core::Recommender;
use estate_recs::models::ScoringRules;
use estate_recs::routes::{self, recommendations::{AppState, CatalogQuery}};
use estate_recs::services::{CacheManager, CatalogClient, CatalogTables, PostgresClient};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration comes first so logging can honour it
    let settings = Settings::load().map_err(|e| io_error(format!("Configuration error: {}", e)))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }

    info!("Starting Estate Recs recommendation service...");

    // Initialize backend client
    let tables = CatalogTables {
        properties: settings.tables.properties.clone(),
        businesses: settings.tables.businesses.clone(),
        profiles: settings.tables.profiles.clone(),
    };

    let catalog = Arc::new(
        CatalogClient::new(
            settings.backend.endpoint.clone(),
            settings.backend.api_key.clone(),
            settings.backend.timeout_secs.unwrap_or(30),
            tables,
        )
        .map_err(|e| io_error(format!("Backend client error: {}", e)))?,
    );

    info!("Catalog client initialized");

    // Initialize cache manager (Redis is optional unless required)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            Arc::new(c)
        }
        Err(e) if settings.cache.required => {
            error!("Failed to connect to Redis: {}", e);
            return Err(io_error("Redis connection required".to_string()));
        }
        Err(e) => {
            warn!("Failed to connect to Redis ({}), using in-memory cache only", e);
            Arc::new(CacheManager::in_memory(l1_cache_size, cache_ttl))
        }
    };

    // Initialize PostgreSQL client
    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            io_error(format!("PostgreSQL connection error: {}", e))
        })?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    // Initialize recommender with configured rules
    let rules = ScoringRules::from(&settings.scoring.rules);
    let recommender = Recommender::new(rules);

    info!("Recommender initialized with rules: {:?}", rules);

    let app_state = AppState {
        catalog,
        cache,
        postgres,
        recommender,
        query: CatalogQuery {
            listing_status: settings.recommendations.listing_status.clone(),
            fetch_limit: settings.recommendations.fetch_limit,
            default_source: settings.recommendations.default_source,
        },
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
