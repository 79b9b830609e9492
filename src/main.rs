use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use lead_matcher::config::{ListingSourceSettings, LogFormat, Settings};
use lead_matcher::core::Matcher;
use lead_matcher::routes::{self, matches::AppState};
use lead_matcher::services::{CatalogSource, ListingSourceError, ODataListingSource, StaticListingSource};
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

/// Pick the listing catalog backing `/matches/catalog`
fn build_catalog(settings: &ListingSourceSettings) -> Result<Option<CatalogSource>, ListingSourceError> {
    if let Some(endpoint) = &settings.endpoint {
        let source = ODataListingSource::new(
            endpoint.clone(),
            settings.api_token.clone(),
            settings.timeout(),
        )?;
        info!("Listing catalog: OData feed at {}", endpoint);
        return Ok(Some(CatalogSource::OData(source)));
    }

    if let Some(path) = &settings.catalog_path {
        let source = StaticListingSource::from_file(path)?;
        info!("Listing catalog: {} listings loaded from {}", source.len(), path);
        return Ok(Some(CatalogSource::Static(source)));
    }

    Ok(None)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    match LogFormat::parse(&log_format) {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.init(),
    }

    info!("Starting lead matcher service...");
    info!("Configuration loaded successfully");

    let options = settings.matching.options().map_err(|e| {
        error!("Invalid matching configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let matcher = Matcher::new(options);

    info!("Matcher initialized with options: {:?}", options);

    let catalog = build_catalog(&settings.listing_source).map_err(|e| {
        error!("Failed to initialize listing catalog: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if catalog.is_none() {
        warn!("No listing catalog configured, /matches/catalog will return 503");
    }

    // Build application state
    let app_state = AppState {
        matcher,
        catalog: catalog.map(Arc::new),
        catalog_limits: settings.listing_source.limits(),
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
