use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{CatalogMatchRequest, ErrorResponse, HealthResponse, LeadCriteria, MatchLeadsRequest, MatchLeadsResponse};
use crate::services::{fetch_catalog, CatalogLimits, CatalogSource};
use crate::core::{is_eligible, MatchError, MatchOptions, MatchRun, Matcher};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub catalog: Option<Arc<CatalogSource>>,
    pub catalog_limits: CatalogLimits,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::post().to(match_leads))
        .route("/matches/catalog", web::post().to(match_catalog));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_some() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match leads against a caller-supplied listing catalog
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// {
///   "leads": [{ "leadId": "string", "neighborhoods": "Kailua, Kapolei", ... }],
///   "listings": [{ "ListingKey": "string", "City": "Kailua", ... }],
///   "maxMatchesPerLead": 5,
///   "minScore": 25
/// }
/// ```
async fn match_leads(
    state: web::Data<AppState>,
    req: web::Json<MatchLeadsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {:?}", errors);
        return validation_failed(errors.to_string());
    }

    let options = match resolve_options(&state.matcher, req.max_matches_per_lead, req.min_score) {
        Ok(options) => options,
        Err(e) => return validation_failed(e.to_string()),
    };

    tracing::info!(
        "Matching {} leads against {} listings (max {} per lead, min score {})",
        req.leads.len(),
        req.listings.len(),
        options.max_matches_per_lead(),
        options.min_score()
    );

    let run = state.matcher.match_leads_with(&req.leads, &req.listings, &options);

    HttpResponse::Ok().json(into_response(run))
}

/// Match leads against the configured listing catalog
///
/// POST /api/v1/matches/catalog
///
/// Request body:
/// ```json
/// {
///   "leads": [{ "leadId": "string", ... }],
///   "leadId": "optional - only match this lead",
///   "maxMatchesPerLead": 5,
///   "minScore": 25
/// }
/// ```
async fn match_catalog(
    state: web::Data<AppState>,
    req: web::Json<CatalogMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for catalog match request: {:?}", errors);
        return validation_failed(errors.to_string());
    }

    let options = match resolve_options(&state.matcher, req.max_matches_per_lead, req.min_score) {
        Ok(options) => options,
        Err(e) => return validation_failed(e.to_string()),
    };

    let Some(catalog) = state.catalog.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Listing catalog not configured".to_string(),
            message: "Set listing_source.endpoint or listing_source.catalog_path".to_string(),
            status_code: 503,
        });
    };

    let leads: Vec<LeadCriteria> = req
        .leads
        .iter()
        .filter(|lead| req.lead_id.as_ref().map_or(true, |id| &lead.lead_id == id))
        .cloned()
        .collect();

    // Only active leads shape the catalog query
    let eligible: Vec<LeadCriteria> = leads.iter().filter(|lead| is_eligible(lead)).cloned().collect();

    if eligible.is_empty() {
        tracing::info!("No active pipeline leads to match");
        return HttpResponse::Ok().json(into_response(MatchRun {
            matches: Vec::new(),
            total_leads: leads.len(),
            eligible_leads: 0,
            total_listings: 0,
        }));
    }

    let listings = match fetch_catalog(catalog.as_ref(), &eligible, &state.catalog_limits).await {
        Ok(listings) => listings,
        Err(e) => {
            tracing::error!("Failed to fetch listing catalog: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch listings".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    tracing::debug!("Fetched {} listings for {} leads", listings.len(), leads.len());

    let run = state.matcher.match_leads_with(&leads, &listings, &options);

    tracing::info!(
        "Returning {} matches for {} leads (from {} listings)",
        run.matches.len(),
        run.eligible_leads,
        run.total_listings
    );

    HttpResponse::Ok().json(into_response(run))
}

/// Per-request overrides fall back to the matcher's configured options
fn resolve_options(
    matcher: &Matcher,
    max_matches_per_lead: Option<i64>,
    min_score: Option<i64>,
) -> Result<MatchOptions, MatchError> {
    let defaults = matcher.options();
    MatchOptions::new(
        max_matches_per_lead.unwrap_or(defaults.max_matches_per_lead() as i64),
        min_score.unwrap_or(defaults.min_score() as i64),
    )
}

fn into_response(run: MatchRun) -> MatchLeadsResponse {
    MatchLeadsResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        match_count: run.matches.len(),
        matches: run.matches,
        total_leads: run.total_leads,
        eligible_leads: run.eligible_leads,
        total_listings: run.total_listings,
    }
}

fn validation_failed(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}
