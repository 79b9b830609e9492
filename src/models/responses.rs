use serde::{Deserialize, Serialize};
use crate::models::domain::ListingMatch;

/// Response for the match endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLeadsResponse {
    pub run_id: String,
    pub matches: Vec<ListingMatch>,
    pub total_leads: usize,
    pub eligible_leads: usize,
    pub total_listings: usize,
    pub match_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
