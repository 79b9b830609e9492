use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{LeadCriteria, Listing};

/// Request to match leads against a caller-supplied catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchLeadsRequest {
    #[validate(nested)]
    #[serde(default)]
    pub leads: Vec<LeadCriteria>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[validate(range(min = 0))]
    #[serde(alias = "max_matches_per_lead", rename = "maxMatchesPerLead")]
    pub max_matches_per_lead: Option<i64>,
    #[validate(range(min = 0, max = 100))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<i64>,
}

/// Request to match leads against the configured listing catalog
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogMatchRequest {
    #[validate(nested)]
    #[serde(default)]
    pub leads: Vec<LeadCriteria>,
    #[serde(alias = "lead_id", rename = "leadId")]
    pub lead_id: Option<String>,
    #[validate(range(min = 0))]
    #[serde(alias = "max_matches_per_lead", rename = "maxMatchesPerLead")]
    pub max_matches_per_lead: Option<i64>,
    #[validate(range(min = 0, max = 100))]
    #[serde(alias = "min_score", rename = "minScore")]
    pub min_score: Option<i64>,
}
