//! Lead Matcher - lead-to-listing matching service for real estate pipelines
//!
//! This library provides the matching engine that ranks active listings for
//! each buyer lead, plus the catalog plumbing and HTTP surface around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{match_leads_to_listings, score_match, MatchError, MatchOptions, Matcher};
pub use crate::models::{LeadCriteria, Listing, ListingMatch, MatchLeadsRequest, MatchLeadsResponse};
