// Core algorithm exports
pub mod catalog;
pub mod matcher;
pub mod normalizer;
pub mod scoring;

pub use catalog::{dedup_by_listing_key, search_areas};
pub use matcher::{
    is_eligible, match_leads_to_listings, MatchError, MatchOptions, MatchRun, Matcher,
    DEFAULT_MAX_MATCHES_PER_LEAD, DEFAULT_MIN_SCORE, EXCLUDED_STAGES,
};
pub use normalizer::{parse_must_haves, parse_neighborhoods, Financing, NormalizedLead, Timeline};
pub use scoring::{score_match, score_normalized};
