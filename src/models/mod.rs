// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{LeadCriteria, Listing, ListingMatch, ListingMedia, SearchArea};
pub use requests::{CatalogMatchRequest, MatchLeadsRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchLeadsResponse};
