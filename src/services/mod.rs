// Service exports
pub mod listing_source;

pub use listing_source::{
    fetch_catalog, CatalogLimits, CatalogSource, ListingQuery, ListingSource, ListingSourceError,
    ODataListingSource, StaticListingSource,
};
