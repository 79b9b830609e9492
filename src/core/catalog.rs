use std::collections::HashSet;
use crate::models::{LeadCriteria, Listing, SearchArea};

/// Collect the distinct search areas named across all leads
///
/// Areas keep the casing the lead entered them with and their first-seen
/// order; only the first `max_areas` are returned.
pub fn search_areas(leads: &[LeadCriteria], max_areas: usize) -> Vec<SearchArea> {
    let mut seen = HashSet::new();

    leads
        .iter()
        .filter_map(|lead| lead.neighborhoods.as_deref())
        .flat_map(|text| text.split([',', ';']))
        .map(str::trim)
        .filter(|area| area.chars().count() > 1)
        .filter(|area| seen.insert(area.to_string()))
        .take(max_areas)
        .map(SearchArea::classify)
        .collect()
}

/// Flatten per-area batches, keeping the first listing seen for each key
pub fn dedup_by_listing_key<I>(batches: I) -> Vec<Listing>
where
    I: IntoIterator<Item = Vec<Listing>>,
{
    let mut seen = HashSet::new();

    batches
        .into_iter()
        .flatten()
        .filter(|listing| seen.insert(listing.listing_key.clone()))
        .collect()
}
