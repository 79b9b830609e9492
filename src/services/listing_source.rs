use crate::core::{dedup_by_listing_key, search_areas};
use crate::models::{LeadCriteria, Listing, SearchArea};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching listings from the catalog
#[derive(Debug, Error)]
pub enum ListingSourceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to load catalog file: {0}")]
    CatalogFile(String),
}

/// One catalog search: active listings, optionally scoped to an area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub area: Option<SearchArea>,
    pub limit: usize,
}

impl ListingQuery {
    pub fn in_area(area: SearchArea, limit: usize) -> Self {
        Self {
            area: Some(area),
            limit,
        }
    }

    pub fn unscoped(limit: usize) -> Self {
        Self { area: None, limit }
    }
}

/// How much of the catalog to pull for one matching run
#[derive(Debug, Clone, Copy)]
pub struct CatalogLimits {
    pub max_areas: usize,
    pub per_area_limit: usize,
    pub fallback_limit: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            max_areas: 5,
            per_area_limit: 50,
            fallback_limit: 100,
        }
    }
}

/// Source of active listings
pub trait ListingSource {
    fn search(
        &self,
        query: &ListingQuery,
    ) -> impl Future<Output = Result<Vec<Listing>, ListingSourceError>> + Send;
}

/// Assemble a deduplicated catalog for the given leads
///
/// Each distinct lead area is searched concurrently; leads without any
/// area fall back to a single unscoped query. Any failed search fails the
/// whole fetch.
pub async fn fetch_catalog<S: ListingSource>(
    source: &S,
    leads: &[LeadCriteria],
    limits: &CatalogLimits,
) -> Result<Vec<Listing>, ListingSourceError> {
    let areas = search_areas(leads, limits.max_areas);

    if areas.is_empty() {
        tracing::debug!("No lead areas, fetching latest {} listings", limits.fallback_limit);
        return source
            .search(&ListingQuery::unscoped(limits.fallback_limit))
            .await;
    }

    tracing::debug!("Fetching listings for {} areas: {:?}", areas.len(), areas);

    let queries: Vec<ListingQuery> = areas
        .into_iter()
        .map(|area| ListingQuery::in_area(area, limits.per_area_limit))
        .collect();

    let batches = join_all(queries.iter().map(|query| source.search(query)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(dedup_by_listing_key(batches))
}

#[derive(Debug, Deserialize)]
struct ODataResponse {
    value: Vec<Listing>,
}

/// RESO Web API (OData) property feed client
pub struct ODataListingSource {
    base_url: String,
    api_token: Option<String>,
    client: Client,
}

impl ODataListingSource {
    /// Create a new OData listing client
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ListingSourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_token,
            client,
        })
    }

    fn property_url(&self, query: &ListingQuery) -> String {
        let mut filters = vec!["(StandardStatus eq 'Active')".to_string()];
        match &query.area {
            Some(SearchArea::City(city)) => {
                filters.push(format!("City eq '{}'", escape_literal(city)))
            }
            Some(SearchArea::PostalCode(zip)) => {
                filters.push(format!("PostalCode eq '{}'", escape_literal(zip)))
            }
            None => {}
        }

        format!(
            "{}/Property?$filter={}&$orderby={}&$top={}&$expand=Media",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&filters.join(" and ")),
            urlencoding::encode("ModificationTimestamp desc"),
            query.limit
        )
    }
}

impl ListingSource for ODataListingSource {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, ListingSourceError> {
        let url = self.property_url(query);

        tracing::debug!("Fetching listings from: {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ListingSourceError::Unauthorized);
            }
            status => {
                return Err(ListingSourceError::ApiError(format!(
                    "Failed to fetch listings: {}",
                    status
                )));
            }
        }

        let body = response.text().await?;
        let parsed: ODataResponse = serde_json::from_str(&body).map_err(|e| {
            ListingSourceError::InvalidResponse(format!("Failed to parse listings: {}", e))
        })?;

        Ok(parsed.value)
    }
}

/// OData string literals escape a single quote by doubling it
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Fixed in-memory catalog, e.g. loaded from a JSON export
#[derive(Debug, Clone, Default)]
pub struct StaticListingSource {
    listings: Vec<Listing>,
}

impl StaticListingSource {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Load a JSON array of listings from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ListingSourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ListingSourceError::CatalogFile(format!("{}: {}", path.display(), e)))?;
        let listings = serde_json::from_str(&json)
            .map_err(|e| ListingSourceError::CatalogFile(format!("{}: {}", path.display(), e)))?;

        Ok(Self::new(listings))
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl ListingSource for StaticListingSource {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, ListingSourceError> {
        let in_area = |listing: &Listing| match &query.area {
            Some(SearchArea::City(city)) => listing
                .city
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(city)),
            Some(SearchArea::PostalCode(zip)) => listing.postal_code.as_deref() == Some(zip.as_str()),
            None => true,
        };

        Ok(self
            .listings
            .iter()
            .filter(|&listing| in_area(listing))
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// Listing source selected by configuration
pub enum CatalogSource {
    OData(ODataListingSource),
    Static(StaticListingSource),
}

impl ListingSource for CatalogSource {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, ListingSourceError> {
        match self {
            CatalogSource::OData(source) => source.search(query).await,
            CatalogSource::Static(source) => source.search(query).await,
        }
    }
}
