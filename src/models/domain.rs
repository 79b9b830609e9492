use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Buyer interest profile as recorded in the lead pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LeadCriteria {
    #[validate(length(min = 1))]
    #[serde(rename = "leadId")]
    pub lead_id: String,
    #[serde(default = "default_lead_name", deserialize_with = "lead_name_or_unknown")]
    pub name: String,
    #[serde(default)]
    pub neighborhoods: Option<String>,
    #[serde(rename = "mustHaves", default)]
    pub must_haves: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub financing: Option<String>,
    #[serde(rename = "heatScore", default, deserialize_with = "null_as_default")]
    pub heat_score: f64,
    #[serde(rename = "pipelineStage", default, deserialize_with = "null_as_default")]
    pub pipeline_stage: String,
}

fn default_lead_name() -> String {
    "Unknown".to_string()
}

fn lead_name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()).unwrap_or_else(default_lead_name))
}

/// Explicit `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Photo or document attached to a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingMedia {
    #[serde(rename = "MediaURL", default, deserialize_with = "null_as_default")]
    pub media_url: String,
    #[serde(rename = "Order", default)]
    pub order: Option<i32>,
}

/// Active property record from the listing catalog
///
/// Field names follow the RESO property resource so catalog payloads
/// deserialize without a mapping layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    pub listing_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub listing_id: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub unparsed_address: Option<String>,
    #[serde(default)]
    pub street_number: Option<String>,
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub street_suffix: Option<String>,
    #[serde(default)]
    pub public_remarks: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub list_price: f64,
    #[serde(default)]
    pub bedrooms_total: Option<u32>,
    #[serde(default)]
    pub bathrooms_total_integer: Option<u32>,
    #[serde(default)]
    pub living_area: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<ListingMedia>,
}

impl Listing {
    /// Display address, falling back to street parts and then "Unknown"
    pub fn display_address(&self) -> String {
        if let Some(address) = self.unparsed_address.as_deref().filter(|a| !a.is_empty()) {
            return address.to_string();
        }

        let parts: Vec<&str> = [&self.street_number, &self.street_name, &self.street_suffix]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            "Unknown".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// URL of the lowest-ordered media item; missing order counts as 0
    pub fn representative_photo(&self) -> Option<&str> {
        self.media
            .iter()
            .min_by_key(|m| m.order.unwrap_or(0))
            .map(|m| m.media_url.as_str())
    }
}

/// Scored (lead, listing) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMatch {
    pub lead_id: String,
    pub lead_name: String,
    pub listing_key: String,
    pub listing_id: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub list_price: f64,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub living_area: Option<f64>,
    pub property_type: String,
    pub photo_url: Option<String>,
    pub match_score: u8,
    pub match_reasons: Vec<String>,
}

impl ListingMatch {
    pub(crate) fn new(
        lead: &LeadCriteria,
        listing: &Listing,
        match_score: u8,
        match_reasons: Vec<String>,
    ) -> Self {
        Self {
            lead_id: lead.lead_id.clone(),
            lead_name: lead.name.clone(),
            listing_key: listing.listing_key.clone(),
            listing_id: listing.listing_id.clone(),
            address: listing.display_address(),
            city: listing.city.clone().unwrap_or_default(),
            postal_code: listing.postal_code.clone().unwrap_or_default(),
            list_price: listing.list_price,
            bedrooms: listing.bedrooms_total.filter(|&b| b > 0),
            bathrooms: listing.bathrooms_total_integer.filter(|&b| b > 0),
            living_area: listing.living_area.filter(|&a| a > 0.0),
            property_type: listing.property_type.clone(),
            photo_url: listing.representative_photo().map(str::to_string),
            match_score,
            match_reasons,
        }
    }
}

/// Geographic scope for a catalog query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchArea {
    City(String),
    PostalCode(String),
}

impl SearchArea {
    /// Five ASCII digits are treated as a postal code, anything else as a city
    pub fn classify(area: &str) -> Self {
        if area.len() == 5 && area.bytes().all(|b| b.is_ascii_digit()) {
            SearchArea::PostalCode(area.to_string())
        } else {
            SearchArea::City(area.to_string())
        }
    }
}
