use crate::models::{LeadCriteria, Listing};
use crate::core::normalizer::{Financing, NormalizedLead, Timeline};

/// Points for a neighborhood found in the listing's location fields
pub const LOCATION_MATCH_POINTS: u32 = 40;
/// Partial credit when the lead is open to all areas
pub const NO_LOCATION_PREFERENCE_POINTS: u32 = 15;
pub const MUST_HAVE_POINTS: u32 = 10;
pub const MAX_MUST_HAVE_MATCHES: usize = 3;
pub const MAX_SCORE: u32 = 100;

/// Calculate a match score (0-100) for a listing against raw lead criteria
///
/// Scoring formula:
/// score = (
///     location    0-40    # first neighborhood found in city/zip/address,
///                         # flat 15 when no preference is given
///     must-haves  0-30    # 10 per keyword found in remarks, max 3
///     timeline    0-15    # 0-3 months = 15, 3-6 months = 8
///     financing   0-15    # pre-approved/cash = 15, need lender = 5
/// )
pub fn score_match(lead: &LeadCriteria, listing: &Listing) -> (u8, Vec<String>) {
    score_normalized(&NormalizedLead::from_criteria(lead), listing)
}

/// Score an already-normalized lead; reasons follow evaluation order
pub fn score_normalized(lead: &NormalizedLead, listing: &Listing) -> (u8, Vec<String>) {
    let mut reasons = Vec::new();

    let total = location_points(&lead.neighborhoods, listing, &mut reasons)
        + must_have_points(&lead.must_haves, listing, &mut reasons)
        + timeline_points(lead.timeline, &mut reasons)
        + financing_points(lead.financing, &mut reasons);

    (total.min(MAX_SCORE) as u8, reasons)
}

fn location_points(neighborhoods: &[String], listing: &Listing, reasons: &mut Vec<String>) -> u32 {
    if neighborhoods.is_empty() {
        reasons.push("No location preference (open to all areas)".to_string());
        return NO_LOCATION_PREFERENCE_POINTS;
    }

    let fields = [
        lowercase(listing.city.as_deref()),
        lowercase(listing.postal_code.as_deref()),
        lowercase(listing.unparsed_address.as_deref()),
    ];

    match neighborhoods
        .iter()
        .find(|hood| fields.iter().any(|field| field.contains(hood.as_str())))
    {
        Some(hood) => {
            reasons.push(format!("Location match: {}", hood));
            LOCATION_MATCH_POINTS
        }
        None => 0,
    }
}

fn must_have_points(must_haves: &[String], listing: &Listing, reasons: &mut Vec<String>) -> u32 {
    let remarks = lowercase(listing.public_remarks.as_deref());

    let matched: Vec<&String> = must_haves
        .iter()
        .filter(|keyword| remarks.contains(keyword.as_str()))
        .take(MAX_MUST_HAVE_MATCHES)
        .collect();

    for keyword in &matched {
        reasons.push(format!("Has: {}", keyword));
    }

    matched.len() as u32 * MUST_HAVE_POINTS
}

#[inline]
fn timeline_points(timeline: Timeline, reasons: &mut Vec<String>) -> u32 {
    let (points, reason) = match timeline {
        Timeline::Immediate => (15, "Ready to buy (0-3 months)"),
        Timeline::NearTerm => (8, "Buying in 3-6 months"),
        Timeline::Unspecified => return 0,
    };
    reasons.push(reason.to_string());
    points
}

#[inline]
fn financing_points(financing: Financing, reasons: &mut Vec<String>) -> u32 {
    let (points, reason) = match financing {
        Financing::PreApproved => (15, "Pre-approved financing"),
        Financing::Cash => (15, "Cash buyer"),
        Financing::NeedLender => (5, "Needs lender referral"),
        Financing::Unspecified => return 0,
    };
    reasons.push(reason.to_string());
    points
}

#[inline]
fn lowercase(field: Option<&str>) -> String {
    field.unwrap_or_default().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_lead(
        neighborhoods: Option<&str>,
        must_haves: Option<&str>,
        timeline: Option<&str>,
        financing: Option<&str>,
    ) -> LeadCriteria {
        LeadCriteria {
            lead_id: "lead-1".to_string(),
            name: "Test Lead".to_string(),
            neighborhoods: neighborhoods.map(str::to_string),
            must_haves: must_haves.map(str::to_string),
            timeline: timeline.map(str::to_string),
            financing: financing.map(str::to_string),
            heat_score: 50.0,
            pipeline_stage: "new".to_string(),
        }
    }

    fn create_test_listing(city: &str, postal_code: &str, address: &str, remarks: &str) -> Listing {
        Listing {
            listing_key: "key-1".to_string(),
            listing_id: "MLS-1".to_string(),
            city: Some(city.to_string()),
            postal_code: Some(postal_code.to_string()),
            unparsed_address: Some(address.to_string()),
            public_remarks: Some(remarks.to_string()),
            list_price: 950_000.0,
            property_type: "Residential".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_location_match_on_city() {
        let lead = create_test_lead(Some("Kailua, Kapolei"), None, Some("0-3 months"), Some("cash"));
        let listing = create_test_listing("Kailua", "96734", "123 Kuulei Rd", "");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 70);
        assert_eq!(
            reasons,
            vec!["Location match: kailua", "Ready to buy (0-3 months)", "Cash buyer"]
        );
    }

    #[test]
    fn test_location_match_on_postal_code_and_address() {
        let zip_lead = create_test_lead(Some("96707"), None, None, None);
        let listing = create_test_listing("Honolulu", "96707", "91-1001 Kaimalie St", "");
        let (score, reasons) = score_match(&zip_lead, &listing);
        assert_eq!(score, 40);
        assert_eq!(reasons, vec!["Location match: 96707"]);

        let street_lead = create_test_lead(Some("kaimalie"), None, None, None);
        let (score, _) = score_match(&street_lead, &listing);
        assert_eq!(score, 40);
    }

    #[test]
    fn test_only_first_matching_neighborhood_recorded() {
        let lead = create_test_lead(Some("Waikiki, Kailua, Kai"), None, None, None);
        let listing = create_test_listing("Kailua", "96734", "1 Kailua Rd", "");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 40);
        assert_eq!(reasons, vec!["Location match: kailua"]);
    }

    #[test]
    fn test_location_preference_without_match_scores_zero() {
        let lead = create_test_lead(Some("Hilo"), None, None, None);
        let listing = create_test_listing("Kailua", "96734", "1 Kailua Rd", "");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_no_location_preference_default() {
        let lead = create_test_lead(None, None, None, None);
        let listing = create_test_listing("Hilo", "96720", "", "");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 15);
        assert_eq!(reasons, vec!["No location preference (open to all areas)"]);
    }

    #[test]
    fn test_must_haves_capped_at_three() {
        let lead = create_test_lead(
            Some("Kailua"),
            Some("pool, garage, lanai, solar, ocean view"),
            None,
            None,
        );
        let listing = create_test_listing(
            "Kailua",
            "96734",
            "",
            "Pool, 2-car garage, covered lanai, owned solar and ocean view",
        );

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 70);
        assert_eq!(
            reasons,
            vec!["Location match: kailua", "Has: pool", "Has: garage", "Has: lanai"]
        );
    }

    #[test]
    fn test_must_haves_skip_missing_keywords() {
        let lead = create_test_lead(None, Some("pool, garage, lanai"), None, None);
        let listing = create_test_listing("Hilo", "96720", "", "Large lanai and new roof");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 25);
        assert_eq!(reasons[1], "Has: lanai");
    }

    #[test]
    fn test_missing_remarks_award_nothing() {
        let lead = create_test_lead(None, Some("pool"), None, None);
        let mut listing = create_test_listing("Hilo", "96720", "", "");
        listing.public_remarks = None;

        let (score, _) = score_match(&lead, &listing);
        assert_eq!(score, 15);
    }

    #[test]
    fn test_timeline_and_financing_points() {
        let listing = create_test_listing("Hilo", "96720", "", "");

        let cases = [
            (Some("3-6 months"), Some("need lender"), 15 + 8 + 5),
            (Some("0-3 months"), Some("pre-approved"), 15 + 15 + 15),
            (Some("someday"), Some("unsure"), 15),
        ];

        for (timeline, financing, expected) in cases {
            let lead = create_test_lead(None, None, timeline, financing);
            let (score, _) = score_match(&lead, &listing);
            assert_eq!(score, expected, "timeline={:?} financing={:?}", timeline, financing);
        }
    }

    #[test]
    fn test_best_case_reaches_exactly_max() {
        let lead = create_test_lead(
            Some("Kailua"),
            Some("pool, garage, lanai, solar"),
            Some("0-3 months"),
            Some("pre-approved"),
        );
        let listing = create_test_listing("Kailua", "96734", "", "pool garage lanai solar");

        let (score, reasons) = score_match(&lead, &listing);

        assert_eq!(score, 100);
        assert_eq!(reasons.len(), 6);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let lead = create_test_lead(Some("Kailua"), Some("pool"), Some("3-6 months"), Some("cash"));
        let listing = create_test_listing("Kailua", "96734", "", "Pool home");

        assert_eq!(score_match(&lead, &listing), score_match(&lead, &listing));
    }
}
