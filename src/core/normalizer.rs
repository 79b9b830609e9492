use crate::models::LeadCriteria;

/// Buying timeline bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeline {
    /// "0-3 months"
    Immediate,
    /// "3-6 months"
    NearTerm,
    Unspecified,
}

impl Timeline {
    /// Exact-value lookup; anything unrecognized is `Unspecified`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("0-3 months") => Timeline::Immediate,
            Some("3-6 months") => Timeline::NearTerm,
            _ => Timeline::Unspecified,
        }
    }
}

/// Financing readiness bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Financing {
    PreApproved,
    Cash,
    NeedLender,
    Unspecified,
}

impl Financing {
    /// Exact-value lookup; anything unrecognized is `Unspecified`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("pre-approved") => Financing::PreApproved,
            Some("cash") => Financing::Cash,
            Some("need lender") => Financing::NeedLender,
            _ => Financing::Unspecified,
        }
    }
}

/// Lead criteria reduced to comparable tokens and buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLead {
    pub neighborhoods: Vec<String>,
    pub must_haves: Vec<String>,
    pub timeline: Timeline,
    pub financing: Financing,
}

impl NormalizedLead {
    pub fn from_criteria(lead: &LeadCriteria) -> Self {
        Self {
            neighborhoods: parse_neighborhoods(lead.neighborhoods.as_deref()),
            must_haves: parse_must_haves(lead.must_haves.as_deref()),
            timeline: Timeline::parse(lead.timeline.as_deref()),
            financing: Financing::parse(lead.financing.as_deref()),
        }
    }
}

/// Split neighborhood text on `,` / `;` into lowercase search terms
///
/// Single-character fragments are dropped as noise.
pub fn parse_neighborhoods(text: Option<&str>) -> Vec<String> {
    tokenize(text, &[',', ';'], 1)
}

/// Split must-have text on `,` / `;` / `.` into lowercase keywords
///
/// Fragments of two characters or fewer are dropped.
pub fn parse_must_haves(text: Option<&str>) -> Vec<String> {
    tokenize(text, &[',', ';', '.'], 2)
}

fn tokenize(text: Option<&str>, delimiters: &[char], max_noise_len: usize) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.split(delimiters)
        .map(|token| token.trim().to_lowercase())
        .filter(|token| token.chars().count() > max_noise_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_neighborhoods() {
        let hoods = parse_neighborhoods(Some("Kailua, Kapolei;  Hawaii Kai ,x,,"));
        assert_eq!(hoods, vec!["kailua", "kapolei", "hawaii kai"]);
    }

    #[test]
    fn test_parse_neighborhoods_absent() {
        assert!(parse_neighborhoods(None).is_empty());
        assert!(parse_neighborhoods(Some("")).is_empty());
        assert!(parse_neighborhoods(Some(" ; , ")).is_empty());
    }

    #[test]
    fn test_parse_must_haves() {
        let keywords = parse_must_haves(Some("Pool. Ocean View; AC, garage,ok"));
        assert_eq!(keywords, vec!["pool", "ocean view", "garage"]);
    }

    #[test]
    fn test_parse_must_haves_keeps_three_char_tokens() {
        assert_eq!(parse_must_haves(Some("gym, ac")), vec!["gym"]);
        assert!(parse_must_haves(None).is_empty());
    }

    #[test]
    fn test_timeline_parse() {
        assert_eq!(Timeline::parse(Some("0-3 months")), Timeline::Immediate);
        assert_eq!(Timeline::parse(Some("3-6 months")), Timeline::NearTerm);
        assert_eq!(Timeline::parse(Some("6-12 months")), Timeline::Unspecified);
        assert_eq!(Timeline::parse(Some("0-3 Months")), Timeline::Unspecified);
        assert_eq!(Timeline::parse(None), Timeline::Unspecified);
    }

    #[test]
    fn test_financing_parse() {
        assert_eq!(Financing::parse(Some("pre-approved")), Financing::PreApproved);
        assert_eq!(Financing::parse(Some("cash")), Financing::Cash);
        assert_eq!(Financing::parse(Some("need lender")), Financing::NeedLender);
        assert_eq!(Financing::parse(Some("Cash")), Financing::Unspecified);
        assert_eq!(Financing::parse(None), Financing::Unspecified);
    }

    #[test]
    fn test_normalized_lead_from_criteria() {
        let lead = LeadCriteria {
            lead_id: "lead-1".to_string(),
            neighborhoods: Some("Kailua".to_string()),
            must_haves: Some("lanai".to_string()),
            timeline: Some("3-6 months".to_string()),
            financing: Some("cash".to_string()),
            ..Default::default()
        };

        let normalized = NormalizedLead::from_criteria(&lead);
        assert_eq!(normalized.neighborhoods, vec!["kailua"]);
        assert_eq!(normalized.must_haves, vec!["lanai"]);
        assert_eq!(normalized.timeline, Timeline::NearTerm);
        assert_eq!(normalized.financing, Financing::Cash);
    }
}
