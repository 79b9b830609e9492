use thiserror::Error;
use crate::models::{LeadCriteria, Listing, ListingMatch};
use crate::core::{normalizer::NormalizedLead, scoring::score_normalized};

pub const DEFAULT_MAX_MATCHES_PER_LEAD: usize = 5;
pub const DEFAULT_MIN_SCORE: u8 = 25;

/// Pipeline stages whose leads are never matched
pub const EXCLUDED_STAGES: [&str; 2] = ["closed_and_followup", "review_request"];

/// Caller configuration violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("maxMatchesPerLead must be >= 0, got {0}")]
    InvalidMaxMatches(i64),

    #[error("minScore must be within 0-100, got {0}")]
    MinScoreOutOfRange(i64),
}

/// Validated selection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    max_matches_per_lead: usize,
    min_score: u8,
}

impl MatchOptions {
    /// Reject out-of-range values instead of clamping them
    pub fn new(max_matches_per_lead: i64, min_score: i64) -> Result<Self, MatchError> {
        let max_matches_per_lead = usize::try_from(max_matches_per_lead)
            .map_err(|_| MatchError::InvalidMaxMatches(max_matches_per_lead))?;

        let min_score = u8::try_from(min_score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or(MatchError::MinScoreOutOfRange(min_score))?;

        Ok(Self {
            max_matches_per_lead,
            min_score,
        })
    }

    pub fn max_matches_per_lead(&self) -> usize {
        self.max_matches_per_lead
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_matches_per_lead: DEFAULT_MAX_MATCHES_PER_LEAD,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Result of one matching run
#[derive(Debug)]
pub struct MatchRun {
    pub matches: Vec<ListingMatch>,
    pub total_leads: usize,
    pub eligible_leads: usize,
    pub total_listings: usize,
}

/// Whether a lead's pipeline stage takes part in matching
#[inline]
pub fn is_eligible(lead: &LeadCriteria) -> bool {
    !EXCLUDED_STAGES.contains(&lead.pipeline_stage.as_str())
}

/// Main matching orchestrator - ranks listings for every eligible lead
///
/// # Pipeline Stages
/// 1. Pipeline stage eligibility
/// 2. Pairwise scoring against the full catalog
/// 3. Minimum score filter
/// 4. Per-lead ranking and cap
/// 5. Global ranking
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    options: MatchOptions,
}

impl Matcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Match leads against the catalog with this matcher's options
    pub fn match_leads(&self, leads: &[LeadCriteria], listings: &[Listing]) -> MatchRun {
        self.match_leads_with(leads, listings, &self.options)
    }

    /// Match leads against the catalog with per-call options
    pub fn match_leads_with(
        &self,
        leads: &[LeadCriteria],
        listings: &[Listing],
        options: &MatchOptions,
    ) -> MatchRun {
        let eligible_leads = leads.iter().filter(|lead| is_eligible(lead)).count();
        let matches = match_leads_to_listings(leads, listings, options);

        tracing::debug!(
            "Matched {} of {} leads against {} listings: {} results",
            eligible_leads,
            leads.len(),
            listings.len(),
            matches.len()
        );

        MatchRun {
            matches,
            total_leads: leads.len(),
            eligible_leads,
            total_listings: listings.len(),
        }
    }
}

/// Rank listings for each eligible lead and merge into one list
///
/// Equal scores keep their input order: catalog order within a lead and
/// lead order across leads, since both sorts are stable.
pub fn match_leads_to_listings(
    leads: &[LeadCriteria],
    listings: &[Listing],
    options: &MatchOptions,
) -> Vec<ListingMatch> {
    let mut all_matches: Vec<ListingMatch> = leads
        .iter()
        .filter(|lead| is_eligible(lead))
        .flat_map(|lead| rank_for_lead(lead, listings, options))
        .collect();

    sort_by_score(&mut all_matches);
    all_matches
}

fn rank_for_lead(
    lead: &LeadCriteria,
    listings: &[Listing],
    options: &MatchOptions,
) -> Vec<ListingMatch> {
    let normalized = NormalizedLead::from_criteria(lead);

    let mut lead_matches: Vec<ListingMatch> = listings
        .iter()
        .filter_map(|listing| {
            let (score, reasons) = score_normalized(&normalized, listing);
            (score >= options.min_score).then(|| ListingMatch::new(lead, listing, score, reasons))
        })
        .collect();

    sort_by_score(&mut lead_matches);
    lead_matches.truncate(options.max_matches_per_lead);
    lead_matches
}

#[inline]
fn sort_by_score(matches: &mut [ListingMatch]) {
    matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}
