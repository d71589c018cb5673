use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::funding_request::AssignmentMethod;

/// Workflow status of an individual founder-investor match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Contacted,
    Interested,
    Declined,
    Funded,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Active => write!(f, "active"),
            MatchStatus::Contacted => write!(f, "contacted"),
            MatchStatus::Interested => write!(f, "interested"),
            MatchStatus::Declined => write!(f, "declined"),
            MatchStatus::Funded => write!(f, "funded"),
        }
    }
}

/// Per-criterion outcome of the scorer. All false for manual assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MatchCriteria {
    pub industry_match: bool,
    pub stage_match: bool,
    pub amount_match: bool,
    pub location_match: bool,
    pub experience_match: bool,
}

/// A founder-investor-fundingRequest association. At most one record may
/// exist per (funding_request_id, founder_id, investor_id) triple; the store
/// enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchRecord {
    pub id: Uuid,
    pub funding_request_id: Uuid,
    pub founder_id: Uuid,
    pub investor_id: Uuid,
    /// 0-100; always 0 for manual assignments
    pub match_score: u8,
    pub match_criteria: MatchCriteria,
    pub assignment_method: AssignmentMethod,
    pub status: MatchStatus,
    pub contacted_at: Option<DateTime<Utc>>,
    pub response_at: Option<DateTime<Utc>>,
    /// Free-form notes, at most 500 characters
    pub notes: Option<String>,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(
        funding_request_id: Uuid,
        founder_id: Uuid,
        investor_id: Uuid,
        match_score: u8,
        match_criteria: MatchCriteria,
        assignment_method: AssignmentMethod,
    ) -> Self {
        MatchRecord {
            id: Uuid::new_v4(),
            funding_request_id,
            founder_id,
            investor_id,
            match_score,
            match_criteria,
            assignment_method,
            status: MatchStatus::Active,
            contacted_at: None,
            response_at: None,
            notes: None,
            email_sent: false,
            email_sent_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Whitelisted field updates for a match record.
#[derive(Debug, Clone, Default)]
pub struct MatchPatch {
    pub status: Option<MatchStatus>,
    pub contacted_at: Option<Option<DateTime<Utc>>>,
    pub response_at: Option<Option<DateTime<Utc>>>,
    pub notes: Option<Option<String>>,
    pub email_sent: Option<bool>,
    pub email_sent_at: Option<Option<DateTime<Utc>>>,
}

impl MatchPatch {
    pub fn apply_to(&self, record: &mut MatchRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(contacted_at) = self.contacted_at {
            record.contacted_at = contacted_at;
        }
        if let Some(response_at) = self.response_at {
            record.response_at = response_at;
        }
        if let Some(ref notes) = self.notes {
            record.notes = notes.clone();
        }
        if let Some(email_sent) = self.email_sent {
            record.email_sent = email_sent;
        }
        if let Some(email_sent_at) = self.email_sent_at {
            record.email_sent_at = email_sent_at;
        }
    }
}

/// Count of matches per status for one funding request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusBreakdown {
    pub active: usize,
    pub contacted: usize,
    pub interested: usize,
    pub declined: usize,
    pub funded: usize,
    pub total: usize,
}

impl StatusBreakdown {
    pub fn from_statuses<I: IntoIterator<Item = MatchStatus>>(statuses: I) -> Self {
        let mut breakdown = StatusBreakdown::default();
        for status in statuses {
            match status {
                MatchStatus::Active => breakdown.active += 1,
                MatchStatus::Contacted => breakdown.contacted += 1,
                MatchStatus::Interested => breakdown.interested += 1,
                MatchStatus::Declined => breakdown.declined += 1,
                MatchStatus::Funded => breakdown.funded += 1,
            }
            breakdown.total += 1;
        }
        breakdown
    }
}
