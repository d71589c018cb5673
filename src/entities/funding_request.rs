use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a funding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FundingRequestStatus {
    Open,
    Allotted,
    Closed,
}

impl std::fmt::Display for FundingRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundingRequestStatus::Open => write!(f, "open"),
            FundingRequestStatus::Allotted => write!(f, "allotted"),
            FundingRequestStatus::Closed => write!(f, "closed"),
        }
    }
}

/// How investors were assigned to a funding request (or to a single match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMethod {
    Manual,
    Ai,
}

/// Ordered funding-stage progression. Ordering drives stage adjacency in the
/// scorer: two stages one step apart count as adjacent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    Growth,
}

impl FundingStage {
    /// Parse a free-form stage label as found on investor profiles.
    /// Returns None for labels outside the known progression.
    pub fn from_label(label: &str) -> Option<FundingStage> {
        let normalized: String = label
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "preseed" => Some(FundingStage::PreSeed),
            "seed" => Some(FundingStage::Seed),
            "seriesa" => Some(FundingStage::SeriesA),
            "seriesb" => Some(FundingStage::SeriesB),
            "seriesc" => Some(FundingStage::SeriesC),
            "growth" | "latestage" | "growthlatestage" => Some(FundingStage::Growth),
            _ => None,
        }
    }

    /// Position on the ordered progression, used for adjacency checks.
    pub fn ordinal(self) -> i32 {
        match self {
            FundingStage::PreSeed => 0,
            FundingStage::Seed => 1,
            FundingStage::SeriesA => 2,
            FundingStage::SeriesB => 3,
            FundingStage::SeriesC => 4,
            FundingStage::Growth => 5,
        }
    }

    pub fn is_adjacent_to(self, other: FundingStage) -> bool {
        (self.ordinal() - other.ordinal()).abs() == 1
    }
}

/// A founder's request for capital. Owned by exactly one founder; mutated
/// only through whitelisted patches (see `FundingRequestPatch`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FundingRequest {
    pub id: Uuid,
    pub founder_id: Uuid,
    pub funding_amount: f64,
    pub currency: String,
    pub funding_stage: FundingStage,
    /// Equity offered in percent, 0-100
    pub equity_offered: Option<f64>,
    pub status: FundingRequestStatus,
    pub allotted_at: Option<DateTime<Utc>>,
    pub allotted_by: Option<Uuid>,
    pub allotment_method: Option<AssignmentMethod>,
    /// Running average of AI-assigned match scores, 0-100
    pub ai_match_score: Option<f64>,
    pub refresh_count: u32,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FundingRequest {
    pub fn new(founder_id: Uuid, funding_amount: f64, currency: &str, stage: FundingStage) -> Self {
        FundingRequest {
            id: Uuid::new_v4(),
            founder_id,
            funding_amount,
            currency: currency.to_string(),
            funding_stage: stage,
            equity_offered: None,
            status: FundingRequestStatus::Open,
            allotted_at: None,
            allotted_by: None,
            allotment_method: None,
            ai_match_score: None,
            refresh_count: 0,
            last_refreshed_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Whitelisted field updates for a funding request. Outer `Option` means
/// "leave untouched"; inner `Option` carries nullable columns.
#[derive(Debug, Clone, Default)]
pub struct FundingRequestPatch {
    pub status: Option<FundingRequestStatus>,
    pub allotted_at: Option<Option<DateTime<Utc>>>,
    pub allotted_by: Option<Option<Uuid>>,
    pub allotment_method: Option<Option<AssignmentMethod>>,
    pub ai_match_score: Option<Option<f64>>,
    pub refresh_count: Option<u32>,
    pub last_refreshed_at: Option<Option<DateTime<Utc>>>,
}

impl FundingRequestPatch {
    pub fn apply_to(&self, request: &mut FundingRequest) {
        if let Some(status) = self.status {
            request.status = status;
        }
        if let Some(allotted_at) = self.allotted_at {
            request.allotted_at = allotted_at;
        }
        if let Some(allotted_by) = self.allotted_by {
            request.allotted_by = allotted_by;
        }
        if let Some(method) = self.allotment_method {
            request.allotment_method = method;
        }
        if let Some(score) = self.ai_match_score {
            request.ai_match_score = score;
        }
        if let Some(count) = self.refresh_count {
            request.refresh_count = count;
        }
        if let Some(refreshed) = self.last_refreshed_at {
            request.last_refreshed_at = refreshed;
        }
    }
}
