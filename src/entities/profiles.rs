use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Company profile seeking funding. Consumed read-only by the matching core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Founder {
    pub id: Uuid,
    pub company_name: String,
    /// Industry label, e.g. "Fintech"
    pub industry: Option<String>,
    /// Free-form address, comma-separated components ("Berlin, Germany")
    pub address: Option<String>,
}

/// A single prior investment on an investor profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreviousInvestment {
    /// Funding stage label at the time of investment, e.g. "Series A"
    pub stage: Option<String>,
    pub industry: Option<String>,
}

/// Investor profile eligible for matching against funding requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Investor {
    pub id: Uuid,
    pub name: String,
    /// Industry interests, e.g. ["Fintech", "Healthtech"]
    #[serde(default)]
    pub investment_interests: Vec<String>,
    #[serde(default)]
    pub previous_investments: Vec<PreviousInvestment>,
    /// Ticket-size bucket label, e.g. "100K-500K" or "5M+"
    pub amount_range: Option<String>,
    pub location: Option<String>,
    /// Only verified investors are eligible for AI selection
    #[serde(default)]
    pub verified: bool,
}

/// Role discriminant carried by every mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Founder,
    Investor,
    Admin,
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartyRole::Founder => write!(f, "founder"),
            PartyRole::Investor => write!(f, "investor"),
            PartyRole::Admin => write!(f, "admin"),
        }
    }
}

/// A resolved participant: profile variants plus the admin role, so downstream
/// code dispatches on the tag instead of re-checking role strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Party {
    Founder(Founder),
    Investor(Investor),
    Admin,
}

impl Party {
    pub fn role(&self) -> PartyRole {
        match self {
            Party::Founder(_) => PartyRole::Founder,
            Party::Investor(_) => PartyRole::Investor,
            Party::Admin => PartyRole::Admin,
        }
    }
}

/// Identity of the authenticated caller, trusted as-is from the HTTP layer.
/// The core only checks role and ownership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActingUser {
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
}

impl ActingUser {
    pub fn is_admin(&self) -> bool {
        self.actor_role == PartyRole::Admin
    }

    pub fn is_founder(&self) -> bool {
        self.actor_role == PartyRole::Founder
    }
}
