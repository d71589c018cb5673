use serde::{Deserialize, Serialize};

/// Thresholds governing allotment and refresh behaviour. Passed into the
/// engines explicitly so tests can vary them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Matches required before a funding request counts as allotted
    pub minimum_investors_for_allotment: usize,
    /// How many times a founder may refresh one funding request
    pub max_refresh_count: u32,
    /// Hours that must elapse between refreshes of the same request
    pub refresh_cooldown_hours: i64,
    /// Upper bound on `count` for AI selection
    pub max_ai_match_count: usize,
    /// Maximum length of match notes, in characters
    pub max_notes_len: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            minimum_investors_for_allotment: 5,
            max_refresh_count: 3,
            refresh_cooldown_hours: 24,
            max_ai_match_count: 20,
            max_notes_len: 500,
        }
    }
}
