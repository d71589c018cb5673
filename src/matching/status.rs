use crate::entities::{MatchStatus, NotificationPriority};
use crate::error::AppError;

/// States reachable from `current`, forward and revert paths combined.
///
/// Forward: active -> {contacted, declined}, contacted -> {interested,
/// declined}, interested -> {funded, declined}. Reverts for re-engagement:
/// contacted -> active, interested -> contacted, declined -> {active,
/// contacted}. Funded is strictly terminal.
pub fn allowed_transitions(current: MatchStatus) -> &'static [MatchStatus] {
    match current {
        MatchStatus::Active => &[MatchStatus::Contacted, MatchStatus::Declined],
        MatchStatus::Contacted => &[
            MatchStatus::Interested,
            MatchStatus::Declined,
            MatchStatus::Active,
        ],
        MatchStatus::Interested => &[
            MatchStatus::Funded,
            MatchStatus::Declined,
            MatchStatus::Contacted,
        ],
        MatchStatus::Declined => &[MatchStatus::Active, MatchStatus::Contacted],
        MatchStatus::Funded => &[],
    }
}

/// Derived effects of a validated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEffects {
    pub new_status: MatchStatus,
    /// active -> contacted stamps the first outreach time
    pub sets_contacted_at: bool,
    /// entering interested or funded stamps the response time
    pub sets_response_at: bool,
    /// terminal-ish states notify the founder
    pub notify_priority: Option<NotificationPriority>,
}

/// What a status-update request amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Requested status equals the current one: only notes may change and no
    /// notification is emitted.
    NotesOnly,
    Transition(TransitionEffects),
}

/// Validate a requested status change against the transition table.
pub fn plan_transition(
    current: MatchStatus,
    requested: MatchStatus,
) -> Result<TransitionOutcome, AppError> {
    if current == requested {
        return Ok(TransitionOutcome::NotesOnly);
    }

    let allowed = allowed_transitions(current);
    if !allowed.contains(&requested) {
        let names: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        return Err(AppError::Validation(format!(
            "Invalid status transition from '{}' to '{}'. Allowed next states: {}",
            current,
            requested,
            if names.is_empty() {
                "none".to_string()
            } else {
                names.join(", ")
            }
        )));
    }

    let notify_priority = match requested {
        MatchStatus::Interested => Some(NotificationPriority::High),
        MatchStatus::Funded => Some(NotificationPriority::Urgent),
        MatchStatus::Declined => Some(NotificationPriority::Medium),
        _ => None,
    };

    Ok(TransitionOutcome::Transition(TransitionEffects {
        new_status: requested,
        sets_contacted_at: current == MatchStatus::Active && requested == MatchStatus::Contacted,
        sets_response_at: matches!(requested, MatchStatus::Interested | MatchStatus::Funded),
        notify_priority,
    }))
}
