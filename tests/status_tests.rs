use fundmatch::entities::{MatchStatus, NotificationPriority, StatusBreakdown};
use fundmatch::error::AppError;
use fundmatch::matching::{allowed_transitions, plan_transition, TransitionOutcome};

fn effects(current: MatchStatus, requested: MatchStatus) -> fundmatch::matching::TransitionEffects {
    match plan_transition(current, requested).unwrap() {
        TransitionOutcome::Transition(effects) => effects,
        TransitionOutcome::NotesOnly => panic!("expected a transition"),
    }
}

#[test]
fn test_transition_table() {
    assert_eq!(
        allowed_transitions(MatchStatus::Active),
        &[MatchStatus::Contacted, MatchStatus::Declined]
    );
    assert_eq!(
        allowed_transitions(MatchStatus::Contacted),
        &[
            MatchStatus::Interested,
            MatchStatus::Declined,
            MatchStatus::Active
        ]
    );
    assert_eq!(
        allowed_transitions(MatchStatus::Interested),
        &[
            MatchStatus::Funded,
            MatchStatus::Declined,
            MatchStatus::Contacted
        ]
    );
    assert_eq!(
        allowed_transitions(MatchStatus::Declined),
        &[MatchStatus::Active, MatchStatus::Contacted]
    );
    assert!(allowed_transitions(MatchStatus::Funded).is_empty());
}

#[test]
fn test_contacted_transition_stamps_contacted_at() {
    let effects = effects(MatchStatus::Active, MatchStatus::Contacted);
    assert!(effects.sets_contacted_at);
    assert!(!effects.sets_response_at);
    assert!(effects.notify_priority.is_none());
}

#[test]
fn test_interested_and_funded_stamp_response_at() {
    let interested = effects(MatchStatus::Contacted, MatchStatus::Interested);
    assert!(interested.sets_response_at);
    assert!(!interested.sets_contacted_at);
    assert_eq!(
        interested.notify_priority,
        Some(NotificationPriority::High)
    );

    let funded = effects(MatchStatus::Interested, MatchStatus::Funded);
    assert!(funded.sets_response_at);
    assert_eq!(funded.notify_priority, Some(NotificationPriority::Urgent));
}

#[test]
fn test_declined_notifies_with_medium_priority() {
    for from in [
        MatchStatus::Active,
        MatchStatus::Contacted,
        MatchStatus::Interested,
    ] {
        let declined = effects(from, MatchStatus::Declined);
        assert!(!declined.sets_contacted_at);
        assert!(!declined.sets_response_at);
        assert_eq!(declined.notify_priority, Some(NotificationPriority::Medium));
    }
}

#[test]
fn test_revert_paths_are_allowed_without_stamps() {
    let back_to_active = effects(MatchStatus::Contacted, MatchStatus::Active);
    assert!(!back_to_active.sets_contacted_at);
    assert!(!back_to_active.sets_response_at);
    assert!(back_to_active.notify_priority.is_none());

    // Re-engagement out of declined
    assert!(plan_transition(MatchStatus::Declined, MatchStatus::Active).is_ok());
    assert!(plan_transition(MatchStatus::Declined, MatchStatus::Contacted).is_ok());
    // A contacted -> active revert does not re-stamp contacted_at on the way
    // back in; only active -> contacted does.
    let recontact = effects(MatchStatus::Declined, MatchStatus::Contacted);
    assert!(!recontact.sets_contacted_at);
}

#[test]
fn test_declined_cannot_jump_to_funded() {
    let err = plan_transition(MatchStatus::Declined, MatchStatus::Funded).unwrap_err();
    match err {
        AppError::Validation(msg) => {
            assert!(msg.contains("declined"));
            assert!(msg.contains("funded"));
            assert!(msg.contains("active"));
            assert!(msg.contains("contacted"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_funded_is_terminal() {
    let err = plan_transition(MatchStatus::Funded, MatchStatus::Active).unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("none")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_same_status_is_notes_only() {
    for status in [
        MatchStatus::Active,
        MatchStatus::Contacted,
        MatchStatus::Interested,
        MatchStatus::Declined,
        MatchStatus::Funded,
    ] {
        assert_eq!(
            plan_transition(status, status).unwrap(),
            TransitionOutcome::NotesOnly
        );
    }
}

#[test]
fn test_skipping_contacted_is_rejected() {
    assert!(plan_transition(MatchStatus::Active, MatchStatus::Interested).is_err());
    assert!(plan_transition(MatchStatus::Active, MatchStatus::Funded).is_err());
    assert!(plan_transition(MatchStatus::Contacted, MatchStatus::Funded).is_err());
}

#[test]
fn test_status_breakdown_counts() {
    let breakdown = StatusBreakdown::from_statuses([
        MatchStatus::Active,
        MatchStatus::Active,
        MatchStatus::Contacted,
        MatchStatus::Interested,
        MatchStatus::Funded,
        MatchStatus::Declined,
        MatchStatus::Declined,
    ]);
    assert_eq!(breakdown.active, 2);
    assert_eq!(breakdown.contacted, 1);
    assert_eq!(breakdown.interested, 1);
    assert_eq!(breakdown.funded, 1);
    assert_eq!(breakdown.declined, 2);
    assert_eq!(breakdown.total, 7);
}
