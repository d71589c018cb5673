use std::collections::HashSet;

use fundmatch::entities::{Founder, FundingRequest, FundingStage, Investor, PreviousInvestment};
use fundmatch::error::AppError;
use fundmatch::matching::{plan_manual_assignment, select_ai_matches};
use uuid::Uuid;

fn founder() -> Founder {
    Founder {
        id: Uuid::new_v4(),
        company_name: "Acme Fintech".to_string(),
        industry: Some("Fintech".to_string()),
        address: Some("Berlin, Germany".to_string()),
    }
}

fn request(founder_id: Uuid) -> FundingRequest {
    FundingRequest::new(founder_id, 300_000.0, "EUR", FundingStage::Seed)
}

fn investor(name: &str, interests: &[&str], investments: usize, verified: bool) -> Investor {
    Investor {
        id: Uuid::new_v4(),
        name: name.to_string(),
        investment_interests: interests.iter().map(|s| s.to_string()).collect(),
        previous_investments: (0..investments)
            .map(|_| PreviousInvestment {
                stage: Some("Seed".to_string()),
                industry: None,
            })
            .collect(),
        amount_range: Some("100K-500K".to_string()),
        location: Some("Berlin".to_string()),
        verified,
    }
}

#[test]
fn test_ai_selection_ranks_and_truncates() {
    let founder = founder();
    let request = request(founder.id);

    let strong = investor("Strong", &["Fintech"], 3, true);
    let weak = investor("Weak", &[], 0, true);
    let medium = investor("Medium", &["Financial"], 2, true);

    let pool = vec![weak.clone(), strong.clone(), medium.clone()];
    let selected = select_ai_matches(&pool, &founder, &request, 2, &HashSet::new());

    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].investor.id, strong.id);
    assert!(selected[0].score >= selected[1].score);
    assert!(selected.iter().all(|c| c.investor.id != weak.id));
}

#[test]
fn test_ai_selection_skips_unverified_and_excluded() {
    let founder = founder();
    let request = request(founder.id);

    let unverified = investor("Unverified", &["Fintech"], 5, false);
    let excluded = investor("Excluded", &["Fintech"], 5, true);
    let eligible = investor("Eligible", &["Fintech"], 5, true);

    let exclude: HashSet<Uuid> = [excluded.id].into_iter().collect();
    let pool = vec![unverified, excluded, eligible.clone()];
    let selected = select_ai_matches(&pool, &founder, &request, 10, &exclude);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].investor.id, eligible.id);
}

#[test]
fn test_ai_selection_empty_pool_is_not_an_error() {
    let founder = founder();
    let request = request(founder.id);

    let assigned = investor("Assigned", &["Fintech"], 1, true);
    let exclude: HashSet<Uuid> = [assigned.id].into_iter().collect();
    let selected = select_ai_matches(&[assigned], &founder, &request, 5, &exclude);
    assert!(selected.is_empty());
}

#[test]
fn test_ai_selection_equal_scores_tie_break_on_investments() {
    let founder = founder();
    let request = request(founder.id);

    // Same interests/range/location; only investment counts differ, and both
    // land in the same experience tier so scores are identical.
    let veteran = investor("Veteran", &["Fintech"], 12, true);
    let newcomer = investor("Newcomer", &["Fintech"], 11, true);

    let pool = vec![newcomer.clone(), veteran.clone()];
    let selected = select_ai_matches(&pool, &founder, &request, 2, &HashSet::new());

    assert_eq!(selected[0].score, selected[1].score);
    assert_eq!(selected[0].investor.id, veteran.id);
}

#[test]
fn test_manual_plan_mixed_duplicates_are_skipped() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let already: HashSet<Uuid> = [a].into_iter().collect();

    let plan = plan_manual_assignment(&[a, b], &already, false).unwrap();
    assert_eq!(plan.to_assign, vec![b]);
    assert_eq!(plan.skipped, vec![a]);
}

#[test]
fn test_manual_plan_all_duplicates_rejected() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let already: HashSet<Uuid> = [a, b].into_iter().collect();

    let err = plan_manual_assignment(&[a, b], &already, false).unwrap_err();
    match err {
        AppError::Validation(msg) => {
            assert!(msg.contains("already assigned"));
            assert!(msg.contains(&a.to_string()));
            assert!(msg.contains(&b.to_string()));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_manual_plan_replace_existing_skips_nothing() {
    let a = Uuid::new_v4();
    let already: HashSet<Uuid> = [a].into_iter().collect();

    let plan = plan_manual_assignment(&[a], &already, true).unwrap();
    assert_eq!(plan.to_assign, vec![a]);
    assert!(plan.skipped.is_empty());
}

#[test]
fn test_manual_plan_empty_input_rejected() {
    let err = plan_manual_assignment(&[], &HashSet::new(), false).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_manual_plan_dedupes_repeats_within_request() {
    let a = Uuid::new_v4();
    let plan = plan_manual_assignment(&[a, a, a], &HashSet::new(), false).unwrap();
    assert_eq!(plan.to_assign, vec![a]);
    assert!(plan.skipped.is_empty());
}
