use fundmatch::entities::{
    Founder, FundingRequest, FundingStage, Investor, PreviousInvestment,
};
use fundmatch::matching::scorer::{
    parse_amount_range, rank_ordering, score_match, AMOUNT_EXPANDED_WEIGHT, AMOUNT_WEIGHT,
    INDUSTRY_PARTIAL_WEIGHT, INDUSTRY_WEIGHT, LOCATION_WEIGHT, STAGE_ADJACENT_WEIGHT,
    STAGE_WEIGHT,
};
use uuid::Uuid;

fn founder(industry: Option<&str>, address: Option<&str>) -> Founder {
    Founder {
        id: Uuid::new_v4(),
        company_name: "Acme Robotics".to_string(),
        industry: industry.map(|s| s.to_string()),
        address: address.map(|s| s.to_string()),
    }
}

fn investor() -> Investor {
    Investor {
        id: Uuid::new_v4(),
        name: "Test Capital".to_string(),
        investment_interests: vec![],
        previous_investments: vec![],
        amount_range: None,
        location: None,
        verified: true,
    }
}

fn prior(stage: Option<&str>, industry: Option<&str>) -> PreviousInvestment {
    PreviousInvestment {
        stage: stage.map(|s| s.to_string()),
        industry: industry.map(|s| s.to_string()),
    }
}

fn request(amount: f64, stage: FundingStage) -> FundingRequest {
    FundingRequest::new(Uuid::new_v4(), amount, "USD", stage)
}

#[test]
fn test_score_is_bounded_and_deterministic() {
    let founder = founder(Some("Fintech"), Some("Berlin, Germany"));
    let mut investor = investor();
    investor.investment_interests = vec!["Fintech".to_string()];
    investor.location = Some("Berlin".to_string());
    investor.amount_range = Some("100K-500K".to_string());
    investor.previous_investments = (0..12)
        .map(|_| prior(Some("Seed"), Some("Fintech")))
        .collect();
    let request = request(300_000.0, FundingStage::Seed);

    let first = score_match(&founder, &investor, &request);
    let second = score_match(&founder, &investor, &request);

    assert!(first.score <= 100);
    assert_eq!(first, second);
}

#[test]
fn test_perfect_profile_scores_full_hundred() {
    let founder = founder(Some("Fintech"), Some("Berlin, Germany"));
    let mut investor = investor();
    investor.investment_interests = vec!["Fintech".to_string()];
    investor.location = Some("Berlin".to_string());
    investor.amount_range = Some("100K-500K".to_string());
    investor.previous_investments = vec![prior(Some("Seed"), Some("Fintech"))];
    let request = request(250_000.0, FundingStage::Seed);

    let breakdown = score_match(&founder, &investor, &request);
    assert_eq!(breakdown.score, 100);
    assert!(breakdown.criteria.industry_match);
    assert!(breakdown.criteria.stage_match);
    assert!(breakdown.criteria.amount_match);
    assert!(breakdown.criteria.location_match);
    assert!(breakdown.criteria.experience_match);
}

#[test]
fn test_empty_profile_scores_zero() {
    let founder = founder(None, None);
    let investor = investor();
    let request = request(1_000_000.0, FundingStage::SeriesA);

    let breakdown = score_match(&founder, &investor, &request);
    assert_eq!(breakdown.score, 0);
    assert!(!breakdown.criteria.industry_match);
    assert!(!breakdown.criteria.stage_match);
    assert!(!breakdown.criteria.amount_match);
    assert!(!breakdown.criteria.location_match);
    assert!(!breakdown.criteria.experience_match);
}

#[test]
fn test_industry_exact_and_partial_credit() {
    let founder = founder(Some("Fintech"), None);
    let request = request(1_000_000.0, FundingStage::SeriesA);

    let mut exact = investor();
    exact.investment_interests = vec!["fintech".to_string()];
    assert_eq!(
        score_match(&founder, &exact, &request).score,
        INDUSTRY_WEIGHT
    );

    // "fin" is a substring of "fintech": half credit
    let mut partial = investor();
    partial.investment_interests = vec!["Fin".to_string()];
    assert_eq!(
        score_match(&founder, &partial, &request).score,
        INDUSTRY_PARTIAL_WEIGHT
    );

    let mut miss = investor();
    miss.investment_interests = vec!["Biotech".to_string()];
    assert_eq!(score_match(&founder, &miss, &request).score, 0);
}

#[test]
fn test_stage_exact_and_adjacent_credit() {
    let founder = founder(None, None);
    let request = request(1_000_000.0, FundingStage::Seed);

    let mut exact = investor();
    exact.previous_investments = vec![prior(Some("Seed"), None)];
    // One prior investment also earns the smallest experience tier (3)
    assert_eq!(
        score_match(&founder, &exact, &request).score,
        STAGE_WEIGHT + 3
    );

    let mut adjacent = investor();
    adjacent.previous_investments = vec![prior(Some("Series A"), None)];
    assert_eq!(
        score_match(&founder, &adjacent, &request).score,
        STAGE_ADJACENT_WEIGHT + 3
    );

    // Two steps away earns nothing for stage
    let mut far = investor();
    far.previous_investments = vec![prior(Some("Series B"), None)];
    assert_eq!(score_match(&founder, &far, &request).score, 3);
}

#[test]
fn test_amount_bucket_and_expanded_range() {
    let founder = founder(None, None);

    let mut bucket = investor();
    bucket.amount_range = Some("100K-500K".to_string());

    let within = request(300_000.0, FundingStage::SeriesA);
    assert_eq!(score_match(&founder, &bucket, &within).score, AMOUNT_WEIGHT);

    // 600K is outside [100K, 500K] but inside the 50%-expanded [50K, 750K]
    let near = request(600_000.0, FundingStage::SeriesA);
    assert_eq!(
        score_match(&founder, &bucket, &near).score,
        AMOUNT_EXPANDED_WEIGHT
    );

    let far = request(900_000.0, FundingStage::SeriesA);
    assert_eq!(score_match(&founder, &bucket, &far).score, 0);

    let mut open_ended = investor();
    open_ended.amount_range = Some("5M+".to_string());
    let big = request(10_000_000.0, FundingStage::Growth);
    assert_eq!(
        score_match(&founder, &open_ended, &big).score,
        AMOUNT_WEIGHT
    );
    // 3M >= 2.5M (expanded lower bound) earns half credit
    let below = request(3_000_000.0, FundingStage::Growth);
    assert_eq!(
        score_match(&founder, &open_ended, &below).score,
        AMOUNT_EXPANDED_WEIGHT
    );
}

#[test]
fn test_location_component_containment() {
    let founder = founder(None, Some("10 Main St, Berlin, Germany"));
    let request = request(1_000_000.0, FundingStage::SeriesA);

    let mut same_city = investor();
    same_city.location = Some("berlin".to_string());
    assert_eq!(
        score_match(&founder, &same_city, &request).score,
        LOCATION_WEIGHT
    );

    let mut same_country = investor();
    same_country.location = Some("Munich, Germany".to_string());
    assert_eq!(
        score_match(&founder, &same_country, &request).score,
        LOCATION_WEIGHT
    );

    let mut elsewhere = investor();
    elsewhere.location = Some("Paris, France".to_string());
    assert_eq!(score_match(&founder, &elsewhere, &request).score, 0);
}

#[test]
fn test_experience_tiers_and_industry_relevance() {
    let founder = founder(Some("Robotics"), None);
    let request = request(1_000_000.0, FundingStage::SeriesA);

    let mut ten = investor();
    ten.previous_investments = (0..10).map(|_| prior(None, None)).collect();
    assert_eq!(score_match(&founder, &ten, &request).score, 10);

    let mut five = investor();
    five.previous_investments = (0..5).map(|_| prior(None, None)).collect();
    assert_eq!(score_match(&founder, &five, &request).score, 7);

    let mut one = investor();
    one.previous_investments = vec![prior(None, None)];
    assert_eq!(score_match(&founder, &one, &request).score, 3);

    // A single industry-relevant prior investment earns the full weight
    let mut relevant = investor();
    relevant.previous_investments = vec![prior(None, Some("robotics"))];
    assert_eq!(score_match(&founder, &relevant, &request).score, 10);
}

#[test]
fn test_parse_amount_range_formats() {
    let range = parse_amount_range("100K-500K").unwrap();
    assert_eq!(range.min, 100_000.0);
    assert_eq!(range.max, Some(500_000.0));

    let range = parse_amount_range("$1M - 5M").unwrap();
    assert_eq!(range.min, 1_000_000.0);
    assert_eq!(range.max, Some(5_000_000.0));

    let range = parse_amount_range("5M+").unwrap();
    assert_eq!(range.min, 5_000_000.0);
    assert_eq!(range.max, None);
    assert!(range.contains(1e12));

    assert!(parse_amount_range("").is_none());
    assert!(parse_amount_range("call us").is_none());
    // Inverted bounds are rejected
    assert!(parse_amount_range("500K-100K").is_none());
}

#[test]
fn test_rank_ordering_tie_break() {
    use std::cmp::Ordering;

    // Higher score wins
    assert_eq!(rank_ordering(90, 0, 50, 20), Ordering::Less);
    // Equal score: more previous investments wins
    assert_eq!(rank_ordering(70, 12, 70, 3), Ordering::Less);
    assert_eq!(rank_ordering(70, 3, 70, 12), Ordering::Greater);
    assert_eq!(rank_ordering(70, 3, 70, 3), Ordering::Equal);
}
