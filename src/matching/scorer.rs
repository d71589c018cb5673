use once_cell::sync::Lazy;

use crate::entities::{Founder, FundingRequest, FundingStage, Investor, MatchCriteria};

// Weight table. Full weights sum to exactly 100.
pub const INDUSTRY_WEIGHT: u8 = 30;
pub const INDUSTRY_PARTIAL_WEIGHT: u8 = 15;
pub const STAGE_WEIGHT: u8 = 25;
pub const STAGE_ADJACENT_WEIGHT: u8 = 12;
pub const AMOUNT_WEIGHT: u8 = 20;
pub const AMOUNT_EXPANDED_WEIGHT: u8 = 10;
pub const LOCATION_WEIGHT: u8 = 15;
pub const EXPERIENCE_WEIGHT: u8 = 10;

/// Result of scoring one investor against one funding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// 0-100
    pub score: u8,
    pub criteria: MatchCriteria,
}

/// Compute the compatibility score between a founder and an investor for a
/// given funding request. Pure and deterministic; profile fields that are
/// missing or unparseable simply contribute nothing.
pub fn score_match(
    founder: &Founder,
    investor: &Investor,
    request: &FundingRequest,
) -> ScoreBreakdown {
    let industry = industry_points(founder, investor);
    let stage = stage_points(request.funding_stage, investor);
    let amount = amount_points(request.funding_amount, investor);
    let location = location_points(founder, investor);
    let experience = experience_points(founder, investor);

    let total: u32 = [industry, stage, amount, location, experience]
        .iter()
        .map(|&p| p as u32)
        .sum();

    ScoreBreakdown {
        score: total.min(100) as u8,
        criteria: MatchCriteria {
            industry_match: industry > 0,
            stage_match: stage > 0,
            amount_match: amount > 0,
            location_match: location > 0,
            experience_match: experience > 0,
        },
    }
}

/// Ranking order for scored candidates: higher score first, and on equal
/// scores the investor with more previous investments first.
pub fn rank_ordering(
    score_a: u8,
    investments_a: usize,
    score_b: u8,
    investments_b: usize,
) -> std::cmp::Ordering {
    score_b
        .cmp(&score_a)
        .then(investments_b.cmp(&investments_a))
}

fn industry_points(founder: &Founder, investor: &Investor) -> u8 {
    let industry = match founder.industry.as_deref() {
        Some(value) if !value.trim().is_empty() => value.trim().to_lowercase(),
        _ => return 0,
    };

    let interests: Vec<String> = investor
        .investment_interests
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();

    if interests.iter().any(|i| *i == industry) {
        return INDUSTRY_WEIGHT;
    }
    if interests
        .iter()
        .any(|i| i.contains(&industry) || industry.contains(i.as_str()))
    {
        return INDUSTRY_PARTIAL_WEIGHT;
    }
    0
}

fn stage_points(request_stage: FundingStage, investor: &Investor) -> u8 {
    let prior_stages: Vec<FundingStage> = investor
        .previous_investments
        .iter()
        .filter_map(|p| p.stage.as_deref())
        .filter_map(FundingStage::from_label)
        .collect();

    if prior_stages.iter().any(|&s| s == request_stage) {
        return STAGE_WEIGHT;
    }
    if prior_stages.iter().any(|&s| s.is_adjacent_to(request_stage)) {
        return STAGE_ADJACENT_WEIGHT;
    }
    0
}

fn amount_points(funding_amount: f64, investor: &Investor) -> u8 {
    let range = match investor.amount_range.as_deref().and_then(parse_amount_range) {
        Some(range) => range,
        None => return 0,
    };

    if range.contains(funding_amount) {
        return AMOUNT_WEIGHT;
    }
    if range.expanded(0.5).contains(funding_amount) {
        return AMOUNT_EXPANDED_WEIGHT;
    }
    0
}

fn location_points(founder: &Founder, investor: &Investor) -> u8 {
    let founder_parts = location_components(founder.address.as_deref());
    let investor_parts = location_components(investor.location.as_deref());
    if founder_parts.is_empty() || investor_parts.is_empty() {
        return 0;
    }

    for inv in &investor_parts {
        for fdr in &founder_parts {
            if inv.contains(fdr.as_str()) || fdr.contains(inv.as_str()) {
                return LOCATION_WEIGHT;
            }
        }
    }
    0
}

fn experience_points(founder: &Founder, investor: &Investor) -> u8 {
    let founder_industry = founder
        .industry
        .as_deref()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty());

    let industry_relevant = match founder_industry {
        Some(ref industry) => investor.previous_investments.iter().any(|p| {
            p.industry
                .as_deref()
                .map(|i| i.trim().to_lowercase() == *industry)
                .unwrap_or(false)
        }),
        None => false,
    };
    if industry_relevant {
        return EXPERIENCE_WEIGHT;
    }

    match investor.previous_investments.len() {
        n if n >= 10 => EXPERIENCE_WEIGHT,
        n if n >= 5 => 7,
        n if n >= 1 => 3,
        _ => 0,
    }
}

fn location_components(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or("")
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Numeric range implied by an investor's ticket-size bucket label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    /// None means open-ended ("5M+")
    pub max: Option<f64>,
}

impl AmountRange {
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && self.max.map(|max| amount <= max).unwrap_or(true)
    }

    /// Range widened by `factor` on both bounds, for half-credit scoring.
    pub fn expanded(&self, factor: f64) -> AmountRange {
        AmountRange {
            min: self.min * (1.0 - factor),
            max: self.max.map(|max| max * (1.0 + factor)),
        }
    }
}

// Ordered longest-suffix-first so "BN" is tried before "B" and "N".
static SUFFIX_MULTIPLIERS: Lazy<Vec<(&'static str, f64)>> = Lazy::new(|| {
    vec![
        ("BN", 1_000_000_000.0),
        ("B", 1_000_000_000.0),
        ("M", 1_000_000.0),
        ("K", 1_000.0),
    ]
});

/// Parse bucket labels like "100K-500K", "$1M-5M" or "5M+". Returns None for
/// labels that do not follow the bucket format.
pub fn parse_amount_range(label: &str) -> Option<AmountRange> {
    let normalized: String = label
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect();

    if let Some(prefix) = normalized.strip_suffix('+') {
        let min = parse_amount(prefix)?;
        return Some(AmountRange { min, max: None });
    }

    let (low, high) = normalized.split_once('-')?;
    let min = parse_amount(low)?;
    let max = parse_amount(high)?;
    if max < min {
        return None;
    }
    Some(AmountRange {
        min,
        max: Some(max),
    })
}

fn parse_amount(token: &str) -> Option<f64> {
    for (suffix, multiplier) in SUFFIX_MULTIPLIERS.iter() {
        if let Some(number) = token.strip_suffix(suffix) {
            return number.parse::<f64>().ok().map(|n| n * multiplier);
        }
    }
    token.parse::<f64>().ok()
}
