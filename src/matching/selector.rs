use std::collections::HashSet;

use uuid::Uuid;

use crate::entities::{Founder, FundingRequest, Investor, MatchCriteria};
use crate::error::AppError;

use super::scorer::{rank_ordering, score_match};

/// One ranked candidate produced by AI selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub investor: Investor,
    pub score: u8,
    pub criteria: MatchCriteria,
}

/// Score and rank eligible investors for a funding request.
///
/// Only verified investors outside `exclude` are considered. The result is
/// sorted by score descending, ties broken by number of previous investments,
/// and truncated to `count`. An empty pool after exclusion is not an error;
/// it yields an empty list the caller reports to the user.
pub fn select_ai_matches(
    pool: &[Investor],
    founder: &Founder,
    request: &FundingRequest,
    count: usize,
    exclude: &HashSet<Uuid>,
) -> Vec<ScoredCandidate> {
    let mut candidates: Vec<ScoredCandidate> = pool
        .iter()
        .filter(|investor| investor.verified && !exclude.contains(&investor.id))
        .map(|investor| {
            let breakdown = score_match(founder, investor, request);
            ScoredCandidate {
                investor: investor.clone(),
                score: breakdown.score,
                criteria: breakdown.criteria,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        rank_ordering(
            a.score,
            a.investor.previous_investments.len(),
            b.score,
            b.investor.previous_investments.len(),
        )
    });
    candidates.truncate(count);
    candidates
}

/// Outcome of validating a manual assignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPlan {
    pub to_assign: Vec<Uuid>,
    pub skipped: Vec<Uuid>,
}

/// Split requested investor ids into assignable ids and known duplicates.
///
/// With `replace_existing` nothing is skipped, because the caller clears the
/// existing matches before assignment. Otherwise ids already assigned to the
/// request move to `skipped`; if every requested id is a duplicate the call
/// fails, since there is nothing left to assign.
pub fn plan_manual_assignment(
    requested: &[Uuid],
    already_assigned: &HashSet<Uuid>,
    replace_existing: bool,
) -> Result<ManualPlan, AppError> {
    if requested.is_empty() {
        return Err(AppError::Validation(
            "No investor ids supplied for manual assignment".to_string(),
        ));
    }

    // Drop repeats within the request itself, keeping the first occurrence.
    let mut seen = HashSet::new();
    let unique: Vec<Uuid> = requested
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    if replace_existing {
        return Ok(ManualPlan {
            to_assign: unique,
            skipped: Vec::new(),
        });
    }

    let (skipped, to_assign): (Vec<Uuid>, Vec<Uuid>) = unique
        .into_iter()
        .partition(|id| already_assigned.contains(id));

    if to_assign.is_empty() {
        let ids: Vec<String> = skipped.iter().map(|id| id.to_string()).collect();
        return Err(AppError::Validation(format!(
            "All selected investors are already assigned to this funding request: {}",
            ids.join(", ")
        )));
    }

    Ok(ManualPlan { to_assign, skipped })
}
