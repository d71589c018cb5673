use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{
    ActingUser, AssignmentMethod, Founder, FundingRequest, FundingRequestStatus, Investor,
    MatchCriteria, MatchRecord, PartyRole,
};
use crate::error::AppError;
use crate::matching::{plan_manual_assignment, select_ai_matches, ScoredCandidate};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignInvestorsRequest {
    /// Authenticated caller id (admin)
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
    pub method: AssignmentMethod,
    /// Manual mode: explicit investor ids to assign
    #[serde(default)]
    pub investor_ids: Vec<Uuid>,
    /// AI mode: how many investors to match (clamped to 1-20)
    pub count: Option<usize>,
    /// Clear existing matches before assigning
    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignedMatch {
    pub match_id: Uuid,
    pub investor_id: Uuid,
    pub investor_name: String,
    pub match_score: u8,
    pub match_criteria: MatchCriteria,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignInvestorsResponse {
    pub funding_request_id: Uuid,
    pub assignment_method: AssignmentMethod,
    pub assigned: Vec<AssignedMatch>,
    /// Investor ids skipped because they were already assigned
    pub skipped_investors: Vec<Uuid>,
    pub total_assigned: usize,
    pub status: FundingRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Assign investors to a funding request, manually or via AI matching
#[utoipa::path(
    post,
    path = "/matching/requests/{id}/assign",
    params(("id" = Uuid, Path, description = "Funding request id")),
    request_body = AssignInvestorsRequest,
    responses(
        (status = 200, description = "Investors assigned", body = AssignInvestorsResponse),
        (status = 404, description = "Funding request or founder not found"),
        (status = 409, description = "Duplicate match detected at write time"),
        (status = 422, description = "Validation failure (role, closed request, unknown or duplicate investors)"),
    )
)]
#[tracing::instrument(skip(state, body), fields(funding_request_id = %id, method = ?body.method))]
pub async fn assign_investors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignInvestorsRequest>,
) -> Result<Json<AssignInvestorsResponse>, AppError> {
    let actor = ActingUser {
        actor_id: body.actor_id,
        actor_role: body.actor_role,
    };
    if !actor.is_admin() {
        return Err(AppError::Validation(
            "Only admins can assign investors to funding requests".to_string(),
        ));
    }

    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;
    if request.status == FundingRequestStatus::Closed {
        return Err(AppError::Validation(
            "Cannot assign investors to a closed funding request".to_string(),
        ));
    }
    let founder = state
        .store
        .find_founder_by_id(request.founder_id)
        .await
        .ok_or_else(|| AppError::NotFound("Founder profile not found".to_string()))?;

    let existing = state.store.find_matches_for_request(id, None).await;
    let existing_ids: HashSet<Uuid> = existing.iter().map(|m| m.investor_id).collect();
    let existing_count = existing.len();

    let (records, assigned, skipped, message) = match body.method {
        AssignmentMethod::Manual => {
            manual_records(
                &state,
                &request,
                &body.investor_ids,
                &existing_ids,
                body.replace_existing,
            )
            .await?
        }
        AssignmentMethod::Ai => {
            ai_records(&state, &request, &founder, body.count, &existing_ids, body.replace_existing)
                .await
        }
    };

    if records.is_empty() {
        // Nothing to persist; report the condition without touching the request.
        return Ok(Json(AssignInvestorsResponse {
            funding_request_id: id,
            assignment_method: body.method,
            assigned: Vec::new(),
            skipped_investors: skipped,
            total_assigned: existing_count,
            status: request.status,
            ai_match_score: request.ai_match_score,
            message,
        }));
    }

    if body.replace_existing {
        let cleared = state.store.delete_matches_for_request(id).await;
        tracing::info!("Cleared {} existing matches before reassignment", cleared);
    }

    let newly_assigned = records.len();
    state.store.create_matches(records.clone()).await?;

    let updated = state
        .engine
        .apply_assignment(
            &state.store,
            &request,
            &actor,
            body.method,
            newly_assigned,
            existing_count,
            body.replace_existing,
            Utc::now(),
        )
        .await?;

    let total = state
        .engine
        .total_assigned(newly_assigned, existing_count, body.replace_existing);

    Ok(Json(AssignInvestorsResponse {
        funding_request_id: id,
        assignment_method: body.method,
        assigned,
        skipped_investors: skipped,
        total_assigned: total,
        status: updated.status,
        ai_match_score: updated.ai_match_score,
        message: None,
    }))
}

type PreparedAssignment = (
    Vec<MatchRecord>,
    Vec<AssignedMatch>,
    Vec<Uuid>,
    Option<String>,
);

async fn manual_records(
    state: &AppState,
    request: &FundingRequest,
    investor_ids: &[Uuid],
    existing_ids: &HashSet<Uuid>,
    replace_existing: bool,
) -> Result<PreparedAssignment, AppError> {
    let plan = plan_manual_assignment(investor_ids, existing_ids, replace_existing)?;

    // Every surviving id must resolve to a known investor; unknown ids fail
    // the whole call. Known duplicates were already moved to the skip list.
    let lookups = join_all(
        plan.to_assign
            .iter()
            .map(|&investor_id| state.store.find_investor_by_id(investor_id)),
    )
    .await;

    let mut invalid: Vec<String> = Vec::new();
    let mut resolved: Vec<Investor> = Vec::new();
    for (investor_id, found) in plan.to_assign.iter().zip(lookups) {
        match found {
            Some(investor) => resolved.push(investor),
            None => invalid.push(investor_id.to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(AppError::Validation(format!(
            "Invalid investor ids: {}",
            invalid.join(", ")
        )));
    }

    let mut records = Vec::with_capacity(resolved.len());
    let mut assigned = Vec::with_capacity(resolved.len());
    for investor in resolved {
        let record = MatchRecord::new(
            request.id,
            request.founder_id,
            investor.id,
            0,
            MatchCriteria::default(),
            AssignmentMethod::Manual,
        );
        assigned.push(AssignedMatch {
            match_id: record.id,
            investor_id: investor.id,
            investor_name: investor.name,
            match_score: 0,
            match_criteria: MatchCriteria::default(),
        });
        records.push(record);
    }
    Ok((records, assigned, plan.skipped, None))
}

async fn ai_records(
    state: &AppState,
    request: &FundingRequest,
    founder: &Founder,
    count: Option<usize>,
    existing_ids: &HashSet<Uuid>,
    replace_existing: bool,
) -> PreparedAssignment {
    let max = state.engine.config().max_ai_match_count;
    let count = count.unwrap_or(5).clamp(1, max);

    let exclude = if replace_existing {
        HashSet::new()
    } else {
        existing_ids.clone()
    };
    let pool = state.store.find_verified_investors().await;
    let candidates = select_ai_matches(&pool, founder, request, count, &exclude);

    if candidates.is_empty() {
        return (
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Some(
                "No eligible investors available; all verified investors are already assigned"
                    .to_string(),
            ),
        );
    }

    let mut records = Vec::with_capacity(candidates.len());
    let mut assigned = Vec::with_capacity(candidates.len());
    for ScoredCandidate {
        investor,
        score,
        criteria,
    } in candidates
    {
        let record = MatchRecord::new(
            request.id,
            request.founder_id,
            investor.id,
            score,
            criteria,
            AssignmentMethod::Ai,
        );
        assigned.push(AssignedMatch {
            match_id: record.id,
            investor_id: investor.id,
            investor_name: investor.name,
            match_score: score,
            match_criteria: criteria,
        });
        records.push(record);
    }
    (records, assigned, Vec::new(), None)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CandidateQuery {
    /// How many candidates to preview (default 5, clamped to 1-20)
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CandidatePreview {
    pub investor_id: Uuid,
    pub investor_name: String,
    pub match_score: u8,
    pub match_criteria: MatchCriteria,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CandidatesResponse {
    pub funding_request_id: Uuid,
    pub candidates: Vec<CandidatePreview>,
    /// Verified investors not yet assigned to this request
    pub eligible_pool: usize,
}

/// Preview the AI-ranked investor candidates without persisting anything
#[utoipa::path(
    get,
    path = "/matching/requests/{id}/candidates",
    params(("id" = Uuid, Path, description = "Funding request id"), CandidateQuery),
    responses(
        (status = 200, description = "Ranked candidate preview", body = CandidatesResponse),
        (status = 404, description = "Funding request or founder not found"),
    )
)]
#[tracing::instrument(skip(state), fields(funding_request_id = %id))]
pub async fn preview_candidates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CandidateQuery>,
) -> Result<Json<CandidatesResponse>, AppError> {
    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;
    let founder = state
        .store
        .find_founder_by_id(request.founder_id)
        .await
        .ok_or_else(|| AppError::NotFound("Founder profile not found".to_string()))?;

    let max = state.engine.config().max_ai_match_count;
    let count = query.count.unwrap_or(5).clamp(1, max);

    let existing_ids: HashSet<Uuid> = state
        .store
        .find_matches_for_request(id, None)
        .await
        .iter()
        .map(|m| m.investor_id)
        .collect();

    let pool = state.store.find_verified_investors().await;
    let eligible_pool = pool
        .iter()
        .filter(|i| i.verified && !existing_ids.contains(&i.id))
        .count();
    let candidates = select_ai_matches(&pool, &founder, &request, count, &existing_ids);

    Ok(Json(CandidatesResponse {
        funding_request_id: id,
        candidates: candidates
            .into_iter()
            .map(|c| CandidatePreview {
                investor_id: c.investor.id,
                investor_name: c.investor.name,
                match_score: c.score,
                match_criteria: c.criteria,
            })
            .collect(),
        eligible_pool,
    }))
}
