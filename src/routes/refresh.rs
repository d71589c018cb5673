use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{ActingUser, FundingRequestPatch, FundingRequestStatus, PartyRole};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// Authenticated caller id (must be the owning founder)
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
    /// Optional reason forwarded to the admin notification
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub funding_request_id: Uuid,
    pub status: FundingRequestStatus,
    pub refresh_count: u32,
    pub remaining_refreshes: u32,
    pub cleared_matches: usize,
}

/// Reset an allotted funding request back to open, clearing its matches
#[utoipa::path(
    post,
    path = "/matching/requests/{id}/refresh",
    params(("id" = Uuid, Path, description = "Funding request id")),
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Request refreshed", body = RefreshResponse),
        (status = 404, description = "Funding request not found"),
        (status = 422, description = "Not owner, not allotted, refresh limit reached or cooldown active"),
    )
)]
#[tracing::instrument(skip(state, body), fields(funding_request_id = %id))]
pub async fn refresh_funding_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let actor = ActingUser {
        actor_id: body.actor_id,
        actor_role: body.actor_role,
    };
    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;

    let (updated, cleared) = state
        .engine
        .refresh(&state.store, &request, &actor, body.reason.as_deref(), Utc::now())
        .await?;

    let remaining = state
        .engine
        .config()
        .max_refresh_count
        .saturating_sub(updated.refresh_count);

    Ok(Json(RefreshResponse {
        funding_request_id: id,
        status: updated.status,
        refresh_count: updated.refresh_count,
        remaining_refreshes: remaining,
        cleared_matches: cleared,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActorQuery {
    /// Authenticated caller id
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveInvestorResponse {
    pub funding_request_id: Uuid,
    pub investor_id: Uuid,
    pub remaining_assigned: usize,
    pub status: FundingRequestStatus,
}

/// Remove a single investor from a funding request
#[utoipa::path(
    delete,
    path = "/matching/requests/{id}/investors/{investor_id}",
    params(
        ("id" = Uuid, Path, description = "Funding request id"),
        ("investor_id" = Uuid, Path, description = "Investor to remove"),
        ActorQuery
    ),
    responses(
        (status = 200, description = "Investor removed", body = RemoveInvestorResponse),
        (status = 404, description = "Funding request or match not found"),
        (status = 422, description = "Caller is neither admin nor owning founder"),
    )
)]
#[tracing::instrument(skip(state, query), fields(funding_request_id = %id, investor_id = %investor_id))]
pub async fn remove_investor(
    State(state): State<AppState>,
    Path((id, investor_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<RemoveInvestorResponse>, AppError> {
    let actor = ActingUser {
        actor_id: query.actor_id,
        actor_role: query.actor_role,
    };
    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;

    let is_owner = actor.is_founder() && request.founder_id == actor.actor_id;
    if !actor.is_admin() && !is_owner {
        return Err(AppError::Validation(
            "Only an admin or the owning founder can remove investors".to_string(),
        ));
    }

    let record = state
        .store
        .find_match_for_investor(id, investor_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound("Match not found for this funding request and investor".to_string())
        })?;
    state.store.delete_match(record.id).await?;

    let updated = state.engine.handle_removal(&state.store, &request).await?;
    let remaining = state.store.count_matches_for_request(id).await;

    Ok(Json(RemoveInvestorResponse {
        funding_request_id: id,
        investor_id,
        remaining_assigned: remaining,
        status: updated.status,
    }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteRequestResponse {
    pub funding_request_id: Uuid,
    pub deleted_matches: usize,
}

/// Delete a funding request together with all of its matches
#[utoipa::path(
    delete,
    path = "/matching/requests/{id}",
    params(("id" = Uuid, Path, description = "Funding request id"), ActorQuery),
    responses(
        (status = 200, description = "Funding request deleted", body = DeleteRequestResponse),
        (status = 404, description = "Funding request not found"),
        (status = 422, description = "Caller is neither admin nor owning founder"),
    )
)]
#[tracing::instrument(skip(state, query), fields(funding_request_id = %id))]
pub async fn delete_funding_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<DeleteRequestResponse>, AppError> {
    let actor = ActingUser {
        actor_id: query.actor_id,
        actor_role: query.actor_role,
    };
    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;

    let is_owner = actor.is_founder() && request.founder_id == actor.actor_id;
    if !actor.is_admin() && !is_owner {
        return Err(AppError::Validation(
            "Only an admin or the owning founder can delete a funding request".to_string(),
        ));
    }

    let deleted_matches = state.store.count_matches_for_request(id).await;
    state.store.delete_funding_request(id).await?;

    tracing::info!(
        "Funding request {} deleted along with {} matches",
        id,
        deleted_matches
    );
    Ok(Json(DeleteRequestResponse {
        funding_request_id: id,
        deleted_matches,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CloseRequest {
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CloseResponse {
    pub funding_request_id: Uuid,
    pub status: FundingRequestStatus,
}

/// Close a funding request so no further investors can be assigned
#[utoipa::path(
    post,
    path = "/matching/requests/{id}/close",
    params(("id" = Uuid, Path, description = "Funding request id")),
    request_body = CloseRequest,
    responses(
        (status = 200, description = "Funding request closed", body = CloseResponse),
        (status = 404, description = "Funding request not found"),
        (status = 422, description = "Caller is neither admin nor owning founder"),
    )
)]
#[tracing::instrument(skip(state, body), fields(funding_request_id = %id))]
pub async fn close_funding_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CloseRequest>,
) -> Result<Json<CloseResponse>, AppError> {
    let actor = ActingUser {
        actor_id: body.actor_id,
        actor_role: body.actor_role,
    };
    let request = state
        .store
        .find_funding_request_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))?;

    let is_owner = actor.is_founder() && request.founder_id == actor.actor_id;
    if !actor.is_admin() && !is_owner {
        return Err(AppError::Validation(
            "Only an admin or the owning founder can close a funding request".to_string(),
        ));
    }

    let patch = FundingRequestPatch {
        status: Some(FundingRequestStatus::Closed),
        ..FundingRequestPatch::default()
    };
    let updated = state.store.update_funding_request(id, patch).await?;

    Ok(Json(CloseResponse {
        funding_request_id: id,
        status: updated.status,
    }))
}
