use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{
    ActingUser, MatchPatch, MatchRecord, MatchStatus, NotificationEvent, NotificationKind,
    PartyRole, StatusBreakdown,
};
use crate::error::AppError;
use crate::matching::{plan_transition, TransitionOutcome};
use crate::notify::emit_or_log;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMatchStatusRequest {
    /// Authenticated caller id (admin or the owning founder)
    pub actor_id: Uuid,
    pub actor_role: PartyRole,
    pub status: MatchStatus,
    /// Free-form notes, at most 500 characters
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateMatchStatusResponse {
    pub updated_match: MatchRecord,
    pub breakdown: StatusBreakdown,
}

/// Move a founder-investor match through its status workflow
#[utoipa::path(
    patch,
    path = "/matching/matches/{id}/status",
    params(("id" = Uuid, Path, description = "Match id")),
    request_body = UpdateMatchStatusRequest,
    responses(
        (status = 200, description = "Match updated", body = UpdateMatchStatusResponse),
        (status = 404, description = "Match not found"),
        (status = 422, description = "Disallowed transition, oversized notes or bad caller role"),
    )
)]
#[tracing::instrument(skip(state, body), fields(match_id = %id, requested_status = %body.status))]
pub async fn update_match_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMatchStatusRequest>,
) -> Result<Json<UpdateMatchStatusResponse>, AppError> {
    let actor = ActingUser {
        actor_id: body.actor_id,
        actor_role: body.actor_role,
    };

    if let Some(ref notes) = body.notes {
        let max = state.engine.config().max_notes_len;
        if notes.chars().count() > max {
            return Err(AppError::Validation(format!(
                "Notes must be at most {} characters",
                max
            )));
        }
    }

    let record = state
        .store
        .find_match_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))?;

    let is_owner = actor.is_founder() && record.founder_id == actor.actor_id;
    if !actor.is_admin() && !is_owner {
        return Err(AppError::Validation(
            "Only an admin or the owning founder can update a match".to_string(),
        ));
    }

    let outcome = plan_transition(record.status, body.status)?;

    let updated = match outcome {
        TransitionOutcome::NotesOnly => {
            // No transition: only notes change, and nothing is emitted.
            if body.notes.is_some() {
                let patch = MatchPatch {
                    notes: Some(body.notes.clone()),
                    ..MatchPatch::default()
                };
                state.store.update_match(id, patch).await?
            } else {
                record.clone()
            }
        }
        TransitionOutcome::Transition(effects) => {
            let now = Utc::now();
            let mut patch = MatchPatch {
                status: Some(effects.new_status),
                ..MatchPatch::default()
            };
            if effects.sets_contacted_at {
                patch.contacted_at = Some(Some(now));
            }
            if effects.sets_response_at {
                patch.response_at = Some(Some(now));
            }
            if body.notes.is_some() {
                patch.notes = Some(body.notes.clone());
            }
            let updated = state.store.update_match(id, patch).await?;

            if let Some(priority) = effects.notify_priority {
                let (founder, investor) = tokio::join!(
                    state.store.find_founder_by_id(updated.founder_id),
                    state.store.find_investor_by_id(updated.investor_id)
                );
                let investor_name = investor
                    .map(|i| i.name)
                    .unwrap_or_else(|| "An investor".to_string());
                let company = founder
                    .map(|f| f.company_name)
                    .unwrap_or_else(|| "your company".to_string());

                let (title, message) = match effects.new_status {
                    MatchStatus::Interested => (
                        "Investor Interested".to_string(),
                        format!("{} expressed interest in {}.", investor_name, company),
                    ),
                    MatchStatus::Funded => (
                        "Investment Funded".to_string(),
                        format!("{} has funded {}. Congratulations!", investor_name, company),
                    ),
                    MatchStatus::Declined => (
                        "Investor Declined".to_string(),
                        format!("{} declined the match with {}.", investor_name, company),
                    ),
                    _ => unreachable!("notify_priority is only set for terminal-ish states"),
                };

                emit_or_log(
                    &state.store,
                    NotificationEvent {
                        recipient_id: updated.founder_id,
                        recipient_type: PartyRole::Founder,
                        kind: NotificationKind::MatchStatusChanged,
                        title,
                        message,
                        related_entity_id: updated.id,
                        priority,
                        action_url: None,
                        action_text: None,
                    },
                )
                .await;
            }
            updated
        }
    };

    let breakdown = state
        .store
        .status_breakdown_for_request(updated.funding_request_id)
        .await;

    Ok(Json(UpdateMatchStatusResponse {
        updated_match: updated,
        breakdown,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MatchListQuery {
    /// Filter matches by workflow status
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchListResponse {
    pub funding_request_id: Uuid,
    pub matches: Vec<MatchRecord>,
    pub breakdown: StatusBreakdown,
}

/// List the matches for a funding request, highest score first
#[utoipa::path(
    get,
    path = "/matching/requests/{id}/matches",
    params(("id" = Uuid, Path, description = "Funding request id"), MatchListQuery),
    responses(
        (status = 200, description = "Matches for the funding request", body = MatchListResponse),
        (status = 404, description = "Funding request not found"),
    )
)]
#[tracing::instrument(skip(state, query), fields(funding_request_id = %id))]
pub async fn list_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<MatchListResponse>, AppError> {
    if state.store.find_funding_request_by_id(id).await.is_none() {
        return Err(AppError::NotFound("Funding request not found".to_string()));
    }

    let (matches, breakdown) = tokio::join!(
        state.store.find_matches_for_request(id, query.status),
        state.store.status_breakdown_for_request(id)
    );

    Ok(Json(MatchListResponse {
        funding_request_id: id,
        matches,
        breakdown,
    }))
}
