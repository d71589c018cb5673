use chrono::{DateTime, Utc};

use crate::config::MatchingConfig;
use crate::entities::{
    ActingUser, AssignmentMethod, FundingRequest, FundingRequestPatch, FundingRequestStatus,
    NotificationEvent, NotificationKind, NotificationPriority, PartyRole,
};
use crate::error::AppError;
use crate::notify::emit_or_log;
use crate::store::MemoryStore;

/// Applies the minimum-investor threshold and refresh policy to funding
/// requests. Holds the config explicitly so tests can vary thresholds.
#[derive(Debug, Clone, Copy)]
pub struct AllotmentEngine {
    config: MatchingConfig,
}

impl AllotmentEngine {
    pub fn new(config: MatchingConfig) -> Self {
        AllotmentEngine { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Count considered for the threshold decision. With `replace_existing`
    /// the prior matches were already cleared, so only the new batch counts.
    pub fn total_assigned(
        &self,
        newly_assigned: usize,
        existing_before: usize,
        replace_existing: bool,
    ) -> usize {
        if replace_existing {
            newly_assigned
        } else {
            existing_before + newly_assigned
        }
    }

    /// Whole hours left on the refresh cooldown, or None when it has elapsed.
    pub fn cooldown_remaining_hours(
        &self,
        last_refreshed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<i64> {
        let elapsed_secs = (now - last_refreshed_at).num_seconds().max(0);
        let cooldown_secs = self.config.refresh_cooldown_hours * 3600;
        if elapsed_secs >= cooldown_secs {
            return None;
        }
        // Report remaining whole hours, rounded up.
        Some((cooldown_secs - elapsed_secs + 3599) / 3600)
    }

    /// Recompute the funding request's status after an assignment and emit
    /// exactly one founder notification describing the outcome.
    pub async fn apply_assignment(
        &self,
        store: &MemoryStore,
        request: &FundingRequest,
        actor: &ActingUser,
        method: AssignmentMethod,
        newly_assigned: usize,
        existing_before: usize,
        replace_existing: bool,
        now: DateTime<Utc>,
    ) -> Result<FundingRequest, AppError> {
        let total = self.total_assigned(newly_assigned, existing_before, replace_existing);
        let minimum = self.config.minimum_investors_for_allotment;

        let mut patch = FundingRequestPatch::default();
        let becomes_allotted =
            total >= minimum && request.status != FundingRequestStatus::Allotted;
        if becomes_allotted {
            patch.status = Some(FundingRequestStatus::Allotted);
            patch.allotted_at = Some(Some(now));
            patch.allotted_by = Some(Some(actor.actor_id));
            patch.allotment_method = Some(Some(method));
        } else if total < minimum {
            // Still accumulating, or fell below the threshold after a replace.
            patch.status = Some(FundingRequestStatus::Open);
        }

        if method == AssignmentMethod::Ai {
            // Mean over ALL AI-sourced matches currently on the request, not
            // just the new batch.
            let ai_scores: Vec<u8> = store
                .find_matches_for_request(request.id, None)
                .await
                .into_iter()
                .filter(|m| m.assignment_method == AssignmentMethod::Ai)
                .map(|m| m.match_score)
                .collect();
            if !ai_scores.is_empty() {
                let mean =
                    ai_scores.iter().map(|&s| s as f64).sum::<f64>() / ai_scores.len() as f64;
                patch.ai_match_score = Some(Some(mean));
            }
        }

        let updated = store.update_funding_request(request.id, patch).await?;

        let is_allotted = updated.status == FundingRequestStatus::Allotted;
        let event = if is_allotted {
            NotificationEvent {
                recipient_id: updated.founder_id,
                recipient_type: PartyRole::Founder,
                kind: NotificationKind::RequestAllotted,
                title: "Investors Allotted".to_string(),
                message: format!(
                    "Your funding request has been allotted with {} matched investor(s).",
                    total
                ),
                related_entity_id: updated.id,
                priority: NotificationPriority::High,
                action_url: None,
                action_text: None,
            }
        } else {
            NotificationEvent {
                recipient_id: updated.founder_id,
                recipient_type: PartyRole::Founder,
                kind: NotificationKind::InvestorsAssigned,
                title: "Investors Assigned".to_string(),
                message: format!(
                    "{} investor(s) assigned to your funding request ({} of {} needed for allotment).",
                    newly_assigned, total, minimum
                ),
                related_entity_id: updated.id,
                priority: NotificationPriority::Medium,
                action_url: None,
                action_text: None,
            }
        };
        emit_or_log(store, event).await;

        tracing::info!(
            "Assignment applied to request {}: {} new, {} total, status {}",
            updated.id,
            newly_assigned,
            total,
            updated.status
        );
        Ok(updated)
    }

    /// Founder-initiated reset of an allotted request back to open.
    ///
    /// Two-phase: matches are deleted first, then the request is updated. If
    /// the update fails after the deletion, a compensating update restores
    /// the pre-refresh request fields; failure of the compensation itself is
    /// logged, not raised over the original error.
    pub async fn refresh(
        &self,
        store: &MemoryStore,
        request: &FundingRequest,
        actor: &ActingUser,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(FundingRequest, usize), AppError> {
        if !actor.is_founder() || request.founder_id != actor.actor_id {
            return Err(AppError::Validation(
                "Only the owning founder can refresh a funding request".to_string(),
            ));
        }
        if request.status != FundingRequestStatus::Allotted {
            return Err(AppError::Validation(
                "Only allotted funding requests can be refreshed".to_string(),
            ));
        }
        if request.refresh_count >= self.config.max_refresh_count {
            return Err(AppError::Validation(format!(
                "Maximum refresh limit ({}) reached.",
                self.config.max_refresh_count
            )));
        }
        if let Some(last) = request.last_refreshed_at {
            if let Some(remaining) = self.cooldown_remaining_hours(last, now) {
                return Err(AppError::Validation(format!(
                    "Please wait {} more hour(s) before refreshing this request again",
                    remaining
                )));
            }
        }

        let prior_admin = request.allotted_by;
        let prior_assigned = store.count_matches_for_request(request.id).await;

        // Phase one: clear the matches.
        let deleted = store.delete_matches_for_request(request.id).await;

        // Phase two: reset the request.
        let reset = FundingRequestPatch {
            status: Some(FundingRequestStatus::Open),
            allotted_at: Some(None),
            allotted_by: Some(None),
            allotment_method: Some(None),
            ai_match_score: Some(None),
            refresh_count: Some(request.refresh_count + 1),
            last_refreshed_at: Some(Some(now)),
        };
        let updated = match store.update_funding_request(request.id, reset).await {
            Ok(updated) => updated,
            Err(original) => {
                // Best-effort compensation: put the request fields back.
                let rollback = FundingRequestPatch {
                    status: Some(request.status),
                    allotted_at: Some(request.allotted_at),
                    allotted_by: Some(request.allotted_by),
                    allotment_method: Some(request.allotment_method),
                    ai_match_score: Some(request.ai_match_score),
                    refresh_count: Some(request.refresh_count),
                    last_refreshed_at: Some(request.last_refreshed_at),
                };
                if let Err(rollback_err) =
                    store.update_funding_request(request.id, rollback).await
                {
                    tracing::error!(
                        "Refresh rollback failed for request {}: {}",
                        request.id,
                        rollback_err
                    );
                }
                return Err(AppError::Dependency(format!(
                    "Failed to update funding request during refresh: {}",
                    original
                )));
            }
        };

        if let Some(admin_id) = prior_admin {
            let reason_text = reason
                .map(|r| format!(" Reason: {}", r))
                .unwrap_or_default();
            emit_or_log(
                store,
                NotificationEvent {
                    recipient_id: admin_id,
                    recipient_type: PartyRole::Admin,
                    kind: NotificationKind::RequestRefreshed,
                    title: "Funding Request Refreshed".to_string(),
                    message: format!(
                        "A founder refreshed their funding request, clearing {} assigned investor(s).{}",
                        prior_assigned, reason_text
                    ),
                    related_entity_id: updated.id,
                    priority: NotificationPriority::Medium,
                    action_url: None,
                    action_text: None,
                },
            )
            .await;
        }

        let remaining_refreshes = self
            .config
            .max_refresh_count
            .saturating_sub(updated.refresh_count);
        emit_or_log(
            store,
            NotificationEvent {
                recipient_id: updated.founder_id,
                recipient_type: PartyRole::Founder,
                kind: NotificationKind::RequestRefreshed,
                title: "Funding Request Refreshed".to_string(),
                message: format!(
                    "Your funding request is open for new investor matches again. {} refresh(es) remaining.",
                    remaining_refreshes
                ),
                related_entity_id: updated.id,
                priority: NotificationPriority::Medium,
                action_url: None,
                action_text: None,
            },
        )
        .await;

        tracing::info!(
            "Request {} refreshed ({} of {}), {} matches cleared",
            updated.id,
            updated.refresh_count,
            self.config.max_refresh_count,
            deleted
        );
        Ok((updated, deleted))
    }

    /// Recompute request state after a single investor was removed.
    ///
    /// Only a drop to zero matches resets the request to open. A request
    /// that falls below the threshold but keeps at least one match stays
    /// allotted.
    pub async fn handle_removal(
        &self,
        store: &MemoryStore,
        request: &FundingRequest,
    ) -> Result<FundingRequest, AppError> {
        let remaining = store.count_matches_for_request(request.id).await;
        if remaining == 0 && request.status == FundingRequestStatus::Allotted {
            let patch = FundingRequestPatch {
                status: Some(FundingRequestStatus::Open),
                allotted_at: Some(None),
                ..FundingRequestPatch::default()
            };
            let updated = store.update_funding_request(request.id, patch).await?;
            tracing::info!(
                "Request {} reset to open after last investor was removed",
                updated.id
            );
            return Ok(updated);
        }
        store
            .find_funding_request_by_id(request.id)
            .await
            .ok_or_else(|| AppError::NotFound("Funding request not found".to_string()))
    }
}
