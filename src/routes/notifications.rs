use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::Notification;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub recipient_id: Uuid,
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

/// List persisted notifications for a recipient, newest first
#[utoipa::path(
    get,
    path = "/notifications/{recipient_id}",
    params(("recipient_id" = Uuid, Path, description = "Founder, investor or admin id")),
    responses(
        (status = 200, description = "Notifications for the recipient", body = NotificationListResponse),
    )
)]
#[tracing::instrument(skip(state), fields(recipient_id = %recipient_id))]
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(recipient_id): Path<Uuid>,
) -> Result<Json<NotificationListResponse>, AppError> {
    let notifications = state.store.notifications_for(recipient_id).await;
    let unread = notifications.iter().filter(|n| !n.read).count();

    Ok(Json(NotificationListResponse {
        recipient_id,
        notifications,
        unread,
    }))
}
