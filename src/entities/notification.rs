use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::profiles::PartyRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// What the notification is about; drives client-side grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    InvestorsAssigned,
    RequestAllotted,
    RequestRefreshed,
    MatchStatusChanged,
}

/// Structured event handed to the notification sink. Fire-and-forget from the
/// core's perspective: emission failures never fail the primary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationEvent {
    pub recipient_id: Uuid,
    pub recipient_type: PartyRole,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_entity_id: Uuid,
    pub priority: NotificationPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
}

/// Persisted form of a notification event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub recipient_type: PartyRole,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_entity_id: Uuid,
    pub priority: NotificationPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_event(event: NotificationEvent) -> Self {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: event.recipient_id,
            recipient_type: event.recipient_type,
            kind: event.kind,
            title: event.title,
            message: event.message,
            related_entity_id: event.related_entity_id,
            priority: event.priority,
            action_url: event.action_url,
            action_text: event.action_text,
            read: false,
            created_at: Utc::now(),
        }
    }
}
