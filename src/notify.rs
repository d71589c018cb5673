use crate::entities::NotificationEvent;
use crate::store::MemoryStore;

/// Persist a notification, swallowing sink failures. Notifications are
/// fire-and-forget: a failed emit must never fail the operation that
/// produced it.
pub async fn emit_or_log(store: &MemoryStore, event: NotificationEvent) {
    let kind = event.kind;
    let recipient = event.recipient_id;
    if let Err(err) = store.emit(event).await {
        tracing::warn!(
            "Failed to persist {:?} notification for {}: {}",
            kind,
            recipient,
            err
        );
    }
}
