use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{WebhookEventId, WebhookId};

/// One event kind a webhook is subscribed to. Stored as the event's wire name
/// so async and sync event kinds share the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WebhookEvent {
    pub id: WebhookEventId,
    pub webhook_id: WebhookId,
    pub event_type: String,
}

impl WebhookEvent {
    /// Batch-load subscribed events for multiple webhooks (for DataLoader)
    pub async fn find_by_webhook_ids(webhook_ids: &[WebhookId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, webhook_id, event_type
            FROM webhook_events
            WHERE webhook_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(webhook_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
