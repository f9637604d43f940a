use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{AppId, WebhookId};
use crate::domains::webhooks::events::WebhookEventSyncType;

/// A subscription endpoint owned by an app.
///
/// Webhooks with a `subscription_query` get their payload shaped by that
/// query; webhooks without one receive the legacy static payload and cannot
/// be pregenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Webhook {
    pub id: WebhookId,
    pub app_id: AppId,
    pub name: String,
    pub target_url: String,
    pub is_active: bool,
    pub subscription_query: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Webhook {
    /// The subscription query, if set and non-empty.
    pub fn subscription_query(&self) -> Option<&str> {
        self.subscription_query
            .as_deref()
            .filter(|query| !query.is_empty())
    }

    /// Batch-load webhooks for multiple apps (for DataLoader)
    pub async fn find_by_app_ids(app_ids: &[AppId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, app_id, name, target_url, is_active, subscription_query, created_at
            FROM webhooks
            WHERE app_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(app_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Active webhooks of active apps subscribed to the given sync event.
    pub async fn find_active_for_event(
        event_type: WebhookEventSyncType,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT w.id, w.app_id, w.name, w.target_url, w.is_active,
                   w.subscription_query, w.created_at
            FROM webhooks w
            JOIN apps a ON a.id = w.app_id
            WHERE w.is_active
              AND a.is_active
              AND EXISTS (
                  SELECT 1 FROM webhook_events e
                  WHERE e.webhook_id = w.id AND e.event_type = $1
              )
            ORDER BY w.id ASC
            "#,
        )
        .bind(event_type.as_str())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
