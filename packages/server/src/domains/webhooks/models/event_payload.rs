use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::EventPayloadId;

/// A stored delivery body, kept so retries resend exactly what was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventPayload {
    pub id: EventPayloadId,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl EventPayload {
    pub fn get_payload(&self) -> &str {
        &self.payload
    }

    /// Batch-load payloads by ID (for DataLoader)
    pub async fn find_by_ids(ids: &[EventPayloadId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, payload, created_at
            FROM event_payloads
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
