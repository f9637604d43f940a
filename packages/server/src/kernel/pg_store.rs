// Postgres-backed webhook store
//
// Thin adapter from BaseWebhookStore onto the model query methods.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{AppId, EventPayloadId, WebhookId};
use crate::domains::app::models::App;
use crate::domains::webhooks::events::WebhookEventSyncType;
use crate::domains::webhooks::models::{EventPayload, Webhook, WebhookEvent};
use crate::kernel::BaseWebhookStore;

#[derive(Clone)]
pub struct PgWebhookStore {
    pool: PgPool,
}

impl PgWebhookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseWebhookStore for PgWebhookStore {
    async fn find_payloads_by_ids(&self, ids: &[EventPayloadId]) -> Result<Vec<EventPayload>> {
        EventPayload::find_by_ids(ids, &self.pool)
            .await
            .context("Failed to load event payloads")
    }

    async fn find_webhook_events_by_webhook_ids(
        &self,
        webhook_ids: &[WebhookId],
    ) -> Result<Vec<WebhookEvent>> {
        WebhookEvent::find_by_webhook_ids(webhook_ids, &self.pool)
            .await
            .context("Failed to load webhook events")
    }

    async fn find_webhooks_by_app_ids(&self, app_ids: &[AppId]) -> Result<Vec<Webhook>> {
        Webhook::find_by_app_ids(app_ids, &self.pool)
            .await
            .context("Failed to load webhooks")
    }

    async fn find_apps_by_ids(&self, ids: &[AppId]) -> Result<Vec<App>> {
        App::find_by_ids(ids, &self.pool)
            .await
            .context("Failed to load apps")
    }

    async fn find_active_webhooks_for_event(
        &self,
        event_type: WebhookEventSyncType,
    ) -> Result<Vec<Webhook>> {
        Webhook::find_active_for_event(event_type, &self.pool)
            .await
            .with_context(|| format!("Failed to load webhooks for {}", event_type))
    }
}
