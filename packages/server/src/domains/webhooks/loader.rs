use anyhow::Result;
use async_trait::async_trait;
use batch_loader::BatchFn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{AppId, EventPayloadId, WebhookId};
use crate::domains::webhooks::models::{Webhook, WebhookEvent};
use crate::kernel::BaseWebhookStore;

/// Batches event payload lookups by payload ID.
pub struct PayloadByIdLoader {
    pub store: Arc<dyn BaseWebhookStore>,
}

impl PayloadByIdLoader {
    pub fn new(store: Arc<dyn BaseWebhookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<EventPayloadId, Option<String>> for PayloadByIdLoader {
    async fn load(&self, keys: &[EventPayloadId]) -> Result<HashMap<EventPayloadId, Option<String>>> {
        let fetched = self.store.find_payloads_by_ids(keys).await?;
        Ok(fetched
            .into_iter()
            .map(|payload| (payload.id, Some(payload.get_payload().to_string())))
            .collect())
    }
}

/// Batches webhook event subscriptions by webhook ID.
pub struct WebhookEventsByWebhookIdLoader {
    pub store: Arc<dyn BaseWebhookStore>,
}

impl WebhookEventsByWebhookIdLoader {
    pub fn new(store: Arc<dyn BaseWebhookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<WebhookId, Vec<WebhookEvent>> for WebhookEventsByWebhookIdLoader {
    async fn load(&self, keys: &[WebhookId]) -> Result<HashMap<WebhookId, Vec<WebhookEvent>>> {
        let fetched = self.store.find_webhook_events_by_webhook_ids(keys).await?;
        let mut events_by_webhook: HashMap<WebhookId, Vec<WebhookEvent>> = HashMap::new();
        for event in fetched {
            events_by_webhook
                .entry(event.webhook_id)
                .or_default()
                .push(event);
        }
        // Ensure every requested key has an entry
        for id in keys {
            events_by_webhook.entry(*id).or_default();
        }
        Ok(events_by_webhook)
    }
}

/// Batches webhook lookups by owning app ID.
pub struct WebhooksByAppIdLoader {
    pub store: Arc<dyn BaseWebhookStore>,
}

impl WebhooksByAppIdLoader {
    pub fn new(store: Arc<dyn BaseWebhookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<AppId, Vec<Webhook>> for WebhooksByAppIdLoader {
    async fn load(&self, keys: &[AppId]) -> Result<HashMap<AppId, Vec<Webhook>>> {
        let fetched = self.store.find_webhooks_by_app_ids(keys).await?;
        let mut webhooks_by_app: HashMap<AppId, Vec<Webhook>> = HashMap::new();
        for webhook in fetched {
            webhooks_by_app
                .entry(webhook.app_id)
                .or_default()
                .push(webhook);
        }
        for id in keys {
            webhooks_by_app.entry(*id).or_default();
        }
        Ok(webhooks_by_app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::webhooks::events::WebhookEventSyncType;
    use crate::domains::webhooks::models::EventPayload;
    use crate::kernel::{MemoryWebhookStore, StoreCall};
    use batch_loader::Loader;
    use chrono::Utc;

    fn webhook(id: i64, app_id: i64) -> Webhook {
        Webhook {
            id: WebhookId::new(id),
            app_id: AppId::new(app_id),
            name: format!("webhook-{id}"),
            target_url: format!("https://app-{app_id}.example.com/hook"),
            is_active: true,
            subscription_query: Some("subscription { event { __typename } }".into()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_payloads_resolve_in_one_fetch_with_missing_as_none() {
        let store = Arc::new(
            MemoryWebhookStore::new()
                .with_payload(EventPayload {
                    id: EventPayloadId::new(1),
                    payload: r#"{"total":"10.00"}"#.into(),
                    created_at: Utc::now(),
                })
                .with_payload(EventPayload {
                    id: EventPayloadId::new(2),
                    payload: "".into(),
                    created_at: Utc::now(),
                }),
        );
        let loader = Loader::new(PayloadByIdLoader::new(store.clone()));

        let values = loader
            .load_many([
                EventPayloadId::new(1),
                EventPayloadId::new(3),
                EventPayloadId::new(2),
            ])
            .await
            .unwrap();

        assert_eq!(
            values,
            vec![Some(r#"{"total":"10.00"}"#.to_string()), None, Some(String::new())]
        );
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_webhook_events_grouped_per_webhook() {
        let store = Arc::new(
            MemoryWebhookStore::new()
                .with_webhook(
                    webhook(1, 7),
                    &[
                        WebhookEventSyncType::CheckoutCalculateTaxes,
                        WebhookEventSyncType::OrderCalculateTaxes,
                    ],
                )
                .with_webhook(webhook(2, 7), &[WebhookEventSyncType::CheckoutCalculateTaxes]),
        );
        let loader = Loader::new(WebhookEventsByWebhookIdLoader::new(store.clone()));

        let (first, second, unknown) = tokio::join!(
            loader.load(WebhookId::new(1)),
            loader.load(WebhookId::new(2)),
            loader.load(WebhookId::new(99)),
        );

        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 1);
        assert!(unknown.unwrap().is_empty());
        assert_eq!(
            store.calls(),
            vec![StoreCall::WebhookEvents(vec![
                WebhookId::new(1),
                WebhookId::new(2),
                WebhookId::new(99),
            ])]
        );
    }

    #[tokio::test]
    async fn test_webhooks_grouped_per_app() {
        let store = Arc::new(
            MemoryWebhookStore::new()
                .with_webhook(webhook(1, 7), &[])
                .with_webhook(webhook(2, 8), &[])
                .with_webhook(webhook(3, 7), &[]),
        );
        let loader = Loader::new(WebhooksByAppIdLoader::new(store));

        let values = loader
            .load_many([AppId::new(7), AppId::new(8), AppId::new(9)])
            .await
            .unwrap();

        let ids: Vec<Vec<i64>> = values
            .iter()
            .map(|webhooks| webhooks.iter().map(|w| w.id.get()).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 3], vec![2], vec![]]);
    }

    #[tokio::test]
    async fn test_store_failure_fails_every_key() {
        let store = Arc::new(MemoryWebhookStore::new());
        store.set_failing(true);
        let loader = Loader::new(WebhooksByAppIdLoader::new(store));

        let (a, b) = tokio::join!(loader.load(AppId::new(1)), loader.load(AppId::new(2)));

        assert!(a.unwrap_err().to_string().contains("webhook store unavailable"));
        assert!(b.unwrap_err().is_batch_failure());
    }
}
