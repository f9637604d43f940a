// TestDependencies - in-memory implementations for testing
//
// Provides stores and a payload generator that record every call, so tests can
// assert how many bulk fetches a request issued and with which keys.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::{BaseCheckoutStore, BasePayloadGenerator, BaseWebhookStore, ServerDeps};
use crate::common::{AppId, CheckoutToken, EventPayloadId, WebhookId};
use crate::domains::app::models::App;
use crate::domains::checkout::models::{Checkout, CheckoutInfo, CheckoutLineInfo};
use crate::domains::webhooks::events::WebhookEventSyncType;
use crate::domains::webhooks::models::{EventPayload, RequestContext, Webhook, WebhookEvent};

// =============================================================================
// Memory Webhook Store
// =============================================================================

/// A bulk read issued against a memory store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Payloads(Vec<EventPayloadId>),
    WebhookEvents(Vec<WebhookId>),
    WebhooksByApp(Vec<AppId>),
    Apps(Vec<AppId>),
    ActiveWebhooks(WebhookEventSyncType),
    CheckoutInfos(Vec<CheckoutToken>),
    CheckoutLines(Vec<CheckoutToken>),
}

#[derive(Default)]
pub struct MemoryWebhookStore {
    apps: RwLock<Vec<App>>,
    webhooks: RwLock<Vec<Webhook>>,
    events: RwLock<Vec<WebhookEvent>>,
    payloads: RwLock<Vec<EventPayload>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: AtomicBool,
}

impl MemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(self, app: App) -> Self {
        self.insert_app(app);
        self
    }

    pub fn with_webhook(self, webhook: Webhook, events: &[WebhookEventSyncType]) -> Self {
        self.insert_webhook(webhook, events);
        self
    }

    pub fn with_payload(self, payload: EventPayload) -> Self {
        self.insert_payload(payload);
        self
    }

    pub fn insert_app(&self, app: App) {
        self.apps.write().unwrap().push(app);
    }

    /// Add a webhook subscribed to the given events.
    pub fn insert_webhook(&self, webhook: Webhook, events: &[WebhookEventSyncType]) {
        {
            let mut stored = self.events.write().unwrap();
            for event in events {
                let id = stored.len() as i64 + 1;
                stored.push(WebhookEvent {
                    id: id.into(),
                    webhook_id: webhook.id,
                    event_type: event.as_str().to_string(),
                });
            }
        }
        self.webhooks.write().unwrap().push(webhook);
    }

    pub fn insert_payload(&self, payload: EventPayload) {
        self.payloads.write().unwrap().push(payload);
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            bail!("webhook store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseWebhookStore for MemoryWebhookStore {
    async fn find_payloads_by_ids(&self, ids: &[EventPayloadId]) -> Result<Vec<EventPayload>> {
        self.record(StoreCall::Payloads(ids.to_vec()))?;
        Ok(self
            .payloads
            .read()
            .unwrap()
            .iter()
            .filter(|payload| ids.contains(&payload.id))
            .cloned()
            .collect())
    }

    async fn find_webhook_events_by_webhook_ids(
        &self,
        webhook_ids: &[WebhookId],
    ) -> Result<Vec<WebhookEvent>> {
        self.record(StoreCall::WebhookEvents(webhook_ids.to_vec()))?;
        Ok(self
            .events
            .read()
            .unwrap()
            .iter()
            .filter(|event| webhook_ids.contains(&event.webhook_id))
            .cloned()
            .collect())
    }

    async fn find_webhooks_by_app_ids(&self, app_ids: &[AppId]) -> Result<Vec<Webhook>> {
        self.record(StoreCall::WebhooksByApp(app_ids.to_vec()))?;
        Ok(self
            .webhooks
            .read()
            .unwrap()
            .iter()
            .filter(|webhook| app_ids.contains(&webhook.app_id))
            .cloned()
            .collect())
    }

    async fn find_apps_by_ids(&self, ids: &[AppId]) -> Result<Vec<App>> {
        self.record(StoreCall::Apps(ids.to_vec()))?;
        Ok(self
            .apps
            .read()
            .unwrap()
            .iter()
            .filter(|app| ids.contains(&app.id))
            .cloned()
            .collect())
    }

    async fn find_active_webhooks_for_event(
        &self,
        event_type: WebhookEventSyncType,
    ) -> Result<Vec<Webhook>> {
        self.record(StoreCall::ActiveWebhooks(event_type))?;
        let apps = self.apps.read().unwrap();
        let events = self.events.read().unwrap();
        let mut webhooks: Vec<Webhook> = self
            .webhooks
            .read()
            .unwrap()
            .iter()
            .filter(|webhook| webhook.is_active)
            .filter(|webhook| {
                apps.iter()
                    .any(|app| app.id == webhook.app_id && app.is_active)
            })
            .filter(|webhook| {
                events.iter().any(|event| {
                    event.webhook_id == webhook.id && event.event_type == event_type.as_str()
                })
            })
            .cloned()
            .collect();
        webhooks.sort_by_key(|webhook| webhook.id);
        Ok(webhooks)
    }
}

// =============================================================================
// Memory Checkout Store
// =============================================================================

#[derive(Default)]
pub struct MemoryCheckoutStore {
    checkouts: RwLock<Vec<CheckoutInfo>>,
    lines: RwLock<Vec<CheckoutLineInfo>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: AtomicBool,
}

impl MemoryCheckoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkout(self, info: CheckoutInfo, lines: Vec<CheckoutLineInfo>) -> Self {
        self.insert_checkout(info, lines);
        self
    }

    pub fn insert_checkout(&self, info: CheckoutInfo, lines: Vec<CheckoutLineInfo>) {
        self.checkouts.write().unwrap().push(info);
        self.lines.write().unwrap().extend(lines);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            bail!("checkout store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseCheckoutStore for MemoryCheckoutStore {
    async fn find_checkout_infos(&self, tokens: &[CheckoutToken]) -> Result<Vec<CheckoutInfo>> {
        self.record(StoreCall::CheckoutInfos(tokens.to_vec()))?;
        Ok(self
            .checkouts
            .read()
            .unwrap()
            .iter()
            .filter(|info| tokens.contains(&info.checkout.token))
            .cloned()
            .collect())
    }

    async fn find_checkout_lines_info(
        &self,
        tokens: &[CheckoutToken],
    ) -> Result<Vec<CheckoutLineInfo>> {
        self.record(StoreCall::CheckoutLines(tokens.to_vec()))?;
        Ok(self
            .lines
            .read()
            .unwrap()
            .iter()
            .filter(|info| tokens.contains(&info.line.checkout_token))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock Payload Generator
// =============================================================================

/// Arguments captured from a generate_payload call
#[derive(Debug, Clone)]
pub struct GenerateCallArgs {
    pub event_type: WebhookEventSyncType,
    pub checkout_token: CheckoutToken,
    pub app_id: AppId,
    pub subscription_query: String,
    pub request: RequestContext,
}

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Payload(Value),
    Empty,
    Failure(String),
    Panic,
}

/// Generator whose answer is scripted per app. Unscripted apps get a payload
/// echoing the checkout token and app id.
#[derive(Default)]
pub struct MockPayloadGenerator {
    responses: Mutex<HashMap<AppId, ScriptedResponse>>,
    calls: Mutex<Vec<GenerateCallArgs>>,
}

impl MockPayloadGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(self, app_id: AppId, payload: Value) -> Self {
        self.script(app_id, ScriptedResponse::Payload(payload))
    }

    /// The app's query yields nothing.
    pub fn with_empty(self, app_id: AppId) -> Self {
        self.script(app_id, ScriptedResponse::Empty)
    }

    pub fn with_failure(self, app_id: AppId, message: &str) -> Self {
        self.script(app_id, ScriptedResponse::Failure(message.to_string()))
    }

    pub fn with_panic(self, app_id: AppId) -> Self {
        self.script(app_id, ScriptedResponse::Panic)
    }

    /// Get all generate calls with their arguments
    pub fn calls(&self) -> Vec<GenerateCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn script(self, app_id: AppId, response: ScriptedResponse) -> Self {
        self.responses.lock().unwrap().insert(app_id, response);
        self
    }
}

#[async_trait]
impl BasePayloadGenerator for MockPayloadGenerator {
    async fn generate_payload(
        &self,
        event_type: WebhookEventSyncType,
        subject: &Checkout,
        subscription_query: &str,
        request: &RequestContext,
        app: &App,
    ) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(GenerateCallArgs {
            event_type,
            checkout_token: subject.token,
            app_id: app.id,
            subscription_query: subscription_query.to_string(),
            request: request.clone(),
        });

        let scripted = self.responses.lock().unwrap().get(&app.id).cloned();
        match scripted {
            Some(ScriptedResponse::Payload(payload)) => Ok(Some(payload)),
            Some(ScriptedResponse::Empty) => Ok(None),
            Some(ScriptedResponse::Failure(message)) => bail!(message),
            Some(ScriptedResponse::Panic) => panic!("payload generator crashed for app {}", app.id),
            None => Ok(Some(json!({
                "checkout": subject.token.to_string(),
                "app_id": app.id,
            }))),
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// In-memory dependency set. Keeps typed handles to the fakes so tests can
/// inspect recorded calls after building `ServerDeps`.
#[derive(Clone)]
pub struct TestDependencies {
    pub webhook_store: Arc<MemoryWebhookStore>,
    pub checkout_store: Arc<MemoryCheckoutStore>,
    pub payload_generator: Arc<MockPayloadGenerator>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            webhook_store: Arc::new(MemoryWebhookStore::new()),
            checkout_store: Arc::new(MemoryCheckoutStore::new()),
            payload_generator: Arc::new(MockPayloadGenerator::new()),
        }
    }

    pub fn webhook_store(mut self, store: MemoryWebhookStore) -> Self {
        self.webhook_store = Arc::new(store);
        self
    }

    pub fn checkout_store(mut self, store: MemoryCheckoutStore) -> Self {
        self.checkout_store = Arc::new(store);
        self
    }

    pub fn payload_generator(mut self, generator: MockPayloadGenerator) -> Self {
        self.payload_generator = Arc::new(generator);
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.webhook_store.clone(),
            self.checkout_store.clone(),
            self.payload_generator.clone(),
        )
    }
}
