// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Loaders and the pregeneration flow are domain code built on top of them.
//
// Naming convention: Base* for trait names (e.g., BaseWebhookStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{AppId, CheckoutToken, EventPayloadId, WebhookId};
use crate::domains::app::models::App;
use crate::domains::checkout::models::{Checkout, CheckoutInfo, CheckoutLineInfo};
use crate::domains::tax::models::{TaxConfiguration, TaxConfigurationPerCountry};
use crate::domains::webhooks::events::WebhookEventSyncType;
use crate::domains::webhooks::models::{EventPayload, RequestContext, Webhook, WebhookEvent};

// =============================================================================
// Record stores (Infrastructure - bulk reads only)
// =============================================================================

/// Bulk reads of app and webhook records.
///
/// Every method is a single round trip for the whole id slice. Unknown ids are
/// simply absent from the result.
#[async_trait]
pub trait BaseWebhookStore: Send + Sync {
    async fn find_payloads_by_ids(&self, ids: &[EventPayloadId]) -> Result<Vec<EventPayload>>;

    async fn find_webhook_events_by_webhook_ids(
        &self,
        webhook_ids: &[WebhookId],
    ) -> Result<Vec<WebhookEvent>>;

    async fn find_webhooks_by_app_ids(&self, app_ids: &[AppId]) -> Result<Vec<Webhook>>;

    async fn find_apps_by_ids(&self, ids: &[AppId]) -> Result<Vec<App>>;

    /// Active webhooks of active apps subscribed to `event_type`, ordered by id.
    async fn find_active_webhooks_for_event(
        &self,
        event_type: WebhookEventSyncType,
    ) -> Result<Vec<Webhook>>;
}

/// Bulk reads of checkout state.
#[async_trait]
pub trait BaseCheckoutStore: Send + Sync {
    async fn find_checkout_infos(&self, tokens: &[CheckoutToken]) -> Result<Vec<CheckoutInfo>>;

    /// Lines of all given checkouts, in line order within each checkout.
    async fn find_checkout_lines_info(
        &self,
        tokens: &[CheckoutToken],
    ) -> Result<Vec<CheckoutLineInfo>>;
}

// =============================================================================
// Subscription payloads (Infrastructure - runs a stored subscription query)
// =============================================================================

#[async_trait]
pub trait BasePayloadGenerator: Send + Sync {
    /// Execute `subscription_query` against `subject` on behalf of `app`.
    ///
    /// `Ok(None)` means the query produced nothing worth sending.
    async fn generate_payload(
        &self,
        event_type: WebhookEventSyncType,
        subject: &Checkout,
        subscription_query: &str,
        request: &RequestContext,
        app: &App,
    ) -> Result<Option<serde_json::Value>>;
}

// =============================================================================
// Tax configuration
// =============================================================================

pub trait BaseTaxConfigurationResolver: Send + Sync {
    /// Channel tax configuration and the country exception that applies to
    /// this checkout, if any.
    fn resolve(
        &self,
        checkout_info: &CheckoutInfo,
        lines: &[CheckoutLineInfo],
    ) -> Result<(TaxConfiguration, Option<TaxConfigurationPerCountry>)>;
}
