use batch_loader::{Loader, LoaderConfig};

use crate::common::{AppId, CheckoutToken, EventPayloadId, WebhookId};
use crate::domains::app::loader::AppByIdLoader;
use crate::domains::app::models::App;
use crate::domains::checkout::loader::{
    CheckoutInfoByCheckoutTokenLoader, CheckoutLinesInfoByCheckoutTokenLoader,
};
use crate::domains::webhooks::loader::{
    PayloadByIdLoader, WebhookEventsByWebhookIdLoader, WebhooksByAppIdLoader,
};
use crate::domains::webhooks::models::{CheckoutTaxPayloads, Requestor, Webhook, WebhookEvent};
use crate::domains::webhooks::pregenerate::{
    AppLoader, CheckoutInfoLoader, CheckoutLinesLoader, PregeneratedCheckoutTaxPayloadsLoader,
};
use crate::kernel::ServerDeps;

/// Every loader of one request. Build a fresh set per request; caches are
/// never shared across requests.
pub struct DataLoaders {
    pub payload: Loader<EventPayloadId, Option<String>, PayloadByIdLoader>,
    pub webhook_events: Loader<WebhookId, Vec<WebhookEvent>, WebhookEventsByWebhookIdLoader>,
    pub webhooks_by_app: Loader<AppId, Vec<Webhook>, WebhooksByAppIdLoader>,
    pub app: AppLoader,
    pub checkout_info: CheckoutInfoLoader,
    pub checkout_lines: CheckoutLinesLoader,
    pub pregenerated_tax_payloads:
        Loader<CheckoutToken, CheckoutTaxPayloads, PregeneratedCheckoutTaxPayloadsLoader>,
}

impl DataLoaders {
    pub fn new(deps: &ServerDeps, requestor: Requestor, config: LoaderConfig) -> Self {
        let app: Loader<AppId, Option<App>, AppByIdLoader> =
            Loader::with_config(AppByIdLoader::new(deps.webhook_store.clone()), config)
                .with_name("app_by_id");
        let checkout_info = Loader::with_config(
            CheckoutInfoByCheckoutTokenLoader::new(deps.checkout_store.clone()),
            config,
        )
        .with_name("checkout_info_by_checkout_token");
        let checkout_lines = Loader::with_config(
            CheckoutLinesInfoByCheckoutTokenLoader::new(deps.checkout_store.clone()),
            config,
        )
        .with_name("checkout_lines_info_by_checkout_token");

        let pregenerated_tax_payloads = Loader::with_config(
            PregeneratedCheckoutTaxPayloadsLoader::new(
                deps.clone(),
                requestor,
                checkout_info.clone(),
                checkout_lines.clone(),
                app.clone(),
            ),
            config,
        )
        .with_name("pregenerated_checkout_tax_payloads");

        Self {
            payload: Loader::with_config(PayloadByIdLoader::new(deps.webhook_store.clone()), config)
                .with_name("payload_by_id"),
            webhook_events: Loader::with_config(
                WebhookEventsByWebhookIdLoader::new(deps.webhook_store.clone()),
                config,
            )
            .with_name("webhook_events_by_webhook_id"),
            webhooks_by_app: Loader::with_config(
                WebhooksByAppIdLoader::new(deps.webhook_store.clone()),
                config,
            )
            .with_name("webhooks_by_app_id"),
            app,
            checkout_info,
            checkout_lines,
            pregenerated_tax_payloads,
        }
    }
}
