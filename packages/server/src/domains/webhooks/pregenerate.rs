//! Pregeneration of checkout tax payloads.
//!
//! For every checkout whose cached prices have expired and whose taxes are
//! computed by a tax app, the subscription query of each eligible tax webhook
//! is executed ahead of time. The payloads are keyed by checkout token, app id
//! and query hash so a later sync webhook delivery can reuse them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use batch_loader::{BatchFn, Loader};
use chrono::Utc;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::common::{get_subscription_query_hash, AppId, CheckoutToken};
use crate::domains::app::loader::AppByIdLoader;
use crate::domains::app::models::App;
use crate::domains::checkout::loader::{
    CheckoutInfoByCheckoutTokenLoader, CheckoutLinesInfoByCheckoutTokenLoader,
};
use crate::domains::checkout::models::{CheckoutInfo, CheckoutLineInfo};
use crate::domains::tax::{get_tax_app_id, get_tax_calculation_strategy, TaxCalculationStrategy};
use crate::domains::webhooks::events::WebhookEventSyncType;
use crate::domains::webhooks::models::{
    CheckoutTaxPayloads, PregeneratedTaxPayloads, RequestContext, Requestor, Webhook,
};
use crate::kernel::ServerDeps;

pub type CheckoutInfoLoader =
    Loader<CheckoutToken, Option<CheckoutInfo>, CheckoutInfoByCheckoutTokenLoader>;
pub type CheckoutLinesLoader =
    Loader<CheckoutToken, Vec<CheckoutLineInfo>, CheckoutLinesInfoByCheckoutTokenLoader>;
pub type AppLoader = Loader<AppId, Option<App>, AppByIdLoader>;

const EVENT_TYPE: WebhookEventSyncType = WebhookEventSyncType::CheckoutCalculateTaxes;

/// Output of one generation task.
struct Generated {
    checkout_token: String,
    app_id: AppId,
    query_hash: String,
    payload: Result<Option<Value>>,
}

/// Pregenerates `CHECKOUT_CALCULATE_TAXES` payloads for checkouts.
///
/// Shares its checkout and app loaders with the rest of the request context,
/// so records already fetched for this request are not fetched again.
pub struct PregeneratedCheckoutTaxPayloadsLoader {
    deps: ServerDeps,
    requestor: Requestor,
    checkout_infos: CheckoutInfoLoader,
    checkout_lines: CheckoutLinesLoader,
    apps: AppLoader,
}

impl PregeneratedCheckoutTaxPayloadsLoader {
    pub fn new(
        deps: ServerDeps,
        requestor: Requestor,
        checkout_infos: CheckoutInfoLoader,
        checkout_lines: CheckoutLinesLoader,
        apps: AppLoader,
    ) -> Self {
        Self {
            deps,
            requestor,
            checkout_infos,
            checkout_lines,
            apps,
        }
    }

    /// Generate payloads for `checkout_tokens`. The result is aligned with the
    /// input; checkouts with nothing generated get an empty map.
    ///
    /// Fails only when the candidate webhooks or the checkout, line or app
    /// records cannot be loaded. A failing generation call is logged and
    /// leaves its slot empty.
    pub async fn pregenerate(
        &self,
        checkout_tokens: &[CheckoutToken],
    ) -> Result<Vec<CheckoutTaxPayloads>> {
        let webhooks = self
            .deps
            .webhook_store
            .find_active_webhooks_for_event(EVENT_TYPE)
            .await
            .context("Failed to load tax webhooks")?;
        let app_ids = distinct_app_ids(&webhooks);

        let (checkout_infos, checkout_lines, apps) = tokio::try_join!(
            self.checkout_infos.load_many(checkout_tokens.iter().copied()),
            self.checkout_lines.load_many(checkout_tokens.iter().copied()),
            self.apps.load_many(app_ids.iter().copied()),
        )
        .context("Failed to load checkout tax dependencies")?;

        let apps: HashMap<AppId, App> = apps
            .into_iter()
            .flatten()
            .map(|app| (app.id, app))
            .collect();

        let request_context = RequestContext::initialize(self.requestor, true, false, EVENT_TYPE);
        let now = Utc::now();

        let mut tasks = JoinSet::new();
        let mut eligible = 0usize;
        for (info, lines) in checkout_infos.into_iter().zip(&checkout_lines) {
            let Some(info) = info else {
                continue;
            };
            let candidates = match self.select_candidates(&info, lines, &webhooks, &apps, now) {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(
                        checkout = %info.checkout.token,
                        error = %e,
                        "Failed to resolve tax configuration, skipping checkout"
                    );
                    continue;
                }
            };
            if candidates.is_empty() {
                continue;
            }
            eligible += 1;

            let checkout = Arc::new(info.checkout);
            for (query, app) in candidates {
                let generator = self.deps.payload_generator.clone();
                let checkout = checkout.clone();
                let request_context = request_context.clone();
                tasks.spawn(async move {
                    let payload = generator
                        .generate_payload(EVENT_TYPE, &checkout, &query, &request_context, &app)
                        .await;
                    Generated {
                        checkout_token: checkout.token.to_string(),
                        app_id: app.id,
                        query_hash: get_subscription_query_hash(&query),
                        payload,
                    }
                });
            }
        }

        let issued = tasks.len();
        let mut results = PregeneratedTaxPayloads::new();
        while let Some(joined) = tasks.join_next().await {
            let generated = match joined {
                Ok(generated) => generated,
                Err(e) => {
                    warn!(error = %e, "Tax payload generation task failed");
                    continue;
                }
            };
            match generated.payload {
                Ok(Some(payload)) if !is_empty_payload(&payload) => {
                    results.insert(
                        &generated.checkout_token,
                        generated.app_id,
                        generated.query_hash,
                        payload,
                    );
                }
                Ok(_) => {
                    debug!(
                        checkout = %generated.checkout_token,
                        app_id = %generated.app_id,
                        "Tax app returned no payload"
                    );
                }
                Err(e) => {
                    warn!(
                        checkout = %generated.checkout_token,
                        app_id = %generated.app_id,
                        error = %e,
                        "Failed to generate tax payload, skipping"
                    );
                }
            }
        }

        info!(
            checkouts = checkout_tokens.len(),
            eligible,
            issued,
            "Checkout tax payload pregeneration complete"
        );

        Ok(results.into_ordered(checkout_tokens))
    }

    /// Webhooks whose payload should be generated for this checkout, paired
    /// with their app. Empty when prices are still valid or taxes are not
    /// delegated to a tax app.
    fn select_candidates(
        &self,
        info: &CheckoutInfo,
        lines: &[CheckoutLineInfo],
        webhooks: &[Webhook],
        apps: &HashMap<AppId, App>,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<(String, App)>> {
        let (tax_configuration, country_tax_configuration) =
            self.deps.tax_resolver.resolve(info, lines)?;
        let strategy =
            get_tax_calculation_strategy(&tax_configuration, country_tax_configuration.as_ref());
        if strategy != TaxCalculationStrategy::TaxApp || !info.checkout.is_price_expired(now) {
            return Ok(Vec::new());
        }

        let tax_app_id = get_tax_app_id(&tax_configuration, country_tax_configuration.as_ref());
        Ok(webhooks
            .iter()
            .filter_map(|webhook| {
                let query = webhook.subscription_query()?;
                let app = apps.get(&webhook.app_id)?;
                match &tax_app_id {
                    Some(identifier) if !app.matches_identifier(identifier) => None,
                    _ => Some((query.to_string(), app.clone())),
                }
            })
            .collect())
    }
}

#[async_trait]
impl BatchFn<CheckoutToken, CheckoutTaxPayloads> for PregeneratedCheckoutTaxPayloadsLoader {
    async fn load(
        &self,
        keys: &[CheckoutToken],
    ) -> Result<HashMap<CheckoutToken, CheckoutTaxPayloads>> {
        let payloads = self.pregenerate(keys).await?;
        Ok(keys.iter().copied().zip(payloads).collect())
    }
}

fn distinct_app_ids(webhooks: &[Webhook]) -> Vec<AppId> {
    let mut seen = HashSet::new();
    webhooks
        .iter()
        .map(|webhook| webhook.app_id)
        .filter(|app_id| seen.insert(*app_id))
        .collect()
}

/// Null, false and empty strings, arrays and objects carry nothing to send.
fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(value) => !value,
        Value::String(value) => value.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Number(_) => false,
    }
}
