//! Server dependencies for loaders (using traits for testability)
//!
//! This module provides the dependency container every request context is
//! built from. All external services use trait abstractions to enable testing.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::tax::CheckoutTaxConfigurationResolver;
use crate::kernel::{
    BaseCheckoutStore, BasePayloadGenerator, BaseTaxConfigurationResolver, BaseWebhookStore,
    PgWebhookStore,
};

/// Dependencies shared by all requests.
#[derive(Clone)]
pub struct ServerDeps {
    pub webhook_store: Arc<dyn BaseWebhookStore>,
    pub checkout_store: Arc<dyn BaseCheckoutStore>,
    pub payload_generator: Arc<dyn BasePayloadGenerator>,
    pub tax_resolver: Arc<dyn BaseTaxConfigurationResolver>,
}

impl ServerDeps {
    pub fn new(
        webhook_store: Arc<dyn BaseWebhookStore>,
        checkout_store: Arc<dyn BaseCheckoutStore>,
        payload_generator: Arc<dyn BasePayloadGenerator>,
    ) -> Self {
        Self {
            webhook_store,
            checkout_store,
            payload_generator,
            tax_resolver: Arc::new(CheckoutTaxConfigurationResolver),
        }
    }

    /// Webhook records from Postgres; checkout state and payload generation
    /// come from the caller.
    pub fn with_postgres(
        pool: PgPool,
        checkout_store: Arc<dyn BaseCheckoutStore>,
        payload_generator: Arc<dyn BasePayloadGenerator>,
    ) -> Self {
        Self::new(
            Arc::new(PgWebhookStore::new(pool)),
            checkout_store,
            payload_generator,
        )
    }

    pub fn with_tax_resolver(mut self, tax_resolver: Arc<dyn BaseTaxConfigurationResolver>) -> Self {
        self.tax_resolver = tax_resolver;
        self
    }
}
