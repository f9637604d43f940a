//! Test harness over the in-memory dependencies.
//!
//! Every test gets its own stores seeded with the default webhook world (see
//! `fixtures`), and builds request contexts from them the way a server would
//! for each incoming request.

use batch_loader::LoaderConfig;
use test_context::AsyncTestContext;
use webhook_core::common::{CheckoutToken, UserId};
use webhook_core::domains::checkout::models::{CheckoutInfo, CheckoutLineInfo};
use webhook_core::domains::webhooks::events::WebhookEventSyncType;
use webhook_core::domains::webhooks::models::Requestor;
use webhook_core::kernel::{MemoryWebhookStore, TestDependencies};
use webhook_core::server::GraphQLContext;

use super::fixtures::*;

/// Test harness that owns the in-memory dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let request = ctx.request();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: TestDependencies,
    pub requestor: Requestor,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::with_deps(TestDependencies::new().webhook_store(default_webhook_store()))
    }

    async fn teardown(self) {
        // Stores are dropped with the harness
    }
}

impl TestHarness {
    /// Creates a harness over custom dependencies.
    pub fn with_deps(deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            deps,
            requestor: Requestor::User(UserId::new(1)),
        }
    }

    /// A fresh request context with empty loader caches.
    pub fn request(&self) -> GraphQLContext {
        self.request_with_config(LoaderConfig::default())
    }

    pub fn request_with_config(&self, config: LoaderConfig) -> GraphQLContext {
        GraphQLContext::new(self.deps.server_deps(), self.requestor, config)
    }

    /// Store a checkout and return its token.
    pub fn add_checkout(&self, info: CheckoutInfo, lines: Vec<CheckoutLineInfo>) -> CheckoutToken {
        let token = info.checkout.token;
        self.deps.checkout_store.insert_checkout(info, lines);
        token
    }
}

pub fn default_webhook_store() -> MemoryWebhookStore {
    let calculate = [WebhookEventSyncType::CheckoutCalculateTaxes];
    MemoryWebhookStore::new()
        .with_app(app(AVALARA_APP_ID, Some(AVALARA), true))
        .with_app(app(TAXJAR_APP_ID, Some(TAXJAR), true))
        .with_app(app(INACTIVE_APP_ID, Some("app.retired"), false))
        .with_webhook(webhook(1, AVALARA_APP_ID, Some(AVALARA_QUERY)), &calculate)
        .with_webhook(webhook(2, TAXJAR_APP_ID, Some(TAXJAR_QUERY)), &calculate)
        .with_webhook(webhook(3, AVALARA_APP_ID, None), &calculate)
        .with_webhook(webhook(4, INACTIVE_APP_ID, Some(INACTIVE_QUERY)), &calculate)
        .with_webhook(
            webhook(5, TAXJAR_APP_ID, Some(ORDER_QUERY)),
            &[WebhookEventSyncType::OrderCalculateTaxes],
        )
        .with_payload(payload(1, r#"{"taxes":[{"amount":"1.20"}]}"#))
        .with_payload(payload(2, r#"{"taxes":[]}"#))
}
