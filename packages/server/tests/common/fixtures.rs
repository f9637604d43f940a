//! Test fixtures for building checkout and webhook records.
//!
//! The default world served by `TestHarness` is:
//!
//! | webhook | app            | events                   | query        |
//! |---------|----------------|--------------------------|--------------|
//! | 1       | 7 app.avalara  | checkout_calculate_taxes | AVALARA      |
//! | 2       | 8 app.taxjar   | checkout_calculate_taxes | TAXJAR       |
//! | 3       | 7 app.avalara  | checkout_calculate_taxes | none         |
//! | 4       | 9 (inactive)   | checkout_calculate_taxes | INACTIVE     |
//! | 5       | 8 app.taxjar   | order_calculate_taxes    | ORDER        |

use chrono::{DateTime, Duration, Utc};
use webhook_core::common::{AppId, ChannelId, CheckoutLineId, CheckoutToken, EventPayloadId};
use webhook_core::domains::app::models::App;
use webhook_core::domains::checkout::models::{
    Address, Channel, Checkout, CheckoutInfo, CheckoutLine, CheckoutLineInfo,
};
use webhook_core::domains::tax::{
    TaxCalculationStrategy, TaxConfiguration, TaxConfigurationPerCountry,
};
use webhook_core::domains::webhooks::models::{EventPayload, Webhook};

pub const AVALARA_APP_ID: AppId = AppId::new(7);
pub const TAXJAR_APP_ID: AppId = AppId::new(8);
pub const INACTIVE_APP_ID: AppId = AppId::new(9);

pub const AVALARA: &str = "app.avalara";
pub const TAXJAR: &str = "app.taxjar";

pub const AVALARA_QUERY: &str =
    "subscription { event { ... on CalculateTaxes { taxBase { totalAmount } } } }";
pub const TAXJAR_QUERY: &str =
    "subscription { event { ... on CalculateTaxes { taxBase { lines { quantity } } } } }";
pub const INACTIVE_QUERY: &str = "subscription { event { __typename } }";
pub const ORDER_QUERY: &str =
    "subscription { event { ... on CalculateTaxes { taxBase { currency } } } }";

pub fn app(id: AppId, identifier: Option<&str>, is_active: bool) -> App {
    App {
        id,
        name: format!("Tax app {id}"),
        identifier: identifier.map(str::to_string),
        is_active,
        created_at: Utc::now(),
    }
}

pub fn webhook(id: i64, app_id: AppId, query: Option<&str>) -> Webhook {
    Webhook {
        id: id.into(),
        app_id,
        name: format!("tax-webhook-{id}"),
        target_url: format!("https://tax-{app_id}.example.com/webhooks"),
        is_active: true,
        subscription_query: query.map(str::to_string),
        created_at: Utc::now(),
    }
}

pub fn payload(id: i64, body: &str) -> EventPayload {
    EventPayload {
        id: EventPayloadId::new(id),
        payload: body.to_string(),
        created_at: Utc::now(),
    }
}

/// Price expiration one minute ago.
pub fn stale() -> DateTime<Utc> {
    Utc::now() - Duration::minutes(1)
}

/// Price expiration one hour ahead.
pub fn fresh() -> DateTime<Utc> {
    Utc::now() + Duration::hours(1)
}

pub fn tax_configuration(
    strategy: Option<TaxCalculationStrategy>,
    tax_app_id: Option<&str>,
) -> TaxConfiguration {
    TaxConfiguration {
        channel_id: ChannelId::new(1),
        tax_calculation_strategy: strategy,
        tax_app_id: tax_app_id.map(str::to_string),
        country_exceptions: vec![],
    }
}

pub fn country_exception(
    country: &str,
    strategy: Option<TaxCalculationStrategy>,
    tax_app_id: Option<&str>,
) -> TaxConfigurationPerCountry {
    TaxConfigurationPerCountry {
        country: country.to_string(),
        tax_calculation_strategy: strategy,
        tax_app_id: tax_app_id.map(str::to_string),
    }
}

/// A US checkout on channel 1 with a fresh token.
pub fn checkout_info(
    tax_configuration: TaxConfiguration,
    price_expiration: DateTime<Utc>,
) -> CheckoutInfo {
    CheckoutInfo {
        checkout: Checkout {
            token: CheckoutToken::new(),
            channel_id: ChannelId::new(1),
            currency: "USD".to_string(),
            email: Some("buyer@example.com".to_string()),
            shipping_address: Some(Address::in_country("US")),
            billing_address: Some(Address::in_country("US")),
            price_expiration,
            last_change: Utc::now() - Duration::hours(2),
        },
        channel: Channel {
            id: ChannelId::new(1),
            slug: "default-channel".to_string(),
            currency_code: "USD".to_string(),
            default_country: "US".to_string(),
            tax_configuration,
        },
    }
}

/// A stale checkout whose taxes go to the given tax app, or to any tax app.
pub fn stale_tax_app_checkout(tax_app_id: Option<&str>) -> CheckoutInfo {
    checkout_info(
        tax_configuration(Some(TaxCalculationStrategy::TaxApp), tax_app_id),
        stale(),
    )
}

pub fn line(id: i64, checkout_token: CheckoutToken, is_shipping_required: bool) -> CheckoutLineInfo {
    CheckoutLineInfo {
        line: CheckoutLine {
            id: CheckoutLineId::new(id),
            checkout_token,
            variant_sku: format!("SKU-{id}"),
            quantity: 2,
        },
        is_shipping_required,
    }
}
