//! Synchronous webhook event kinds.
//!
//! Sync events expect the app to answer inline (taxes, shipping methods), which
//! is what makes pregenerating their payloads worthwhile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventSyncType {
    CheckoutCalculateTaxes,
    OrderCalculateTaxes,
    ShippingListMethodsForCheckout,
    CheckoutFilterShippingMethods,
    OrderFilterShippingMethods,
}

impl WebhookEventSyncType {
    pub const ALL: [WebhookEventSyncType; 5] = [
        WebhookEventSyncType::CheckoutCalculateTaxes,
        WebhookEventSyncType::OrderCalculateTaxes,
        WebhookEventSyncType::ShippingListMethodsForCheckout,
        WebhookEventSyncType::CheckoutFilterShippingMethods,
        WebhookEventSyncType::OrderFilterShippingMethods,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventSyncType::CheckoutCalculateTaxes => "checkout_calculate_taxes",
            WebhookEventSyncType::OrderCalculateTaxes => "order_calculate_taxes",
            WebhookEventSyncType::ShippingListMethodsForCheckout => {
                "shipping_list_methods_for_checkout"
            }
            WebhookEventSyncType::CheckoutFilterShippingMethods => {
                "checkout_filter_shipping_methods"
            }
            WebhookEventSyncType::OrderFilterShippingMethods => "order_filter_shipping_methods",
        }
    }
}

impl fmt::Display for WebhookEventSyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sync webhook event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for WebhookEventSyncType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == needle)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}
