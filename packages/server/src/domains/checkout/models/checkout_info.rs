use serde::{Deserialize, Serialize};

use super::{Address, Checkout};
use crate::common::ChannelId;
use crate::domains::tax::models::TaxConfiguration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub slug: String,
    pub currency_code: String,
    /// Country used for taxes when the checkout has no usable address.
    pub default_country: String,
    pub tax_configuration: TaxConfiguration,
}

/// Checkout plus the channel data needed to price it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    pub checkout: Checkout,
    pub channel: Channel,
}

impl CheckoutInfo {
    pub fn shipping_address(&self) -> Option<&Address> {
        self.checkout.shipping_address.as_ref()
    }

    pub fn billing_address(&self) -> Option<&Address> {
        self.checkout.billing_address.as_ref()
    }
}
