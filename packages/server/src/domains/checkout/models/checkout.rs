use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ChannelId, CheckoutToken};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl Address {
    pub fn in_country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: None,
            postal_code: None,
        }
    }
}

/// A shopping cart. Prices computed for it stay valid until
/// `price_expiration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    pub token: CheckoutToken,
    pub channel_id: ChannelId,
    pub currency: String,
    pub email: Option<String>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub price_expiration: DateTime<Utc>,
    pub last_change: DateTime<Utc>,
}

impl Checkout {
    /// True once cached prices are no longer valid at `now`.
    pub fn is_price_expired(&self, now: DateTime<Utc>) -> bool {
        self.price_expiration <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn checkout(price_expiration: DateTime<Utc>) -> Checkout {
        Checkout {
            token: CheckoutToken::new(),
            channel_id: ChannelId::new(1),
            currency: "USD".to_string(),
            email: None,
            shipping_address: None,
            billing_address: None,
            price_expiration,
            last_change: Utc::now(),
        }
    }

    #[test]
    fn test_price_expiration_boundary_counts_as_expired() {
        let now = Utc::now();
        assert!(checkout(now).is_price_expired(now));
        assert!(checkout(now - Duration::minutes(1)).is_price_expired(now));
        assert!(!checkout(now + Duration::minutes(1)).is_price_expired(now));
    }
}
