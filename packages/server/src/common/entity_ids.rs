//! Typed ID definitions for all domain entities.
//!
//! # Example
//!
//! ```rust
//! use webhook_core::common::{AppId, WebhookId};
//!
//! let app_id = AppId::new(1);
//! let webhook_id = WebhookId::new(1);
//!
//! // This would be a compile error:
//! // let wrong: WebhookId = app_id;
//! # let _ = (app_id, webhook_id);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for App entities (installed integrations).
pub struct App;

/// Marker type for Webhook entities (an app's subscription endpoint).
pub struct Webhook;

/// Marker type for WebhookEvent entities (event kinds a webhook listens to).
pub struct WebhookEvent;

/// Marker type for EventPayload entities (stored delivery bodies).
pub struct EventPayload;

/// Marker type for Channel entities.
pub struct Channel;

/// Marker type for CheckoutLine entities.
pub struct CheckoutLine;

/// Marker type for User entities (staff or customers).
pub struct User;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for App entities.
pub type AppId = Id<App>;

/// Typed ID for Webhook entities.
pub type WebhookId = Id<Webhook>;

/// Typed ID for WebhookEvent entities.
pub type WebhookEventId = Id<WebhookEvent>;

/// Typed ID for EventPayload entities.
pub type EventPayloadId = Id<EventPayload>;

/// Typed ID for Channel entities.
pub type ChannelId = Id<Channel>;

/// Typed ID for CheckoutLine entities.
pub type CheckoutLineId = Id<CheckoutLine>;

/// Typed ID for User entities.
pub type UserId = Id<User>;

// ============================================================================
// Checkout token
// ============================================================================

/// Primary key of a checkout. Checkouts are addressed by an opaque UUID token
/// rather than a serial id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CheckoutToken(Uuid);

impl CheckoutToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for CheckoutToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckoutToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for CheckoutToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for CheckoutToken {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_token_display_is_hyphenated_uuid() {
        let uuid = Uuid::new_v4();
        let token = CheckoutToken::from_uuid(uuid);
        assert_eq!(token.to_string(), uuid.to_string());
        assert_eq!(token.to_string().parse::<CheckoutToken>().unwrap(), token);
    }

    #[test]
    fn test_checkout_token_serializes_as_string() {
        let token = CheckoutToken::new();
        let json = serde_json::to_value(token).unwrap();
        assert_eq!(json, serde_json::Value::String(token.to_string()));
    }
}
