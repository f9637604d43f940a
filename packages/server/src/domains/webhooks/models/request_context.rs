use serde::{Deserialize, Serialize};

use crate::common::{AppId, UserId};
use crate::domains::webhooks::events::WebhookEventSyncType;

/// Who triggered the work a payload is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Requestor {
    User(UserId),
    App(AppId),
    Anonymous,
}

/// Execution context handed to subscription payload generation.
///
/// Built once per pregeneration call and shared by every generated payload so
/// they all observe the same requestor and read policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub requestor: Requestor,
    pub sync_event: bool,
    /// When false, reads issued while generating must go to the primary
    /// database rather than a replica.
    pub allow_replica: bool,
    pub event_type: WebhookEventSyncType,
}

impl RequestContext {
    pub fn initialize(
        requestor: Requestor,
        sync_event: bool,
        allow_replica: bool,
        event_type: WebhookEventSyncType,
    ) -> Self {
        Self {
            requestor,
            sync_event,
            allow_replica,
            event_type,
        }
    }
}
