pub mod events;
pub mod loader;
pub mod models;
pub mod pregenerate;

pub use events::{UnknownEventType, WebhookEventSyncType};
pub use loader::{PayloadByIdLoader, WebhookEventsByWebhookIdLoader, WebhooksByAppIdLoader};
pub use pregenerate::PregeneratedCheckoutTaxPayloadsLoader;
