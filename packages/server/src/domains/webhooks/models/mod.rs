pub mod event_payload;
pub mod pregenerated_payloads;
pub mod request_context;
pub mod webhook;
pub mod webhook_event;

pub use event_payload::*;
pub use pregenerated_payloads::*;
pub use request_context::*;
pub use webhook::*;
pub use webhook_event::*;
