// Webhook Core - checkout tax payload pregeneration
//
// Request-scoped batched loaders over app, webhook and checkout records, and
// the pipeline that pregenerates tax app payloads for stale checkouts.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
