//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod pg_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use pg_store::PgWebhookStore;
pub use test_dependencies::{
    GenerateCallArgs, MemoryCheckoutStore, MemoryWebhookStore, MockPayloadGenerator, StoreCall,
    TestDependencies,
};
pub use traits::*;
