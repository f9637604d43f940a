// Request-scoped server state
pub mod graphql;

pub use graphql::*;
