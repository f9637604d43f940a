// GraphQL request context and per-request loaders
pub mod context;
pub mod loaders;

pub use context::*;
pub use loaders::DataLoaders;
