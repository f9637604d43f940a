pub mod query_hash;

pub use query_hash::*;
