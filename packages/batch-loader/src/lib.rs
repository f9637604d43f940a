//! # Batch Loader
//!
//! A request-scoped loader that collapses individual key lookups into bulk
//! fetches and memoizes every result for the lifetime of the loader.
//!
//! ## How a batch forms
//!
//! ```text
//! load(a) ──┐
//! load(b) ──┼─► pending [a, b] ──(yield × N)──► BatchFn::load(&[a, b]) ──► resolve a, b
//! load(a) ──┘   (dedup: same future as the first load(a))
//! ```
//!
//! The first uncached `load` in a scheduling turn spawns a dispatch task. That
//! task yields to the runtime a configurable number of times so every other
//! synchronous caller gets a chance to enqueue, then issues exactly one call to
//! the batch function with the distinct keys in first-request order.
//!
//! ## Key Invariants
//!
//! 1. **One fetch per key** - a key reaches the batch function at most once per loader
//! 2. **Positional results** - `load_many` returns values aligned with its input keys
//! 3. **Explicit absence** - keys missing from the batch result resolve to `V::default()`
//! 4. **All-or-nothing batches** - a failing batch function fails every key in that batch
//!
//! A loader is meant to live inside one request context and be dropped with it.
//! Cloning a [`Loader`] shares the cache, it never copies it.
//!
//! ## Example
//!
//! ```ignore
//! use batch_loader::{BatchFn, Loader};
//! use std::collections::HashMap;
//!
//! struct UserNames;
//!
//! #[async_trait::async_trait]
//! impl BatchFn<i64, Option<String>> for UserNames {
//!     async fn load(&self, keys: &[i64]) -> anyhow::Result<HashMap<i64, Option<String>>> {
//!         Ok(keys.iter().map(|k| (*k, Some(format!("user-{k}")))).collect())
//!     }
//! }
//!
//! let loader = Loader::new(UserNames);
//! let (a, b) = tokio::join!(loader.load(1), loader.load(2)); // one batch: [1, 2]
//! ```

mod batch_fn;
mod config;
mod error;
mod loader;

pub use batch_fn::BatchFn;
pub use config::LoaderConfig;
pub use error::LoadError;
pub use loader::{LoadFuture, Loader};
