use std::collections::HashMap;

use async_trait::async_trait;

/// A bulk fetch behind a [`Loader`](crate::Loader).
///
/// Implementations must issue a single bulk operation for the whole slice.
/// `keys` are distinct and arrive in the order they were first requested.
/// A key left out of the returned map is not an error: the loader resolves it
/// to `V::default()`, so use `Option<T>` for single records and `Vec<T>` for
/// grouped records.
///
/// Returning `Err` fails every key of the batch with the same error.
#[async_trait]
pub trait BatchFn<K, V>: Send + Sync + 'static {
    async fn load(&self, keys: &[K]) -> anyhow::Result<HashMap<K, V>>;
}
