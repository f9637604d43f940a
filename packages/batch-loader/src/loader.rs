use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt, Shared, TryJoinAll};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::{BatchFn, LoadError, LoaderConfig};

/// Memoized result of a single key. Every caller asking for the same key gets
/// a clone of the same shared future.
pub type LoadFuture<V> = Shared<BoxFuture<'static, Result<V, LoadError>>>;

type Waiters<K, V> = Vec<(K, oneshot::Sender<Result<V, LoadError>>)>;

struct State<K, V> {
    cache: HashMap<K, LoadFuture<V>>,
    pending: Waiters<K, V>,
}

/// Batching, memoizing loader for one request context.
pub struct Loader<K, V, F> {
    state: Arc<Mutex<State<K, V>>>,
    batch_fn: Arc<F>,
    config: LoaderConfig,
    name: &'static str,
}

impl<K, V, F> Clone for Loader<K, V, F> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            batch_fn: Arc::clone(&self.batch_fn),
            config: self.config,
            name: self.name,
        }
    }
}

impl<K, V, F> Loader<K, V, F>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Default + Send + Sync + 'static,
    F: BatchFn<K, V>,
{
    pub fn new(batch_fn: F) -> Self {
        Self::with_config(batch_fn, LoaderConfig::default())
    }

    pub fn with_config(batch_fn: F, mut config: LoaderConfig) -> Self {
        config.max_batch_size = config.max_batch_size.map(|max| max.max(1));
        Self {
            state: Arc::new(Mutex::new(State {
                cache: HashMap::new(),
                pending: Vec::new(),
            })),
            batch_fn: Arc::new(batch_fn),
            config,
            name: std::any::type_name::<F>(),
        }
    }

    pub fn with_yield_count(mut self, yield_count: usize) -> Self {
        self.config.yield_count = yield_count;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.config.max_batch_size = Some(max_batch_size.max(1));
        self
    }

    /// Name used in log fields. Defaults to the batch function's type name.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Request a single key.
    ///
    /// The key is enqueued when this is called, not when the returned future
    /// is first polled. Must be called from within a tokio runtime.
    pub fn load(&self, key: K) -> LoadFuture<V> {
        let mut state = lock(&self.state);

        if let Some(existing) = state.cache.get(&key) {
            trace!(loader = self.name, "cache hit");
            return existing.clone();
        }

        let (tx, rx) = oneshot::channel();
        let shared = rx
            .map(|received| received.unwrap_or(Err(LoadError::Dropped)))
            .boxed()
            .shared();
        state.cache.insert(key.clone(), shared.clone());
        state.pending.push((key, tx));

        if let Some(max) = self.config.max_batch_size {
            if state.pending.len() >= max {
                let full = std::mem::take(&mut state.pending);
                drop(state);
                self.spawn_batch(full);
                return shared;
            }
        }

        let first_of_batch = state.pending.len() == 1;
        drop(state);
        if first_of_batch {
            self.spawn_dispatch();
        }
        shared
    }

    /// Request several keys. The output is aligned with `keys`, duplicates
    /// included.
    pub fn load_many<I>(&self, keys: I) -> TryJoinAll<LoadFuture<V>>
    where
        I: IntoIterator<Item = K>,
    {
        future::try_join_all(keys.into_iter().map(|key| self.load(key)))
    }

    /// Seed the cache with a known value. Does nothing if the key is already
    /// cached or in flight.
    pub fn prime(&self, key: K, value: V) {
        let mut state = lock(&self.state);
        state
            .cache
            .entry(key)
            .or_insert_with(|| future::ready(Ok(value)).boxed().shared());
    }

    /// Forget a memoized key so the next `load` fetches it again.
    pub fn clear(&self, key: &K) {
        lock(&self.state).cache.remove(key);
    }

    pub fn clear_all(&self) {
        lock(&self.state).cache.clear();
    }

    /// Number of memoized keys, resolved or in flight.
    pub fn cached_len(&self) -> usize {
        lock(&self.state).cache.len()
    }

    fn spawn_dispatch(&self) {
        let state = Arc::clone(&self.state);
        let batch_fn = Arc::clone(&self.batch_fn);
        let yield_count = self.config.yield_count;
        let name = self.name;

        tokio::spawn(async move {
            for _ in 0..yield_count {
                tokio::task::yield_now().await;
            }
            let waiters = std::mem::take(&mut lock(&state).pending);
            if waiters.is_empty() {
                // A full batch was already dispatched by `load`.
                return;
            }
            run_batch(name, batch_fn.as_ref(), waiters).await;
        });
    }

    fn spawn_batch(&self, waiters: Waiters<K, V>) {
        let batch_fn = Arc::clone(&self.batch_fn);
        let name = self.name;
        tokio::spawn(async move {
            run_batch(name, batch_fn.as_ref(), waiters).await;
        });
    }
}

async fn run_batch<K, V, F>(name: &'static str, batch_fn: &F, waiters: Waiters<K, V>)
where
    K: Eq + Hash + Clone,
    V: Clone + Default,
    F: BatchFn<K, V>,
{
    // A key cleared while pending can be enqueued again in the same batch.
    let mut seen = HashSet::new();
    let keys: Vec<K> = waiters
        .iter()
        .map(|(key, _)| key)
        .filter(|key| seen.insert(*key))
        .cloned()
        .collect();
    let batch_size = keys.len();
    debug!(loader = name, batch_size, "dispatching batch");

    match batch_fn.load(&keys).await {
        Ok(values) => {
            let found = values.len();
            for (key, tx) in waiters {
                let value = values.get(&key).cloned().unwrap_or_default();
                // Receiver lives in the cache; it is only gone if the entry was cleared.
                let _ = tx.send(Ok(value));
            }
            trace!(loader = name, batch_size, found, "batch resolved");
        }
        Err(error) => {
            warn!(loader = name, batch_size, error = %error, "batch load failed");
            let error = LoadError::batch(error);
            for (_, tx) in waiters {
                let _ = tx.send(Err(error.clone()));
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
