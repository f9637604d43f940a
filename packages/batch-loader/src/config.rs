/// Tuning knobs for batch formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// How many times the dispatch task yields to the runtime before it
    /// collects the pending keys.
    pub yield_count: usize,
    /// Upper bound on keys per bulk fetch. `None` sends every key collected in
    /// a turn as one batch.
    pub max_batch_size: Option<usize>,
}

impl LoaderConfig {
    pub const DEFAULT_YIELD_COUNT: usize = 10;
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            yield_count: Self::DEFAULT_YIELD_COUNT,
            max_batch_size: None,
        }
    }
}
