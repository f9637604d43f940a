//! Errors surfaced to callers of [`Loader::load`](crate::Loader::load).
//!
//! A missing record is never an error. Only a failed bulk fetch, or a dispatch
//! task that died before answering, reaches the caller.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The batch function returned an error. Every key of that batch receives
    /// a clone of the same error.
    #[error("batch load failed: {0:#}")]
    Batch(Arc<anyhow::Error>),

    /// The dispatch task ended without resolving the key (for example the
    /// batch function panicked).
    #[error("batch dispatch ended before resolving the key")]
    Dropped,
}

impl LoadError {
    pub(crate) fn batch(error: anyhow::Error) -> Self {
        LoadError::Batch(Arc::new(error))
    }

    /// Returns true if this error came from the batch function itself.
    pub fn is_batch_failure(&self) -> bool {
        matches!(self, LoadError::Batch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_display_includes_cause_chain() {
        let inner = anyhow::anyhow!("connection reset").context("fetching webhooks");
        let err = LoadError::batch(inner);
        let display = err.to_string();
        assert!(display.contains("batch load failed"));
        assert!(display.contains("fetching webhooks"));
        assert!(display.contains("connection reset"));
    }

    #[test]
    fn test_batch_error_clones_share_source() {
        let err = LoadError::batch(anyhow::anyhow!("boom"));
        let cloned = err.clone();
        match (&err, &cloned) {
            (LoadError::Batch(a), LoadError::Batch(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("Expected Batch errors"),
        }
        assert!(cloned.is_batch_failure());
        assert!(!LoadError::Dropped.is_batch_failure());
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let err: anyhow::Error = LoadError::Dropped.into();
        assert!(err.downcast_ref::<LoadError>().is_some());
    }
}
