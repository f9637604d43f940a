use anyhow::Result;
use async_trait::async_trait;
use batch_loader::BatchFn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::AppId;
use crate::domains::app::models::App;
use crate::kernel::BaseWebhookStore;

/// Batches app lookups by ID.
pub struct AppByIdLoader {
    pub store: Arc<dyn BaseWebhookStore>,
}

impl AppByIdLoader {
    pub fn new(store: Arc<dyn BaseWebhookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<AppId, Option<App>> for AppByIdLoader {
    async fn load(&self, keys: &[AppId]) -> Result<HashMap<AppId, Option<App>>> {
        let fetched = self.store.find_apps_by_ids(keys).await?;
        Ok(fetched.into_iter().map(|app| (app.id, Some(app))).collect())
    }
}
