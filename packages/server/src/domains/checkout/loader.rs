use anyhow::Result;
use async_trait::async_trait;
use batch_loader::BatchFn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::CheckoutToken;
use crate::domains::checkout::models::{CheckoutInfo, CheckoutLineInfo};
use crate::kernel::BaseCheckoutStore;

/// Batches checkout info lookups by checkout token.
pub struct CheckoutInfoByCheckoutTokenLoader {
    pub store: Arc<dyn BaseCheckoutStore>,
}

impl CheckoutInfoByCheckoutTokenLoader {
    pub fn new(store: Arc<dyn BaseCheckoutStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<CheckoutToken, Option<CheckoutInfo>> for CheckoutInfoByCheckoutTokenLoader {
    async fn load(
        &self,
        keys: &[CheckoutToken],
    ) -> Result<HashMap<CheckoutToken, Option<CheckoutInfo>>> {
        let fetched = self.store.find_checkout_infos(keys).await?;
        Ok(fetched
            .into_iter()
            .map(|info| (info.checkout.token, Some(info)))
            .collect())
    }
}

/// Batches checkout line lookups by checkout token.
pub struct CheckoutLinesInfoByCheckoutTokenLoader {
    pub store: Arc<dyn BaseCheckoutStore>,
}

impl CheckoutLinesInfoByCheckoutTokenLoader {
    pub fn new(store: Arc<dyn BaseCheckoutStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchFn<CheckoutToken, Vec<CheckoutLineInfo>> for CheckoutLinesInfoByCheckoutTokenLoader {
    async fn load(
        &self,
        keys: &[CheckoutToken],
    ) -> Result<HashMap<CheckoutToken, Vec<CheckoutLineInfo>>> {
        let fetched = self.store.find_checkout_lines_info(keys).await?;
        let mut lines_by_checkout: HashMap<CheckoutToken, Vec<CheckoutLineInfo>> = HashMap::new();
        for info in fetched {
            lines_by_checkout
                .entry(info.line.checkout_token)
                .or_default()
                .push(info);
        }
        for token in keys {
            lines_by_checkout.entry(*token).or_default();
        }
        Ok(lines_by_checkout)
    }
}
