use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::common::{AppId, CheckoutToken};

/// Pregenerated tax payloads of one checkout: app id -> query hash -> payload.
///
/// The query hash dimension keeps payloads apart when the same app changes its
/// subscription query, or when two webhooks of one app use different queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutTaxPayloads(BTreeMap<AppId, BTreeMap<String, Value>>);

impl CheckoutTaxPayloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload. Returns the payload previously stored for the same
    /// app and query hash, if any.
    pub fn insert(&mut self, app_id: AppId, query_hash: String, payload: Value) -> Option<Value> {
        self.0.entry(app_id).or_default().insert(query_hash, payload)
    }

    pub fn get(&self, app_id: AppId, query_hash: &str) -> Option<&Value> {
        self.0.get(&app_id).and_then(|by_hash| by_hash.get(query_hash))
    }

    pub fn for_app(&self, app_id: AppId) -> Option<&BTreeMap<String, Value>> {
        self.0.get(&app_id)
    }

    pub fn app_ids(&self) -> impl Iterator<Item = AppId> + '_ {
        self.0.keys().copied()
    }

    /// Number of stored payloads across all apps.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Payloads pregenerated for a set of checkouts, keyed by checkout token
/// string.
///
/// Absent entries mean nothing was generated. Generation failures are never
/// recorded here.
#[derive(Debug, Clone, Default)]
pub struct PregeneratedTaxPayloads {
    by_checkout: HashMap<String, CheckoutTaxPayloads>,
}

impl PregeneratedTaxPayloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        checkout_token: &str,
        app_id: AppId,
        query_hash: String,
        payload: Value,
    ) -> Option<Value> {
        self.by_checkout
            .entry(checkout_token.to_string())
            .or_default()
            .insert(app_id, query_hash, payload)
    }

    pub fn for_checkout(&self, checkout_token: &str) -> Option<&CheckoutTaxPayloads> {
        self.by_checkout.get(checkout_token)
    }

    pub fn get(&self, checkout_token: &str, app_id: AppId, query_hash: &str) -> Option<&Value> {
        self.for_checkout(checkout_token)
            .and_then(|payloads| payloads.get(app_id, query_hash))
    }

    pub fn is_empty(&self) -> bool {
        self.by_checkout.values().all(CheckoutTaxPayloads::is_empty)
    }

    /// Project onto `tokens`, one entry per token in the same order. Tokens
    /// without payloads get an empty map; a repeated token gets a copy.
    pub fn into_ordered(mut self, tokens: &[CheckoutToken]) -> Vec<CheckoutTaxPayloads> {
        let mut taken: HashMap<String, CheckoutTaxPayloads> = HashMap::new();
        tokens
            .iter()
            .map(|token| {
                let key = token.to_string();
                if let Some(payloads) = self.by_checkout.remove(&key) {
                    taken.insert(key, payloads.clone());
                    payloads
                } else {
                    taken.get(&key).cloned().unwrap_or_default()
                }
            })
            .collect()
    }
}
