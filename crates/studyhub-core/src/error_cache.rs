//! Locally cached error-bank items
//!
//! Older clients kept error-bank entries in local storage before the
//! server-side bank existed. The map is read and rewritten whole on every
//! call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use studyhub_storage::{load_json, save_json, KeyValueStore};

use crate::Result;

pub const ERROR_BANK_KEY: &str = "error_bank_items";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedErrorItem {
    pub id: String,
    pub subject: String,
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ErrorBankCache {
    storage: Arc<dyn KeyValueStore>,
}

impl ErrorBankCache {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn read_all(&self) -> BTreeMap<String, CachedErrorItem> {
        match load_json(self.storage.as_ref(), ERROR_BANK_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Discarding unreadable error-bank cache: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn write_all(&self, items: &BTreeMap<String, CachedErrorItem>) -> Result<()> {
        save_json(self.storage.as_ref(), ERROR_BANK_KEY, items)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<CachedErrorItem> {
        self.read_all().remove(id)
    }

    /// Items, newest first
    pub fn list(&self) -> Vec<CachedErrorItem> {
        let mut items: Vec<CachedErrorItem> = self.read_all().into_values().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    pub fn upsert(&self, item: CachedErrorItem) -> Result<()> {
        let mut items = self.read_all();
        items.insert(item.id.clone(), item);
        self.write_all(&items)
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut items = self.read_all();
        if items.remove(id).is_none() {
            return Ok(false);
        }
        self.write_all(&items)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(ERROR_BANK_KEY)?;
        Ok(())
    }
}
