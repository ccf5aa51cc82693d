//! In-memory record store for testing and development

use crate::core::record::Record;
use crate::core::sort::SortClause;
use crate::core::store::{FilterCondition, RecordStore, StorePage};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory record store implementation
///
/// Records are kept in insertion order. Queries filter, stable-sort by the
/// compiled clause, count, then slice. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryStore<T: Record> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> InMemoryStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store holding `records`
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
        }
    }

    fn filtered_sorted(&self, filters: &[FilterCondition], sort: &SortClause) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matching: Vec<T> = records
            .iter()
            .filter(|r| filters.iter().all(|f| f.matches(*r)))
            .cloned()
            .collect();

        if !sort.is_empty() {
            matching.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(matching)
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn query(
        &self,
        filters: &[FilterCondition],
        sort: &SortClause,
        page_number: usize,
        page_size: usize,
    ) -> Result<StorePage<T>> {
        let matching = self.filtered_sorted(filters, sort)?;
        let total_count = matching.len();
        let skip = page_number.saturating_sub(1).saturating_mul(page_size);
        let items = matching.into_iter().skip(skip).take(page_size).collect();

        tracing::debug!(
            resource = T::resource_name(),
            total_count,
            page_number,
            page_size,
            "queried in-memory store"
        );
        Ok(StorePage { items, total_count })
    }

    async fn list(&self, filters: &[FilterCondition], sort: &SortClause) -> Result<Vec<T>> {
        self.filtered_sorted(filters, sort)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.iter().find(|r| r.id() == *id).cloned())
    }

    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(anyhow!(
                "{} with id '{}' already exists",
                T::resource_name(),
                record.id()
            ));
        }
        records.push(record.clone());

        Ok(record)
    }

    async fn update(&self, record: T) -> Result<Option<T>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let before = records.len();
        records.retain(|r| r.id() != *id);
        Ok(records.len() != before)
    }
}
