//! Storage collaborator contract
//!
//! The engine never touches a backing store directly. It hands a
//! [`RecordStore`] the filter conditions, the compiled [`SortClause`] and the
//! requested page; the store answers with the page and the count of the whole
//! filtered set.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::core::field::FieldValue;
use crate::core::record::Record;
use crate::core::sort::SortClause;

/// A predicate over internal record fields
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// The field equals the value
    Equals { field: String, value: FieldValue },
    /// At least one of the text fields contains the needle
    ContainsAny { fields: Vec<String>, needle: String },
}

impl FilterCondition {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        FilterCondition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains_any<I, S>(fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterCondition::ContainsAny {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        }
    }

    /// Evaluate the condition against a record
    ///
    /// Text comparison is ordinal and case-sensitive.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        match self {
            FilterCondition::Equals { field, value } => {
                record.field_value(field).as_ref() == Some(value)
            }
            FilterCondition::ContainsAny { fields, needle } => fields.iter().any(|field| {
                record
                    .field_value(field)
                    .as_ref()
                    .and_then(FieldValue::as_string)
                    .is_some_and(|text| text.contains(needle.as_str()))
            }),
        }
    }
}

/// A page of records plus the size of the whole filtered set
#[derive(Debug, Clone, PartialEq)]
pub struct StorePage<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

/// Async storage collaborator for one record type
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Filter, sort, count, then slice one page
    ///
    /// `sort` is applied as a strict left-to-right composite order and
    /// `total_count` covers the filtered set before paging.
    async fn query(
        &self,
        filters: &[FilterCondition],
        sort: &SortClause,
        page_number: usize,
        page_size: usize,
    ) -> Result<StorePage<T>>;

    /// Filter and sort without paging
    async fn list(&self, filters: &[FilterCondition], sort: &SortClause) -> Result<Vec<T>>;

    /// Get a record by id
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// Get several records by id, in the order requested
    ///
    /// Missing ids are skipped; callers compare lengths to detect them.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.get(id).await? {
                found.push(record);
            }
        }
        Ok(found)
    }

    async fn exists(&self, id: &Uuid) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Store a new record
    async fn insert(&self, record: T) -> Result<T>;

    /// Replace the record with the same id
    ///
    /// Returns `None` when no such record is stored.
    async fn update(&self, record: T) -> Result<Option<T>>;

    /// Remove a record; `false` when it was not stored
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}
