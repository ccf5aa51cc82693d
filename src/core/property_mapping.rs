//! Property mapping registry
//!
//! A [`PropertyMappingTable`] translates external (API-visible) field names
//! into one or more internal field names plus a direction-reversal flag. The
//! [`PropertyMappingRegistry`] holds one table per exact
//! `(external type, internal type)` pair. It is built once at startup through
//! [`PropertyMappingRegistryBuilder`] and is read-only afterwards, so it can be
//! shared behind an `Arc` without locking.
//!
//! # Example
//!
//! ```
//! use shaper::core::property_mapping::{
//!     PropertyMappingEntry, PropertyMappingRegistry, PropertyMappingTable,
//! };
//!
//! struct PersonDto;
//! struct Person;
//!
//! let table = PropertyMappingTable::new(vec![
//!     PropertyMappingEntry::new("Id", ["id"]),
//!     PropertyMappingEntry::new("Name", ["first_name", "last_name"]),
//! ])
//! .unwrap();
//!
//! let registry = PropertyMappingRegistry::builder()
//!     .register::<PersonDto, Person>(table)
//!     .build();
//!
//! assert!(registry.is_valid_field_list::<PersonDto, Person>(Some("name desc, id")));
//! assert!(!registry.is_valid_field_list::<PersonDto, Person>(Some("salary")));
//! ```

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ShaperConfig;
use crate::core::error::{ConfigError, MappingError};

/// One external field and the internal fields it expands to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMappingEntry {
    #[serde(rename = "external")]
    pub external_name: String,
    #[serde(rename = "internal")]
    pub internal_names: Vec<String>,
    #[serde(default)]
    pub reverse: bool,
}

impl PropertyMappingEntry {
    pub fn new<I, S>(external_name: impl Into<String>, internal_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            external_name: external_name.into(),
            internal_names: internal_names.into_iter().map(Into::into).collect(),
            reverse: false,
        }
    }

    /// Mark the entry so that sorting by it inverts the requested direction
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

/// Extract the field token of a list item: trimmed, cut at the first space
pub(crate) fn field_token(clause: &str) -> &str {
    let clause = clause.trim();
    match clause.find(' ') {
        Some(index) => &clause[..index],
        None => clause,
    }
}

/// Immutable mapping of external name to entry, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMappingTable {
    entries: IndexMap<String, PropertyMappingEntry>,
}

impl PropertyMappingTable {
    /// Build a table, rejecting empty internal lists and duplicate names
    pub fn new(entries: impl IntoIterator<Item = PropertyMappingEntry>) -> Result<Self, MappingError> {
        let mut map = IndexMap::new();
        for entry in entries {
            if entry.internal_names.is_empty() {
                return Err(MappingError::EmptyInternalNames {
                    external: entry.external_name,
                });
            }
            let key = entry.external_name.to_lowercase();
            if map.contains_key(&key) {
                return Err(MappingError::DuplicateExternalName {
                    external: entry.external_name,
                });
            }
            map.insert(key, entry);
        }
        Ok(Self { entries: map })
    }

    /// Find the entry for an external name, ignoring case
    pub fn get(&self, external_name: &str) -> Option<&PropertyMappingEntry> {
        self.entries.get(&external_name.to_lowercase())
    }

    pub fn contains(&self, external_name: &str) -> bool {
        self.get(external_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &PropertyMappingEntry> {
        self.entries.values()
    }

    /// First token of a comma-separated list that has no entry
    ///
    /// Each item is trimmed and anything after its first space (an `asc` or
    /// `desc` suffix) is ignored.
    pub fn first_unmatched<'a>(&self, fields: &'a str) -> Option<&'a str> {
        fields
            .split(',')
            .map(field_token)
            .find(|token| !self.contains(token))
    }

    /// Whether every token of an optional field list has an entry
    ///
    /// An absent or blank list is always valid.
    pub fn is_valid_field_list(&self, fields: Option<&str>) -> bool {
        match fields {
            None => true,
            Some(f) if f.trim().is_empty() => true,
            Some(f) => self.first_unmatched(f).is_none(),
        }
    }
}

/// Process-wide registry of mapping tables keyed by exact type pair
#[derive(Debug, Default)]
pub struct PropertyMappingRegistry {
    tables: HashMap<(TypeId, TypeId), PropertyMappingTable>,
}

impl PropertyMappingRegistry {
    pub fn builder() -> PropertyMappingRegistryBuilder {
        PropertyMappingRegistryBuilder::default()
    }

    /// Resolve the table for `<E, I>`
    ///
    /// The lookup is exact: a table registered for another pair never answers,
    /// even when one of the two types matches.
    pub fn lookup<E: 'static, I: 'static>(&self) -> Result<&PropertyMappingTable, MappingError> {
        self.tables
            .get(&(TypeId::of::<E>(), TypeId::of::<I>()))
            .ok_or(MappingError::NotFound {
                external: type_name::<E>(),
                internal: type_name::<I>(),
            })
    }

    /// Validate a field list against the `<E, I>` table
    ///
    /// Returns false when no table is registered for the pair.
    pub fn is_valid_field_list<E: 'static, I: 'static>(&self, fields: Option<&str>) -> bool {
        match self.lookup::<E, I>() {
            Ok(table) => table.is_valid_field_list(fields),
            Err(e) => {
                tracing::error!(error = %e, "field list checked against unregistered mapping");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Startup-time builder for [`PropertyMappingRegistry`]
#[derive(Debug, Default)]
pub struct PropertyMappingRegistryBuilder {
    tables: HashMap<(TypeId, TypeId), PropertyMappingTable>,
}

impl PropertyMappingRegistryBuilder {
    /// Register the table for `<E, I>`, replacing any previous one
    pub fn register<E: 'static, I: 'static>(mut self, table: PropertyMappingTable) -> Self {
        tracing::debug!(
            external = type_name::<E>(),
            internal = type_name::<I>(),
            entries = table.len(),
            "registered property mapping"
        );
        self.tables
            .insert((TypeId::of::<E>(), TypeId::of::<I>()), table);
        self
    }

    /// Register the table for `<E, I>` from a configured resource section
    pub fn register_from_config<E: 'static, I: 'static>(
        self,
        config: &ShaperConfig,
        resource: &str,
    ) -> Result<Self, ConfigError> {
        let section = config
            .property_mapping(resource)
            .ok_or_else(|| ConfigError::MissingMapping {
                resource: resource.to_string(),
            })?;

        let table = PropertyMappingTable::new(section.entries.iter().cloned()).map_err(|source| {
            ConfigError::InvalidMapping {
                resource: resource.to_string(),
                source,
            }
        })?;

        Ok(self.register::<E, I>(table))
    }

    pub fn build(self) -> PropertyMappingRegistry {
        PropertyMappingRegistry {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PersonDto;
    struct Person;
    struct OtherDto;

    fn person_table() -> PropertyMappingTable {
        PropertyMappingTable::new(vec![
            PropertyMappingEntry::new("Id", ["id"]),
            PropertyMappingEntry::new("Age", ["date_of_birth"]).reversed(),
            PropertyMappingEntry::new("Name", ["first_name", "last_name"]),
        ])
        .unwrap()
    }

    fn registry() -> PropertyMappingRegistry {
        PropertyMappingRegistry::builder()
            .register::<PersonDto, Person>(person_table())
            .build()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = person_table();
        assert!(table.contains("name"));
        assert!(table.contains("NAME"));
        assert_eq!(
            table.get("age").unwrap().internal_names,
            vec!["date_of_birth".to_string()]
        );
        assert!(table.get("age").unwrap().reverse);
    }

    #[test]
    fn test_empty_internal_names_rejected() {
        let err = PropertyMappingTable::new(vec![PropertyMappingEntry::new(
            "Ghost",
            Vec::<String>::new(),
        )])
        .unwrap_err();
        assert_eq!(err, MappingError::EmptyInternalNames {
            external: "Ghost".into()
        });
    }

    #[test]
    fn test_duplicate_external_name_rejected() {
        let err = PropertyMappingTable::new(vec![
            PropertyMappingEntry::new("Name", ["first_name"]),
            PropertyMappingEntry::new("name", ["last_name"]),
        ])
        .unwrap_err();
        assert!(matches!(err, MappingError::DuplicateExternalName { .. }));
    }

    #[test]
    fn test_empty_field_list_always_valid() {
        let registry = registry();
        assert!(registry.is_valid_field_list::<PersonDto, Person>(None));
        assert!(registry.is_valid_field_list::<PersonDto, Person>(Some("")));
        assert!(registry.is_valid_field_list::<PersonDto, Person>(Some("   ")));
    }

    #[test]
    fn test_field_list_strips_direction() {
        let registry = registry();
        assert!(registry.is_valid_field_list::<PersonDto, Person>(Some(" Name desc , age asc,id")));
        assert!(!registry.is_valid_field_list::<PersonDto, Person>(Some("Name, Salary desc")));
    }

    #[test]
    fn test_first_unmatched() {
        let table = person_table();
        assert_eq!(table.first_unmatched("id, salary desc, bonus"), Some("salary"));
        assert_eq!(table.first_unmatched("id,name"), None);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = registry();
        assert!(registry.lookup::<PersonDto, Person>().is_ok());

        let err = registry.lookup::<OtherDto, Person>().unwrap_err();
        assert!(matches!(err, MappingError::NotFound { .. }));
        assert!(registry.lookup::<Person, PersonDto>().is_err());
        assert!(!registry.is_valid_field_list::<OtherDto, Person>(None));
    }

    #[test]
    fn test_register_from_config() {
        let config = ShaperConfig::default_config();
        let registry = PropertyMappingRegistry::builder()
            .register_from_config::<PersonDto, Person>(&config, "authors")
            .unwrap()
            .build();
        let table = registry.lookup::<PersonDto, Person>().unwrap();
        assert_eq!(
            table.get("Name").unwrap().internal_names,
            vec!["first_name".to_string(), "last_name".to_string()]
        );
    }

    #[test]
    fn test_register_from_config_missing_resource() {
        let config = ShaperConfig::default_config();
        let err = PropertyMappingRegistry::builder()
            .register_from_config::<PersonDto, Person>(&config, "invoices")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingMapping { .. }));
    }
}
