//! Sort clause compiler
//!
//! Turns a textual `orderBy` specification such as `"Name desc, Age"` into a
//! composite [`SortClause`] over internal fields. One external field may fan
//! out into several internal keys (`Name` becomes `first_name` then
//! `last_name`), which are applied left to right as tie-breakers.
//!
//! The `desc` suffix is matched case-insensitively, so `"name DESC"` and
//! `"name desc"` compile to the same clause.

use std::cmp::Ordering;
use std::fmt;

use crate::core::error::SortError;
use crate::core::property_mapping::{PropertyMappingEntry, PropertyMappingTable, field_token};
use crate::core::record::Record;

/// Direction of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// One internal field and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub internal_name: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(internal_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            internal_name: internal_name.into(),
            direction,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction.is_descending()
    }
}

/// Ordered composite sort: the first key is primary, the rest break ties
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortClause {
    keys: Vec<SortKey>,
}

impl SortClause {
    /// Compile an `orderBy` specification against a mapping table
    ///
    /// Every clause is resolved before any key is emitted, so an unknown field
    /// anywhere in the list fails the whole specification.
    pub fn compile(order_by: &str, table: &PropertyMappingTable) -> Result<Self, SortError> {
        if order_by.trim().is_empty() {
            return Err(SortError::EmptySpecification);
        }

        let resolved = order_by
            .split(',')
            .map(|clause| resolve(clause.trim(), table))
            .collect::<Result<Vec<_>, _>>()?;

        let keys = resolved
            .into_iter()
            .flat_map(|(entry, direction)| {
                let direction = if entry.reverse {
                    direction.reversed()
                } else {
                    direction
                };
                entry
                    .internal_names
                    .iter()
                    .map(move |name| SortKey::new(name.clone(), direction))
            })
            .collect();

        let clause = SortClause { keys };
        tracing::debug!(order_by, compiled = %clause, "compiled sort clause");
        Ok(clause)
    }

    /// Compile when a specification is present, or yield an empty clause
    pub fn compile_optional(
        order_by: Option<&str>,
        table: &PropertyMappingTable,
    ) -> Result<Self, SortError> {
        match order_by {
            Some(spec) if !spec.trim().is_empty() => Self::compile(spec, table),
            _ => Ok(Self::default()),
        }
    }

    /// Build a clause directly from internal keys
    pub fn by(keys: impl IntoIterator<Item = SortKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compare two records key by key; later keys only break ties
    pub fn compare<T: Record>(&self, a: &T, b: &T) -> Ordering {
        for key in &self.keys {
            let left = a.field_value(&key.internal_name);
            let right = b.field_value(&key.internal_name);
            let ordering = match (left, right) {
                (Some(l), Some(r)) => l.compare(&r),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            let ordering = if key.is_descending() {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .keys
            .iter()
            .map(|k| format!("{} {}", k.internal_name, k.direction))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", rendered)
    }
}

fn resolve<'t>(
    clause: &str,
    table: &'t PropertyMappingTable,
) -> Result<(&'t PropertyMappingEntry, SortDirection), SortError> {
    let direction = if ends_with_desc(clause) {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let token = field_token(clause);
    let entry = table.get(token).ok_or_else(|| SortError::UnknownField {
        field: token.to_string(),
    })?;
    Ok((entry, direction))
}

fn ends_with_desc(clause: &str) -> bool {
    const SUFFIX: &str = " desc";
    clause.len() >= SUFFIX.len()
        && clause.is_char_boundary(clause.len() - SUFFIX.len())
        && clause[clause.len() - SUFFIX.len()..].eq_ignore_ascii_case(SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::property_mapping::PropertyMappingEntry;
    use uuid::Uuid;

    fn table() -> PropertyMappingTable {
        PropertyMappingTable::new(vec![
            PropertyMappingEntry::new("Id", ["id"]),
            PropertyMappingEntry::new("MainCategory", ["main_category"]),
            PropertyMappingEntry::new("Age", ["date_of_birth"]).reversed(),
            PropertyMappingEntry::new("Name", ["first_name", "last_name"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_name_desc_expands_to_both_fields() {
        let clause = SortClause::compile("Name desc", &table()).unwrap();
        assert_eq!(clause.keys(), &[
            SortKey::new("first_name", SortDirection::Descending),
            SortKey::new("last_name", SortDirection::Descending),
        ]);
    }

    #[test]
    fn test_reverse_flag_inverts_direction() {
        let clause = SortClause::compile("Age", &table()).unwrap();
        assert_eq!(clause.keys(), &[SortKey::new(
            "date_of_birth",
            SortDirection::Descending
        )]);

        let clause = SortClause::compile("age desc", &table()).unwrap();
        assert_eq!(clause.keys()[0].direction, SortDirection::Ascending);
    }

    #[test]
    fn test_output_length_is_sum_of_expansions() {
        let clause = SortClause::compile("mainCategory, name, age desc, id", &table()).unwrap();
        assert_eq!(clause.len(), 1 + 2 + 1 + 1);
        assert_eq!(clause.keys()[0].internal_name, "main_category");
        assert_eq!(clause.keys()[4].internal_name, "id");
    }

    #[test]
    fn test_desc_suffix_is_case_insensitive() {
        let clause = SortClause::compile("Name DESC", &table()).unwrap();
        assert!(clause.keys().iter().all(SortKey::is_descending));
    }

    #[test]
    fn test_unknown_field_fails_whole_specification() {
        let err = SortClause::compile("Name, Salary desc", &table()).unwrap_err();
        assert_eq!(err, SortError::UnknownField {
            field: "Salary".into()
        });
    }

    #[test]
    fn test_empty_specification_rejected() {
        assert_eq!(
            SortClause::compile("  ", &table()).unwrap_err(),
            SortError::EmptySpecification
        );
        assert!(SortClause::compile_optional(None, &table()).unwrap().is_empty());
        assert!(SortClause::compile_optional(Some(""), &table()).unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        let clause = SortClause::compile("Name desc", &table()).unwrap();
        assert_eq!(clause.to_string(), "first_name desc, last_name desc");
    }

    #[derive(Clone)]
    struct Person {
        id: Uuid,
        first: &'static str,
        last: &'static str,
    }

    impl Record for Person {
        fn resource_name() -> &'static str {
            "Person"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "first_name" => Some(self.first.into()),
                "last_name" => Some(self.last.into()),
                _ => None,
            }
        }

        fn field_names() -> &'static [&'static str] {
            &["first_name", "last_name"]
        }
    }

    #[test]
    fn test_compare_uses_later_keys_as_tie_breakers() {
        let person = |first, last| Person {
            id: Uuid::new_v4(),
            first,
            last,
        };
        let mut people = vec![
            person("Ann", "Zeta"),
            person("Bob", "Alpha"),
            person("Ann", "Beta"),
        ];

        let clause = SortClause::compile("Name", &table()).unwrap();
        people.sort_by(|a, b| clause.compare(a, b));
        let names: Vec<_> = people.iter().map(|p| (p.first, p.last)).collect();
        assert_eq!(names, vec![("Ann", "Beta"), ("Ann", "Zeta"), ("Bob", "Alpha")]);

        let clause = SortClause::compile("Name desc", &table()).unwrap();
        people.sort_by(|a, b| clause.compare(a, b));
        let names: Vec<_> = people.iter().map(|p| (p.first, p.last)).collect();
        assert_eq!(names, vec![("Bob", "Alpha"), ("Ann", "Zeta"), ("Ann", "Beta")]);
    }
}
