//! Stored-record trait: the internal side of a property mapping

use crate::core::field::FieldValue;
use uuid::Uuid;

/// Base trait for internal (stored) records.
///
/// Records expose their internal fields by name so the storage collaborator
/// can filter and apply a compiled sort clause without knowing the concrete
/// type. Field names here are the *internal* names a property mapping table
/// expands to (e.g. `first_name`), never the external API names.
pub trait Record: Clone + Send + Sync + 'static {
    /// The resource name used in messages and routes (e.g., "Author")
    fn resource_name() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the value of an internal field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// List of internal field names this record exposes
    fn field_names() -> &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Note {
        id: Uuid,
        body: String,
    }

    impl Record for Note {
        fn resource_name() -> &'static str {
            "Note"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "body" => Some(self.body.clone().into()),
                _ => None,
            }
        }

        fn field_names() -> &'static [&'static str] {
            &["id", "body"]
        }
    }

    #[test]
    fn test_field_value_by_internal_name() {
        let note = Note {
            id: Uuid::new_v4(),
            body: "hello".into(),
        };
        assert_eq!(note.field_value("body"), Some(FieldValue::from("hello")));
        assert_eq!(note.field_value("id"), Some(FieldValue::from(note.id)));
        assert_eq!(note.field_value("missing"), None);
        assert_eq!(Note::field_names(), &["id", "body"]);
    }
}
