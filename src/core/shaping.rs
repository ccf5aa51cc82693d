//! Data shaping
//!
//! External models describe their fields once through [`Shapeable`], an
//! ahead-of-time list of `(name, getter)` pairs usually generated by
//! [`impl_shaped_fields!`](crate::impl_shaped_fields). The shaper projects a
//! model onto an insertion-ordered [`ShapedRecord`] holding only the requested
//! fields.
//!
//! [`type_has_properties`] is the pre-flight check: callers reject unknown
//! fields as a client error before [`shape`] runs. If an unknown field reaches
//! [`shape`] anyway it fails with [`ShapingError::InvalidField`] instead of
//! dropping the field.
//!
//! The shaper only accepts full external-model instances. A shaped record is
//! not itself [`Shapeable`], so shaping it again does not compile:
//!
//! ```compile_fail
//! use shaper::core::shaping::{shape, ShapedRecord};
//!
//! let already_shaped = ShapedRecord::default();
//! let _ = shape(&already_shaped, Some("id,name"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::error::ShapingError;
use crate::core::field::FieldValue;

/// A declared field of an external model and how to read it
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub getter: fn(&T) -> FieldValue,
}

impl<T> FieldDescriptor<T> {
    pub const fn new(name: &'static str, getter: fn(&T) -> FieldValue) -> Self {
        Self { name, getter }
    }

    pub fn read(&self, model: &T) -> FieldValue {
        (self.getter)(model)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// External models that can be shaped
pub trait Shapeable: Sized + 'static {
    /// Declared fields, in declaration order
    fn describe_fields() -> &'static [FieldDescriptor<Self>];

    /// Find a declared field, ignoring case
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::describe_fields()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

/// Insertion-ordered map of declared field name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShapedRecord(IndexMap<String, FieldValue>);

impl ShapedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

fn requested(fields: Option<&str>) -> Option<&str> {
    fields.filter(|f| !f.trim().is_empty())
}

/// Whether every requested field is declared on `T`
///
/// Absent or blank selections are always accepted.
pub fn type_has_properties<T: Shapeable>(fields: Option<&str>) -> bool {
    match requested(fields) {
        None => true,
        Some(list) => list.split(',').all(|token| T::field(token.trim()).is_some()),
    }
}

/// Project one model onto the requested fields
///
/// With no selection every declared field is returned in declaration order.
/// Otherwise fields appear in the order the client listed them, keyed by their
/// declared names.
pub fn shape<T: Shapeable>(model: &T, fields: Option<&str>) -> Result<ShapedRecord, ShapingError> {
    let mut shaped = IndexMap::new();

    match requested(fields) {
        None => {
            for descriptor in T::describe_fields() {
                shaped.insert(descriptor.name.to_string(), descriptor.read(model));
            }
        }
        Some(list) => {
            for token in list.split(',').map(str::trim) {
                let descriptor = T::field(token).ok_or_else(|| {
                    tracing::error!(
                        field = token,
                        model = std::any::type_name::<T>(),
                        "unchecked field reached the shaper"
                    );
                    ShapingError::InvalidField {
                        field: token.to_string(),
                        type_name: std::any::type_name::<T>(),
                    }
                })?;
                shaped.insert(descriptor.name.to_string(), descriptor.read(model));
            }
        }
    }

    Ok(ShapedRecord(shaped))
}

/// Project a sequence of models onto the requested fields
pub fn shape_all<'a, T, I>(models: I, fields: Option<&str>) -> Result<Vec<ShapedRecord>, ShapingError>
where
    T: Shapeable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    models.into_iter().map(|m| shape(m, fields)).collect()
}
