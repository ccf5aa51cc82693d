//! Macros for reducing boilerplate when defining records and external models
//!
//! These macros generate the trait implementations the engine needs: field
//! access by internal name for stored records, and the declared field list for
//! shapeable external models.

/// Implement [`Record`](crate::core::record::Record) for a stored record type
///
/// Every listed field must be convertible into a
/// [`FieldValue`](crate::core::field::FieldValue). The first argument after the
/// type is the resource name used in messages.
///
/// # Example
/// ```rust,ignore
/// impl_record!(Author, "Author", {
///     "id" => id,
///     "first_name" => first_name,
///     "last_name" => last_name,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident,
        $resource:expr,
        {
            $( $name:literal => $field:ident ),* $(,)?
        }
    ) => {
        impl $crate::core::record::Record for $type {
            fn resource_name() -> &'static str {
                $resource
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $( $name => Some($crate::core::field::FieldValue::from(self.$field.clone())), )*
                    _ => None,
                }
            }

            fn field_names() -> &'static [&'static str] {
                &[ $( $name ),* ]
            }
        }
    };
}

/// Implement [`Shapeable`](crate::core::shaping::Shapeable) for an external model
///
/// Fields are declared in the order full representations list them. The
/// names given here are the keys clients select with `fields=` and the keys
/// that appear in shaped output.
///
/// # Example
/// ```rust,ignore
/// impl_shaped_fields!(AuthorDto, [
///     "id" => id,
///     "name" => name,
///     "age" => age,
///     "mainCategory" => main_category,
/// ]);
/// ```
#[macro_export]
macro_rules! impl_shaped_fields {
    (
        $type:ident,
        [ $( $name:literal => $field:ident ),* $(,)? ]
    ) => {
        impl $crate::core::shaping::Shapeable for $type {
            fn describe_fields() -> &'static [$crate::core::shaping::FieldDescriptor<Self>] {
                static FIELDS: &[$crate::core::shaping::FieldDescriptor<$type>] = &[
                    $(
                        $crate::core::shaping::FieldDescriptor::new($name, |model: &$type| {
                            $crate::core::field::FieldValue::from(model.$field.clone())
                        }),
                    )*
                ];
                FIELDS
            }
        }
    };
}
