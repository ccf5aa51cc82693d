//! Explicit input validation
//!
//! Creation payloads implement [`Validate`] by running field validators through
//! a [`Validator`], which collects every `(field, message)` failure instead of
//! stopping at the first one. The [`Validated`] extractor runs this before the
//! handler sees the payload.

pub mod extractor;
pub mod validators;

pub use extractor::Validated;

use serde::Serialize;

use crate::core::error::ValidationError;

/// A single failed check on a named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Types whose values can be checked before they are used
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        for (index, item) in self.iter().enumerate() {
            v.item(index, item);
        }
        v.finish()
    }
}

/// Accumulates failures across several checks
#[derive(Debug, Default)]
pub struct Validator {
    failures: Vec<FieldFailure>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a validator against a value, recording its failure
    pub fn check<F>(&mut self, field: &str, value: &str, validator: F) -> &mut Self
    where
        F: Fn(&str, &str) -> Result<(), String>,
    {
        if let Err(message) = validator(field, value) {
            self.failures.push(FieldFailure::new(field, message));
        }
        self
    }

    /// Required and bounded in length
    ///
    /// The length check is skipped when the value is missing so only one
    /// failure is reported for it.
    pub fn text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            return self.check(field, value, validators::required());
        }
        self.check(field, value, validators::max_length(max))
    }

    /// Record a failure for a value that is absent entirely
    pub fn present<T>(&mut self, field: &str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            let message = format!("The {} field is required.", field);
            self.failures.push(FieldFailure::new(field, message));
        }
        self
    }

    /// Validate a nested item, prefixing its failures with `field[index]`
    pub fn nested<T: Validate>(&mut self, field: &str, index: usize, item: &T) -> &mut Self {
        if let Err(ValidationError::FieldErrors(failures)) = item.validate() {
            let prefix = format!("{}[{}]", field, index);
            self.failures.extend(failures.into_iter().map(|f| FieldFailure {
                field: format!("{}.{}", prefix, f.field),
                message: f.message,
            }));
        }
        self
    }

    /// Validate one element of a top-level list, prefixing with `[index]`
    pub fn item<T: Validate>(&mut self, index: usize, item: &T) -> &mut Self {
        if let Err(ValidationError::FieldErrors(failures)) = item.validate() {
            self.failures.extend(failures.into_iter().map(|f| FieldFailure {
                field: format!("[{}].{}", index, f.field),
                message: f.message,
            }));
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(self.failures))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        title: String,
    }

    impl Validate for Line {
        fn validate(&self) -> Result<(), ValidationError> {
            let mut v = Validator::new();
            v.text("title", &self.title, 5);
            v.finish()
        }
    }

    #[test]
    fn test_collects_all_failures() {
        let mut v = Validator::new();
        v.text("firstName", "", 50).text("lastName", &"x".repeat(51), 50);
        assert!(!v.is_valid());

        let Err(ValidationError::FieldErrors(failures)) = v.finish() else {
            panic!("expected failures");
        };
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].field, "firstName");
        assert_eq!(failures[1].field, "lastName");
    }

    #[test]
    fn test_missing_text_reports_once() {
        let mut v = Validator::new();
        v.text("firstName", "   ", 2);
        let Err(ValidationError::FieldErrors(failures)) = v.finish() else {
            panic!("expected failures");
        };
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("required"));
    }

    #[test]
    fn test_present() {
        let mut v = Validator::new();
        v.present::<u8>("dateOfBirth", None).present("x", Some(&1));
        let Err(ValidationError::FieldErrors(failures)) = v.finish() else {
            panic!("expected failures");
        };
        assert_eq!(failures, vec![FieldFailure::new(
            "dateOfBirth",
            "The dateOfBirth field is required."
        )]);
    }

    #[test]
    fn test_nested_prefixes_field_path() {
        let mut v = Validator::new();
        v.nested("courses", 1, &Line {
            title: "far too long".into(),
        });
        let Err(ValidationError::FieldErrors(failures)) = v.finish() else {
            panic!("expected failures");
        };
        assert_eq!(failures[0].field, "courses[1].title");
    }

    #[test]
    fn test_list_prefixes_index() {
        let lines = vec![
            Line { title: "ok".into() },
            Line { title: String::new() },
        ];
        let Err(ValidationError::FieldErrors(failures)) = lines.validate() else {
            panic!("expected failures");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "[1].title");
    }

    #[test]
    fn test_valid_finishes_ok() {
        let mut v = Validator::new();
        v.text("title", "ok", 5);
        assert!(v.finish().is_ok());
    }
}
