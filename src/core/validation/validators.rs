//! Reusable field validators
//!
//! Each validator receives the external field name and the submitted text and
//! returns a human-readable message on failure.

/// Validator: text is present and not blank
pub fn required() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.trim().is_empty() {
            Err(format!("The {} field is required.", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: text must not exceed `max` characters
pub fn max_length(max: usize) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &str| {
        let len = value.chars().count();
        if len > max {
            Err(format!(
                "The field {} must be a string with a maximum length of {} (actual: {}).",
                field, max, len
            ))
        } else {
            Ok(())
        }
    }
}

/// Validator: two texts must differ
pub fn differs_from<'a>(
    other: &'a str,
    message: &'static str,
) -> impl Fn(&str, &str) -> Result<(), String> + 'a {
    move |_: &str, value: &str| {
        if value == other {
            Err(message.to_string())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_blank_returns_error() {
        let v = required();
        assert!(v("firstName", "").is_err());
        assert!(v("firstName", "   ").unwrap_err().contains("firstName"));
    }

    #[test]
    fn test_required_text_returns_ok() {
        let v = required();
        assert!(v("firstName", "Nancy").is_ok());
    }

    #[test]
    fn test_max_length_counts_chars() {
        let v = max_length(3);
        assert!(v("code", "abc").is_ok());
        assert!(v("code", "äöü").is_ok());
        let err = v("code", "abcd").unwrap_err();
        assert!(err.contains("maximum length of 3"));
    }

    #[test]
    fn test_differs_from() {
        let v = differs_from("same", "must differ");
        assert!(v("title", "other").is_ok());
        assert_eq!(v("title", "same").unwrap_err(), "must differ");
    }
}
