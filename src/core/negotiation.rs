//! Representation negotiation
//!
//! The `Accept` media type decides two things: which external-model variant
//! to render (`full` or `friendly`) and whether hyperlinks are embedded. Links
//! are requested by ending the subtype with `hateoas`, e.g.
//! `application/vnd.example.author.full.hateoas+json`. The structured-syntax
//! suffix (`+json`) is ignored throughout.
//!
//! The vocabulary is declared once when the [`Negotiator`] is built:
//!
//! | base subtype                      | variant    |
//! |-----------------------------------|------------|
//! | `{vendor}.{full}`                 | `Full`     |
//! | `{vendor}.{friendly}`, `{vendor}` | `Friendly` |
//! | `json`, `*`                       | `Friendly` |
//!
//! Anything else is answered with 406.

use std::fmt;

use crate::config::MediaTypesConfig;
use crate::core::error::{ConfigError, NegotiationError};

const LINKS_MARKER: &str = "hateoas";
const SEPARATORS: [char; 4] = ['.', '-', '+', '_'];

/// A parsed `Accept` media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeDescriptor {
    pub raw_value: String,
    pub type_: String,
    pub subtype_without_suffix: String,
}

impl MediaTypeDescriptor {
    /// Parse a single media type, ignoring parameters and suffix
    pub fn parse(raw: &str) -> Result<Self, NegotiationError> {
        let mime: mime::Mime = raw.trim().parse().map_err(|_| NegotiationError::InvalidMediaType {
            value: raw.to_string(),
        })?;

        Ok(Self {
            raw_value: raw.to_string(),
            type_: mime.type_().as_str().to_ascii_lowercase(),
            subtype_without_suffix: mime.subtype().as_str().to_ascii_lowercase(),
        })
    }

    /// Whether the subtype ends with the links marker
    pub fn includes_links(&self) -> bool {
        self.subtype_without_suffix.ends_with(LINKS_MARKER)
    }

    /// Subtype with the links marker and one preceding separator removed
    pub fn base_subtype(&self) -> &str {
        let subtype = self.subtype_without_suffix.as_str();
        if !self.includes_links() {
            return subtype;
        }
        let stripped = &subtype[..subtype.len() - LINKS_MARKER.len()];
        stripped
            .strip_suffix(|c: char| SEPARATORS.contains(&c))
            .unwrap_or(stripped)
    }
}

/// External-model variant chosen by negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    Full,
    #[default]
    Friendly,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Full => write!(f, "full"),
            Variant::Friendly => write!(f, "friendly"),
        }
    }
}

/// Outcome of negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Representation {
    pub variant: Variant,
    pub include_links: bool,
}

/// Maps accepted media types to representations
#[derive(Debug, Clone)]
pub struct Negotiator {
    full: String,
    friendly: Vec<String>,
}

impl Negotiator {
    /// Build the vocabulary for a vendor prefix
    ///
    /// Fails when a token is blank, carries the links marker, or when the full
    /// and friendly tokens collide, since negotiation could then not be total.
    pub fn new(vendor_prefix: &str, full: &str, friendly: &str) -> Result<Self, ConfigError> {
        let vendor = vendor_prefix.trim().to_ascii_lowercase();
        let full = full.trim().to_ascii_lowercase();
        let friendly = friendly.trim().to_ascii_lowercase();

        let invalid = |message: String| ConfigError::InvalidMediaTypes { message };

        for (name, token) in [("vendor_prefix", &vendor), ("full", &full), ("friendly", &friendly)] {
            if token.is_empty() {
                return Err(invalid(format!("{} must not be empty", name)));
            }
            if token.ends_with(LINKS_MARKER) {
                return Err(invalid(format!("{} must not end with '{}'", name, LINKS_MARKER)));
            }
        }
        if full == friendly {
            return Err(invalid(format!("full and friendly are both '{}'", full)));
        }

        Ok(Self {
            full: format!("{}.{}", vendor, full),
            friendly: vec![
                format!("{}.{}", vendor, friendly),
                vendor,
                "json".to_string(),
                "*".to_string(),
            ],
        })
    }

    pub fn from_config(config: &MediaTypesConfig) -> Result<Self, ConfigError> {
        Self::new(&config.vendor_prefix, &config.full, &config.friendly)
    }

    /// Negotiate the representation for an `Accept` header value
    ///
    /// An absent header yields the default friendly, link-free
    /// representation. Only the first entry of a comma-separated list is
    /// considered.
    pub fn negotiate(&self, accept: Option<&str>) -> Result<Representation, NegotiationError> {
        let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
            return Ok(Representation::default());
        };

        let first = accept.split(',').next().unwrap_or(accept);
        let descriptor = MediaTypeDescriptor::parse(first)?;
        self.representation_for(&descriptor)
    }

    /// Map a parsed media type onto the vocabulary
    pub fn representation_for(
        &self,
        descriptor: &MediaTypeDescriptor,
    ) -> Result<Representation, NegotiationError> {
        let not_acceptable = || NegotiationError::NotAcceptable {
            value: descriptor.raw_value.clone(),
        };

        if descriptor.type_ != "application" && descriptor.type_ != "*" {
            return Err(not_acceptable());
        }

        let base = descriptor.base_subtype();
        let variant = if base == self.full {
            Variant::Full
        } else if self.friendly.iter().any(|token| token == base) {
            Variant::Friendly
        } else {
            return Err(not_acceptable());
        };

        let representation = Representation {
            variant,
            include_links: descriptor.includes_links(),
        };
        tracing::debug!(
            media_type = %descriptor.raw_value,
            variant = %representation.variant,
            include_links = representation.include_links,
            "negotiated representation"
        );
        Ok(representation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negotiator() -> Negotiator {
        Negotiator::new("vnd.example.author", "full", "friendly").unwrap()
    }

    #[test]
    fn test_full_with_links() {
        let r = negotiator()
            .negotiate(Some("application/vnd.example.author.full.hateoas+json"))
            .unwrap();
        assert_eq!(r, Representation {
            variant: Variant::Full,
            include_links: true
        });
    }

    #[test]
    fn test_friendly_without_links() {
        let r = negotiator()
            .negotiate(Some("application/vnd.example.author.friendly+json"))
            .unwrap();
        assert_eq!(r, Representation {
            variant: Variant::Friendly,
            include_links: false
        });
    }

    #[test]
    fn test_vendor_hateoas_is_friendly_with_links() {
        let r = negotiator()
            .negotiate(Some("application/vnd.example.author.hateoas+json"))
            .unwrap();
        assert_eq!(r.variant, Variant::Friendly);
        assert!(r.include_links);
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let r = negotiator()
            .negotiate(Some("application/VND.EXAMPLE.AUTHOR.FULL.HATEOAS+JSON"))
            .unwrap();
        assert_eq!(r.variant, Variant::Full);
        assert!(r.include_links);
    }

    #[test]
    fn test_plain_json_and_wildcards() {
        let n = negotiator();
        assert_eq!(n.negotiate(None).unwrap(), Representation::default());
        assert_eq!(n.negotiate(Some("application/json")).unwrap(), Representation::default());
        assert_eq!(n.negotiate(Some("*/*")).unwrap(), Representation::default());
        assert_eq!(
            n.negotiate(Some("application/json, text/plain;q=0.5")).unwrap(),
            Representation::default()
        );
    }

    #[test]
    fn test_unparsable_is_invalid() {
        let err = negotiator().negotiate(Some("not a media type")).unwrap_err();
        assert!(matches!(err, NegotiationError::InvalidMediaType { .. }));
    }

    #[test]
    fn test_unknown_subtype_is_not_acceptable() {
        let n = negotiator();
        assert!(matches!(
            n.negotiate(Some("application/vnd.other.full+json")).unwrap_err(),
            NegotiationError::NotAcceptable { .. }
        ));
        assert!(matches!(
            n.negotiate(Some("text/csv")).unwrap_err(),
            NegotiationError::NotAcceptable { .. }
        ));
    }

    #[test]
    fn test_base_subtype_strips_one_separator() {
        let d = MediaTypeDescriptor::parse("application/vnd.example.author.full-hateoas+json").unwrap();
        assert_eq!(d.subtype_without_suffix, "vnd.example.author.full-hateoas");
        assert_eq!(d.base_subtype(), "vnd.example.author.full");

        let d = MediaTypeDescriptor::parse("application/json").unwrap();
        assert!(!d.includes_links());
        assert_eq!(d.base_subtype(), "json");
    }

    #[test]
    fn test_invalid_vocabulary() {
        assert!(Negotiator::new("vnd.example", "same", "same").is_err());
        assert!(Negotiator::new("", "full", "friendly").is_err());
        assert!(Negotiator::new("vnd.example", "full.hateoas", "friendly").is_err());
    }
}
