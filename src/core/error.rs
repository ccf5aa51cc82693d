//! Typed error handling for the shaper engine
//!
//! Every failure the engine can report belongs to one category enum, and all
//! categories roll up into [`ShaperError`], which knows its HTTP status, a
//! stable error code and an optional structured detail body.
//!
//! # Error Categories
//!
//! - [`MappingError`]: property mapping registry misconfiguration
//! - [`SortError`]: rejected `orderBy` specifications
//! - [`ShapingError`]: rejected or inconsistent field selections
//! - [`NegotiationError`]: unusable `Accept` media types
//! - [`ValidationError`]: creation payloads failing validation
//! - [`EntityError`]: missing resources
//! - [`RequestError`]: malformed request parts outside the engine's inputs
//! - [`RouteError`]: hyperlink generation failures
//! - [`StorageError`]: storage collaborator failures
//! - [`ConfigError`]: configuration loading and startup wiring
//!
//! All per-request validation failures are raised before the storage
//! collaborator is queried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::validation::FieldFailure;

/// The main error type for the shaper engine
#[derive(Debug, thiserror::Error)]
pub enum ShaperError {
    /// Property mapping errors
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Sort specification errors
    #[error(transparent)]
    Sort(#[from] SortError),

    /// Data shaping errors
    #[error(transparent)]
    Shaping(#[from] ShapingError),

    /// Content negotiation errors
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Entity lookup errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Link generation errors
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Storage collaborator errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShaperError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShaperError::Mapping(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShaperError::Sort(_) => StatusCode::BAD_REQUEST,
            ShaperError::Shaping(e) => e.status_code(),
            ShaperError::Negotiation(e) => e.status_code(),
            ShaperError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShaperError::Entity(e) => e.status_code(),
            ShaperError::Request(_) => StatusCode::BAD_REQUEST,
            ShaperError::Route(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShaperError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShaperError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShaperError::Mapping(e) => e.error_code(),
            ShaperError::Sort(e) => e.error_code(),
            ShaperError::Shaping(e) => e.error_code(),
            ShaperError::Negotiation(e) => e.error_code(),
            ShaperError::Validation(_) => "VALIDATION_ERROR",
            ShaperError::Entity(e) => e.error_code(),
            ShaperError::Request(_) => "BAD_REQUEST",
            ShaperError::Route(_) => "LINK_GENERATION_ERROR",
            ShaperError::Storage(_) => "STORAGE_ERROR",
            ShaperError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error is the client's fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShaperError::Sort(SortError::UnknownField { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            ShaperError::Shaping(ShapingError::InvalidFieldSelection { fields }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            ShaperError::Negotiation(
                NegotiationError::InvalidMediaType { value }
                | NegotiationError::NotAcceptable { value },
            ) => Some(serde_json::json!({ "mediaType": value })),
            ShaperError::Validation(ValidationError::FieldErrors(failures)) => {
                Some(serde_json::json!({ "fields": failures }))
            }
            ShaperError::Entity(EntityError::NotFound { resource, id }) => {
                Some(serde_json::json!({ "resource": resource, "id": id }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShaperError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::warn!(code = self.error_code(), error = %self, "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors raised by the property mapping registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// No table was registered for the exact (external, internal) type pair
    #[error("Cannot find exact property mapping instance for <{external}, {internal}>")]
    NotFound {
        external: &'static str,
        internal: &'static str,
    },

    /// An entry declares no internal fields
    #[error("Property mapping for '{external}' must name at least one internal field")]
    EmptyInternalNames { external: String },

    /// Two entries share an external name (case-insensitive)
    #[error("Property mapping for '{external}' is declared more than once")]
    DuplicateExternalName { external: String },
}

impl MappingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            MappingError::NotFound { .. } => "MAPPING_NOT_FOUND",
            MappingError::EmptyInternalNames { .. } => "INVALID_MAPPING",
            MappingError::DuplicateExternalName { .. } => "INVALID_MAPPING",
        }
    }
}

// =============================================================================
// Sort Errors
// =============================================================================

/// Errors raised while compiling an `orderBy` specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The specification was empty or blank
    #[error("Sort specification must not be empty")]
    EmptySpecification,

    /// A clause names a field absent from the mapping table
    #[error("Sorting by '{field}' is not supported")]
    UnknownField { field: String },
}

impl SortError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SortError::EmptySpecification => "EMPTY_SORT_SPECIFICATION",
            SortError::UnknownField { .. } => "UNKNOWN_SORT_FIELD",
        }
    }
}

// =============================================================================
// Shaping Errors
// =============================================================================

/// Errors related to data shaping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapingError {
    /// The client asked for fields the external model does not declare
    #[error("Not all requested data shaping fields exist on the resource: {fields}")]
    InvalidFieldSelection { fields: String },

    /// An unknown field reached the shaper after the existence check passed
    #[error("Field '{field}' is not declared on {type_name}")]
    InvalidField {
        field: String,
        type_name: &'static str,
    },
}

impl ShapingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShapingError::InvalidFieldSelection { .. } => StatusCode::BAD_REQUEST,
            ShapingError::InvalidField { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ShapingError::InvalidFieldSelection { .. } => "INVALID_FIELD_SELECTION",
            ShapingError::InvalidField { .. } => "INVALID_FIELD",
        }
    }
}

// =============================================================================
// Negotiation Errors
// =============================================================================

/// Errors related to content negotiation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    /// The media type could not be parsed
    #[error("Invalid media type '{value}'")]
    InvalidMediaType { value: String },

    /// The media type parsed but is not part of the declared vocabulary
    #[error("Media type '{value}' is not supported")]
    NotAcceptable { value: String },
}

impl NegotiationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            NegotiationError::InvalidMediaType { .. } => StatusCode::BAD_REQUEST,
            NegotiationError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            NegotiationError::InvalidMediaType { .. } => "INVALID_MEDIA_TYPE",
            NegotiationError::NotAcceptable { .. } => "NOT_ACCEPTABLE",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("One or more validation errors occurred: {}", summarize(.0))]
    FieldErrors(Vec<FieldFailure>),
}

fn summarize(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to resource lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// Resource was not found
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },
}

impl EntityError {
    /// Shorthand for a missing resource
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        EntityError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to malformed request parts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A list of identifiers could not be parsed
    #[error("Invalid identifier list '{value}'")]
    InvalidIdList { value: String },

    /// A header value was not valid text
    #[error("Header '{header}' is not valid text")]
    InvalidHeader { header: String },

    /// A path parameter could not be read
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// The query string could not be read
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },

    /// The request body could not be read as the expected JSON document
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },
}

// =============================================================================
// Route Errors
// =============================================================================

/// Errors raised while building hyperlinks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No route was registered under this name
    #[error("No route named '{name}'")]
    UnknownRoute { name: String },

    /// A template placeholder had no value
    #[error("Route '{name}' requires parameter '{parameter}'")]
    MissingParameter { name: String, parameter: String },

    /// Query parameters could not be encoded
    #[error("Failed to encode query for route '{name}': {message}")]
    QueryEncoding { name: String, message: String },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors surfaced by the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store failed
    #[error("Storage operation failed: {message}")]
    Backend { message: String },
}

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError::Backend {
            message: format!("{err:#}"),
        }
    }
}

impl From<anyhow::Error> for ShaperError {
    fn from(err: anyhow::Error) -> Self {
        ShaperError::Storage(err.into())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration and startup wiring
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A registry table could not be built
    #[error("Invalid property mapping for '{resource}': {source}")]
    InvalidMapping {
        resource: String,
        #[source]
        source: MappingError,
    },

    /// No mapping section exists for a resource
    #[error("No property mapping configured for resource '{resource}'")]
    MissingMapping { resource: String },

    /// The media type vocabulary is inconsistent
    #[error("Invalid media type vocabulary: {message}")]
    InvalidMediaTypes { message: String },
}
