//! Application state shared across handlers

use std::sync::Arc;

use axum::http::{HeaderMap, header};

use crate::core::error::{RequestError, ShaperError};
use crate::core::negotiation::{Negotiator, Representation};
use crate::core::property_mapping::PropertyMappingRegistry;
use crate::core::store::RecordStore;
use crate::entities::{Author, Course};
use crate::links::{LinkBuilder, RouteTable};

/// Application state shared across handlers
///
/// Everything here is built once by the
/// [`ServerBuilder`](crate::server::ServerBuilder) and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub authors: Arc<dyn RecordStore<Author>>,
    pub courses: Arc<dyn RecordStore<Course>>,
    pub mappings: Arc<PropertyMappingRegistry>,
    pub negotiator: Arc<Negotiator>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn links(&self) -> LinkBuilder<'_> {
        LinkBuilder::new(&self.routes)
    }

    /// Negotiate the representation from the request's `Accept` header
    pub fn negotiate(&self, headers: &HeaderMap) -> Result<Representation, ShaperError> {
        let accept = headers
            .get(header::ACCEPT)
            .map(|value| {
                value.to_str().map_err(|_| RequestError::InvalidHeader {
                    header: header::ACCEPT.to_string(),
                })
            })
            .transpose()?;

        Ok(self.negotiator.negotiate(accept)?)
    }

    /// Like [`negotiate`](Self::negotiate), falling back to the default
    /// representation when the header cannot be honoured
    pub fn negotiate_or_default(&self, headers: &HeaderMap) -> Representation {
        self.negotiate(headers).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "ignoring Accept header");
            Representation::default()
        })
    }
}
