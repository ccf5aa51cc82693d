//! Axum extractor for validated payloads
//!
//! `Validated<T>` deserializes the JSON body into `T` and runs
//! [`Validate::validate`] before the handler is called.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use super::Validate;
use crate::core::error::{RequestError, ShaperError};

/// Axum extractor that validates a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_author(
///     Validated(payload): Validated<AuthorForCreation>,
/// ) -> Result<Response, ShaperError> {
///     // payload already passed validation
/// }
/// ```
///
/// An unreadable body is rejected with 400, a readable one that fails
/// validation with 422.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ShaperError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|e| {
            RequestError::InvalidBody {
                message: e.body_text(),
            }
        })?;

        payload.validate()?;
        Ok(Validated(payload))
    }
}
