//! HTTP handlers for the course library API

pub mod author_collections;
pub mod authors;
pub mod courses;
pub mod root;

use axum::{
    Json,
    extract::{Path, rejection::PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::error::{RequestError, ShaperError};

/// 200 with a JSON body
pub(crate) fn render<T: Serialize>(body: T) -> Response {
    Json(body).into_response()
}

/// 201 with a `Location` header and a JSON body
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Result<Response, ShaperError> {
    let location = HeaderValue::try_from(location).map_err(|_| RequestError::InvalidHeader {
        header: header::LOCATION.to_string(),
    })?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}

/// Unwrap a path extraction, reporting failures as [`RequestError::InvalidPath`]
pub(crate) fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, RequestError> {
    path.map(|Path(value)| value)
        .map_err(|e| RequestError::InvalidPath {
            message: e.body_text(),
        })
}
