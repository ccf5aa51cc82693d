//! Creating and reading several authors at once

use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::Response,
};
use uuid::Uuid;

use super::authors::{insert_author_with_courses, remove_author_with_courses};
use super::{created, path_param, render};
use crate::core::error::{EntityError, RequestError, ShaperError};
use crate::core::validation::Validated;
use crate::entities::{Author, AuthorDto, AuthorForCreation};
use crate::server::router::route_names::GET_AUTHOR_COLLECTION;
use crate::server::state::AppState;

/// Parse `(id1,id2,...)`; the parentheses are optional
pub fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, RequestError> {
    let invalid = || RequestError::InvalidIdList {
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);

    if inner.trim().is_empty() {
        return Err(invalid());
    }

    inner
        .split(',')
        .map(|id| Uuid::parse_str(id.trim()).map_err(|_| invalid()))
        .collect()
}

/// GET /api/authorcollections/({authorIds})
pub async fn get_author_collection(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ShaperError> {
    let raw_ids = path_param(path)?;
    let ids = parse_id_list(&raw_ids)?;
    let authors = state.authors.get_many(&ids).await?;

    if authors.len() != ids.len() {
        let missing = ids
            .iter()
            .find(|id| !authors.iter().any(|a| a.id == **id))
            .map(Uuid::to_string)
            .unwrap_or_default();
        return Err(EntityError::not_found("Author", missing).into());
    }

    Ok(render(authors.iter().map(AuthorDto::from).collect::<Vec<_>>()))
}

/// POST /api/authorcollections
///
/// All authors are stored or none: a failure removes the authors of the
/// collection stored so far.
pub async fn create_author_collection(
    State(state): State<AppState>,
    Validated(payload): Validated<Vec<AuthorForCreation>>,
) -> Result<Response, ShaperError> {
    let records = payload
        .into_iter()
        .map(AuthorForCreation::into_records)
        .collect::<Result<Vec<_>, _>>()?;

    let mut stored: Vec<(Author, Vec<Uuid>)> = Vec::with_capacity(records.len());
    for (author, courses) in records {
        match insert_author_with_courses(&state, author, courses).await {
            Ok(entry) => stored.push(entry),
            Err(e) => {
                for (author, course_ids) in &stored {
                    remove_author_with_courses(&state, author.id, course_ids).await;
                }
                return Err(e);
            }
        }
    }
    let created_authors: Vec<Author> = stored.into_iter().map(|(author, _)| author).collect();
    tracing::info!(count = created_authors.len(), "author collection created");

    let ids = created_authors
        .iter()
        .map(|a| a.id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = state
        .routes
        .url(GET_AUTHOR_COLLECTION, &[("authorIds", ids.as_str())])?;

    created(
        location,
        created_authors.iter().map(AuthorDto::from).collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(parse_id_list(&format!("({},{})", a, b)).unwrap(), vec![a, b]);
        assert_eq!(parse_id_list(&format!("{}, {}", a, b)).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_parse_id_list_rejects_malformed() {
        assert!(parse_id_list("()").is_err());
        assert!(parse_id_list("(not-a-uuid)").is_err());
        assert!(parse_id_list(&format!("({},)", Uuid::new_v4())).is_err());
    }
}
