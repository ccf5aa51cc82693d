//! Author collection, single author and author creation

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::{created, path_param, render};
use crate::core::error::{EntityError, RequestError, ShaperError, ShapingError};
use crate::core::negotiation::{Representation, Variant};
use crate::core::paging::{PagedResult, PaginationMetadata, ResourceParameters};
use crate::core::shaping::{ShapedRecord, shape, type_has_properties};
use crate::core::sort::SortClause;
use crate::core::store::FilterCondition;
use crate::core::validation::Validated;
use crate::entities::{Author, AuthorDto, AuthorForCreation, AuthorFullDto, Course};
use crate::links::{Link, LinkedCollection, Linked, Relation, ResourceLinkSpec, ResourceUriType};
use crate::server::router::route_names::*;
use crate::server::state::AppState;

/// Links attached to every author
pub const AUTHOR_LINKS: ResourceLinkSpec = ResourceLinkSpec {
    self_route: GET_AUTHOR,
    id_param: "authorId",
    relations: &[
        Relation {
            rel: "create_course_for_author",
            route: CREATE_COURSE_FOR_AUTHOR,
            method: "POST",
        },
        Relation {
            rel: "courses",
            route: GET_COURSES_FOR_AUTHOR,
            method: "GET",
        },
    ],
};

const ALLOWED_METHODS: &str = "GET,HEAD,POST,OPTIONS";

/// Reject field selections the negotiated variant does not declare
pub(crate) fn check_author_fields(variant: Variant, fields: Option<&str>) -> Result<(), ShapingError> {
    let declared = match variant {
        Variant::Full => type_has_properties::<AuthorFullDto>(fields),
        Variant::Friendly => type_has_properties::<AuthorDto>(fields),
    };

    if declared {
        Ok(())
    } else {
        Err(ShapingError::InvalidFieldSelection {
            fields: fields.unwrap_or_default().to_string(),
        })
    }
}

/// Map an author onto the negotiated variant and shape it
pub(crate) fn shape_author(
    author: &Author,
    variant: Variant,
    fields: Option<&str>,
) -> Result<ShapedRecord, ShapingError> {
    match variant {
        Variant::Full => shape(&AuthorFullDto::from(author), fields),
        Variant::Friendly => shape(&AuthorDto::from(author), fields),
    }
}

fn author_filters(params: &ResourceParameters) -> Vec<FilterCondition> {
    let mut filters = Vec::new();
    if let Some(category) = params.main_category() {
        filters.push(FilterCondition::equals("main_category", category));
    }
    if let Some(search) = params.search_query() {
        filters.push(FilterCondition::contains_any(
            ["main_category", "first_name", "last_name"],
            search,
        ));
    }
    filters
}

/// GET /api/authors
///
/// Sort and field selection are checked before the store is queried.
pub async fn get_authors(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ResourceParameters>, QueryRejection>,
) -> Result<Response, ShaperError> {
    let Query(params) = query.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;
    let representation = state.negotiate(&headers)?;

    let table = state.mappings.lookup::<AuthorDto, Author>()?;
    let sort = SortClause::compile_optional(Some(&params.order_by), table)?;
    check_author_fields(representation.variant, params.fields())?;

    let page = state
        .authors
        .query(
            &author_filters(&params),
            &sort,
            params.page_number,
            params.page_size(),
        )
        .await?;
    let paged = PagedResult::from_store_page(page, params.page_number, params.page_size());

    let links = state.links();
    let previous_page_link = paged
        .has_previous()
        .then(|| links.collection_uri(GET_AUTHORS, &params, ResourceUriType::PreviousPage))
        .transpose()?;
    let next_page_link = paged
        .has_next()
        .then(|| links.collection_uri(GET_AUTHORS, &params, ResourceUriType::NextPage))
        .transpose()?;
    let metadata = paged.metadata(previous_page_link, next_page_link);

    tracing::debug!(
        total_count = paged.total_count(),
        current_page = paged.current_page(),
        total_pages = paged.total_pages(),
        "authors page assembled"
    );

    let body = render_authors(&state, &paged, &params, representation)?;
    let mut response = body.into_response();
    if let Some(value) = metadata.header_value() {
        response
            .headers_mut()
            .insert(HeaderName::from_static(PaginationMetadata::HEADER), value);
    }
    Ok(response)
}

fn render_authors(
    state: &AppState,
    paged: &PagedResult<Author>,
    params: &ResourceParameters,
    representation: Representation,
) -> Result<Response, ShaperError> {
    let fields = params.fields();

    if !representation.include_links {
        let shaped = paged
            .items()
            .iter()
            .map(|author| shape_author(author, representation.variant, fields))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Json(shaped).into_response());
    }

    let links = state.links();
    let value = paged
        .items()
        .iter()
        .map(|author| -> Result<Linked<ShapedRecord>, ShaperError> {
            let shaped = shape_author(author, representation.variant, fields)?;
            let author_links = links.links_for_resource(&AUTHOR_LINKS, author.id, None)?;
            Ok(Linked::new(shaped, author_links))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let collection_links =
        links.links_for_collection(GET_AUTHORS, params, paged.has_next(), paged.has_previous())?;

    Ok(Json(LinkedCollection {
        value,
        links: collection_links,
    })
    .into_response())
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

/// GET /api/authors/{authorId}
pub async fn get_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<FieldsQuery>, QueryRejection>,
) -> Result<Response, ShaperError> {
    let author_id = path_param(path)?;
    let Query(FieldsQuery { fields }) = query.map_err(|e| RequestError::InvalidQuery {
        message: e.body_text(),
    })?;
    let fields = fields.as_deref().filter(|f| !f.trim().is_empty());
    let representation = state.negotiate(&headers)?;
    check_author_fields(representation.variant, fields)?;

    let author = state
        .authors
        .get(&author_id)
        .await?
        .ok_or_else(|| EntityError::not_found("Author", author_id))?;

    let shaped = shape_author(&author, representation.variant, fields)?;
    if representation.include_links {
        let links = state.links().links_for_resource(&AUTHOR_LINKS, author.id, fields)?;
        Ok(render(Linked::new(shaped, links)))
    } else {
        Ok(render(shaped))
    }
}

/// POST /api/authors
///
/// Responds 201 with the created author, always linked. An `Accept` header
/// outside the vocabulary falls back to the friendly variant.
pub async fn create_author(
    State(state): State<AppState>,
    headers: HeaderMap,
    Validated(payload): Validated<AuthorForCreation>,
) -> Result<Response, ShaperError> {
    let representation = state.negotiate_or_default(&headers);
    let (author, courses) = payload.into_records()?;

    let (author, _) = insert_author_with_courses(&state, author, courses).await?;
    tracing::info!(author_id = %author.id, "author created");

    let links = state.links();
    let location = author_location(&state, author.id)?;
    let shaped = shape_author(&author, representation.variant, None)?;
    let author_links = links.links_for_resource(&AUTHOR_LINKS, author.id, None)?;

    created(location, Linked::new(shaped, author_links))
}

/// Store an author and its courses
///
/// Either everything is stored or nothing is: when a course insert fails,
/// the courses already stored and the author are removed again. Returns the
/// author and the ids of its courses.
pub(crate) async fn insert_author_with_courses(
    state: &AppState,
    author: Author,
    courses: Vec<Course>,
) -> Result<(Author, Vec<Uuid>), ShaperError> {
    let author = state.authors.insert(author).await?;

    let mut course_ids = Vec::with_capacity(courses.len());
    for course in courses {
        match state.courses.insert(course).await {
            Ok(course) => course_ids.push(course.id),
            Err(e) => {
                remove_author_with_courses(state, author.id, &course_ids).await;
                return Err(e.into());
            }
        }
    }
    Ok((author, course_ids))
}

/// Best-effort removal of a partially stored author
pub(crate) async fn remove_author_with_courses(
    state: &AppState,
    author_id: Uuid,
    course_ids: &[Uuid],
) {
    for course_id in course_ids {
        if let Err(e) = state.courses.delete(course_id).await {
            tracing::error!(course_id = %course_id, error = %e, "failed to roll back course");
        }
    }
    if let Err(e) = state.authors.delete(&author_id).await {
        tracing::error!(author_id = %author_id, error = %e, "failed to roll back author");
    }
    tracing::warn!(author_id = %author_id, "rolled back author creation");
}

/// DELETE /api/authors/{authorId}
///
/// Removes the author together with its courses.
pub async fn delete_author(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ShaperError> {
    let author_id = path_param(path)?;
    if !state.authors.exists(&author_id).await? {
        return Err(EntityError::not_found("Author", author_id).into());
    }

    let courses = state
        .courses
        .list(
            &[FilterCondition::equals("author_id", author_id)],
            &SortClause::default(),
        )
        .await?;
    for course in &courses {
        state.courses.delete(&course.id).await?;
    }
    state.authors.delete(&author_id).await?;
    tracing::info!(author_id = %author_id, courses = courses.len(), "author deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}

fn author_location(state: &AppState, author_id: Uuid) -> Result<String, ShaperError> {
    let id = author_id.to_string();
    Ok(state.routes.url(GET_AUTHOR, &[("authorId", id.as_str())])?)
}

/// OPTIONS /api/authors
pub async fn get_authors_options() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
    )
}

/// Links of the collection root, used by the root document
pub(crate) fn authors_entry_links(state: &AppState) -> Result<Vec<Link>, ShaperError> {
    Ok(vec![
        Link::get(state.routes.url(GET_AUTHORS, &[])?, "authors"),
        Link::post(state.routes.url(CREATE_AUTHOR, &[])?, "create_author"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_author_fields_per_variant() {
        assert!(check_author_fields(Variant::Friendly, Some("id,name,age")).is_ok());
        assert!(check_author_fields(Variant::Friendly, Some("firstName")).is_err());
        assert!(check_author_fields(Variant::Full, Some("firstName, dateOfBirth")).is_ok());
        assert!(check_author_fields(Variant::Full, Some("age")).is_err());
        assert!(check_author_fields(Variant::Full, None).is_ok());
    }

    #[test]
    fn test_field_selection_error_names_request() {
        let err = check_author_fields(Variant::Friendly, Some("id, unknownField")).unwrap_err();
        assert!(err.to_string().contains("unknownField"));
    }

    #[test]
    fn test_author_filters() {
        let params: ResourceParameters =
            serde_urlencoded::from_str("mainCategory=%20Rum%20&searchQuery=Kev").unwrap();
        let filters = author_filters(&params);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], FilterCondition::equals("main_category", "Rum"));
        assert!(author_filters(&ResourceParameters::default()).is_empty());
    }
}
