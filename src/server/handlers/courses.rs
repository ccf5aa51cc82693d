//! Courses of an author

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::{created, path_param, render};
use crate::core::error::{EntityError, ShaperError};
use crate::core::sort::SortClause;
use crate::core::store::FilterCondition;
use crate::core::validation::Validated;
use crate::entities::{Course, CourseDto, CourseForCreation, CourseForUpdate};
use crate::server::router::route_names::GET_COURSE_FOR_AUTHOR;
use crate::server::state::AppState;

const COURSE_ORDER: &str = "Title";

async fn ensure_author(state: &AppState, author_id: Uuid) -> Result<(), ShaperError> {
    if state.authors.exists(&author_id).await? {
        Ok(())
    } else {
        Err(EntityError::not_found("Author", author_id).into())
    }
}

/// The course, if it exists and belongs to the author
async fn course_of(
    state: &AppState,
    author_id: Uuid,
    course_id: Uuid,
) -> Result<Option<Course>, ShaperError> {
    Ok(state
        .courses
        .get(&course_id)
        .await?
        .filter(|c| c.author_id == author_id))
}

fn course_location(state: &AppState, course: &Course) -> Result<String, ShaperError> {
    let author_id = course.author_id.to_string();
    let course_id = course.id.to_string();
    Ok(state.routes.url(
        GET_COURSE_FOR_AUTHOR,
        &[("authorId", author_id.as_str()), ("courseId", course_id.as_str())],
    )?)
}

/// GET /api/authors/{authorId}/courses
pub async fn get_courses_for_author(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ShaperError> {
    let author_id = path_param(path)?;
    let table = state.mappings.lookup::<CourseDto, Course>()?;
    let sort = SortClause::compile(COURSE_ORDER, table)?;
    ensure_author(&state, author_id).await?;

    let courses = state
        .courses
        .list(&[FilterCondition::equals("author_id", author_id)], &sort)
        .await?;

    Ok(render(courses.iter().map(CourseDto::from).collect::<Vec<_>>()))
}

/// GET /api/authors/{authorId}/courses/{courseId}
pub async fn get_course_for_author(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Response, ShaperError> {
    let (author_id, course_id) = path_param(path)?;
    ensure_author(&state, author_id).await?;

    let course = course_of(&state, author_id, course_id)
        .await?
        .ok_or_else(|| EntityError::not_found("Course", course_id))?;

    Ok(render(CourseDto::from(&course)))
}

/// POST /api/authors/{authorId}/courses
pub async fn create_course_for_author(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    Validated(payload): Validated<CourseForCreation>,
) -> Result<Response, ShaperError> {
    let author_id = path_param(path)?;
    ensure_author(&state, author_id).await?;

    let course = state.courses.insert(payload.into_record(author_id)).await?;
    tracing::info!(author_id = %author_id, course_id = %course.id, "course created");

    created(course_location(&state, &course)?, CourseDto::from(&course))
}

/// PUT /api/authors/{authorId}/courses/{courseId}
///
/// Replaces the course and responds 204. An unknown course id is created
/// under that id and answered like a POST.
pub async fn update_course_for_author(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    Validated(payload): Validated<CourseForUpdate>,
) -> Result<Response, ShaperError> {
    let (author_id, course_id) = path_param(path)?;
    ensure_author(&state, author_id).await?;

    if let Some(course) = course_of(&state, author_id, course_id).await? {
        state
            .courses
            .update(payload.apply(course))
            .await?
            .ok_or_else(|| EntityError::not_found("Course", course_id))?;
        tracing::info!(author_id = %author_id, course_id = %course_id, "course updated");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    // The id is taken by a course of another author
    if state.courses.exists(&course_id).await? {
        return Err(EntityError::not_found("Course", course_id).into());
    }

    let course = state
        .courses
        .insert(payload.into_record_with_id(author_id, course_id))
        .await?;
    tracing::info!(author_id = %author_id, course_id = %course_id, "course upserted");

    created(course_location(&state, &course)?, CourseDto::from(&course))
}

/// DELETE /api/authors/{authorId}/courses/{courseId}
pub async fn delete_course_for_author(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Response, ShaperError> {
    let (author_id, course_id) = path_param(path)?;
    ensure_author(&state, author_id).await?;

    if course_of(&state, author_id, course_id).await?.is_none()
        || !state.courses.delete(&course_id).await?
    {
        return Err(EntityError::not_found("Course", course_id).into());
    }
    tracing::info!(author_id = %author_id, course_id = %course_id, "course deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
