//! Routes of the course library API
//!
//! Every route that appears in a hyperlink is registered by name in the
//! [`RouteTable`], next to the axum path it serves:
//! - GET /api - Root document
//! - GET|HEAD|POST|OPTIONS /api/authors - Author collection
//! - GET|DELETE /api/authors/{authorId} - One author
//! - GET|POST /api/authors/{authorId}/courses - Courses of an author
//! - GET|PUT|DELETE /api/authors/{authorId}/courses/{courseId} - One course
//! - POST /api/authorcollections - Create several authors
//! - GET /api/authorcollections/({authorIds}) - Read several authors

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::handlers::{author_collections, authors, courses, root};
use super::state::AppState;
use crate::links::RouteTable;

/// Names under which routes are registered for link generation
pub mod route_names {
    pub const GET_ROOT: &str = "GetRoot";
    pub const GET_AUTHORS: &str = "GetAuthors";
    pub const GET_AUTHOR: &str = "GetAuthor";
    pub const CREATE_AUTHOR: &str = "CreateAuthor";
    pub const GET_COURSES_FOR_AUTHOR: &str = "GetCoursesForAuthor";
    pub const GET_COURSE_FOR_AUTHOR: &str = "GetCourseForAuthor";
    pub const CREATE_COURSE_FOR_AUTHOR: &str = "CreateCourseForAuthor";
    pub const GET_AUTHOR_COLLECTION: &str = "GetAuthorCollection";
}

/// Named route templates for link generation
pub fn route_table(base_url: &str) -> RouteTable {
    use route_names::*;

    RouteTable::new(base_url)
        .with_route(GET_ROOT, "/api")
        .with_route(GET_AUTHORS, "/api/authors")
        .with_route(CREATE_AUTHOR, "/api/authors")
        .with_route(GET_AUTHOR, "/api/authors/{authorId}")
        .with_route(GET_COURSES_FOR_AUTHOR, "/api/authors/{authorId}/courses")
        .with_route(CREATE_COURSE_FOR_AUTHOR, "/api/authors/{authorId}/courses")
        .with_route(
            GET_COURSE_FOR_AUTHOR,
            "/api/authors/{authorId}/courses/{courseId}",
        )
        .with_route(GET_AUTHOR_COLLECTION, "/api/authorcollections/({authorIds})")
}

/// Build the API router
pub fn build_router(state: AppState, custom_routes: Vec<Router>) -> Router {
    let api = Router::new()
        .route("/api", get(root::get_root))
        .route(
            "/api/authors",
            get(authors::get_authors)
                .post(authors::create_author)
                .options(authors::get_authors_options),
        )
        .route(
            "/api/authors/{authorId}",
            get(authors::get_author).delete(authors::delete_author),
        )
        .route(
            "/api/authors/{authorId}/courses",
            get(courses::get_courses_for_author).post(courses::create_course_for_author),
        )
        .route(
            "/api/authors/{authorId}/courses/{courseId}",
            get(courses::get_course_for_author)
                .put(courses::update_course_for_author)
                .delete(courses::delete_course_for_author),
        )
        .route(
            "/api/authorcollections",
            post(author_collections::create_author_collection),
        )
        .route(
            "/api/authorcollections/{authorIds}",
            get(author_collections::get_author_collection),
        )
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(health_check))
        .merge(api);

    for custom_router in custom_routes {
        app = app.merge(custom_router);
    }

    app.layer(TraceLayer::new_for_http())
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_resolves_every_name() {
        use route_names::*;

        let table = route_table("http://localhost:3000");
        let id = [("authorId", "42"), ("courseId", "7"), ("authorIds", "1,2")];
        for name in [
            GET_ROOT,
            GET_AUTHORS,
            GET_AUTHOR,
            CREATE_AUTHOR,
            GET_COURSES_FOR_AUTHOR,
            GET_COURSE_FOR_AUTHOR,
            CREATE_COURSE_FOR_AUTHOR,
            GET_AUTHOR_COLLECTION,
        ] {
            assert!(table.url(name, &id).is_ok(), "route {} failed", name);
        }
        assert_eq!(
            table.url(GET_AUTHOR_COLLECTION, &id).unwrap(),
            "http://localhost:3000/api/authorcollections/(1,2)"
        );
    }
}
