//! Root document

use axum::{extract::State, response::Response};

use super::{authors::authors_entry_links, render};
use crate::core::error::ShaperError;
use crate::links::Link;
use crate::server::router::route_names::GET_ROOT;
use crate::server::state::AppState;

/// GET /api
pub async fn get_root(State(state): State<AppState>) -> Result<Response, ShaperError> {
    let mut links = vec![Link::get(state.routes.url(GET_ROOT, &[])?, "self")];
    links.extend(authors_entry_links(&state)?);
    Ok(render(links))
}
