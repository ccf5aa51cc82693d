//! Link sets for resources and paged collections

use serde::Serialize;
use uuid::Uuid;

use super::{Link, RouteTable};
use crate::core::error::RouteError;
use crate::core::paging::PageParameters;

/// Which page a collection URI points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUriType {
    PreviousPage,
    NextPage,
    Current,
}

/// A named relation reachable from a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub rel: &'static str,
    pub route: &'static str,
    pub method: &'static str,
}

/// Routes that make up the link set of one resource type
#[derive(Debug, Clone, Copy)]
pub struct ResourceLinkSpec {
    /// Route of the single-resource read
    pub self_route: &'static str,
    /// Placeholder in every route that receives the resource id
    pub id_param: &'static str,
    /// Relations added unconditionally after `self`
    pub relations: &'static [Relation],
}

#[derive(Serialize)]
struct FieldsQuery<'a> {
    fields: &'a str,
}

/// Builds links from a [`RouteTable`]
#[derive(Debug, Clone, Copy)]
pub struct LinkBuilder<'a> {
    routes: &'a RouteTable,
}

impl<'a> LinkBuilder<'a> {
    pub fn new(routes: &'a RouteTable) -> Self {
        Self { routes }
    }

    /// `self` link (carrying the field selection) followed by the relations
    pub fn links_for_resource(
        &self,
        spec: &ResourceLinkSpec,
        id: Uuid,
        fields: Option<&str>,
    ) -> Result<Vec<Link>, RouteError> {
        let id = id.to_string();
        let params = [(spec.id_param, id.as_str())];

        let self_href = match fields.filter(|f| !f.trim().is_empty()) {
            Some(fields) => {
                self.routes
                    .url_with_query(spec.self_route, &params, &FieldsQuery { fields })?
            }
            None => self.routes.url(spec.self_route, &params)?,
        };

        let mut links = Vec::with_capacity(spec.relations.len() + 1);
        links.push(Link::get(self_href, "self"));
        for relation in spec.relations {
            let href = self.routes.url(relation.route, &params)?;
            links.push(Link::new(href, relation.rel, relation.method));
        }
        Ok(links)
    }

    /// URI of the collection with only the page number varied
    pub fn collection_uri<P: PageParameters>(
        &self,
        route: &str,
        params: &P,
        kind: ResourceUriType,
    ) -> Result<String, RouteError> {
        let current = params.page_number();
        let page = match kind {
            ResourceUriType::PreviousPage => current.saturating_sub(1).max(1),
            ResourceUriType::NextPage => current + 1,
            ResourceUriType::Current => current,
        };
        self.routes.url_with_query(route, &[], &params.for_page(page))
    }

    /// `self`, plus `nextPage`/`previousPage` when those pages exist
    pub fn links_for_collection<P: PageParameters>(
        &self,
        route: &str,
        params: &P,
        has_next: bool,
        has_previous: bool,
    ) -> Result<Vec<Link>, RouteError> {
        let mut links = vec![Link::get(
            self.collection_uri(route, params, ResourceUriType::Current)?,
            "self",
        )];

        if has_next {
            links.push(Link::get(
                self.collection_uri(route, params, ResourceUriType::NextPage)?,
                "nextPage",
            ));
        }

        if has_previous {
            links.push(Link::get(
                self.collection_uri(route, params, ResourceUriType::PreviousPage)?,
                "previousPage",
            ));
        }

        Ok(links)
    }
}
