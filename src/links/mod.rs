//! Hypermedia links
//!
//! Links are `(href, rel, method)` triples generated from named routes in a
//! [`RouteTable`]. The [`LinkBuilder`] assembles the link sets for single
//! resources and for paged collections.

pub mod builder;
pub mod registry;

pub use builder::{LinkBuilder, Relation, ResourceLinkSpec, ResourceUriType};
pub use registry::RouteTable;

use serde::Serialize;

/// A hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }

    pub fn get(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self::new(href, rel, "GET")
    }

    pub fn post(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self::new(href, rel, "POST")
    }
}

/// A representation with its links embedded under `links`
#[derive(Debug, Clone, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub resource: T,
    pub links: Vec<Link>,
}

impl<T> Linked<T> {
    pub fn new(resource: T, links: Vec<Link>) -> Self {
        Self { resource, links }
    }
}

/// A collection body: `{ "value": [...], "links": [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct LinkedCollection<T> {
    pub value: Vec<T>,
    pub links: Vec<Link>,
}
