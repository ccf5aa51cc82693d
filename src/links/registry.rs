//! Named route table for link generation
//!
//! Routes are registered once under a name (e.g. `GetAuthor`) with a path
//! template such as `/api/authors/{authorId}`. Links are produced by name, so
//! handlers never format paths themselves.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::error::RouteError;

/// Registry resolving route names to absolute hrefs
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    base_url: String,
    /// Maps route name -> path template
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Create an empty table whose hrefs start with `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            routes: HashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register a route, replacing any previous template with that name
    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.routes.insert(name.into(), template.into());
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn template(&self, name: &str) -> Result<&str, RouteError> {
        self.routes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RouteError::UnknownRoute {
                name: name.to_string(),
            })
    }

    /// Fill a route's `{placeholders}`, producing a path without base URL
    pub fn path(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let template = self.template(name)?;
        let mut path = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| RouteError::MissingParameter {
                name: name.to_string(),
                parameter: after.to_string(),
            })?;
            let parameter = &after[..close];
            let value = params
                .iter()
                .find(|(key, _)| *key == parameter)
                .map(|(_, value)| *value)
                .ok_or_else(|| RouteError::MissingParameter {
                    name: name.to_string(),
                    parameter: parameter.to_string(),
                })?;
            path.push_str(value);
            rest = &after[close + 1..];
        }
        path.push_str(rest);

        Ok(path)
    }

    /// Absolute href for a route
    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        Ok(format!("{}{}", self.base_url, self.path(name, params)?))
    }

    /// Absolute href for a route with a serialized query string
    pub fn url_with_query<Q: Serialize>(
        &self,
        name: &str,
        params: &[(&str, &str)],
        query: &Q,
    ) -> Result<String, RouteError> {
        let url = self.url(name, params)?;
        let query = serde_urlencoded::to_string(query).map_err(|e| RouteError::QueryEncoding {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        if query.is_empty() {
            Ok(url)
        } else {
            Ok(format!("{}?{}", url, query))
        }
    }

    /// List registered route names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new("http://localhost:3000/")
            .with_route("GetAuthors", "/api/authors")
            .with_route("GetAuthor", "/api/authors/{authorId}")
            .with_route(
                "GetCourseForAuthor",
                "/api/authors/{authorId}/courses/{courseId}",
            )
    }

    #[test]
    fn test_url_fills_placeholders() {
        let table = table();
        assert_eq!(
            table.url("GetAuthor", &[("authorId", "42")]).unwrap(),
            "http://localhost:3000/api/authors/42"
        );
        assert_eq!(
            table
                .path("GetCourseForAuthor", &[("courseId", "7"), ("authorId", "42")])
                .unwrap(),
            "/api/authors/42/courses/7"
        );
    }

    #[test]
    fn test_unknown_route() {
        let err = table().url("DeleteAuthor", &[]).unwrap_err();
        assert_eq!(err, RouteError::UnknownRoute {
            name: "DeleteAuthor".into()
        });
    }

    #[test]
    fn test_missing_parameter() {
        let err = table().url("GetAuthor", &[]).unwrap_err();
        assert!(matches!(err, RouteError::MissingParameter { parameter, .. } if parameter == "authorId"));
    }

    #[test]
    fn test_url_with_query() {
        let table = table();
        let url = table
            .url_with_query("GetAuthors", &[], &[("fields", "id,name"), ("orderBy", "Name desc")])
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:3000/api/authors?fields=id%2Cname&orderBy=Name+desc"
        );

        let empty: [(&str, &str); 0] = [];
        assert_eq!(
            table.url_with_query("GetAuthors", &[], &empty).unwrap(),
            "http://localhost:3000/api/authors"
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(table().names(), vec!["GetAuthor", "GetAuthors", "GetCourseForAuthor"]);
    }
}
