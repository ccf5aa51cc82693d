//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_router, route_table};
use super::state::AppState;
use crate::config::ShaperConfig;
use crate::core::negotiation::Negotiator;
use crate::core::property_mapping::PropertyMappingRegistry;
use crate::core::store::RecordStore;
use crate::entities::{Author, AuthorDto, Course, CourseDto};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the course library server
///
/// The property mapping registry, the negotiator and the route table are
/// built once from the [`ShaperConfig`] and shared read-only afterwards.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ShaperConfig::from_yaml_file("config.yaml")?)
///     .with_author_store(InMemoryStore::<Author>::new())
///     .with_course_store(InMemoryStore::<Course>::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ShaperConfig,
    authors: Option<Arc<dyn RecordStore<Author>>>,
    courses: Option<Arc<dyn RecordStore<Course>>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ShaperConfig::default(),
            authors: None,
            courses: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ShaperConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the author store (required)
    pub fn with_author_store(mut self, store: impl RecordStore<Author> + 'static) -> Self {
        self.authors = Some(Arc::new(store));
        self
    }

    /// Set the course store (required)
    pub fn with_course_store(mut self, store: impl RecordStore<Course> + 'static) -> Self {
        self.courses = Some(Arc::new(store));
        self
    }

    /// Add routes outside the course library API
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn config(&self) -> &ShaperConfig {
        &self.config
    }

    /// Build the shared handler state
    ///
    /// Fails when a store is missing or when the configured mappings or
    /// media types are invalid.
    pub fn build_state(&mut self) -> Result<AppState> {
        let authors = self
            .authors
            .take()
            .ok_or_else(|| anyhow::anyhow!("Author store is required. Call .with_author_store()"))?;
        let courses = self
            .courses
            .take()
            .ok_or_else(|| anyhow::anyhow!("Course store is required. Call .with_course_store()"))?;

        let mappings = PropertyMappingRegistry::builder()
            .register_from_config::<AuthorDto, Author>(&self.config, "authors")?
            .register_from_config::<CourseDto, Course>(&self.config, "courses")?
            .build();
        let negotiator = Negotiator::from_config(&self.config.media_types)?;
        let routes = route_table(&self.config.base_url);

        tracing::debug!(
            mappings = mappings.len(),
            base_url = %routes.base_url(),
            "server state built"
        );

        Ok(AppState {
            authors,
            courses,
            mappings: Arc::new(mappings),
            negotiator: Arc::new(negotiator),
            routes: Arc::new(routes),
        })
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        Ok(build_router(state, self.custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_author_store(authors)
    ///     .with_course_store(courses)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn builder() -> ServerBuilder {
        ServerBuilder::new()
            .with_author_store(InMemoryStore::<Author>::new())
            .with_course_store(InMemoryStore::<Course>::new())
    }

    #[test]
    fn test_build_requires_author_store() {
        let err = ServerBuilder::new()
            .with_course_store(InMemoryStore::<Course>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("with_author_store"));
    }

    #[test]
    fn test_build_requires_course_store() {
        let err = ServerBuilder::new()
            .with_author_store(InMemoryStore::<Author>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("with_course_store"));
    }

    #[test]
    fn test_build_state_registers_both_mappings() {
        let state = builder().build_state().unwrap();
        assert!(state.mappings.lookup::<AuthorDto, Author>().is_ok());
        assert!(state.mappings.lookup::<CourseDto, Course>().is_ok());
        assert!(state.mappings.lookup::<CourseDto, Author>().is_err());
    }

    #[test]
    fn test_build_fails_on_missing_mapping_section() {
        let mut config = ShaperConfig::default();
        config.property_mappings.retain(|m| m.resource != "courses");

        let err = builder().with_config(config).build().unwrap_err();
        assert!(err.to_string().contains("courses"));
    }

    #[test]
    fn test_build_fails_on_invalid_media_types() {
        let mut config = ShaperConfig::default();
        config.media_types.full = config.media_types.friendly.clone();

        assert!(builder().with_config(config).build().is_err());
    }

    #[test]
    fn test_custom_base_url_flows_into_routes() {
        let mut config = ShaperConfig::default();
        config.base_url = "https://api.example.com/".to_string();

        let state = builder().with_config(config).build_state().unwrap();
        assert_eq!(
            state.routes.url("GetAuthors", &[]).unwrap(),
            "https://api.example.com/api/authors"
        );
    }
}
