//! # Shaper
//!
//! Paginated, sortable, shapeable REST collections for Rust.
//!
//! ## Features
//!
//! - **Property Mapping**: Translate external sort fields into one or more internal fields
//! - **Composite Sorting**: `orderBy=Name desc, Age` compiled into an ordered key list
//! - **Paging**: Clamped page sizes and an `X-Pagination` metadata header
//! - **Data Shaping**: `fields=id,name` projects only the requested fields
//! - **Content Negotiation**: Vendor media types select full/friendly variants and links
//! - **Hypermedia**: Links generated from named routes
//! - **Configuration-Based**: Media types and mappings loaded from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shaper::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let authors = InMemoryStore::with_records(vec![Author::new(
//!         "Berry",
//!         "Griffin Beak Eldritch",
//!         NaiveDate::from_ymd_opt(1650, 7, 23).unwrap(),
//!         "Ships",
//!     )]);
//!
//!     ServerBuilder::new()
//!         .with_config(ShaperConfig::from_yaml_file("config.yaml")?)
//!         .with_author_store(authors)
//!         .with_course_store(InMemoryStore::<Course>::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ErrorResponse, ShaperError},
        field::FieldValue,
        negotiation::{Negotiator, Representation, Variant},
        paging::{PageParameters, PagedResult, PaginationMetadata, ResourceParameters},
        property_mapping::{PropertyMappingEntry, PropertyMappingRegistry, PropertyMappingTable},
        record::Record,
        shaping::{FieldDescriptor, Shapeable, ShapedRecord, shape, shape_all, type_has_properties},
        sort::{SortClause, SortDirection},
        store::{FilterCondition, RecordStore, StorePage},
        validation::{Validate, Validated},
    };

    // === Macros ===
    pub use crate::{impl_record, impl_shaped_fields};

    // === Entities ===
    pub use crate::entities::{
        Author, AuthorDto, AuthorForCreation, AuthorFullDto, Course, CourseDto, CourseForCreation,
        CourseForUpdate,
    };

    // === Links ===
    pub use crate::links::{Link, LinkBuilder, Linked, LinkedCollection, RouteTable};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::{MediaTypesConfig, ResourceMappingConfig, ShaperConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
