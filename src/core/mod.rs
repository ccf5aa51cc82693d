//! Core engine: property mapping, sorting, paging, shaping and negotiation

pub mod error;
pub mod field;
pub mod negotiation;
pub mod paging;
pub mod property_mapping;
pub mod record;
pub mod shaping;
pub mod sort;
pub mod store;
pub mod validation;

pub use error::{ErrorResponse, ShaperError};
pub use field::FieldValue;
pub use negotiation::{MediaTypeDescriptor, Negotiator, Representation, Variant};
pub use paging::{PageParameters, PagedResult, PaginationMetadata, ResourceParameters};
pub use property_mapping::{
    PropertyMappingEntry, PropertyMappingRegistry, PropertyMappingRegistryBuilder,
    PropertyMappingTable,
};
pub use record::Record;
pub use shaping::{FieldDescriptor, Shapeable, ShapedRecord, shape, shape_all, type_has_properties};
pub use sort::{SortClause, SortDirection, SortKey};
pub use store::{FilterCondition, RecordStore, StorePage};
pub use validation::{FieldFailure, Validate, Validated, Validator};
