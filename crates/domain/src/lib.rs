//! Domain layer for the Kaizen review service.
//!
//! Contains only pure business logic: entities, value objects and the
//! deterministic services around the review prompt/markdown contract.
//! No network, storage or framework dependencies belong here.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::{Improvement, Knowledge, Review, StructuredReviewResult};
pub use errors::{DomainError, DomainResult};
pub use value_objects::{Category, Severity, SourceType};
