//! Domain entities - objects with identity and lifecycle.

pub mod knowledge;
pub mod review;

pub use knowledge::Knowledge;
pub use review::{Improvement, Review, StructuredReviewResult};
