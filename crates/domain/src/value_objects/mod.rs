//! Domain value objects - immutable classification concepts.

pub mod category;
pub mod severity;
pub mod source_type;

pub use category::Category;
pub use severity::Severity;
pub use source_type::SourceType;
