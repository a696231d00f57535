//! Use cases orchestrating domain entities through the outbound ports.

pub mod knowledge_use_cases;
pub mod review_code_use_case;
pub mod review_use_cases;

pub use knowledge_use_cases::*;
pub use review_code_use_case::*;
pub use review_use_cases::*;
