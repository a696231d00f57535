//! Application layer: use cases for the review pipeline and knowledge
//! management, plus the ports infrastructure implements.
//!
//! Dependency direction:
//!
//! ```text
//! application -> domain
//! llm / store -> application (implement the ports)
//! ```

pub mod dtos;
pub mod errors;
pub mod ports;
pub mod use_cases;

pub use errors::ApplicationError;

/// Application layer result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Languages accepted for review requests. The entity stores the value
/// as a free string; only the use-case boundary enforces this list.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "TypeScript",
    "JavaScript",
    "Python",
    "Go",
    "Java",
    "C++",
    "C#",
    "Ruby",
    "PHP",
    "Rust",
    "Swift",
    "Kotlin",
    "Other",
];

/// Check a language against [`SUPPORTED_LANGUAGES`].
pub fn is_supported_language(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}
