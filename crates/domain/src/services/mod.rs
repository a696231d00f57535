//! Pure domain services around the review prompt/markdown contract.
//!
//! `knowledge_prompt` ranks knowledge into the prompt fragment,
//! `review_prompt` renders the fixed instruction templates, and
//! `review_parser` converts the model's markdown answer back into a
//! structured result. The templates and the parser encode the same
//! heading vocabulary and change together; the golden tests under
//! `tests/` pin that contract.

pub mod knowledge_prompt;
pub mod review_parser;
pub mod review_prompt;

pub use knowledge_prompt::{build_knowledge_prompt, KnowledgePrompt, GENERIC_REVIEW_INSTRUCTION};
pub use review_parser::parse_review_markdown;
pub use review_prompt::{build_system_prompt, build_user_prompt};
