//! Request and response types crossing the use-case boundary.

pub mod knowledge;
pub mod review;

pub use knowledge::*;
pub use review::*;
