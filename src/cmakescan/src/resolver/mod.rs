// cmakescan/src/resolver/mod.rs

//! Resolution of a parsed document into literal header names.

pub mod evaluate;
pub mod headers;

pub use evaluate::Evaluator;
pub use headers::{is_public_header_name, HeaderFilter};
