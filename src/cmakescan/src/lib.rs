// cmakescan/src/lib.rs

//! Scan a CMakeLists.txt for the public headers a module declares.
//!
//! This library provides:
//! - A streaming lexer for the subset of the CMake language that matters
//!   for source lists (words, strings, comments, punctuators)
//! - A layered parser recognising variable references, glued words,
//!   parentheses, calls with parameter blocks, and `if`/`foreach` blocks
//! - A resolver expanding `${VAR}` references against every `set()` in the
//!   file and filtering the results by public header naming rules
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), cmakescan::ParseError> {
//! let input = "set(EXTRA b.h)\nqt_internal_add_module(Core SOURCES a.h a_p.h ${EXTRA})\n";
//! let headers = cmakescan::scan("Core", "src/corelib", input)?;
//! assert_eq!(headers, vec!["src/corelib/a.h\n", "src/corelib/b.h\n"]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod parser;
pub mod query;
pub mod resolver;
pub mod scanner;

#[cfg(feature = "cli")]
pub mod cli;

use std::path::PathBuf;

pub use error::{ParseError, ParseErrorKind, Result};
pub use parser::Document;
pub use query::CMakeScanner;
pub use scanner::Position;

/// Ingest `input` and list the public headers it declares for `module`.
pub fn scan<M, P>(module: M, root: P, input: &str) -> Result<Vec<String>>
where
    M: Into<String>,
    P: Into<PathBuf>,
{
    let mut scanner = CMakeScanner::new(module, root);
    scanner.ingest_str(input)?;
    scanner.headers()
}
