// cmakescan/src/parser/mod.rs

//! Layered parser turning scanned tokens into a [`Document`].
//!
//! Each layer is a pure transformation of the stream below it:
//! references, then glue, then nesting, then calls, then control
//! structures. The reference layer pulls tokens from the scanner as it
//! goes; the layers above it work on its output. Nothing is shared between
//! layers except the end-of-stream position, used to place errors that
//! only show up when input runs out.
//!
//! Parentheses, `$`-references and control blocks may each nest at most
//! [`MAX_NESTING`] deep; deeper input is a
//! [`NestingTooDeep`](crate::error::ParseErrorKind::NestingTooDeep) error.

pub mod calls;
pub mod control;
pub mod glue;
pub mod nesting;
pub mod node;
pub mod reference;

pub use node::{
    Branch, Call, Compound, Conditional, ControlKeyword, Document, Group, Loop, Node,
    ParameterBlock, Reference,
};

use crate::error::Result;
use crate::scanner::Scanner;

/// How deep parentheses, references or control blocks may nest.
pub const MAX_NESTING: usize = 256;

/// Run all layers over the scanner's input.
pub fn parse<I>(mut scanner: Scanner<I>) -> Result<Document>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    let nodes = reference::recognize(&mut scanner)?;
    let end = scanner.position();
    let nodes = glue::glue(nodes);
    let nodes = nesting::nest(nodes, end)?;
    let nodes = calls::call(nodes);
    let nodes = control::control(nodes, end)?;
    Ok(Document::new(nodes, end))
}

/// Scan and parse a whole string.
pub fn parse_str(input: &str) -> Result<Document> {
    parse(Scanner::new(input))
}
