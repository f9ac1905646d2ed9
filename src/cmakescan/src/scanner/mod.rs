// cmakescan/src/scanner/mod.rs

//! Lexical scanner for CMakeLists.txt files.
//!
//! Turns a stream of text lines into primitive tokens: words (with keywords
//! singled out), quoted strings, single-character punctuators, runs of
//! colons and whitespace gaps. Comments are discarded, their surrounding
//! spacing merged into one gap.

pub mod lexer;
pub mod scanner;
pub mod token;

pub use lexer::Lexer;
pub use scanner::Scanner;
pub use token::{is_keyword, Position, Token, TokenType, KEYWORDS};

