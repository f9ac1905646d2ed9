// cmakescan/src/scanner/scanner.rs

//! Core scanner: a token stream that also knows where it stopped.

use super::lexer::Lexer;
use super::token::{Position, Token};
use crate::error::Result;

/// Lexical scanner for CMakeLists.txt content.
///
/// Tokens, Gaps included, are pulled one at a time, reading input lines
/// only as needed. Once the scanner is exhausted, [`position`] is the end
/// of the stream.
///
/// [`position`]: Scanner::position
pub struct Scanner<I> {
    lexer: Lexer<I>,
}

impl<'a> Scanner<std::str::SplitInclusive<'a, char>> {
    /// Create a scanner over a whole string, fed to the lexer line by line.
    pub fn new(input: &'a str) -> Self {
        Self::from_lines(input.split_inclusive('\n'))
    }
}

impl<I> Scanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a scanner pulling lines (terminators included) from `lines`.
    pub fn from_lines<L>(lines: L) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self {
            lexer: Lexer::new(lines.into_iter()),
        }
    }

    /// Position just after the last character read so far.
    pub fn position(&self) -> Position {
        self.lexer.position()
    }
}

impl<I> Iterator for Scanner<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.next()
    }
}
