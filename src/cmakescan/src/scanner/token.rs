// cmakescan/src/scanner/token.rs

//! Token types and structures for CMake lexical analysis.

use std::fmt;

/// Words that the control-structure layer cares about, or that must not be
/// mistaken for parameter names.
pub const KEYWORDS: [&str; 11] = [
    "if",
    "elseif",
    "else",
    "endif",
    "foreach",
    "endforeach",
    "function",
    "endfunction",
    "macro",
    "endmacro",
    "set",
];

/// True if `text` is spelled exactly like one of the [`KEYWORDS`].
pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// A location in the input stream (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Advance past one consumed character.
    pub fn consume(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// A primitive lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// The raw text of the token
    pub lexeme: String,
    /// Where the token starts
    pub position: Position,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, position: Position) -> Self {
        Self {
            token_type,
            lexeme,
            position,
        }
    }

    /// Build a Word, or a Keyword if the text is one.
    pub fn word(lexeme: String, position: Position) -> Self {
        let token_type = if is_keyword(&lexeme) {
            TokenType::Keyword
        } else {
            TokenType::Word
        };
        Self::new(token_type, lexeme, position)
    }

    pub fn is_gap(&self) -> bool {
        self.token_type == TokenType::Gap
    }

    /// Word or Keyword.
    pub fn is_wordlike(&self) -> bool {
        matches!(self.token_type, TokenType::Word | TokenType::Keyword)
    }

    /// True for a punctuator spelled `text`.
    pub fn is_punct(&self, text: &str) -> bool {
        self.token_type == TokenType::Punct && self.lexeme == text
    }

    /// The text between the quotes of a String token, with CMake escape
    /// sequences decoded. Other tokens give their lexeme unchanged.
    pub fn contents(&self) -> String {
        if self.token_type != TokenType::String {
            return self.lexeme.clone();
        }
        let inner = &self.lexeme[1..self.lexeme.len() - 1];
        unescape(inner)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.lexeme)
    }
}

/// Kinds of primitive token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A run of whitespace (comments folded in)
    Gap,
    /// Identifier or number: a run of alphanumerics and underscores
    Word,
    /// A Word spelled like one of the [`KEYWORDS`]
    Keyword,
    /// Double-quoted literal, quotes included
    String,
    /// A single character, or a run of colons
    Punct,
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(e @ ('\\' | '"' | '$' | ';' | '(' | ')' | '#' | '@' | '^' | ' ')) => out.push(e),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
