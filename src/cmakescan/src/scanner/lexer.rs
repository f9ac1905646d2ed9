// cmakescan/src/scanner/lexer.rs

//! Low-level lexical analysis for CMake tokens.
//!
//! The lexer pulls its input one line at a time, only reading the next line
//! once everything buffered so far has been consumed or a token runs off the
//! end of the buffer. Lines are taken verbatim, so callers feeding a file
//! line by line must keep the line terminators.

use super::token::{Position, Token, TokenType};
use crate::error::{ParseError, Result};

/// Streaming lexer over an iterator of text lines.
pub struct Lexer<I> {
    lines: I,
    buffer: Vec<char>,
    current: usize,
    position: Position,
    exhausted: bool,
    done: bool,
    gap: String,
    gap_start: Position,
    after_string: bool,
}

impl<I> Lexer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Create a new lexer pulling lines from `lines`.
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            buffer: Vec::new(),
            current: 0,
            position: Position::default(),
            exhausted: false,
            done: false,
            gap: String::new(),
            gap_start: Position::default(),
            after_string: false,
        }
    }

    /// Position just after the most recently consumed character.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Scan the next token, or `None` at end of input.
    pub fn scan_token(&mut self) -> Result<Option<Token>> {
        self.compact();
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(self.take_gap()),
            };

            if c.is_whitespace() {
                self.scan_whitespace();
                continue;
            }
            if c == '#' {
                self.skip_comment();
                continue;
            }
            if c == '"' {
                // Strings do not carry the spacing around them.
                self.gap.clear();
                let token = self.scan_string()?;
                self.after_string = true;
                return Ok(Some(token));
            }

            if let Some(gap) = self.take_gap() {
                return Ok(Some(gap));
            }

            let start_position = self.position;
            let start = self.current;
            let first = self.advance();

            let token_type = if is_word_char(first) {
                while self.peek().is_some_and(is_word_char) {
                    self.advance();
                }
                TokenType::Word
            } else if first == ':' {
                while self.peek() == Some(':') {
                    self.advance();
                }
                TokenType::Punct
            } else {
                TokenType::Punct
            };

            let lexeme = self.lexeme(start);
            return Ok(Some(match token_type {
                TokenType::Word => Token::word(lexeme, start_position),
                _ => Token::new(token_type, lexeme, start_position),
            }));
        }
    }

    fn scan_whitespace(&mut self) {
        if self.gap.is_empty() {
            self.gap_start = self.position;
        }
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
            self.gap.push(c);
        }
    }

    fn skip_comment(&mut self) {
        if self.gap.is_empty() {
            self.gap_start = self.position;
        }
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Hand back pending spacing as a Gap, unless it follows a String.
    fn take_gap(&mut self) -> Option<Token> {
        let after_string = std::mem::replace(&mut self.after_string, false);
        if self.gap.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.gap);
        if after_string {
            return None;
        }
        Some(Token::new(TokenType::Gap, text, self.gap_start))
    }

    fn scan_string(&mut self) -> Result<Token> {
        let start_position = self.position;
        let start = self.current;
        self.advance(); // opening quote

        let mut backslashes = 0usize;
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return Err(ParseError::dangling_text(self.lexeme(start)).at(self.position));
                }
            };
            self.advance();
            match c {
                '\\' => backslashes += 1,
                '"' if backslashes % 2 == 0 => break,
                _ => backslashes = 0,
            }
        }

        Ok(Token::new(TokenType::String, self.lexeme(start), start_position))
    }

    fn lexeme(&self, start: usize) -> String {
        self.buffer[start..self.current].iter().collect()
    }

    fn advance(&mut self) -> char {
        let c = self.buffer[self.current];
        self.current += 1;
        self.position.consume(c);
        c
    }

    /// Look at the next character, reading more lines as needed.
    fn peek(&mut self) -> Option<char> {
        while self.current >= self.buffer.len() {
            if !self.fill() {
                return None;
            }
        }
        Some(self.buffer[self.current])
    }

    fn fill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.lines.next() {
            Some(line) => {
                self.buffer.extend(line.as_ref().chars());
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    /// Drop already-tokenized text; only safe between tokens.
    fn compact(&mut self) {
        if self.current > 0 {
            self.buffer.drain(..self.current);
            self.current = 0;
        }
    }
}

impl<I> Iterator for Lexer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scan_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
