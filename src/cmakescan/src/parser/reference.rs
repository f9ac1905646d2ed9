// cmakescan/src/parser/reference.rs

//! Recognition of `${...}` and `$<...>` variable references.
//!
//! This layer reads straight off the [`Scanner`], so input lines are only
//! pulled as far as the current token needs. References are only packaged
//! here; evaluation happens on demand in the resolver. Gaps outside
//! references pass through for the glue layer.

use super::node::{Node, Reference};
use super::MAX_NESTING;
use crate::error::{ParseError, Result};
use crate::scanner::{Scanner, Token};
use std::iter::Peekable;

/// Package every `$`-reference in the scanned stream as a [`Reference`].
///
/// Errors found only when input runs out are placed at the end of stream.
pub fn recognize<I>(scanner: &mut Scanner<I>) -> Result<Vec<Node>>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    let recognized = recognize_stream(&mut scanner.by_ref().peekable());
    recognized.map_err(|err| err.or_at(Scanner::position(scanner)))
}

fn recognize_stream<S>(stream: &mut Peekable<S>) -> Result<Vec<Node>>
where
    S: Iterator<Item = Result<Token>>,
{
    let mut nodes = Vec::new();

    while let Some(token) = stream.next() {
        let token = token?;
        if token.is_punct("$") {
            if let Some(open) = next_opener(stream) {
                nodes.push(Node::Reference(expand(token, open?, stream, 1)?));
                continue;
            }
        }
        nodes.push(Node::Token(token));
    }

    Ok(nodes)
}

fn is_opener(token: &Token) -> bool {
    token.is_punct("{") || token.is_punct("<")
}

fn next_opener<S>(stream: &mut Peekable<S>) -> Option<Result<Token>>
where
    S: Iterator<Item = Result<Token>>,
{
    stream.next_if(|token| matches!(token, Ok(token) if is_opener(token)))
}

fn closer_for(open: &Token) -> &'static str {
    if open.is_punct("{") {
        "}"
    } else {
        ">"
    }
}

/// Gather the rest of a reference whose `$` and opener have been consumed.
/// `depth` counts the references enclosing this one, itself included.
fn expand<S>(sigil: Token, open: Token, stream: &mut Peekable<S>, depth: usize) -> Result<Reference>
where
    S: Iterator<Item = Result<Token>>,
{
    let closer = closer_for(&open);
    let mut body = Vec::new();

    loop {
        let token = match next_significant(stream)? {
            Some(token) => token,
            None => {
                let gathered = format!("{}{}{}", sigil.lexeme, open.lexeme, joined(&body));
                let closer = closer.chars().next().unwrap_or('}');
                return Err(ParseError::unclosed_evaluator(closer, gathered));
            }
        };

        if token.is_punct(closer) {
            if body.is_empty() {
                let text = format!("{}{}{}", sigil.lexeme, open.lexeme, token.lexeme);
                return Err(ParseError::empty_evaluator(text).at(sigil.position));
            }
            return Ok(Reference {
                sigil,
                open,
                body,
                close: token,
            });
        }

        if token.is_punct("$") {
            while stream.next_if(|t| matches!(t, Ok(t) if t.is_gap())).is_some() {}
            if let Some(inner_open) = next_opener(stream) {
                if depth >= MAX_NESTING {
                    return Err(ParseError::nesting_too_deep(token.lexeme).at(token.position));
                }
                let inner = expand(token, inner_open?, stream, depth + 1)?;
                body.push(Node::Reference(inner));
                continue;
            }
        }

        body.push(Node::Token(token));
    }
}

/// Spacing is not significant inside a reference.
fn next_significant<S>(stream: &mut S) -> Result<Option<Token>>
where
    S: Iterator<Item = Result<Token>>,
{
    stream
        .find(|token| !matches!(token, Ok(token) if token.is_gap()))
        .transpose()
}

fn joined(nodes: &[Node]) -> String {
    nodes.iter().map(Node::text).collect()
}
