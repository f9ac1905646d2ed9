// cmakescan/src/parser/nesting.rs

//! Matching of parentheses into [`Group`]s, up to [`MAX_NESTING`] deep.

use super::node::{Group, Node};
use super::MAX_NESTING;
use crate::error::{ParseError, Result};
use crate::scanner::{Position, Token};

/// Replace each parenthesised sequence with a Group.
pub fn nest(nodes: Vec<Node>, end: Position) -> Result<Vec<Node>> {
    let mut stream = nodes.into_iter();
    let mut nested = Vec::new();

    while let Some(node) = stream.next() {
        match node {
            Node::Token(token) if token.is_punct(")") => {
                return Err(ParseError::unopened_parentheses().at(token.position));
            }
            Node::Token(token) if token.is_punct("(") => {
                nested.push(Node::Group(group(token, &mut stream, end, 1)?));
            }
            other => nested.push(other),
        }
    }

    Ok(nested)
}

/// Gather up to the `)` matching an already-consumed `(`.
fn group<I>(open: Token, stream: &mut I, end: Position, depth: usize) -> Result<Group>
where
    I: Iterator<Item = Node>,
{
    let mut items = Vec::new();

    while let Some(node) = stream.next() {
        match node {
            Node::Token(token) if token.is_punct(")") => {
                return Ok(Group {
                    open,
                    items,
                    close: token,
                });
            }
            Node::Token(token) if token.is_punct("(") => {
                if depth >= MAX_NESTING {
                    let position = token.position;
                    return Err(ParseError::nesting_too_deep(token.lexeme).at(position));
                }
                items.push(Node::Group(group(token, stream, end, depth + 1)?));
            }
            other => items.push(other),
        }
    }

    let gathered: Vec<_> = items.iter().map(Node::text).collect();
    Err(ParseError::unclosed_parentheses(format!("({}", gathered.join(" "))).at(end))
}
