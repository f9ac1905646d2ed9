// cmakescan/src/parser/control.rs

//! Grouping of `if`/`elseif`/`else`/`endif` chains into [`Conditional`]s
//! and `foreach`/`endforeach` blocks into [`Loop`]s, nested up to
//! [`MAX_NESTING`] deep.

use super::node::{Branch, Call, Conditional, ControlKeyword, Loop, Node};
use super::MAX_NESTING;
use crate::error::{ParseError, Result};
use crate::scanner::Position;

type Stream = std::vec::IntoIter<Node>;

/// Recognize control structures in the top-level call stream.
pub fn control(nodes: Vec<Node>, end: Position) -> Result<Vec<Node>> {
    let mut stream = nodes.into_iter();
    let mut controlled = Vec::new();

    while let Some(node) = stream.next() {
        let call = match node {
            Node::Call(call) => call,
            other => {
                controlled.push(other);
                continue;
            }
        };
        let node = match call.control() {
            Some(ControlKeyword::If) => Node::Conditional(conditional(call, &mut stream, end, 1)?),
            Some(ControlKeyword::ForEach) => Node::Loop(foreach(call, &mut stream, end, 1)?),
            Some(ControlKeyword::ElseIf | ControlKeyword::Else | ControlKeyword::EndIf) => {
                return Err(ParseError::unstarted_conditional_fragment(call.text()).at(call.position()));
            }
            Some(ControlKeyword::EndForEach) => {
                return Err(ParseError::unstarted_loop(call.text()).at(call.position()));
            }
            None => Node::Call(call),
        };
        controlled.push(node);
    }

    Ok(controlled)
}

/// Gather the rest of a chain whose `if()` has been consumed.
fn conditional(opening: Call, stream: &mut Stream, end: Position, depth: usize) -> Result<Conditional> {
    let opening_text = opening.text();
    let mut branches = Vec::new();
    let mut current = Branch::new(opening);
    let mut seen_else = false;

    while let Some(node) = stream.next() {
        let call = match node {
            Node::Call(call) => call,
            other => {
                current.body.push(other);
                continue;
            }
        };
        match call.control() {
            Some(ControlKeyword::If) => {
                let depth = deeper(&call, depth)?;
                let inner = conditional(call, stream, end, depth)?;
                current.body.push(Node::Conditional(inner));
            }
            Some(ControlKeyword::ForEach) => {
                let depth = deeper(&call, depth)?;
                let inner = foreach(call, stream, end, depth)?;
                current.body.push(Node::Loop(inner));
            }
            Some(ControlKeyword::EndIf) => {
                branches.push(current);
                return Ok(Conditional {
                    branches,
                    end: call,
                });
            }
            Some(ControlKeyword::ElseIf | ControlKeyword::Else) if seen_else => {
                return Err(ParseError::not_allowed_after_else(call.text())
                    .with_context(opening_text)
                    .at(call.position()));
            }
            Some(keyword @ (ControlKeyword::ElseIf | ControlKeyword::Else)) => {
                seen_else = keyword == ControlKeyword::Else;
                branches.push(std::mem::replace(&mut current, Branch::new(call)));
            }
            Some(ControlKeyword::EndForEach) => {
                return Err(ParseError::unstarted_loop(call.text())
                    .with_context(opening_text)
                    .at(call.position()));
            }
            None => current.body.push(Node::Call(call)),
        }
    }

    Err(ParseError::unterminated_conditional(opening_text).at(end))
}

/// Gather the rest of a loop whose `foreach()` has been consumed.
fn foreach(head: Call, stream: &mut Stream, end: Position, depth: usize) -> Result<Loop> {
    let mut body = Vec::new();

    while let Some(node) = stream.next() {
        let call = match node {
            Node::Call(call) => call,
            other => {
                body.push(other);
                continue;
            }
        };
        match call.control() {
            Some(ControlKeyword::ForEach) => {
                let depth = deeper(&call, depth)?;
                body.push(Node::Loop(foreach(call, stream, end, depth)?));
            }
            Some(ControlKeyword::If) => {
                let depth = deeper(&call, depth)?;
                body.push(Node::Conditional(conditional(call, stream, end, depth)?));
            }
            Some(ControlKeyword::EndForEach) => return Ok(Loop { head, body, end: call }),
            Some(ControlKeyword::ElseIf | ControlKeyword::Else | ControlKeyword::EndIf) => {
                return Err(ParseError::unstarted_conditional_fragment(call.text())
                    .with_context(head.text())
                    .at(call.position()));
            }
            None => body.push(Node::Call(call)),
        }
    }

    Err(ParseError::unterminated_loop(head.text()).at(end))
}

/// Depth of a block opened by `call` inside one at `depth`.
fn deeper(call: &Call, depth: usize) -> Result<usize> {
    if depth >= MAX_NESTING {
        return Err(ParseError::nesting_too_deep(call.text()).at(call.position()));
    }
    Ok(depth + 1)
}
