// cmakescan/src/parser/glue.rs

//! Gluing of juxtaposed word fragments.
//!
//! Words, references and the punctuators common in paths, options and
//! package names are merged into a [`Compound`] when no spacing separates
//! them. Spacing stops mattering after this layer, so Gaps are dropped.

use super::node::{Compound, Node};
use crate::scanner::TokenType;

/// Punctuators that glue to their neighbours.
const GLUE_PUNCTUATORS: [&str; 6] = [".", "/", "-", ",", ":", "::"];

/// Merge runs of glueable nodes and discard Gaps.
pub fn glue(nodes: Vec<Node>) -> Vec<Node> {
    let mut glued = Vec::new();
    let mut run = Vec::new();

    for node in nodes {
        if is_glueable(&node) {
            run.push(node);
            continue;
        }
        flush(&mut run, &mut glued);
        if !node.is_gap() {
            glued.push(node);
        }
    }
    flush(&mut run, &mut glued);

    glued
}

fn is_glueable(node: &Node) -> bool {
    match node {
        Node::Reference(_) => true,
        Node::Token(token) => match token.token_type {
            TokenType::Word | TokenType::Keyword => true,
            TokenType::Punct => GLUE_PUNCTUATORS.contains(&token.lexeme.as_str()),
            TokenType::Gap | TokenType::String => false,
        },
        _ => false,
    }
}

fn flush(run: &mut Vec<Node>, glued: &mut Vec<Node>) {
    match run.len() {
        0 => {}
        1 => glued.extend(run.drain(..)),
        _ => glued.push(Node::Compound(Compound {
            parts: std::mem::take(run),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::reference::recognize;
    use crate::scanner::Scanner;

    fn glued(input: &str) -> Vec<Node> {
        glue(recognize(&mut Scanner::new(input)).unwrap())
    }

    #[test]
    fn test_path_is_glued() {
        let nodes = glued("sub/dir/baz.h other.h");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::Compound(c) if c.parts.len() == 7));
        assert_eq!(nodes[0].text(), "sub/dir/baz.h");
        assert_eq!(nodes[1].text(), "other.h");
    }

    #[test]
    fn test_single_fragment_is_not_wrapped() {
        let nodes = glued("SOURCES");
        assert!(matches!(&nodes[0], Node::Token(_)));
    }

    #[test]
    fn test_scoped_name_and_reference() {
        let nodes = glued("Qt::Core ${DIR}/x.h");
        let texts: Vec<_> = nodes.iter().map(Node::text).collect();
        assert_eq!(texts, vec!["Qt::Core", "${DIR}/x.h"]);
    }

    #[test]
    fn test_gaps_dropped_and_parens_kept_apart() {
        let nodes = glued("f( a  b )");
        let texts: Vec<_> = nodes.iter().map(Node::text).collect();
        assert_eq!(texts, vec!["f", "(", "a", "b", ")"]);
        assert!(nodes.iter().all(|n| !n.is_gap()));
    }

    #[test]
    fn test_strings_do_not_glue() {
        let nodes = glued("a\"b\"c");
        let texts: Vec<_> = nodes.iter().map(Node::text).collect();
        assert_eq!(texts, vec!["a", "\"b\"", "c"]);
    }
}
