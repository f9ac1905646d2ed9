// cmakescan/src/resolver/evaluate.rs

//! Evaluation of parsed tokens to literal strings.
//!
//! References are expanded by searching the whole document for `set()`
//! calls of the variable. No control-flow analysis is done, so every
//! branch of every conditional counts as a possible assignment, and every
//! value assigned is produced.

use crate::error::{ParseError, Result};
use crate::parser::{Document, Node, Reference, MAX_NESTING};
use log::debug;

/// Expands tokens against the assignments in one document.
pub struct Evaluator<'a> {
    document: &'a Document,
    /// Variables currently being expanded, innermost last
    expanding: Vec<String>,
    /// Nodes being evaluated, counting both tree nesting and variables
    /// expanding into other variables; capped at [`MAX_NESTING`]
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            expanding: Vec::new(),
            depth: 0,
        }
    }

    /// All literal values a node may stand for, in order.
    pub fn evaluate(&mut self, node: &Node) -> Result<Vec<String>> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::nesting_too_deep(node.text()).at(node.position()));
        }
        self.depth += 1;
        let values = self.evaluate_node(node);
        self.depth -= 1;
        values
    }

    fn evaluate_node(&mut self, node: &Node) -> Result<Vec<String>> {
        match node {
            Node::Token(token) => Ok(vec![token.lexeme.clone()]),
            Node::Reference(reference) => self.expand(reference),
            Node::Compound(compound) => {
                let mut text = String::new();
                for part in &compound.parts {
                    if matches!(part, Node::Reference(r) if r.is_build_tree()) {
                        debug!("skipping build-tree path {}", compound.text());
                        return Ok(Vec::new());
                    }
                    text.push_str(&self.single_value(part)?);
                }
                Ok(vec![text])
            }
            Node::Group(group) => {
                let mut values = vec![group.open.lexeme.clone()];
                values.extend(self.evaluate_all(&group.items)?);
                values.push(group.close.lexeme.clone());
                Ok(values)
            }
            Node::Params(block) => {
                let mut values = vec![block.name.lexeme.clone()];
                values.extend(self.evaluate_all(&block.values)?);
                Ok(values)
            }
            Node::Call(call) => {
                let mut values = self.evaluate(&call.callee)?;
                values.extend(self.evaluate(&Node::Group(call.args.clone()))?);
                Ok(values)
            }
            Node::Conditional(conditional) => {
                let mut values = Vec::new();
                for branch in &conditional.branches {
                    values.extend(self.evaluate(&Node::Call(branch.guard.clone()))?);
                    values.extend(self.evaluate_all(&branch.body)?);
                }
                values.extend(self.evaluate(&Node::Call(conditional.end.clone()))?);
                Ok(values)
            }
            Node::Loop(block) => {
                let mut values = self.evaluate(&Node::Call(block.head.clone()))?;
                values.extend(self.evaluate_all(&block.body)?);
                values.extend(self.evaluate(&Node::Call(block.end.clone()))?);
                Ok(values)
            }
        }
    }

    fn evaluate_all(&mut self, nodes: &[Node]) -> Result<Vec<String>> {
        let mut values = Vec::new();
        for node in nodes {
            values.extend(self.evaluate(node)?);
        }
        Ok(values)
    }

    /// A glued fragment must stand for exactly one literal.
    fn single_value(&mut self, node: &Node) -> Result<String> {
        let mut values = self.evaluate(node)?.into_iter();
        match (values.next(), values.next()) {
            (Some(value), None) => Ok(value),
            (None, _) => Err(ParseError::empty_glue(node.text()).at(node.position())),
            (Some(first), Some(extra)) => {
                Err(ParseError::multi_candidate_glue(node.text(), first, extra).at(node.position()))
            }
        }
    }

    fn expand(&mut self, reference: &Reference) -> Result<Vec<String>> {
        if reference.is_build_tree() {
            debug!("skipping build-tree reference {}", reference.text());
            return Ok(Vec::new());
        }
        self.lookup(&reference.variable().text(), reference.default())
    }

    /// Every non-empty value assigned to `variable`, or its default when
    /// it is never assigned.
    fn lookup(&mut self, variable: &str, default: Option<&Node>) -> Result<Vec<String>> {
        if self.expanding.iter().any(|name| name == variable) {
            debug!("{} refers to itself; expanding it to nothing", variable);
            return Ok(Vec::new());
        }

        self.expanding.push(variable.to_string());
        let values = self.assigned_values(variable);
        self.expanding.pop();
        let values = values?;

        match default {
            Some(default) if values.is_empty() => self.evaluate(default),
            _ => Ok(values),
        }
    }

    fn assigned_values(&mut self, variable: &str) -> Result<Vec<String>> {
        let document = self.document;
        let mut values = Vec::new();
        for call in document.assignments(variable) {
            for node in call.parameters().iter().skip(1) {
                values.extend(self.evaluate(node)?.into_iter().filter(|v| !v.is_empty()));
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::parser::parse_str;

    /// Evaluate the first value of the last call in `input`.
    fn evaluate_last(input: &str) -> Result<Vec<String>> {
        let document = parse_str(input)?;
        let last = match document.nodes.last() {
            Some(Node::Call(call)) => call.parameters()[0].clone(),
            other => panic!("expected a call, got {:?}", other),
        };
        Evaluator::new(&document).evaluate(&last)
    }

    #[test]
    fn test_plain_word() {
        assert_eq!(evaluate_last("use(foo.h)").unwrap(), vec!["foo.h"]);
    }

    #[test]
    fn test_every_assignment_is_a_candidate() {
        let values = evaluate_last(
            "if(A)\n set(H a.h b.h)\nelse()\n set(H c.h)\nendif()\nuse(${H})\n",
        )
        .unwrap();
        assert_eq!(values, vec!["a.h", "b.h", "c.h"]);
    }

    #[test]
    fn test_recursive_expansion() {
        let values = evaluate_last("set(DIR sub)\nset(H ${DIR}/x.h)\nuse(${H})\n").unwrap();
        assert_eq!(values, vec!["sub/x.h"]);
    }

    #[test]
    fn test_default_used_only_when_unset() {
        // The default is the single token after the colon.
        assert_eq!(evaluate_last("use(${UNSET:fallback})").unwrap(), vec!["fallback"]);
        assert_eq!(
            evaluate_last("set(SET s.h)\nuse(${SET:fallback})").unwrap(),
            vec!["s.h"]
        );
        assert!(evaluate_last("use(${UNSET})").unwrap().is_empty());
    }

    #[test]
    fn test_build_tree_references_skipped() {
        assert!(evaluate_last("set(QT_BUILD_DIR x)\nuse(${QT_BUILD_DIR})").unwrap().is_empty());
        assert!(evaluate_last("use(${QT_BUILD_DIR}/x.h)").unwrap().is_empty());
    }

    #[test]
    fn test_multi_candidate_glue() {
        let err = evaluate_last("set(D a b)\nuse(${D}/x.h)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MultiCandidateGlue);
        assert_eq!(err.context, vec!["${D}", "a", "b"]);
    }

    #[test]
    fn test_empty_glue() {
        let err = evaluate_last("use(${NOWHERE}/x.h)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyGlue);
    }

    #[test]
    fn test_self_reference_terminates() {
        let values = evaluate_last("set(L a.h)\nset(L ${L} b.h)\nuse(${L})").unwrap();
        assert_eq!(values, vec!["a.h", "b.h"]);
    }

    fn chain(links: usize) -> String {
        let mut input = String::from("set(V0 a.h)\n");
        for i in 1..links {
            input.push_str(&format!("set(V{} ${{V{}}})\n", i, i - 1));
        }
        input.push_str(&format!("use(${{V{}}})\n", links - 1));
        input
    }

    #[test]
    fn test_variable_chains_expand() {
        assert_eq!(evaluate_last(&chain(100)).unwrap(), vec!["a.h"]);
    }

    #[test]
    fn test_overlong_variable_chain_is_rejected() {
        let err = evaluate_last(&chain(2000)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);
    }
}
