// cmakescan/src/parser/calls.rs

//! Recognition of calls and segmentation of their parameter lists.
//!
//! A word (or glued word) directly followed by a Group becomes a [`Call`].
//! Unless the callee is a keyword, its parameter list is re-segmented into
//! [`ParameterBlock`]s, each opened by an upper-case parameter name such as
//! `SOURCES`. Keyword calls are left alone for the control-structure layer.

use super::node::{Call, Group, Node, ParameterBlock};
use crate::scanner::{Token, TokenType};

/// Turn each callee-plus-Group pair into a Call.
pub fn call(nodes: Vec<Node>) -> Vec<Node> {
    let mut called: Vec<Node> = Vec::new();

    for node in nodes {
        let node = match node {
            Node::Group(group) => match called.pop() {
                Some(callee) if is_callee(&callee) => Node::Call(make_call(callee, group)),
                previous => {
                    called.extend(previous);
                    Node::Group(group)
                }
            },
            other => other,
        };
        called.push(node);
    }

    called
}

fn is_callee(node: &Node) -> bool {
    match node {
        Node::Token(token) => token.is_wordlike(),
        Node::Compound(_) => true,
        _ => false,
    }
}

fn make_call(callee: Node, group: Group) -> Call {
    let is_keyword = matches!(&callee, Node::Token(t) if t.token_type == TokenType::Keyword);
    let args = if is_keyword {
        group
    } else {
        Group {
            items: split_params(group.items),
            ..group
        }
    };
    Call {
        callee: Box::new(callee),
        args,
    }
}

/// Break a parameter list into blocks, one per parameter name.
pub fn split_params(items: Vec<Node>) -> Vec<Node> {
    let mut split = Vec::new();
    let mut block: Option<ParameterBlock> = None;

    for item in items {
        match item {
            Node::Token(token) if is_param_name(&token) => {
                if let Some(done) = block.replace(ParameterBlock::new(token)) {
                    split.push(Node::Params(done));
                }
            }
            other => match block.as_mut() {
                Some(current) => current.values.push(other),
                None => split.push(other),
            },
        }
    }
    split.extend(block.map(Node::Params));

    split
}

/// Upper-case, non-keyword words name parameters. Upper-case defines
/// (`QT*`, bar `QT_LICENSE_ID`) and `TEST_*` names show up as values.
pub fn is_param_name(token: &Token) -> bool {
    if token.token_type != TokenType::Word || !is_upper(&token.lexeme) {
        return false;
    }
    let name = token.lexeme.as_str();
    let is_define = name.starts_with("QT") && name != "QT_LICENSE_ID";
    !(is_define || name.starts_with("TEST_"))
}

/// At least one cased character and no lower-case ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{glue::glue, nesting::nest, reference::recognize};
    use crate::scanner::{Position, Scanner};

    fn called(input: &str) -> Vec<Node> {
        let mut scanner = Scanner::new(input);
        let nodes = glue(recognize(&mut scanner).unwrap());
        call(nest(nodes, scanner.position()).unwrap())
    }

    fn word(text: &str) -> Token {
        Token::word(text.to_string(), Position::default())
    }

    #[test]
    fn test_param_names() {
        assert!(is_param_name(&word("SOURCES")));
        assert!(is_param_name(&word("NO_UNITY_BUILD_SOURCES")));
        assert!(is_param_name(&word("QT_LICENSE_ID")));
        assert!(!is_param_name(&word("QT_NO_CAST_FROM_ASCII")));
        assert!(!is_param_name(&word("QTP0001")));
        assert!(!is_param_name(&word("TEST_FOO")));
        assert!(!is_param_name(&word("Core")));
        assert!(!is_param_name(&word("1234")));
    }

    #[test]
    fn test_call_with_parameter_blocks() {
        let nodes = called("qt_internal_add_module(Core\n SOURCES a.h b.h\n LIBRARIES Qt::Gui)\n");
        assert_eq!(nodes.len(), 1);
        let call = match &nodes[0] {
            Node::Call(call) => call,
            other => panic!("expected call, got {:?}", other),
        };
        assert_eq!(call.name(), "qt_internal_add_module");
        let params = call.parameters();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].text(), "Core");
        match &params[1] {
            Node::Params(block) => {
                assert!(block.is_source());
                let values: Vec<_> = block.values.iter().map(Node::text).collect();
                assert_eq!(values, vec!["a.h", "b.h"]);
            }
            other => panic!("expected parameter block, got {:?}", other),
        }
        assert_eq!(params[2].text(), "LIBRARIES Qt::Gui");
    }

    #[test]
    fn test_defines_stay_inside_block() {
        let nodes = called("qt_internal_extend_target(Core DEFINES QT_NO_FOO TEST_BAR SOURCES x.h)");
        let call = match &nodes[0] {
            Node::Call(call) => call,
            other => panic!("expected call, got {:?}", other),
        };
        let blocks: Vec<_> = call.parameter_blocks().map(|b| b.text()).collect();
        assert_eq!(blocks, vec!["DEFINES QT_NO_FOO TEST_BAR", "SOURCES x.h"]);
    }

    #[test]
    fn test_keyword_call_is_not_segmented() {
        let nodes = called("set(MY_HEADERS A.h B.h)");
        match &nodes[0] {
            Node::Call(call) => {
                assert_eq!(call.keyword(), Some("set"));
                assert!(call.parameters().iter().all(|p| !matches!(p, Node::Params(_))));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_space_before_parenthesis_and_bare_group() {
        let nodes = called("if (FOO)\n(bare)\n");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Node::Call(c) if c.keyword() == Some("if")));
        assert!(matches!(&nodes[1], Node::Group(_)));
    }

    #[test]
    fn test_glued_callee() {
        let nodes = called("my.func(A b)");
        assert!(matches!(&nodes[0], Node::Call(c) if c.name() == "my.func"));
    }
}
