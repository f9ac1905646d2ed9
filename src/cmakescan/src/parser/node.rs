// cmakescan/src/parser/node.rs

//! The parse tree: one closed sum type for everything the layers build.
//!
//! Nodes are built bottom-up, one layer at a time, and never mutated once a
//! layer has handed them on.

use crate::scanner::{Position, Token, TokenType};
use std::fmt;

/// Any element of a parsed token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A primitive token, as produced by the lexer
    Token(Token),
    /// `${...}` or `$<...>`, unevaluated
    Reference(Reference),
    /// Juxtaposed fragments with no spacing between them
    Compound(Compound),
    /// A parenthesised sequence
    Group(Group),
    /// A named block of a parameter list
    Params(ParameterBlock),
    /// A name followed by a parenthesised parameter list
    Call(Call),
    /// An `if()` ... `endif()` chain
    Conditional(Conditional),
    /// A `foreach()` ... `endforeach()` block
    Loop(Loop),
}

impl Node {
    /// Source-like rendering of the node.
    pub fn text(&self) -> String {
        match self {
            Node::Token(token) => token.lexeme.clone(),
            Node::Reference(reference) => reference.text(),
            Node::Compound(compound) => compound.text(),
            Node::Group(group) => group.text(),
            Node::Params(block) => block.text(),
            Node::Call(call) => call.text(),
            Node::Conditional(conditional) => conditional.text(),
            Node::Loop(block) => block.text(),
        }
    }

    /// Where the node starts in the input.
    pub fn position(&self) -> Position {
        match self {
            Node::Token(token) => token.position,
            Node::Reference(reference) => reference.sigil.position,
            Node::Compound(compound) => compound.position(),
            Node::Group(group) => group.open.position,
            Node::Params(block) => block.name.position,
            Node::Call(call) => call.position(),
            Node::Conditional(conditional) => conditional.position(),
            Node::Loop(block) => block.head.position(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.as_token().is_some_and(Token::is_gap)
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_punct(text))
    }

    /// Collect every Call in this subtree, in document order.
    pub fn collect_calls<'a>(&'a self, calls: &mut Vec<&'a Call>) {
        match self {
            Node::Call(call) => calls.push(call),
            Node::Conditional(conditional) => {
                for branch in &conditional.branches {
                    calls.push(&branch.guard);
                    for node in &branch.body {
                        node.collect_calls(calls);
                    }
                }
                calls.push(&conditional.end);
            }
            Node::Loop(block) => {
                calls.push(&block.head);
                for node in &block.body {
                    node.collect_calls(calls);
                }
                calls.push(&block.end);
            }
            _ => {}
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

fn joined(nodes: &[Node], joiner: &str) -> String {
    nodes.iter().map(Node::text).collect::<Vec<_>>().join(joiner)
}

/// A variable reference: `$`, an opener, the body, and the matching closer.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub sigil: Token,
    pub open: Token,
    /// Never empty
    pub body: Vec<Node>,
    pub close: Token,
}

impl Reference {
    /// The referenced variable's name.
    pub fn variable(&self) -> &Node {
        &self.body[0]
    }

    /// The value after `:`, as in `${NAME:default}`.
    pub fn default(&self) -> Option<&Node> {
        if self.body.len() > 2 && self.body[1].is_punct(":") {
            Some(&self.body[2])
        } else {
            None
        }
    }

    /// References into the build tree, which cannot name source files.
    pub fn is_build_tree(&self) -> bool {
        self.variable().text().contains("_BUILD_")
    }

    pub fn text(&self) -> String {
        format!(
            "{}{}{}{}",
            self.sigil.lexeme,
            self.open.lexeme,
            joined(&self.body, ""),
            self.close.lexeme
        )
    }
}

/// Two or more fragments glued together, such as a file path.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub parts: Vec<Node>,
}

impl Compound {
    pub fn text(&self) -> String {
        joined(&self.parts, "")
    }

    pub fn position(&self) -> Position {
        self.parts.first().map(Node::position).unwrap_or_default()
    }
}

/// `(`, whatever it encloses, and the matching `)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub open: Token,
    pub items: Vec<Node>,
    pub close: Token,
}

impl Group {
    pub fn text(&self) -> String {
        format!("({})", joined(&self.items, " "))
    }
}

/// A parameter name and the values that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBlock {
    pub name: Token,
    pub values: Vec<Node>,
}

impl ParameterBlock {
    pub fn new(name: Token) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    /// True for source lists: `SOURCES` and `NO_*_SOURCES`.
    pub fn is_source(&self) -> bool {
        let name = self.name.lexeme.as_str();
        name == "SOURCES" || (name.starts_with("NO_") && name.ends_with("_SOURCES"))
    }

    pub fn is_private_filter(&self) -> bool {
        self.name.lexeme == "PRIVATE_HEADER_FILTERS"
    }

    pub fn text(&self) -> String {
        if self.values.is_empty() {
            self.name.lexeme.clone()
        } else {
            format!("{} {}", self.name.lexeme, joined(&self.values, " "))
        }
    }
}

/// The control-flow keywords that shape the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKeyword {
    If,
    ElseIf,
    Else,
    EndIf,
    ForEach,
    EndForEach,
}

/// A call: callee name plus its parenthesised parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// A Word, Keyword or Compound
    pub callee: Box<Node>,
    pub args: Group,
}

impl Call {
    pub fn name(&self) -> String {
        self.callee.text()
    }

    /// The parameter list, without its parentheses.
    pub fn parameters(&self) -> &[Node] {
        &self.args.items
    }

    /// The callee, if it is a keyword.
    pub fn keyword(&self) -> Option<&str> {
        match self.callee.as_ref() {
            Node::Token(token) if token.token_type == TokenType::Keyword => {
                Some(token.lexeme.as_str())
            }
            _ => None,
        }
    }

    /// The control-flow role of this call, if any.
    pub fn control(&self) -> Option<ControlKeyword> {
        match self.keyword()? {
            "if" => Some(ControlKeyword::If),
            "elseif" => Some(ControlKeyword::ElseIf),
            "else" => Some(ControlKeyword::Else),
            "endif" => Some(ControlKeyword::EndIf),
            "foreach" => Some(ControlKeyword::ForEach),
            "endforeach" => Some(ControlKeyword::EndForEach),
            _ => None,
        }
    }

    /// True if this call defines or extends the named module: its first
    /// parameter is `module` and it is `qt_internal_add_*_module()` or
    /// `qt_internal_extend_target()`.
    pub fn grows_module(&self, module: &str) -> bool {
        let name = self.name();
        let adds_module = name.starts_with("qt_internal_add_") && name.ends_with("_module");
        if !adds_module && name != "qt_internal_extend_target" {
            return false;
        }
        match self.parameters().first() {
            Some(Node::Token(token)) if token.token_type == TokenType::Punct => false,
            Some(first) => first.text() == module,
            None => false,
        }
    }

    /// The parameter blocks of the call, skipping anything before the first.
    pub fn parameter_blocks(&self) -> impl Iterator<Item = &ParameterBlock> {
        self.parameters().iter().filter_map(|node| match node {
            Node::Params(block) => Some(block),
            _ => None,
        })
    }

    pub fn position(&self) -> Position {
        self.callee.position()
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.callee.text(), self.args.text())
    }
}

/// One arm of a conditional: its opening call and the nodes it governs.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// The `if()`, `elseif()` or `else()` call
    pub guard: Call,
    pub body: Vec<Node>,
}

impl Branch {
    pub fn new(guard: Call) -> Self {
        Self {
            guard,
            body: Vec::new(),
        }
    }
}

/// `if()`, any `elseif()`s, at most one trailing `else()`, then `endif()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Never empty; the first branch is the `if()`
    pub branches: Vec<Branch>,
    pub end: Call,
}

impl Conditional {
    pub fn has_else(&self) -> bool {
        self.branches
            .last()
            .is_some_and(|b| b.guard.control() == Some(ControlKeyword::Else))
    }

    pub fn position(&self) -> Position {
        self.branches
            .first()
            .map(|b| b.guard.position())
            .unwrap_or_else(|| self.end.position())
    }

    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        for branch in &self.branches {
            parts.push(branch.guard.text());
            parts.extend(branch.body.iter().map(Node::text));
        }
        parts.push(self.end.text());
        parts.join(" ")
    }
}

/// `foreach()` ... `endforeach()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub head: Call,
    pub body: Vec<Node>,
    pub end: Call,
}

impl Loop {
    pub fn text(&self) -> String {
        let mut parts = vec![self.head.text()];
        parts.extend(self.body.iter().map(Node::text));
        parts.push(self.end.text());
        parts.join(" ")
    }
}

/// The top-level nodes parsed from one input stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
    /// Position just past the end of the input
    pub end: Position,
}

impl Document {
    pub fn new(nodes: Vec<Node>, end: Position) -> Self {
        Self { nodes, end }
    }

    /// Every call in the document, at any depth of control structure.
    pub fn calls(&self) -> Vec<&Call> {
        let mut calls = Vec::new();
        for node in &self.nodes {
            node.collect_calls(&mut calls);
        }
        calls
    }

    /// Every `set()` of the named variable, across all branches.
    pub fn assignments<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a Call> + 'a {
        self.calls().into_iter().filter(move |call| {
            call.keyword() == Some("set")
                && call
                    .parameters()
                    .first()
                    .is_some_and(|first| first.text() == variable)
        })
    }

    /// Calls that define or extend the named module.
    pub fn module_calls<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a Call> + 'a {
        self.calls()
            .into_iter()
            .filter(move |call| call.grows_module(module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Token {
        Token::word(text.to_string(), Position::default())
    }

    fn punct(text: &str) -> Token {
        Token::new(TokenType::Punct, text.to_string(), Position::default())
    }

    fn call(name: &str, items: Vec<Node>) -> Call {
        Call {
            callee: Box::new(Node::Token(word(name))),
            args: Group {
                open: punct("("),
                items,
                close: punct(")"),
            },
        }
    }

    #[test]
    fn test_source_block_names() {
        assert!(ParameterBlock::new(word("SOURCES")).is_source());
        assert!(ParameterBlock::new(word("NO_PCH_SOURCES")).is_source());
        assert!(!ParameterBlock::new(word("NO_SOURCES_HERE")).is_source());
        assert!(!ParameterBlock::new(word("LIBRARIES")).is_source());
        assert!(ParameterBlock::new(word("PRIVATE_HEADER_FILTERS")).is_private_filter());
    }

    #[test]
    fn test_grows_module() {
        let add = call("qt_internal_add_module", vec![Node::Token(word("Core"))]);
        assert!(add.grows_module("Core"));
        assert!(!add.grows_module("Gui"));

        let extend = call("qt_internal_extend_target", vec![Node::Token(word("Core"))]);
        assert!(extend.grows_module("Core"));

        let plugin = call("qt_internal_add_plugin", vec![Node::Token(word("Core"))]);
        assert!(!plugin.grows_module("Core"));

        let empty = call("qt_internal_add_qml_module", vec![]);
        assert!(!empty.grows_module("Core"));
    }

    #[test]
    fn test_reference_parts() {
        let reference = Reference {
            sigil: punct("$"),
            open: punct("{"),
            body: vec![
                Node::Token(word("QT_BUILD_DIR")),
                Node::Token(punct(":")),
                Node::Token(word("fallback")),
            ],
            close: punct("}"),
        };
        assert_eq!(reference.text(), "${QT_BUILD_DIR:fallback}");
        assert_eq!(reference.default().map(Node::text), Some("fallback".to_string()));
        assert!(reference.is_build_tree());
    }
}
