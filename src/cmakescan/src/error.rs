// cmakescan/src/error.rs

//! Error types for the CMakeLists.txt scanner.
//!
//! Every failure the scanner can report is a [`ParseError`]. The error
//! carries a [`ParseErrorKind`] naming the diagnostic, the free-form context
//! that was in hand when the problem was spotted, and the stream position at
//! which it happened. There is no recovery: the first error aborts the scan.

use crate::scanner::Position;
use std::fmt;
use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// The diagnostics a scan can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Unterminated quoted string (or other text) left at end of input
    #[error("Dangling text at end of stream")]
    DanglingText,
    /// `${` or `$<` with no matching closer before end of input
    #[error("Unclosed $-evaluator")]
    UnclosedEvaluator,
    /// `${}` or `$<>` with nothing to evaluate
    #[error("Empty $-evaluator")]
    EmptyEvaluator,
    /// `)` with no matching `(`
    #[error("Unopened parentheses")]
    UnopenedParentheses,
    /// `(` with no matching `)`
    #[error("Unclosed parentheses")]
    UnclosedParentheses,
    /// Parentheses, references, control blocks or variable expansions
    /// nested past [`MAX_NESTING`](crate::parser::MAX_NESTING)
    #[error("Nesting too deep")]
    NestingTooDeep,
    /// `elseif()` or `else()` following an `else()` in the same chain
    #[error("Not allowed after else()")]
    NotAllowedAfterElse,
    /// `endforeach()` outside any loop
    #[error("Unstarted loop")]
    UnstartedLoop,
    /// `elseif()`, `else()` or `endif()` outside any conditional
    #[error("Unstarted conditional fragment")]
    UnstartedConditionalFragment,
    /// `if()` with no `endif()`
    #[error("Unterminated conditional")]
    UnterminatedConditional,
    /// `foreach()` with no `endforeach()`
    #[error("Unterminated loop")]
    UnterminatedLoop,
    /// A fragment of a glued word expanded to several values
    #[error("Glued variable has multi-candidate value")]
    MultiCandidateGlue,
    /// A fragment of a glued word expanded to nothing
    #[error("Glued variable has no value")]
    EmptyGlue,
    /// A private header filter that is neither a regex nor a string
    #[error("Neither regex nor string as private header filter")]
    InvalidPrivateFilter,
    /// A private header filter that does not compile
    #[error("Invalid private header filter regex")]
    InvalidFilterRegex,
}

impl ParseErrorKind {
    /// Which stage of the scan reports this kind of error.
    pub fn category(&self) -> &'static str {
        match self {
            ParseErrorKind::DanglingText => "lexical",
            ParseErrorKind::UnclosedEvaluator | ParseErrorKind::EmptyEvaluator => "reference",
            ParseErrorKind::UnopenedParentheses
            | ParseErrorKind::UnclosedParentheses
            | ParseErrorKind::NestingTooDeep => "nesting",
            ParseErrorKind::NotAllowedAfterElse
            | ParseErrorKind::UnstartedLoop
            | ParseErrorKind::UnstartedConditionalFragment
            | ParseErrorKind::UnterminatedConditional
            | ParseErrorKind::UnterminatedLoop => "control",
            ParseErrorKind::MultiCandidateGlue
            | ParseErrorKind::EmptyGlue
            | ParseErrorKind::InvalidPrivateFilter
            | ParseErrorKind::InvalidFilterRegex => "evaluation",
        }
    }
}

/// A malformed-input condition found while scanning or evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Offending text, in the order it was gathered
    pub context: Vec<String>,
    /// Where in the input the scan was when it failed
    pub position: Option<Position>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for item in &self.context {
            write!(f, ", {:?}", item)?;
        }
        if let Some(position) = &self.position {
            write!(f, ", {}", position)?;
        }
        Ok(())
    }
}

impl ParseError {
    /// Create an error of the given kind with no context.
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            context: Vec::new(),
            position: None,
        }
    }

    pub fn dangling_text<S: Into<String>>(text: S) -> Self {
        Self::new(ParseErrorKind::DanglingText).with_context(text)
    }

    pub fn unclosed_evaluator<S: Into<String>>(closer: char, gathered: S) -> Self {
        Self::new(ParseErrorKind::UnclosedEvaluator)
            .with_context(closer.to_string())
            .with_context(gathered)
    }

    pub fn empty_evaluator<S: Into<String>>(text: S) -> Self {
        Self::new(ParseErrorKind::EmptyEvaluator).with_context(text)
    }

    pub fn unopened_parentheses() -> Self {
        Self::new(ParseErrorKind::UnopenedParentheses).with_context(")")
    }

    pub fn unclosed_parentheses<S: Into<String>>(gathered: S) -> Self {
        Self::new(ParseErrorKind::UnclosedParentheses).with_context(gathered)
    }

    pub fn nesting_too_deep<S: Into<String>>(opening: S) -> Self {
        Self::new(ParseErrorKind::NestingTooDeep).with_context(opening)
    }

    pub fn not_allowed_after_else<S: Into<String>>(call: S) -> Self {
        Self::new(ParseErrorKind::NotAllowedAfterElse).with_context(call)
    }

    pub fn unstarted_loop<S: Into<String>>(call: S) -> Self {
        Self::new(ParseErrorKind::UnstartedLoop).with_context(call)
    }

    pub fn unstarted_conditional_fragment<S: Into<String>>(call: S) -> Self {
        Self::new(ParseErrorKind::UnstartedConditionalFragment).with_context(call)
    }

    pub fn unterminated_conditional<S: Into<String>>(opening: S) -> Self {
        Self::new(ParseErrorKind::UnterminatedConditional).with_context(opening)
    }

    pub fn unterminated_loop<S: Into<String>>(opening: S) -> Self {
        Self::new(ParseErrorKind::UnterminatedLoop).with_context(opening)
    }

    pub fn multi_candidate_glue<S: Into<String>>(token: S, first: S, extra: S) -> Self {
        Self::new(ParseErrorKind::MultiCandidateGlue)
            .with_context(token)
            .with_context(first)
            .with_context(extra)
    }

    pub fn empty_glue<S: Into<String>>(token: S) -> Self {
        Self::new(ParseErrorKind::EmptyGlue).with_context(token)
    }

    pub fn invalid_private_filter<S: Into<String>>(token: S, block: S) -> Self {
        Self::new(ParseErrorKind::InvalidPrivateFilter)
            .with_context(token)
            .with_context(block)
    }

    pub fn invalid_filter_regex<S: Into<String>>(pattern: S, reason: S) -> Self {
        Self::new(ParseErrorKind::InvalidFilterRegex)
            .with_context(pattern)
            .with_context(reason)
    }

    /// Append a diagnostic argument.
    pub fn with_context<S: Into<String>>(mut self, item: S) -> Self {
        self.context.push(item.into());
        self
    }

    /// Record where the failure happened, replacing any earlier position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Record a position only if none is known yet.
    pub fn or_at(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    /// Stage of the scan that reported the error.
    pub fn category(&self) -> &'static str {
        self.kind.category()
    }
}
