// cmakescan/src/query.rs

//! The scanner facade: ingest one CMakeLists.txt, then ask for the public
//! headers it declares for a module.

use crate::error::{ParseError, Result};
use crate::parser::{self, Document, Node, ParameterBlock};
use crate::resolver::{Evaluator, HeaderFilter};
use crate::scanner::{Scanner, TokenType};
use log::{debug, trace, warn};
use std::path::{Component, Path, PathBuf};

/// Recovers a module's public headers from a CMakeLists.txt.
#[derive(Debug, Clone)]
pub struct CMakeScanner {
    module: String,
    root: PathBuf,
    document: Option<Document>,
}

impl CMakeScanner {
    /// Set up a scanner for the named module.
    ///
    /// `root` is the directory holding the CMakeLists.txt, relative to the
    /// git module's root. Header paths in source lists are relative to the
    /// CMakeLists.txt, so `root` is prepended to each one reported.
    pub fn new<M: Into<String>, P: Into<PathBuf>>(module: M, root: P) -> Self {
        Self {
            module: module.into(),
            root: root.into(),
            document: None,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The parsed document, once [`ingest`](Self::ingest) has succeeded.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Parse a stream of lines (terminators included) and keep the result.
    pub fn ingest<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let document = parser::parse(Scanner::from_lines(lines))?;
        debug!(
            "ingested {} top-level nodes for {} ({})",
            document.nodes.len(),
            self.module,
            document.end
        );
        self.document = Some(document);
        Ok(())
    }

    /// Parse a whole string.
    pub fn ingest_str(&mut self, input: &str) -> Result<()> {
        self.ingest(input.split_inclusive('\n'))
    }

    /// The public headers of the module, each joined to the root and
    /// terminated with a newline, in declaration order.
    ///
    /// Re-evaluates the document on every call; empty before ingestion.
    pub fn headers(&self) -> Result<Vec<String>> {
        let document = match &self.document {
            Some(document) => document,
            None => {
                warn!("headers requested before anything was ingested");
                return Ok(Vec::new());
            }
        };

        let filter = HeaderFilter::new(&self.private_filters(document)?)?;
        let mut evaluator = Evaluator::new(document);
        let mut headers = Vec::new();

        for block in self.module_blocks(document, ParameterBlock::is_source) {
            for value in &block.values {
                for name in evaluator.evaluate(value)? {
                    if filter.accepts(&name) {
                        let path = self.resolve(&name);
                        trace!("public header {}", path);
                        headers.push(format!("{}\n", path));
                    }
                }
            }
        }

        Ok(headers)
    }

    /// Parameter blocks of calls growing our module that pass `test`.
    fn module_blocks<'a>(
        &'a self,
        document: &'a Document,
        test: fn(&ParameterBlock) -> bool,
    ) -> impl Iterator<Item = &'a ParameterBlock> + 'a {
        document
            .module_calls(&self.module)
            .flat_map(|call| call.parameter_blocks())
            .filter(move |block| test(block))
    }

    /// Regexes named in PRIVATE_HEADER_FILTERS blocks of our module.
    fn private_filters(&self, document: &Document) -> Result<Vec<String>> {
        let mut patterns = Vec::new();
        for block in self.module_blocks(document, ParameterBlock::is_private_filter) {
            for value in &block.values {
                match value {
                    Node::Token(token) if token.token_type == TokenType::Punct => {
                        patterns.push(token.lexeme.clone());
                    }
                    Node::Token(token) if token.token_type == TokenType::String => {
                        patterns.push(token.contents());
                    }
                    other => {
                        return Err(ParseError::invalid_private_filter(other.text(), block.text())
                            .at(other.position()));
                    }
                }
            }
        }
        Ok(patterns)
    }

    /// Join a name to the root, dropping `.` components.
    fn resolve(&self, name: &str) -> String {
        let path: PathBuf = self
            .root
            .join(name)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    fn headers(module: &str, root: &str, input: &str) -> Result<Vec<String>> {
        let mut scanner = CMakeScanner::new(module, root);
        scanner.ingest_str(input)?;
        scanner.headers()
    }

    #[test]
    fn test_simple_sources() {
        let found = headers(
            "Core",
            "src/corelib",
            "qt_internal_add_module(Core SOURCES foo.h bar_p.h sub/baz.h)\n",
        )
        .unwrap();
        assert_eq!(found, vec!["src/corelib/foo.h\n", "src/corelib/sub/baz.h\n"]);
    }

    #[test]
    fn test_other_modules_ignored() {
        let found = headers(
            "Core",
            "src",
            "qt_internal_add_module(Gui SOURCES gui.h)\nqt_internal_extend_target(Core SOURCES core.h)\n",
        )
        .unwrap();
        assert_eq!(found, vec!["src/core.h\n"]);
    }

    #[test]
    fn test_root_dot_components() {
        assert_eq!(headers("Core", ".", "qt_internal_add_module(Core SOURCES ./a.h)").unwrap(), vec!["a.h\n"]);
        assert_eq!(headers("Core", "", "qt_internal_add_module(Core SOURCES a.h)").unwrap(), vec!["a.h\n"]);
    }

    #[test]
    fn test_non_literal_private_filter() {
        let err = headers(
            "Core",
            "src",
            "qt_internal_add_module(Core SOURCES a.h PRIVATE_HEADER_FILTERS foo)",
        )
        .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPrivateFilter);
    }

    #[test]
    fn test_headers_before_ingest() {
        let scanner = CMakeScanner::new("Core", "src");
        assert!(scanner.headers().unwrap().is_empty());
        assert!(scanner.document().is_none());
    }

    #[test]
    fn test_ingest_from_lines() {
        let lines = vec![
            "qt_internal_add_module(Core\n".to_string(),
            "    SOURCES\n".to_string(),
            "        global/qglobal.h # the big one\n".to_string(),
            ")\n".to_string(),
        ];
        let mut scanner = CMakeScanner::new("Core", "src/corelib");
        scanner.ingest(lines).unwrap();
        assert_eq!(scanner.headers().unwrap(), vec!["src/corelib/global/qglobal.h\n"]);
    }
}
