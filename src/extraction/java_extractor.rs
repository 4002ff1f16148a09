/// Tree-sitter based Java fact extractor.
///
/// Reports the package declaration and the import declarations of a
/// compilation unit. Type bodies are not visited.
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser, Tree};

use crate::errors::{ImportGraphError, Result};
use crate::extraction::FactExtractor;
use crate::types::Fact;

/// Extracts package and import facts from Java source files.
pub struct JavaExtractor;

impl FactExtractor for JavaExtractor {
    fn extensions(&self) -> &[&str] {
        &["java"]
    }

    fn language_name(&self) -> &str {
        "Java"
    }

    fn facts(&self, file_path: &Path, source: &str) -> Result<Vec<Fact>> {
        let tree = Self::parse_source(source).map_err(|message| ImportGraphError::Extraction {
            message,
            path: file_path.display().to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match Self::first_error(root) {
                Some(node) => format!(
                    "syntax error at line {}, column {}",
                    node.start_position().row + 1,
                    node.start_position().column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(ImportGraphError::Extraction {
                message,
                path: file_path.display().to_string(),
            });
        }

        let source = source.as_bytes();
        let mut facts = Vec::new();
        let mut cursor = root.walk();
        if cursor.goto_first_child() {
            loop {
                if let Some(fact) = Self::visit_node(cursor.node(), source) {
                    facts.push(fact);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        Ok(facts)
    }
}

impl JavaExtractor {
    /// Parse source code into a tree-sitter AST.
    fn parse_source(source: &str) -> std::result::Result<Tree, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| format!("failed to load Java grammar: {e}"))?;
        parser
            .parse(source, None)
            .ok_or_else(|| "tree-sitter parse returned None".to_string())
    }

    /// Turns a top-level declaration into a fact, if it is one we track.
    fn visit_node(node: TsNode<'_>, source: &[u8]) -> Option<Fact> {
        match node.kind() {
            "package_declaration" => Self::declared_name(node, source).map(Fact::Package),
            "import_declaration" => Self::declared_name(node, source).map(Fact::Import),
            _ => None,
        }
    }

    /// Returns the dotted name of a package or import declaration.
    ///
    /// For `import java.util.*;` this is `java.util`; for
    /// `import static java.lang.Math.PI;` it is `java.lang.Math.PI`.
    fn declared_name(node: TsNode<'_>, source: &[u8]) -> Option<String> {
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if matches!(child.kind(), "identifier" | "scoped_identifier") {
                    return child
                        .utf8_text(source)
                        .ok()
                        .map(|text| text.split_whitespace().collect());
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        None
    }

    /// Finds the first error or missing node in document order.
    fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if child.has_error() {
                    if let Some(found) = Self::first_error(child) {
                        return Some(found);
                    }
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        None
    }
}
