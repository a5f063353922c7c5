//! tree-sitter wrapper used by the signature extraction passes.

use std::path::Path;

use tree_sitter::{Node, Tree};

use crate::errors::{LabstubError, LabstubResult};

/// Parsed Python source unit. Holds the source so node text can be sliced.
pub struct ParsedSource {
    pub path: String,
    pub source: String,
    pub tree: Tree,
}

impl ParsedSource {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        node_text(node, &self.source)
    }
}

/// Slice the source text covered by `node`.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Parse Python source. A tree containing error or missing nodes is a
/// parse failure; no partial result is returned.
pub fn parse_source(source: &str, path: &str) -> LabstubResult<ParsedSource> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| LabstubError::Parse {
            path: path.to_string(),
            message: format!("Failed to set language: {e}"),
        })?;

    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| LabstubError::Parse {
            path: path.to_string(),
            message: "parser returned no tree".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error_position(root)
            .map(|p| (p.row + 1, p.column + 1))
            .unwrap_or((1, 1));
        return Err(LabstubError::Parse {
            path: path.to_string(),
            message: format!("invalid syntax at line {line}, column {column}"),
        });
    }

    Ok(ParsedSource {
        path: path.to_string(),
        source: source.to_string(),
        tree,
    })
}

/// Read and parse a file. A missing file yields `Ok(None)`.
pub fn parse_file(path: &Path) -> LabstubResult<Option<ParsedSource>> {
    if !path.exists() {
        return Ok(None);
    }
    let source = std::fs::read_to_string(path)?;
    parse_source(&source, &path.to_string_lossy()).map(Some)
}

fn first_error_position(node: Node<'_>) -> Option<tree_sitter::Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(point) = first_error_position(child) {
                return Some(point);
            }
        }
    }
    None
}
