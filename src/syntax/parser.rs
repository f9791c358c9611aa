use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

use super::languages::Dialect;

/// Why a source text could not be turned into a usable tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("{dialect} grammar could not be loaded: {reason}")]
    Grammar {
        dialect: &'static str,
        reason: String,
    },

    #[error("{dialect} parser produced no tree")]
    NoTree { dialect: &'static str },

    /// One-based line and column of the first erroneous node.
    #[error("syntax error at {line}:{column}")]
    Syntax { line: usize, column: usize },
}

/// A successfully parsed, error-free syntax tree.
pub struct SyntaxTree {
    tree: Tree,
    dialect: Dialect,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("dialect", &self.dialect)
            .field("root", &self.root().kind())
            .finish()
    }
}

/// Parse `source` with the grammar of `dialect`.
///
/// Tree-sitter recovers from errors by inserting `ERROR`/`MISSING` nodes;
/// any such node makes the whole parse a [`ParseFailure::Syntax`].
pub fn parse(source: &str, dialect: Dialect) -> Result<SyntaxTree, ParseFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseFailure::Grammar {
            dialect: dialect.name(),
            reason: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or(ParseFailure::NoTree {
            dialect: dialect.name(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error_node(root).unwrap_or(root);
        let pos = bad.start_position();
        return Err(ParseFailure::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    Ok(SyntaxTree { tree, dialect })
}

fn first_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error_node(child) {
                return Some(found);
            }
        }
    }
    None
}
