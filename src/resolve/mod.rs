/// Resolution of classified navigation requests to cross-file targets.
pub mod classify;
pub mod model;
pub mod paths;
pub mod route;

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::document::{Position, Range, WordSpan};
use crate::syntax::parser::ParseFailure;

/// Every way a resolution can come up empty. None of these reach the host;
/// the navigator logs them and answers "no definition".
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("parse failed for {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseFailure,
    },

    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("no matching binding: {0}")]
    NoMatch(String),

    #[error("ambiguous binding, candidates: {}", candidates.join(", "))]
    Ambiguous { candidates: Vec<String> },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid tree query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    #[error("request cancelled")]
    Cancelled,
}

/// How precisely a result pins down its target. Hosts merging answers from
/// several definition providers should prefer the higher value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Specificity {
    /// Start of the target file.
    File,
    /// A declaration inside the target file.
    Symbol,
}

impl Specificity {
    pub fn priority(self) -> u8 {
        match self {
            Specificity::File => 50,
            Specificity::Symbol => 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationResult {
    /// Span of the clicked word in the requesting document.
    pub origin: Range,
    pub target_file: PathBuf,
    pub target: Range,
    pub specificity: Specificity,
}

impl NavigationResult {
    /// Jump to the top of `target_file`.
    pub fn file_start(word: &WordSpan, target_file: PathBuf) -> Self {
        Self {
            origin: word.range,
            target_file,
            target: Range::point(Position::ZERO),
            specificity: Specificity::File,
        }
    }

    /// Jump to a declaration starting at `at`.
    pub fn symbol(word: &WordSpan, target_file: PathBuf, at: Position) -> Self {
        Self {
            origin: word.range,
            target_file,
            target: Range::point(at),
            specificity: Specificity::Symbol,
        }
    }

    pub fn priority(&self) -> u8 {
        self.specificity.priority()
    }
}

/// Per-request context handed to the resolvers.
pub struct ResolveContext<'a> {
    pub config: &'a crate::config::NavConfig,
    pub cancel: &'a tokio_util::sync::CancellationToken,
}

impl ResolveContext<'_> {
    pub fn check_cancelled(&self) -> Result<(), ResolveError> {
        if self.cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        Ok(())
    }
}

/// Read a file that a resolver has decided it needs.
pub(crate) fn read_source(path: &std::path::Path) -> Result<String, ResolveError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ResolveError::NotFound(path.to_path_buf())
        } else {
            ResolveError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_outranks_file() {
        assert!(Specificity::Symbol > Specificity::File);
        assert!(Specificity::Symbol.priority() > Specificity::File.priority());
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = ResolveError::Ambiguous {
            candidates: vec!["User".into(), "USER".into()],
        };
        assert_eq!(err.to_string(), "ambiguous binding, candidates: User, USER");
    }
}
