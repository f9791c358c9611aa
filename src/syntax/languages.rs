use std::path::Path;

use tree_sitter::Language;

/// Grammar a source file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JavaScript,
    /// JavaScript or TypeScript with optional type annotations.
    TypeScript,
    Tsx,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Dialect::JavaScript => "javascript",
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }

    pub fn language(self) -> Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    pub fn get_by_extension(ext: &str) -> Option<Dialect> {
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Some(Dialect::JavaScript),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Dialect for a file's own extension, falling back to plain JavaScript.
    pub fn for_path(path: &Path) -> Dialect {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::get_by_extension)
            .unwrap_or(Dialect::JavaScript)
    }

    /// Like [`Dialect::for_path`], but accepts type annotations in `.js`
    /// files too. Used for the document a request originates from.
    pub fn annotated_for_path(path: &Path) -> Dialect {
        match Self::for_path(path) {
            Dialect::JavaScript => Dialect::TypeScript,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_by_extension() {
        assert_eq!(Dialect::get_by_extension("js"), Some(Dialect::JavaScript));
        assert_eq!(Dialect::get_by_extension("mts"), Some(Dialect::TypeScript));
        assert_eq!(Dialect::get_by_extension("tsx"), Some(Dialect::Tsx));
        assert_eq!(Dialect::get_by_extension("py"), None);
    }

    #[test]
    fn test_annotated_dialect() {
        assert_eq!(
            Dialect::annotated_for_path(Path::new("routes/api.js")),
            Dialect::TypeScript
        );
        assert_eq!(
            Dialect::annotated_for_path(Path::new("view.tsx")),
            Dialect::Tsx
        );
        assert_eq!(
            Dialect::for_path(Path::new("config/app")),
            Dialect::JavaScript
        );
    }
}
