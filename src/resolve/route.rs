use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{Position, SourceDocument, WordSpan};
use crate::syntax::languages::Dialect;
use crate::syntax::query::{self, RouteCallShape, RouteHandlerBinding};
use crate::syntax::parser;

use super::{NavigationResult, ResolveContext, ResolveError, paths, read_source};

/// A route-file import resolved to the controller file it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local_name: String,
    pub resolved_path: PathBuf,
}

/// Resolve a word inside a route handler array to the controller file or
/// to the handler method's declaration.
pub fn resolve_route(
    ctx: &ResolveContext<'_>,
    document: &SourceDocument,
    position: Position,
    word: &WordSpan,
) -> Result<NavigationResult, ResolveError> {
    let dialect = Dialect::annotated_for_path(document.path());
    let tree = parser::parse(document.text(), dialect).map_err(|source| ResolveError::Parse {
        path: document.path().to_path_buf(),
        source,
    })?;
    ctx.check_cancelled()?;

    let handler = handler_at(ctx, document, tree.root(), position)?;
    debug!(
        controller = %handler.controller,
        method = %handler.method,
        verb = %handler.verb,
        "found route handler"
    );

    let import = import_for(ctx, document, tree.root(), &handler.controller)?;
    ctx.check_cancelled()?;
    if !import.resolved_path.is_file() {
        return Err(ResolveError::NotFound(import.resolved_path));
    }
    debug!(path = %import.resolved_path.display(), "found controller file");

    if !handler.method.is_empty() && word.text == handler.method {
        let at = method_position(ctx, &import.resolved_path, &handler.method)?;
        return Ok(NavigationResult::symbol(word, import.resolved_path, at));
    }

    if word.text == handler.controller || handler.method.is_empty() {
        return Ok(NavigationResult::file_start(word, import.resolved_path));
    }

    Err(ResolveError::NoMatch(format!(
        "{} names neither {} nor {}",
        word.text, handler.controller, handler.method
    )))
}

/// The handler array enclosing `position`. When arrays nest, the innermost wins.
fn handler_at(
    ctx: &ResolveContext<'_>,
    document: &SourceDocument,
    root: tree_sitter::Node<'_>,
    position: Position,
) -> Result<RouteHandlerBinding, ResolveError> {
    let config = ctx.config;
    let shape = RouteCallShape {
        namespace: &config.route_namespace,
        object: &config.route_object,
        verbs: &config.http_verbs,
        handler_property: &config.handler_property,
    };

    query::route_handlers(root, document.text(), &shape)
        .into_iter()
        .filter(|binding| {
            document
                .byte_range(binding.span.start, binding.span.end)
                .contains(position)
        })
        .min_by_key(|binding| binding.span.len())
        .ok_or_else(|| {
            ResolveError::NoMatch(format!(
                "no {}.{} handler array at {}:{}",
                config.route_namespace, config.route_object, position.line, position.character
            ))
        })
}

fn import_for(
    ctx: &ResolveContext<'_>,
    document: &SourceDocument,
    root: tree_sitter::Node<'_>,
    controller: &str,
) -> Result<ImportBinding, ResolveError> {
    let import = query::import_binding(root, document.text(), controller)
        .ok_or_else(|| ResolveError::NoMatch(format!("no import binds {controller}")))?;
    Ok(ImportBinding {
        resolved_path: paths::resolve_specifier(
            document.path(),
            &import.specifier,
            &ctx.config.source_extension,
        ),
        local_name: import.local_name,
    })
}

/// Start of the first class method named `method` in `path`.
fn method_position(
    ctx: &ResolveContext<'_>,
    path: &Path,
    method: &str,
) -> Result<Position, ResolveError> {
    let source = read_source(path)?;
    let dialect = Dialect::annotated_for_path(path);
    let tree = parser::parse(&source, dialect).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    ctx.check_cancelled()?;

    let decl = query::class_methods(tree.root(), &source, &dialect.language())?
        .into_iter()
        .find(|m| m.name == method)
        .ok_or_else(|| {
            ResolveError::NoMatch(format!("no method {method} in {}", path.display()))
        })?;

    Ok(SourceDocument::new(path, source).offset_to_position(decl.span.start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;
    use crate::resolve::Specificity;
    use std::fs;
    use tokio_util::sync::CancellationToken;

    const ROUTES: &str = r#"import SystemHealthController from "./controllers/health.js";

fastify.Route.get("/health", { handler: [SystemHealthController, "getHealth"] });
"#;

    const HEALTH: &str = r#"export default class SystemHealthController {
    constructor() {}

    getHealth(req, reply) {
        return reply.send({ ok: true });
    }
}
"#;

    fn setup() -> (tempfile::TempDir, SourceDocument) {
        let dir = tempfile::tempdir().unwrap();
        let routes_dir = dir.path().join("routes");
        fs::create_dir_all(routes_dir.join("controllers")).unwrap();
        fs::write(routes_dir.join("api.js"), ROUTES).unwrap();
        fs::write(routes_dir.join("controllers/health.js"), HEALTH).unwrap();
        let doc = SourceDocument::read(&routes_dir.join("api.js")).unwrap();
        (dir, doc)
    }

    fn resolve_at(doc: &SourceDocument, pos: Position) -> Result<NavigationResult, ResolveError> {
        let config = NavConfig::default();
        let cancel = CancellationToken::new();
        let ctx = ResolveContext { config: &config, cancel: &cancel };
        let word = doc.word_at(pos).unwrap();
        resolve_route(&ctx, doc, pos, &word)
    }

    #[test]
    fn test_method_word_jumps_to_declaration() {
        let (_dir, doc) = setup();
        // "getHealth" inside the handler array.
        let result = resolve_at(&doc, Position::new(2, 68)).unwrap();
        assert!(result.target_file.ends_with("routes/controllers/health.js"));
        assert_eq!(result.target.start, Position::new(3, 4));
        assert_eq!(result.target.start, result.target.end);
        assert_eq!(result.specificity, Specificity::Symbol);
    }

    #[test]
    fn test_controller_word_jumps_to_file_start() {
        let (_dir, doc) = setup();
        let result = resolve_at(&doc, Position::new(2, 45)).unwrap();
        assert!(result.target_file.ends_with("routes/controllers/health.js"));
        assert_eq!(result.target.start, Position::ZERO);
        assert_eq!(result.specificity, Specificity::File);
    }

    #[test]
    fn test_outside_handler_array_is_no_match() {
        let (_dir, doc) = setup();
        // "fastify" at the start of the registration line.
        let err = resolve_at(&doc, Position::new(2, 2)).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch(_)));
    }

    #[test]
    fn test_missing_method_is_no_match() {
        let (dir, doc) = setup();
        fs::write(
            dir.path().join("routes/controllers/health.js"),
            "export default class SystemHealthController {}\n",
        )
        .unwrap();
        let err = resolve_at(&doc, Position::new(2, 68)).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch(_)));
    }

    #[test]
    fn test_missing_controller_file_is_not_found() {
        let (dir, doc) = setup();
        fs::remove_file(dir.path().join("routes/controllers/health.js")).unwrap();
        let err = resolve_at(&doc, Position::new(2, 45)).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[test]
    fn test_unimported_controller_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes/api.js");
        let doc = SourceDocument::new(
            &path,
            r#"fastify.Route.get("/a", { handler: [Ghost, "run"] });"#,
        );
        let err = resolve_at(&doc, Position::new(0, 37)).unwrap_err();
        assert!(matches!(err, ResolveError::NoMatch(_)));
    }
}
