use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::{SourceDocument, WordSpan};
use crate::syntax::languages::Dialect;
use crate::syntax::{parser, query};

use super::{NavigationResult, ResolveContext, ResolveError, paths, read_source};

/// The injection call a clicked word refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinding {
    pub resolved_name: String,
}

/// Where a project keeps its models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub project_root: PathBuf,
    pub models_dir: PathBuf,
}

/// Resolve a `<name>Model` word in a controller to the model's source file.
pub fn resolve_model(
    ctx: &ResolveContext<'_>,
    document: &SourceDocument,
    word: &WordSpan,
) -> Result<NavigationResult, ResolveError> {
    let binding = find_model_binding(ctx, document, &word.text)?;
    debug!(model = %binding.resolved_name, word = %word.text, "found injected model");

    let layout = project_layout(ctx, document.path())?;
    debug!(
        root = %layout.project_root.display(),
        models_dir = %layout.models_dir.display(),
        "resolved project layout"
    );

    ctx.check_cancelled()?;
    let model_file = layout
        .models_dir
        .join(format!("{}{}", binding.resolved_name, ctx.config.dotted_extension()));
    if !model_file.is_file() {
        return Err(ResolveError::NotFound(model_file));
    }

    Ok(NavigationResult::file_start(word, model_file))
}

/// Name passed to the injection call whose derived word equals `word`.
///
/// Several calls naming the same model are fine; calls naming different
/// models that derive the same word are reported as ambiguous.
fn find_model_binding(
    ctx: &ResolveContext<'_>,
    document: &SourceDocument,
    word: &str,
) -> Result<ModelBinding, ResolveError> {
    let dialect = Dialect::annotated_for_path(document.path());
    let tree = parser::parse(document.text(), dialect).map_err(|source| ResolveError::Parse {
        path: document.path().to_path_buf(),
        source,
    })?;
    ctx.check_cancelled()?;

    let config = ctx.config;
    let mut candidates: Vec<String> = Vec::new();
    for call in query::injection_calls(
        tree.root(),
        document.text(),
        &config.injection_receiver,
        &config.injection_method,
    ) {
        let derived = format!("{}{}", call.name.to_lowercase(), config.model_suffix);
        if derived == word && !candidates.contains(&call.name) {
            candidates.push(call.name);
        }
    }

    match candidates.len() {
        0 => Err(ResolveError::NoMatch(format!(
            "no {}.{}() call derives {word}",
            config.injection_receiver, config.injection_method
        ))),
        1 => Ok(ModelBinding {
            resolved_name: candidates.remove(0),
        }),
        _ => Err(ResolveError::Ambiguous { candidates }),
    }
}

/// Project root and models directory for a controller file.
///
/// The project configuration file must exist. When it cannot be parsed, or
/// sets no models directory, the default directory is used.
pub fn project_layout(
    ctx: &ResolveContext<'_>,
    controller: &Path,
) -> Result<ProjectLayout, ResolveError> {
    let config = ctx.config;
    let project_root = paths::ascend(controller, config.project_root_depth).ok_or_else(|| {
        ResolveError::NoMatch(format!(
            "no directory {} levels above {}",
            config.project_root_depth,
            controller.display()
        ))
    })?;

    ctx.check_cancelled()?;
    let config_path = paths::join_segments(&project_root, &[config.config_file.as_str()]);
    if !config_path.is_file() {
        return Err(ResolveError::NotFound(config_path));
    }
    let config_source = read_source(&config_path)?;

    let default_dir =
        || paths::join_segments(&project_root, &[config.default_models_dir.as_str()]);
    let models_dir = match parser::parse(&config_source, Dialect::for_path(&config_path)) {
        Ok(tree) => {
            ctx.check_cancelled()?;
            let segments =
                query::join_call_segments(tree.root(), &config_source, &config.models_dir_property);
            match segments {
                Some(segments) => paths::join_segments(&project_root, &segments),
                None => default_dir(),
            }
        }
        Err(e) => {
            warn!(
                path = %config_path.display(),
                error = %e,
                "unparsable project config, using default models directory"
            );
            default_dir()
        }
    };

    Ok(ProjectLayout {
        project_root,
        models_dir,
    })
}
