/// Navigation orchestrator: the single entry point a host calls.
///
/// Extracts the clicked word, classifies the request, and dispatches to the
/// model or route resolver. Every failure is logged and collapses to `None`.
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, info, info_span, warn};

use crate::config::NavConfig;
use crate::document::{Position, SourceDocument, WordSpan};
use crate::resolve::classify::{Classification, classify};
use crate::resolve::{NavigationResult, ResolveContext, ResolveError, model, route};

/// A single definition request, built once and read-only thereafter.
#[derive(Debug, Clone)]
pub struct NavigationRequest<'a> {
    pub document: &'a SourceDocument,
    pub position: Position,
    pub word: WordSpan,
    pub line_text: &'a str,
}

impl<'a> NavigationRequest<'a> {
    /// `None` when no identifier touches `position`.
    pub fn at(document: &'a SourceDocument, position: Position) -> Option<Self> {
        let word = document.word_at(position)?;
        let line_text = document.line_text(position.line).unwrap_or_default();
        Some(Self {
            document,
            position,
            word,
            line_text,
        })
    }

    pub fn classify(&self, config: &NavConfig) -> Classification {
        classify(config, self.document.path(), &self.word.text, self.line_text)
    }
}

#[derive(Clone)]
pub struct Navigator {
    config: Arc<NavConfig>,
    dispatch: Option<Dispatch>,
}

impl Navigator {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config: Arc::new(config),
            dispatch: None,
        }
    }

    /// Route this navigator's diagnostics to `dispatch` instead of the
    /// global default subscriber.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Resolve the definition of the word at `position`, or `None`.
    ///
    /// Requests share no state; the same request against an unchanged file
    /// system always produces the same answer. `cancel` is checked between
    /// phases and a cancelled request yields `None`.
    pub async fn provide_definition(
        &self,
        document: &SourceDocument,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<NavigationResult> {
        let request = async {
            info_span!(
                "provide_definition",
                path = %document.path().display(),
                line = position.line,
                character = position.character,
            )
            .in_scope(|| self.resolve(document, position, cancel))
        };

        match &self.dispatch {
            Some(dispatch) => request.with_subscriber(dispatch.clone()).await,
            None => request.await,
        }
    }

    fn resolve(
        &self,
        document: &SourceDocument,
        position: Position,
        cancel: &CancellationToken,
    ) -> Option<NavigationResult> {
        if cancel.is_cancelled() {
            debug!("request cancelled before start");
            return None;
        }

        let Some(request) = NavigationRequest::at(document, position) else {
            debug!("no word at position");
            return None;
        };
        debug!(word = %request.word.text, "word clicked");

        let ctx = ResolveContext {
            config: &self.config,
            cancel,
        };
        let outcome = match request.classify(&self.config) {
            Classification::ModelLookup => {
                debug!("handling model navigation");
                model::resolve_model(&ctx, request.document, &request.word)
            }
            Classification::RouteLookup => {
                debug!("handling route navigation");
                route::resolve_route(&ctx, request.document, request.position, &request.word)
            }
            Classification::NoMatch => {
                debug!("no navigation rule matched");
                return None;
            }
        };

        match outcome {
            Ok(result) => {
                info!(
                    target_file = %result.target_file.display(),
                    line = result.target.start.line,
                    character = result.target.start.character,
                    specificity = ?result.specificity,
                    "resolved definition"
                );
                Some(result)
            }
            Err(
                e @ (ResolveError::Parse { .. } | ResolveError::Io { .. } | ResolveError::Query(_)),
            ) => {
                warn!(error = %e, "definition lookup failed");
                None
            }
            Err(e) => {
                debug!(error = %e, "no definition");
                None
            }
        }
    }
}
