/// Configuration module for uisap-nav.
///
/// Every framework convention the resolvers rely on (suffixes, file names,
/// directory layout, route call shape) lives here with a default that matches
/// a stock uisap/core project.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ── Default value functions ──────────────────────────────────────────

fn default_model_suffix() -> String {
    "Model".to_string()
}

fn default_self_token() -> String {
    "this.".to_string()
}

fn default_controllers_segment() -> String {
    "controllers".to_string()
}

fn default_injection_receiver() -> String {
    "this".to_string()
}

fn default_injection_method() -> String {
    "resolve".to_string()
}

fn default_route_file() -> String {
    "routes/api.js".to_string()
}

fn default_route_namespace() -> String {
    "fastify".to_string()
}

fn default_route_object() -> String {
    "Route".to_string()
}

fn default_http_verbs() -> Vec<String> {
    ["get", "post", "put", "delete", "patch"]
        .iter()
        .map(|v| v.to_string())
        .collect()
}

fn default_handler_property() -> String {
    "handler".to_string()
}

fn default_project_root_depth() -> usize {
    3
}

fn default_config_file() -> String {
    "config/app.js".to_string()
}

fn default_models_dir_property() -> String {
    "modelsDir".to_string()
}

fn default_models_dir() -> String {
    "app/models".to_string()
}

fn default_source_extension() -> String {
    "js".to_string()
}

fn default_framework_package() -> String {
    "@uisap/core".to_string()
}

// ── Config struct ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NavConfig {
    /// Suffix that marks a clicked word as a model reference (`userModel`).
    #[serde(default = "default_model_suffix")]
    pub model_suffix: String,

    /// Token the clicked line must contain for a model lookup.
    #[serde(default = "default_self_token")]
    pub self_token: String,

    /// Path segment that identifies controller files.
    #[serde(default = "default_controllers_segment")]
    pub controllers_segment: String,

    #[serde(default = "default_injection_receiver")]
    pub injection_receiver: String,

    #[serde(default = "default_injection_method")]
    pub injection_method: String,

    /// Trailing path of the route-definition file, `/`-separated.
    #[serde(default = "default_route_file")]
    pub route_file: String,

    #[serde(default = "default_route_namespace")]
    pub route_namespace: String,

    #[serde(default = "default_route_object")]
    pub route_object: String,

    #[serde(default = "default_http_verbs")]
    pub http_verbs: Vec<String>,

    #[serde(default = "default_handler_property")]
    pub handler_property: String,

    /// Directory levels between a controller file and the project root.
    #[serde(default = "default_project_root_depth")]
    pub project_root_depth: usize,

    /// Project configuration file, relative to the project root.
    #[serde(default = "default_config_file")]
    pub config_file: String,

    #[serde(default = "default_models_dir_property")]
    pub models_dir_property: String,

    /// Models directory used when the project configuration has no override.
    #[serde(default = "default_models_dir")]
    pub default_models_dir: String,

    /// Extension (without dot) appended to model names and bare import specifiers.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// npm package whose presence in `package.json` marks a uisap/core project.
    #[serde(default = "default_framework_package")]
    pub framework_package: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            model_suffix: default_model_suffix(),
            self_token: default_self_token(),
            controllers_segment: default_controllers_segment(),
            injection_receiver: default_injection_receiver(),
            injection_method: default_injection_method(),
            route_file: default_route_file(),
            route_namespace: default_route_namespace(),
            route_object: default_route_object(),
            http_verbs: default_http_verbs(),
            handler_property: default_handler_property(),
            project_root_depth: default_project_root_depth(),
            config_file: default_config_file(),
            models_dir_property: default_models_dir_property(),
            default_models_dir: default_models_dir(),
            source_extension: default_source_extension(),
            framework_package: default_framework_package(),
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

impl NavConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file or invalid JSON yields the defaults; only an unreadable
    /// existing file is an error.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("{} not found, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;

        let cfg: NavConfig = match serde_json::from_str(&data) {
            Ok(c) => c,
            Err(e) => {
                warn!("Invalid JSON in {}: {e}", config_path.display());
                warn!("Using default configuration");
                return Ok(Self::default());
            }
        };

        info!("Loaded configuration from {}", config_path.display());
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.model_suffix.is_empty(), "model_suffix must not be empty");
        anyhow::ensure!(!self.route_file.is_empty(), "route_file must not be empty");
        anyhow::ensure!(
            !self.http_verbs.is_empty(),
            "at least one HTTP verb must be specified"
        );
        anyhow::ensure!(
            !self.source_extension.is_empty(),
            "source_extension must not be empty"
        );
        anyhow::ensure!(
            self.project_root_depth > 0,
            "project_root_depth must be positive"
        );
        Ok(())
    }

    /// Extension as a dotted suffix, e.g. `.js`.
    #[must_use]
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.source_extension.trim_start_matches('.'))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
