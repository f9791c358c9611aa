/// Detect whether a workspace is a uisap/core project by reading its
/// `package.json`.
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameworkStatus {
    /// The package is a declared dependency; `version` is its version range.
    Detected { version: String },
    NotDetected,
    /// `package.json` exists but could not be read or parsed.
    Unreadable { reason: String },
}

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: Map<String, Value>,
}

pub fn detect_framework(root: &Path, package: &str) -> FrameworkStatus {
    let manifest = root.join("package.json");
    if !manifest.is_file() {
        debug!(path = %manifest.display(), "no package.json");
        return FrameworkStatus::NotDetected;
    }

    let parsed = std::fs::read_to_string(&manifest)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_str::<PackageJson>(&data).map_err(|e| e.to_string()));

    match parsed {
        Ok(pkg) => match pkg.dependencies.get(package) {
            Some(version) => FrameworkStatus::Detected {
                version: version.as_str().unwrap_or_default().to_string(),
            },
            None => FrameworkStatus::NotDetected,
        },
        Err(reason) => {
            warn!(path = %manifest.display(), error = %reason, "failed to read package.json");
            FrameworkStatus::Unreadable { reason }
        }
    }
}
