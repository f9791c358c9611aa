use std::path::{Component, Path, PathBuf};

use crate::syntax::languages::Dialect;

/// Collapse `.` and `..` components without touching the file system.
/// A `..` at the root is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `base` joined with each segment, then normalized. Segments may contain
/// `/` themselves.
pub fn join_segments<S: AsRef<str>>(base: &Path, segments: &[S]) -> PathBuf {
    let mut joined = base.to_path_buf();
    for segment in segments {
        for part in segment.as_ref().split(['/', '\\']) {
            if !part.is_empty() {
                joined.push(part);
            }
        }
    }
    normalize(&joined)
}

/// The directory `levels` steps above `path`.
pub fn ascend(path: &Path, levels: usize) -> Option<PathBuf> {
    let mut current = path;
    for _ in 0..levels {
        current = current.parent()?;
    }
    Some(current.to_path_buf())
}

/// Path text with every `\` turned into `/`.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Whether the trailing components of `path` equal `suffix` (`/`-separated),
/// regardless of the separator style `path` was written with.
pub fn ends_with_segments(path: &Path, suffix: &str) -> bool {
    let path = to_slash(path);
    let wanted: Vec<&str> = suffix.split('/').filter(|s| !s.is_empty()).collect();
    if wanted.is_empty() {
        return false;
    }
    let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    actual.ends_with(&wanted)
}

/// Whether any directory component of `path` equals `segment`.
pub fn has_segment(path: &Path, segment: &str) -> bool {
    let path = to_slash(path);
    let mut parts: Vec<&str> = path.split('/').collect();
    parts.pop();
    parts.iter().any(|p| *p == segment)
}

/// Resolve an import specifier against the importing file's directory,
/// appending `.<extension>` when the specifier has no source extension.
pub fn resolve_specifier(importer: &Path, specifier: &str, extension: &str) -> PathBuf {
    let has_source_ext = Path::new(specifier)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Dialect::get_by_extension)
        .is_some();
    let specifier = if has_source_ext {
        specifier.to_string()
    } else {
        format!("{specifier}.{}", extension.trim_start_matches('.'))
    };
    let base = importer.parent().unwrap_or_else(|| Path::new(""));
    normalize(&base.join(specifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/proj/routes/../controllers/./health.js")),
            PathBuf::from("/proj/controllers/health.js")
        );
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_join_segments() {
        assert_eq!(
            join_segments(Path::new("/proj"), &["custom", "models"]),
            PathBuf::from("/proj/custom/models")
        );
        assert_eq!(
            join_segments(Path::new("/proj/config"), &["..", "src/models"]),
            PathBuf::from("/proj/src/models")
        );
    }

    #[test]
    fn test_ascend() {
        let p = Path::new("/proj/app/controllers/UserController.js");
        assert_eq!(ascend(p, 3), Some(PathBuf::from("/proj")));
        assert_eq!(ascend(Path::new("a.js"), 3), None);
    }

    #[test]
    fn test_ends_with_segments_any_separator() {
        assert!(ends_with_segments(Path::new("/proj/routes/api.js"), "routes/api.js"));
        assert!(ends_with_segments(Path::new(r"C:\proj\routes\api.js"), "routes/api.js"));
        assert!(!ends_with_segments(Path::new("/proj/myroutes/api.js"), "routes/api.js"));
        assert!(!ends_with_segments(Path::new("/proj/routes/api.json"), "routes/api.js"));
    }

    #[test]
    fn test_has_segment() {
        assert!(has_segment(Path::new("/proj/app/controllers/User.js"), "controllers"));
        assert!(!has_segment(Path::new("/proj/app/mycontrollers/User.js"), "controllers"));
        assert!(!has_segment(Path::new("/proj/app/controllers"), "controllers"));
    }

    #[test]
    fn test_resolve_specifier() {
        let route = Path::new("/proj/routes/api.js");
        assert_eq!(
            resolve_specifier(route, "./controllers/health.js", "js"),
            PathBuf::from("/proj/routes/controllers/health.js")
        );
        assert_eq!(
            resolve_specifier(route, "../app/controllers/health", "js"),
            PathBuf::from("/proj/app/controllers/health.js")
        );
        assert_eq!(
            resolve_specifier(route, "../app/health.controller", "js"),
            PathBuf::from("/proj/app/health.controller.js")
        );
        assert_eq!(
            resolve_specifier(route, "./health.ts", "js"),
            PathBuf::from("/proj/routes/health.ts")
        );
    }
}
