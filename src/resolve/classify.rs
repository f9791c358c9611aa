use std::path::Path;

use crate::config::NavConfig;

use super::paths;

/// Which resolver, if any, should handle a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    ModelLookup,
    RouteLookup,
    NoMatch,
}

/// Decide from surface text alone; never reads or parses anything.
/// Rules are tried in order and the first match wins.
pub fn classify(config: &NavConfig, path: &Path, word: &str, line_text: &str) -> Classification {
    if word.ends_with(&config.model_suffix)
        && line_text.contains(&config.self_token)
        && paths::has_segment(path, &config.controllers_segment)
    {
        return Classification::ModelLookup;
    }

    if paths::ends_with_segments(path, &config.route_file) {
        return Classification::RouteLookup;
    }

    Classification::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER: &str = "/proj/app/controllers/UserController.js";
    const ROUTES: &str = "/proj/routes/api.js";

    fn run(path: &str, word: &str, line: &str) -> Classification {
        classify(&NavConfig::default(), Path::new(path), word, line)
    }

    #[test]
    fn test_model_lookup() {
        assert_eq!(
            run(CONTROLLER, "userModel", "    return this.userModel.all();"),
            Classification::ModelLookup
        );
    }

    #[test]
    fn test_model_lookup_requires_every_condition() {
        // No self-reference on the line.
        assert_eq!(
            run(CONTROLLER, "userModel", "const userModel = build();"),
            Classification::NoMatch
        );
        // Wrong suffix.
        assert_eq!(
            run(CONTROLLER, "userService", "this.userService.go();"),
            Classification::NoMatch
        );
        // Not under a controllers directory.
        assert_eq!(
            run("/proj/app/services/UserService.js", "userModel", "this.userModel"),
            Classification::NoMatch
        );
    }

    #[test]
    fn test_route_lookup_any_separator() {
        assert_eq!(
            run(ROUTES, "getHealth", r#"handler: [Health, "getHealth"]"#),
            Classification::RouteLookup
        );
        assert_eq!(
            run(r"C:\proj\routes\api.js", "Health", ""),
            Classification::RouteLookup
        );
    }

    #[test]
    fn test_model_rule_wins_over_route_rule() {
        // A route file that also sits under a controllers directory.
        assert_eq!(
            run("/proj/controllers/routes/api.js", "userModel", "this.userModel"),
            Classification::ModelLookup
        );
    }

    #[test]
    fn test_unrelated_word() {
        assert_eq!(
            run("/proj/app/lib/util.js", "counter", "let counter = 0;"),
            Classification::NoMatch
        );
    }
}
