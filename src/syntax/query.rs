//! Pattern matchers over JavaScript/TypeScript syntax trees.
//!
//! Each helper recognises one framework motif and returns plain data with
//! byte spans; converting spans to positions is left to the caller, which
//! owns the [`SourceDocument`](crate::document::SourceDocument).

use std::ops::Range as ByteRange;

use tree_sitter::{Language, Node, Query, QueryCursor, QueryError, StreamingIterator};

const CLASS_METHOD_QUERY: &str = r#"
(class_body
  (method_definition
    name: (property_identifier) @name) @method)
"#;

/// `<receiver>.<method>("Name")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionCall {
    pub name: String,
    pub span: ByteRange<usize>,
}

/// Shape of a route registration call: `<namespace>.<object>.<verb>(path, options)`.
#[derive(Debug, Clone)]
pub struct RouteCallShape<'a> {
    pub namespace: &'a str,
    pub object: &'a str,
    pub verbs: &'a [String],
    pub handler_property: &'a str,
}

/// `handler: [Controller, "method"]` found inside a route registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandlerBinding {
    pub controller: String,
    pub method: String,
    pub verb: String,
    /// Span of the handler array, brackets included.
    pub span: ByteRange<usize>,
}

/// An import declaration binding a local name to a module specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    pub local_name: String,
    pub specifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub span: ByteRange<usize>,
}

/// Every injection call of the form `<receiver>.<method>("...")`, in source order.
pub fn injection_calls(
    root: Node<'_>,
    source: &str,
    receiver: &str,
    method: &str,
) -> Vec<InjectionCall> {
    let mut calls = Vec::new();
    for_each_node(root, |node| {
        if node.kind() != "call_expression" {
            return;
        }
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };
        let Some((object, property)) = member_object_and_property(callee, source) else {
            return;
        };
        if !matches!(object.kind(), "this" | "identifier")
            || node_text(object, source) != receiver
        {
            return;
        }
        if property != method {
            return;
        }
        let Some(name) = call_arguments(node)
            .first()
            .and_then(|arg| string_literal_value(*arg, source))
        else {
            return;
        };
        calls.push(InjectionCall {
            name,
            span: node.byte_range(),
        });
    });
    calls
}

/// Every route registration whose options object carries a well-formed
/// handler array, in source order.
pub fn route_handlers(
    root: Node<'_>,
    source: &str,
    shape: &RouteCallShape<'_>,
) -> Vec<RouteHandlerBinding> {
    let mut bindings = Vec::new();
    for_each_node(root, |node| {
        if node.kind() != "call_expression" {
            return;
        }
        if let Some(binding) = route_handler_from_call(node, source, shape) {
            bindings.push(binding);
        }
    });
    bindings
}

fn route_handler_from_call(
    node: Node<'_>,
    source: &str,
    shape: &RouteCallShape<'_>,
) -> Option<RouteHandlerBinding> {
    let callee = node.child_by_field_name("function")?;
    let (route_object, verb) = member_object_and_property(callee, source)?;
    if !shape.verbs.iter().any(|v| *v == verb) {
        return None;
    }
    let (namespace, object_name) = member_object_and_property(route_object, source)?;
    if object_name != shape.object {
        return None;
    }
    if namespace.kind() != "identifier" || node_text(namespace, source) != shape.namespace {
        return None;
    }

    let args = call_arguments(node);
    let options = args.get(1)?;
    if options.kind() != "object" {
        return None;
    }
    let handler = object_property_value(*options, shape.handler_property, source)?;
    if handler.kind() != "array" {
        return None;
    }
    let elements = named_children(handler);
    let [controller, method] = elements.as_slice() else {
        return None;
    };
    if controller.kind() != "identifier" {
        return None;
    }
    let method = string_literal_value(*method, source)?;

    Some(RouteHandlerBinding {
        controller: node_text(*controller, source).to_string(),
        method,
        verb: verb.to_string(),
        span: handler.byte_range(),
    })
}

/// The import that binds `local_name`, covering default, namespace and
/// named (possibly aliased) specifiers.
pub fn import_binding(root: Node<'_>, source: &str, local_name: &str) -> Option<ImportSpecifier> {
    let mut found = None;
    for_each_node(root, |node| {
        if found.is_some() || node.kind() != "import_statement" {
            return;
        }
        let Some(source_node) = node.child_by_field_name("source") else {
            return;
        };
        let Some(specifier) = string_literal_value(source_node, source) else {
            return;
        };
        if import_local_names(node, source).iter().any(|n| *n == local_name) {
            found = Some(ImportSpecifier {
                local_name: local_name.to_string(),
                specifier,
            });
        }
    });
    found
}

fn import_local_names<'s>(import: Node<'_>, source: &'s str) -> Vec<&'s str> {
    let mut names = Vec::new();
    for clause in named_children(import) {
        if clause.kind() != "import_clause" {
            continue;
        }
        for part in named_children(clause) {
            match part.kind() {
                "identifier" => names.push(node_text(part, source)),
                "namespace_import" => {
                    if let Some(ident) = named_children(part)
                        .into_iter()
                        .find(|c| c.kind() == "identifier")
                    {
                        names.push(node_text(ident, source));
                    }
                }
                "named_imports" => {
                    for spec in named_children(part) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        let local = spec
                            .child_by_field_name("alias")
                            .or_else(|| spec.child_by_field_name("name"));
                        if let Some(local) = local {
                            names.push(node_text(local, source));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    names
}

/// Methods declared directly in a class body, in source order. Private
/// (`#name`) and computed names are not included.
pub fn class_methods(
    root: Node<'_>,
    source: &str,
    language: &Language,
) -> Result<Vec<MethodDecl>, QueryError> {
    let query = Query::new(language, CLASS_METHOD_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut methods = Vec::new();

    let mut matches = cursor.matches(&query, root, source.as_bytes());
    while let Some(m) = matches.next() {
        let mut name = None;
        let mut span = None;
        for cap in m.captures {
            match query.capture_names()[cap.index as usize] {
                "name" => name = Some(node_text(cap.node, source).to_string()),
                "method" => span = Some(cap.node.byte_range()),
                _ => {}
            }
        }
        if let (Some(name), Some(span)) = (name, span) {
            methods.push(MethodDecl { name, span });
        }
    }

    Ok(methods)
}

/// Arguments of the last `join(...)` call assigned to `property` in an
/// object literal or class field. `None` unless every argument of that call
/// is a string literal.
pub fn join_call_segments(root: Node<'_>, source: &str, property: &str) -> Option<Vec<String>> {
    let mut segments = None;
    for_each_node(root, |node| {
        let value = match node.kind() {
            "pair" => {
                let key_matches = node
                    .child_by_field_name("key")
                    .and_then(|k| property_key_name(k, source))
                    .is_some_and(|k| k == property);
                if !key_matches {
                    return;
                }
                node.child_by_field_name("value")
            }
            "field_definition" | "public_field_definition" => {
                let key = node
                    .child_by_field_name("property")
                    .or_else(|| node.child_by_field_name("name"));
                let key_matches = key
                    .and_then(|k| property_key_name(k, source))
                    .is_some_and(|k| k == property);
                if !key_matches {
                    return;
                }
                node.child_by_field_name("value")
            }
            _ => return,
        };
        let Some(value) = value else {
            return;
        };
        if value.kind() != "call_expression" || !is_join_callee(value, source) {
            return;
        }
        // A join with any non-literal argument (`__dirname`, a variable)
        // cannot be resolved lexically and yields no override.
        segments = call_arguments(value)
            .into_iter()
            .map(|arg| string_literal_value(arg, source))
            .collect::<Option<Vec<_>>>()
            .filter(|parts| !parts.is_empty());
    });
    segments
}

fn is_join_callee(call: Node<'_>, source: &str) -> bool {
    let Some(callee) = call.child_by_field_name("function") else {
        return false;
    };
    match callee.kind() {
        "identifier" => node_text(callee, source) == "join",
        _ => member_object_and_property(callee, source).is_some_and(|(_, p)| p == "join"),
    }
}

// ── Node helpers ─────────────────────────────────────────────────────

/// Pre-order traversal of every node under `root`, `root` included.
pub fn for_each_node<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Named children, comments excluded.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn call_arguments(node: Node<'_>) -> Vec<Node<'_>> {
    node.child_by_field_name("arguments")
        .map(named_children)
        .unwrap_or_default()
}

fn member_object_and_property<'t, 's>(
    node: Node<'t>,
    source: &'s str,
) -> Option<(Node<'t>, &'s str)> {
    if node.kind() != "member_expression" {
        return None;
    }
    let object = node.child_by_field_name("object")?;
    let property = node.child_by_field_name("property")?;
    Some((object, node_text(property, source)))
}

fn object_property_value<'t>(object: Node<'t>, key: &str, source: &str) -> Option<Node<'t>> {
    named_children(object).into_iter().find_map(|child| {
        if child.kind() != "pair" {
            return None;
        }
        let key_node = child.child_by_field_name("key")?;
        if property_key_name(key_node, source)? != key {
            return None;
        }
        child.child_by_field_name("value")
    })
}

fn property_key_name(key: Node<'_>, source: &str) -> Option<String> {
    match key.kind() {
        "property_identifier" | "identifier" => Some(node_text(key, source).to_string()),
        "string" => string_literal_value(key, source),
        _ => None,
    }
}

/// Value of a plain quoted string literal; template strings are rejected.
fn string_literal_value(node: Node<'_>, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    unquote_string_literal(node_text(node, source))
}

fn unquote_string_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() < 2 {
        return None;
    }
    let first = trimmed.chars().next()?;
    if (first == '"' || first == '\'') && trimmed.ends_with(first) {
        return Some(trimmed[1..trimmed.len() - 1].to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::languages::Dialect;
    use crate::syntax::parser::parse;

    fn verbs() -> Vec<String> {
        ["get", "post", "put", "delete", "patch"]
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_injection_calls() {
        let source = r#"
class UserController {
    constructor() {
        this.userModel = this.resolve("User");
        this.roleModel = this.resolve('Role');
        this.other = other.resolve("Nope");
        this.dynamic = this.resolve(name);
        this.tpl = this.resolve(`Tpl`);
    }
}
"#;
        let tree = parse(source, Dialect::TypeScript).unwrap();
        let calls = injection_calls(tree.root(), source, "this", "resolve");
        let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Role"]);
    }

    #[test]
    fn test_route_handlers() {
        let source = r#"
import SystemHealthController from "./controllers/health.js";

fastify.Route.get("/health", { handler: [SystemHealthController, "getHealth"] });
fastify.Route.post("/health", { schema: {}, "handler": [SystemHealthController, 'reset'] });
fastify.Route.options("/health", { handler: [SystemHealthController, "opts"] });
other.Route.get("/x", { handler: [SystemHealthController, "x"] });
fastify.Route.get("/y", { handler: [SystemHealthController, "y", extra] });
fastify.Route.get("/z", { handler: ["SystemHealthController", "z"] });
"#;
        let tree = parse(source, Dialect::TypeScript).unwrap();
        let verbs = verbs();
        let shape = RouteCallShape {
            namespace: "fastify",
            object: "Route",
            verbs: &verbs,
            handler_property: "handler",
        };
        let bindings = route_handlers(tree.root(), source, &shape);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].controller, "SystemHealthController");
        assert_eq!(bindings[0].method, "getHealth");
        assert_eq!(bindings[0].verb, "get");
        assert_eq!(
            &source[bindings[0].span.clone()],
            r#"[SystemHealthController, "getHealth"]"#
        );
        assert_eq!(bindings[1].method, "reset");
        assert_eq!(bindings[1].verb, "post");
    }

    #[test]
    fn test_import_binding_variants() {
        let source = r#"
import Health from "./controllers/health.js";
import * as Users from "./controllers/users";
import { Orders, Billing as Invoices } from "../controllers/shop.js";
import "./side-effect.js";
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        let root = tree.root();

        assert_eq!(
            import_binding(root, source, "Health").unwrap().specifier,
            "./controllers/health.js"
        );
        assert_eq!(
            import_binding(root, source, "Users").unwrap().specifier,
            "./controllers/users"
        );
        assert_eq!(
            import_binding(root, source, "Orders").unwrap().specifier,
            "../controllers/shop.js"
        );
        assert_eq!(
            import_binding(root, source, "Invoices").unwrap().specifier,
            "../controllers/shop.js"
        );
        assert!(import_binding(root, source, "Billing").is_none());
        assert!(import_binding(root, source, "Missing").is_none());
    }

    #[test]
    fn test_class_methods() {
        let source = r#"
export default class SystemHealthController {
    static async getHealth(req, reply) {
        return { ok: true };
    }

    #secret() {}

    reset() {}
}
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        let language = Dialect::JavaScript.language();
        let methods = class_methods(tree.root(), source, &language).unwrap();
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getHealth", "reset"]);
        assert!(source[methods[0].span.clone()].starts_with("static async getHealth"));
    }

    #[test]
    fn test_join_call_segments() {
        let source = r#"
import { join } from "path";
export default {
    name: "demo",
    modelsDir: join("custom", "models"),
};
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        assert_eq!(
            join_call_segments(tree.root(), source, "modelsDir"),
            Some(vec!["custom".to_string(), "models".to_string()])
        );
        assert_eq!(join_call_segments(tree.root(), source, "viewsDir"), None);
    }

    #[test]
    fn test_join_call_segments_member_callee() {
        let source = r#"
module.exports = {
    modelsDir: path.join("src", "models"),
};
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        assert_eq!(
            join_call_segments(tree.root(), source, "modelsDir"),
            Some(vec!["src".to_string(), "models".to_string()])
        );
    }

    #[test]
    fn test_join_call_segments_rejects_non_literal_arguments() {
        let source = r#"
module.exports = {
    modelsDir: path.join(__dirname, "..", "app", "models"),
};
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        assert_eq!(join_call_segments(tree.root(), source, "modelsDir"), None);
    }

    #[test]
    fn test_join_call_segments_last_definition_wins() {
        let source = r#"
const a = { modelsDir: join("first", "models") };
const b = { modelsDir: join(base, "models") };
"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        assert_eq!(join_call_segments(tree.root(), source, "modelsDir"), None);
    }

    #[test]
    fn test_join_call_segments_ignores_non_join_value() {
        let source = r#"export default { modelsDir: "app/models" };"#;
        let tree = parse(source, Dialect::JavaScript).unwrap();
        assert_eq!(join_call_segments(tree.root(), source, "modelsDir"), None);
    }
}
