//! Syntax-tree route extraction for Express-style JavaScript/TypeScript.
//!
//! Two passes over one parsed file:
//!
//! 1. collect every identifier bound to `express.Router()` or `express()`,
//!    on top of the implicit `app`;
//! 2. emit a route for each `<router>.<verb>('<path>', ...)` call with at
//!    least two arguments whose first argument is a plain string literal.
//!
//! The handler is the full source of the matched call.

use super::normalize::normalize;
use crate::analyzers::javascript::{for_each_node, parse_file, string_literal_value, JsAst};
use crate::core::{HttpMethod, Language, RouteRecord};
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::Node;

const APP_IDENTIFIER: &str = "app";
const EXPRESS_NAMESPACE: &str = "express";
const ROUTER_FACTORY: &str = "Router";

const ROUTE_VERBS: [(&str, HttpMethod); 5] = [
    ("get", HttpMethod::Get),
    ("post", HttpMethod::Post),
    ("put", HttpMethod::Put),
    ("delete", HttpMethod::Delete),
    ("patch", HttpMethod::Patch),
];

pub fn extract(source: &str, path: &Path) -> Result<Vec<RouteRecord>> {
    let ast = parse_file(source, path)?;
    let routers = collect_router_identifiers(&ast);
    Ok(collect_routes(&ast, &routers))
}

fn collect_router_identifiers(ast: &JsAst) -> HashSet<String> {
    let mut routers = HashSet::from([APP_IDENTIFIER.to_string()]);
    for_each_node(ast.root(), |node| {
        if node.kind() != "variable_declarator" {
            return;
        }
        let (Some(name), Some(value)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("value"),
        ) else {
            return;
        };
        if name.kind() == "identifier" && is_router_factory(ast, value) {
            routers.insert(ast.text(&name).to_string());
        }
    });
    routers
}

fn is_router_factory(ast: &JsAst, node: Node) -> bool {
    if node.kind() != "call_expression" {
        return false;
    }
    let Some(function) = node.child_by_field_name("function") else {
        return false;
    };
    match function.kind() {
        "identifier" => ast.text(&function) == EXPRESS_NAMESPACE,
        "member_expression" => {
            member_parts(ast, function) == Some((EXPRESS_NAMESPACE, ROUTER_FACTORY))
        }
        _ => false,
    }
}

/// `(object, property)` of a plain `ident.prop` member expression.
fn member_parts<'a>(ast: &'a JsAst, member: Node) -> Option<(&'a str, &'a str)> {
    let object = member.child_by_field_name("object")?;
    let property = member.child_by_field_name("property")?;
    if object.kind() != "identifier" || property.kind() != "property_identifier" {
        return None;
    }
    Some((ast.text(&object), ast.text(&property)))
}

fn collect_routes(ast: &JsAst, routers: &HashSet<String>) -> Vec<RouteRecord> {
    let mut routes = Vec::new();
    for_each_node(ast.root(), |node| {
        if let Some(route) = route_from_call(ast, routers, node) {
            routes.push(route);
        }
    });
    routes
}

fn route_from_call(ast: &JsAst, routers: &HashSet<String>, node: Node) -> Option<RouteRecord> {
    if node.kind() != "call_expression" {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    if function.kind() != "member_expression" {
        return None;
    }
    let (receiver, verb) = member_parts(ast, function)?;
    if !routers.contains(receiver) {
        return None;
    }
    let method = ROUTE_VERBS
        .iter()
        .find(|(name, _)| *name == verb)
        .map(|(_, method)| *method)?;

    let arguments = node.child_by_field_name("arguments")?;
    if arguments.kind() != "arguments" {
        return None;
    }
    let mut cursor = arguments.walk();
    let args: Vec<Node> = arguments
        .named_children(&mut cursor)
        .filter(|arg| arg.kind() != "comment")
        .collect();
    if args.len() < 2 {
        return None;
    }
    let route_path = string_literal_value(&args[0], &ast.source)?;

    Some(RouteRecord::new(
        method,
        route_path,
        normalize(ast.text(&node), Language::JavaScript),
    ))
}
