//! Decorator line-scan for Flask-style Python.
//!
//! `@<name>.route('<path>', methods=[...])` emits one route per listed
//! method (GET when the list is absent). `@<name>.get('<path>')` and the
//! other verb shortcuts emit a single route. The handler is everything from
//! the line after the decorator through the decorated function's indented
//! body.

use super::normalize::normalize;
use crate::core::{HttpMethod, Language, RouteRecord};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

static ROUTE_DECORATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^@\w+\.(route|get|post|put|patch|delete)\(\s*['"]([^'"]+)['"](.*)$"#).unwrap()
});

static METHODS_ARGUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"methods\s*=\s*[\[(]([^\])]*)[\])]").unwrap());

static QUOTED_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"](\w+)['"]"#).unwrap());

pub fn extract(source: &str, path: &Path) -> Result<Vec<RouteRecord>> {
    let lines: Vec<&str> = source.lines().collect();
    let mut routes = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let Some(captures) = ROUTE_DECORATOR.captures(line.trim()) else {
            continue;
        };
        let route_path = &captures[2];
        let methods = decorator_methods(&captures[1], &captures[3], path);
        if methods.is_empty() {
            continue;
        }

        let handler = normalize(&handler_lines(&lines, index + 1), Language::Python);
        for method in methods {
            routes.push(RouteRecord::new(method, route_path, handler.clone()));
        }
    }

    Ok(routes)
}

fn decorator_methods(decorator: &str, rest: &str, path: &Path) -> Vec<HttpMethod> {
    if decorator != "route" {
        return HttpMethod::parse(decorator).into_iter().collect();
    }
    let Some(list) = METHODS_ARGUMENT.captures(rest) else {
        return vec![HttpMethod::Get];
    };

    let mut methods = Vec::new();
    for token in QUOTED_WORD.captures_iter(&list[1]) {
        match HttpMethod::parse(&token[1]) {
            Some(method) if !methods.contains(&method) => methods.push(method),
            Some(_) => {}
            None => debug!(
                "Dropping non-canonical method {} in {}",
                &token[1],
                path.display()
            ),
        }
    }
    methods
}

fn is_function_definition(trimmed: &str) -> bool {
    trimmed.starts_with("def ") || trimmed.starts_with("async def ")
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Lines after a route decorator: stacked decorators, the `def` line and its
/// indented block.
fn handler_lines(lines: &[&str], start: usize) -> String {
    let mut collected: Vec<&str> = Vec::new();
    let mut index = start;

    while index < lines.len() {
        let trimmed = lines[index].trim_start();
        if is_function_definition(trimmed) {
            break;
        }
        if trimmed.starts_with('@') && ROUTE_DECORATOR.is_match(trimmed) {
            // Another route decorator stacked on the same function
            index += 1;
            continue;
        }
        if !(trimmed.is_empty() || trimmed.starts_with('@') || trimmed.starts_with('#')) {
            return collected.join("\n");
        }
        collected.push(lines[index]);
        index += 1;
    }

    if index < lines.len() {
        let signature = lines[index];
        let signature_indent = indentation(signature);
        collected.push(signature);
        index += 1;
        while index < lines.len() {
            let line = lines[index];
            if !line.trim().is_empty() && indentation(line) <= signature_indent {
                break;
            }
            collected.push(line);
            index += 1;
        }
    }

    while collected.last().is_some_and(|line| line.trim().is_empty()) {
        collected.pop();
    }
    collected.join("\n")
}
