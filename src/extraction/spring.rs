//! Annotation line-scan for Spring-style Java controllers.
//!
//! Each `@XxxMapping` line starts a route. The handler runs from the
//! annotation up to the next annotation or class declaration.

use super::normalize::normalize;
use crate::core::{HttpMethod, Language, RouteRecord};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

const DEFAULT_PATH: &str = "/";

/// Mapping annotation → verb. `RequestMapping` defaults to GET unless a
/// `method = RequestMethod.X` attribute says otherwise.
const MAPPING_ANNOTATIONS: [(&str, HttpMethod); 6] = [
    ("RequestMapping", HttpMethod::Get),
    ("GetMapping", HttpMethod::Get),
    ("PostMapping", HttpMethod::Post),
    ("PutMapping", HttpMethod::Put),
    ("DeleteMapping", HttpMethod::Delete),
    ("PatchMapping", HttpMethod::Patch),
];

static ANNOTATION_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@(\w+)\b").unwrap());

static NAMED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?:value|path)\s*=\s*\{?\s*"([^"}]+)""#).unwrap());

static POSITIONAL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^@\w+\(\s*\{?\s*"([^"}]+)""#).unwrap());

static REQUEST_METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RequestMethod\.(\w+)").unwrap());

pub fn extract(source: &str, path: &Path) -> Result<Vec<RouteRecord>> {
    let lines: Vec<&str> = source.lines().collect();
    let mut routes = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let annotation = line.trim();
        let Some(mut method) = mapping_method(annotation) else {
            continue;
        };
        if let Some(explicit) = REQUEST_METHOD.captures(annotation) {
            match HttpMethod::parse(&explicit[1]) {
                Some(parsed) => method = parsed,
                None => {
                    debug!(
                        "Dropping non-canonical method {} in {}",
                        &explicit[1],
                        path.display()
                    );
                    continue;
                }
            }
        }

        let route_path = NAMED_PATH
            .captures(annotation)
            .or_else(|| POSITIONAL_PATH.captures(annotation))
            .map(|captures| captures[1].to_string())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let mut handler = vec![annotation];
        handler.extend(
            lines[index + 1..]
                .iter()
                .take_while(|next| !ends_handler(next.trim()))
                .copied(),
        );

        routes.push(RouteRecord::new(
            method,
            route_path,
            normalize(&handler.join("\n"), Language::Java),
        ));
    }

    Ok(routes)
}

fn mapping_method(annotation: &str) -> Option<HttpMethod> {
    let name = ANNOTATION_NAME.captures(annotation)?;
    MAPPING_ANNOTATIONS
        .iter()
        .find(|(candidate, _)| *candidate == &name[1])
        .map(|(_, method)| *method)
}

fn ends_handler(trimmed: &str) -> bool {
    trimmed.starts_with('@') || trimmed.starts_with("public class ") || trimmed.starts_with("class ")
}
