//! DSL scan for Rails-style `config/routes.rb`.
//!
//! Controller code is not resolved, so the handler is a placeholder naming
//! the `controller#action` target.

use super::normalize::normalize;
use crate::core::{HttpMethod, Language, RouteRecord};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const UNKNOWN_TARGET: &str = "unknown#action";

static ROUTE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(get|post|put|patch|delete)\s+['"]([^'"]+)['"](?:(?:\s*,\s*to:|\s*=>)\s*['"]([^'"]+)['"])?"#,
    )
    .unwrap()
});

pub fn extract(source: &str, _path: &Path) -> Result<Vec<RouteRecord>> {
    let routes = source
        .lines()
        .filter_map(|line| ROUTE_CALL.captures(line.trim()))
        .filter_map(|captures| {
            let method = HttpMethod::parse(&captures[1])?;
            let target = captures.get(3).map_or(UNKNOWN_TARGET, |m| m.as_str());
            Some(RouteRecord::new(
                method,
                &captures[2],
                normalize(&format!("# Controller: {target}"), Language::Ruby),
            ))
        })
        .collect();
    Ok(routes)
}
