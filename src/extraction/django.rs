//! URL-table scan for Django-style `urls.py` files.
//!
//! Every `path(...)`, `re_path(...)` or `url(...)` entry pointing at a view
//! becomes a GET route. Django's URL table carries no verb, so GET is a
//! known approximation. `include(...)` entries mount another table and are
//! not endpoints.

use super::normalize::normalize;
use crate::core::{HttpMethod, Language, RouteRecord};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static URL_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:path|re_path|url)\(\s*r?['"]([^'"]+)['"]\s*,\s*([^,)]+)"#).unwrap()
});

pub fn extract(source: &str, _path: &Path) -> Result<Vec<RouteRecord>> {
    let routes = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| URL_ENTRY.captures(line))
        .filter_map(|captures| {
            let view = captures[2].trim();
            if view.starts_with("include(") {
                return None;
            }
            let view = view.trim_end_matches('(');
            Some(RouteRecord::new(
                HttpMethod::Get,
                &captures[1],
                normalize(&format!("# View: {view}"), Language::Python),
            ))
        })
        .collect();
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_table_entries() {
        let source = indoc! {r#"
            from django.urls import include, path, re_path
            from . import views

            urlpatterns = [
                path('articles/', views.article_list, name='articles'),
                re_path(r'^archive/(?P<year>[0-9]{4})/$', views.archive),
                path('api/', include('api.urls')),
                # path('old/', views.old),
            ]
        "#};
        let routes = extract(source, Path::new("blog/urls.py")).unwrap();
        let summary: Vec<_> = routes
            .iter()
            .map(|route| (route.method, route.route_path.as_str(), route.handler.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (HttpMethod::Get, "articles/", "# View: views.article_list"),
                (
                    HttpMethod::Get,
                    "^archive/(?P<year>[0-9]{4})/$",
                    "# View: views.archive"
                ),
            ]
        );
    }

    #[test]
    fn test_class_based_view() {
        let routes = extract(
            "urlpatterns = [path(\"login/\", LoginView.as_view())]",
            Path::new("urls.py"),
        )
        .unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].handler, "# View: LoginView.as_view");
    }
}
