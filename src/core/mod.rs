pub mod declarations;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use declarations::{ControllerInfo, DataLayer, DeclarationSet, ModelInfo, TypeInfo};

/// Source language of a scanned repository.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Ruby,
    Unknown,
}

impl Language {
    /// Languages with an extension table, in vote tie-break order.
    pub const TRACKED: [Language; 4] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Ruby,
    ];

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx"],
            Language::Python => &[".py"],
            Language::Java => &[".java"],
            Language::Ruby => &[".rb"],
            Language::Unknown => &[],
        }
    }

    /// Extensions to scan for this language; `Unknown` falls back to every tracked extension.
    pub fn scan_extensions(&self) -> Vec<&'static str> {
        match self {
            Language::Unknown => Self::TRACKED
                .iter()
                .flat_map(|lang| lang.extensions().iter().copied())
                .collect(),
            known => known.extensions().to_vec(),
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        let dotted = format!(".{}", ext.trim_start_matches('.').to_ascii_lowercase());
        Self::TRACKED
            .iter()
            .find(|lang| lang.extensions().contains(&dotted.as_str()))
            .copied()
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web framework family a repository was classified as.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Express,
    Flask,
    Django,
    Spring,
    Rails,
    Unknown,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Express => "express",
            Framework::Flask => "flask",
            Framework::Django => "django",
            Framework::Spring => "spring",
            Framework::Rails => "rails",
            Framework::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of framework detection for one repository scan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionResult {
    pub language: Language,
    pub framework: Framework,
}

impl DetectionResult {
    pub fn unknown() -> Self {
        Self {
            language: Language::Unknown,
            framework: Framework::Unknown,
        }
    }
}

/// The five HTTP verbs a route record may carry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Case-insensitive parse; anything outside the five canonical verbs is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(token))
            .copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered HTTP endpoint.
///
/// `handler` has already been through [`crate::extraction::normalize`] and is at
/// most 40 lines. `explanation` is never set by the scanner itself; downstream
/// enrichment attaches it with [`RouteRecord::with_explanation`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    pub method: HttpMethod,
    pub route_path: String,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl RouteRecord {
    pub fn new(method: HttpMethod, route_path: impl Into<String>, handler: String) -> Self {
        Self {
            method,
            route_path: route_path.into(),
            handler,
            explanation: None,
        }
    }

    pub fn with_explanation(self, explanation: impl Into<String>) -> Self {
        Self {
            explanation: Some(explanation.into()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("ts"), Language::JavaScript);
        assert_eq!(Language::from_extension(".JS"), Language::JavaScript);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("java"), Language::Java);
        assert_eq!(Language::from_extension("rb"), Language::Ruby);
        assert_eq!(Language::from_extension("go"), Language::Unknown);
    }

    #[test]
    fn test_unknown_language_scans_every_tracked_extension() {
        let exts = Language::Unknown.scan_extensions();
        assert!(exts.contains(&".ts"));
        assert!(exts.contains(&".py"));
        assert!(exts.contains(&".java"));
        assert!(exts.contains(&".rb"));
    }

    #[test]
    fn test_http_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse(" Patch "), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("OPTIONS"), None);
        assert_eq!(HttpMethod::parse(""), None);
    }

    #[test]
    fn test_route_record_serializes_wire_shape() {
        let record = RouteRecord::new(HttpMethod::Get, "/health", "app.get()".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["routePath"], "/health");
        assert_eq!(json["handler"], "app.get()");
        assert!(json.get("explanation").is_none());

        let enriched = record.with_explanation("Returns service health");
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["explanation"], "Returns service health");
    }

    #[test]
    fn test_detection_result_serializes_lowercase() {
        let json = serde_json::to_string(&DetectionResult::unknown()).unwrap();
        assert_eq!(json, r#"{"language":"unknown","framework":"unknown"}"#);
    }
}
