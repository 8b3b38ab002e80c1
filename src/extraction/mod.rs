//! Route extraction.
//!
//! The detected framework selects one [`RouteStrategy`]; the strategy is run
//! over every walked file it accepts, one file at a time. A file that cannot
//! be read or parsed is recorded as a [`SkippedFile`] and the scan moves on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use routemap::config::ScanConfig;
//! use routemap::extraction::extract_routes;
//!
//! let scan = extract_routes(Path::new("./my-service"), &ScanConfig::default());
//! for route in &scan.routes {
//!     println!("{} {}", route.method, route.route_path);
//! }
//! ```

mod django;
mod express;
mod flask;
pub mod normalize;
mod rails;
mod spring;

pub use normalize::{normalize, MAX_HANDLER_LINES};

use crate::config::ScanConfig;
use crate::core::{DetectionResult, Framework, Language, RouteRecord};
use crate::detection::detect_with_config;
use crate::errors::SkippedFile;
use crate::io::FileWalker;
use anyhow::Result;
use serde::Serialize;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Closed set of extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStrategy {
    /// tree-sitter walk of Express-style router calls
    SyntaxTree,
    /// Flask-style `@x.route(...)` decorators
    Decorator,
    /// Django-style `urls.py` tables
    UrlTable,
    /// Spring-style `@XxxMapping` annotations
    Annotation,
    /// Rails-style `routes.rb` DSL
    RoutesDsl,
}

impl RouteStrategy {
    /// Strategy for a detected framework. `Unknown` falls back to the
    /// syntax-tree strategy.
    pub fn for_framework(framework: Framework) -> Self {
        match framework {
            Framework::Express => RouteStrategy::SyntaxTree,
            Framework::Flask => RouteStrategy::Decorator,
            Framework::Django => RouteStrategy::UrlTable,
            Framework::Spring => RouteStrategy::Annotation,
            Framework::Rails => RouteStrategy::RoutesDsl,
            Framework::Unknown => RouteStrategy::SyntaxTree,
        }
    }

    /// Language whose files this strategy reads.
    pub fn language(&self) -> Language {
        match self {
            RouteStrategy::SyntaxTree => Language::JavaScript,
            RouteStrategy::Decorator | RouteStrategy::UrlTable => Language::Python,
            RouteStrategy::Annotation => Language::Java,
            RouteStrategy::RoutesDsl => Language::Ruby,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RouteStrategy::SyntaxTree => "syntax-tree",
            RouteStrategy::Decorator => "decorator",
            RouteStrategy::UrlTable => "url-table",
            RouteStrategy::Annotation => "annotation",
            RouteStrategy::RoutesDsl => "routes-dsl",
        }
    }

    /// Whether `path` is a candidate file for this strategy.
    pub fn accepts(&self, path: &Path) -> bool {
        if Language::from_path(path) != self.language() {
            return false;
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match self {
            RouteStrategy::UrlTable => file_name.ends_with("urls.py"),
            RouteStrategy::RoutesDsl => file_name.ends_with("routes.rb"),
            _ => true,
        }
    }

    /// Run the strategy over one file's source.
    pub fn extract(&self, source: &str, path: &Path) -> Result<Vec<RouteRecord>> {
        match self {
            RouteStrategy::SyntaxTree => express::extract(source, path),
            RouteStrategy::Decorator => flask::extract(source, path),
            RouteStrategy::UrlTable => django::extract(source, path),
            RouteStrategy::Annotation => spring::extract(source, path),
            RouteStrategy::RoutesDsl => rails::extract(source, path),
        }
    }
}

impl std::fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything about a finished scan except the routes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub detection: DetectionResult,
    pub route_count: usize,
    pub skipped: Vec<SkippedFile>,
    pub truncated: bool,
}

/// A completed, collected scan.
#[derive(Debug, Clone)]
pub struct RouteScan {
    pub detection: DetectionResult,
    pub routes: Vec<RouteRecord>,
    pub skipped: Vec<SkippedFile>,
    pub truncated: bool,
}

impl RouteScan {
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            detection: self.detection,
            route_count: self.routes.len(),
            skipped: self.skipped.clone(),
            truncated: self.truncated,
        }
    }
}

/// Lazy route sequence over a walked tree.
///
/// Files are read and extracted only when the pending queue runs dry, so a
/// consumer that stops early never touches the remaining files. Records come
/// out in walk order, then source order within a file.
pub struct RouteIter {
    root: PathBuf,
    detection: DetectionResult,
    strategy: RouteStrategy,
    files: std::vec::IntoIter<PathBuf>,
    pending: VecDeque<RouteRecord>,
    skipped: Vec<SkippedFile>,
    truncated: bool,
    emitted: usize,
}

impl RouteIter {
    pub fn new(root: &Path, detection: DetectionResult, config: &ScanConfig) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let strategy = RouteStrategy::for_framework(detection.framework);
        let extensions = detection.language.scan_extensions();
        let walk = FileWalker::new(&root)
            .with_extensions(&extensions)
            .with_config(config)
            .walk();

        let files: Vec<PathBuf> = walk
            .files
            .into_iter()
            .filter(|path| strategy.accepts(path))
            .collect();
        info!(
            "Extracting routes with {} strategy from {} file(s)",
            strategy,
            files.len()
        );

        Self {
            root,
            detection,
            strategy,
            files: files.into_iter(),
            pending: VecDeque::new(),
            skipped: walk.skipped,
            truncated: walk.truncated,
            emitted: 0,
        }
    }

    pub fn detection(&self) -> DetectionResult {
        self.detection
    }

    pub fn strategy(&self) -> RouteStrategy {
        self.strategy
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Summary of what has been produced so far.
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            detection: self.detection,
            route_count: self.emitted,
            skipped: self.skipped.clone(),
            truncated: self.truncated,
        }
    }

    fn extract_file(&mut self, path: &Path) {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                self.skip(path, format!("read failed: {e}"));
                return;
            }
        };
        match self.strategy.extract(&source, path) {
            Ok(routes) => {
                debug!("{} route(s) in {}", routes.len(), path.display());
                self.pending.extend(routes);
            }
            Err(e) => self.skip(path, format!("parse failed: {e}")),
        }
    }

    fn skip(&mut self, path: &Path, reason: String) {
        let skipped = SkippedFile::new(&self.root, path, reason);
        warn!("Skipping {}: {}", skipped.file.display(), skipped.reason);
        self.skipped.push(skipped);
    }
}

impl Iterator for RouteIter {
    type Item = RouteRecord;

    fn next(&mut self) -> Option<RouteRecord> {
        loop {
            if let Some(route) = self.pending.pop_front() {
                self.emitted += 1;
                return Some(route);
            }
            let path = self.files.next()?;
            self.extract_file(&path);
        }
    }
}

/// Detect the framework under `root` and collect every route.
pub fn extract_routes(root: &Path, config: &ScanConfig) -> RouteScan {
    let detection = {
        let _span = info_span!("detect").entered();
        detect_with_config(root, config)
    };
    extract_routes_with(root, detection, config)
}

/// Collect every route under `root` using an existing detection result.
pub fn extract_routes_with(
    root: &Path,
    detection: DetectionResult,
    config: &ScanConfig,
) -> RouteScan {
    let _span = info_span!("extract", framework = %detection.framework).entered();
    let mut iter = RouteIter::new(root, detection, config);
    let routes: Vec<RouteRecord> = iter.by_ref().collect();
    info!("Extracted {} route(s)", routes.len());

    RouteScan {
        detection,
        routes,
        skipped: iter.skipped,
        truncated: iter.truncated,
    }
}
