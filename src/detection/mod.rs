//! Framework and language detection.
//!
//! Detection runs in two stages:
//!
//! 1. **Markers**: each entry of [`FRAMEWORK_MARKERS`] is checked in table
//!    order against `root/<marker>`. The first framework with any marker
//!    present wins; table order is the only tie-break.
//! 2. **Extension vote**: with no marker, every file under the root is
//!    counted by language. The highest count wins, ties going to the
//!    language encountered first in walk order. The framework is `unknown`.
//!
//! Detection never fails: an empty or unreadable tree yields
//! `{ language: unknown, framework: unknown }`.

use crate::config::ScanConfig;
use crate::core::{DetectionResult, Framework, Language};
use crate::io::FileWalker;
use std::path::Path;
use tracing::{debug, info};

pub struct FrameworkMarkers {
    pub framework: Framework,
    pub language: Language,
    pub markers: &'static [&'static str],
}

/// Marker files per framework, in priority order.
pub static FRAMEWORK_MARKERS: &[FrameworkMarkers] = &[
    FrameworkMarkers {
        framework: Framework::Express,
        language: Language::JavaScript,
        markers: &["package.json"],
    },
    FrameworkMarkers {
        framework: Framework::Flask,
        language: Language::Python,
        markers: &["requirements.txt", "app.py"],
    },
    FrameworkMarkers {
        framework: Framework::Django,
        language: Language::Python,
        markers: &["manage.py", "settings.py"],
    },
    FrameworkMarkers {
        framework: Framework::Spring,
        language: Language::Java,
        markers: &["pom.xml", "build.gradle"],
    },
    FrameworkMarkers {
        framework: Framework::Rails,
        language: Language::Ruby,
        markers: &["Gemfile", "config/routes.rb"],
    },
];

pub fn detect(root: &Path) -> DetectionResult {
    detect_with_config(root, &ScanConfig::default())
}

pub fn detect_with_config(root: &Path, config: &ScanConfig) -> DetectionResult {
    if let Some(result) = detect_by_markers(root) {
        info!(
            "Detected framework: {} ({})",
            result.framework, result.language
        );
        return result;
    }

    let language = vote_by_extension(root, config);
    info!(
        "Fallback detection: language={}, framework=unknown",
        language
    );
    DetectionResult {
        language,
        framework: Framework::Unknown,
    }
}

fn detect_by_markers(root: &Path) -> Option<DetectionResult> {
    FRAMEWORK_MARKERS
        .iter()
        .find(|entry| {
            entry
                .markers
                .iter()
                .any(|marker| root.join(marker).is_file())
        })
        .map(|entry| DetectionResult {
            language: entry.language,
            framework: entry.framework,
        })
}

fn vote_by_extension(root: &Path, config: &ScanConfig) -> Language {
    let extensions = Language::Unknown.scan_extensions();
    let walk = FileWalker::new(root)
        .with_extensions(&extensions)
        .with_config(config)
        .walk();

    // (language, count) in first-encountered order
    let mut tally: Vec<(Language, usize)> = Vec::new();
    for file in &walk.files {
        let language = Language::from_path(file);
        if language == Language::Unknown {
            continue;
        }
        match tally.iter_mut().find(|(lang, _)| *lang == language) {
            Some((_, count)) => *count += 1,
            None => tally.push((language, 1)),
        }
    }
    debug!("Extension tally: {:?}", tally);

    tally
        .iter()
        .fold(None::<(Language, usize)>, |best, &(lang, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((lang, count)),
        })
        .map(|(lang, _)| lang)
        .unwrap_or(Language::Unknown)
}
