//! Handler normalization: redact noise and bound the size of handler text.

use crate::core::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Hard cap on handler length, in lines.
pub const MAX_HANDLER_LINES: usize = 40;

static JAVASCRIPT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"console\.(?:log|debug|info|warn|error|trace)\([^)]*\);?").unwrap(),
        // 500 responses are boilerplate; drop them up to the closing brace
        Regex::new(r"(?s)res\.status\(500\).*?\};?").unwrap(),
        Regex::new(r"(?s)/\*.*?\*/").unwrap(),
    ]
});

static PYTHON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\bprint\([^)]*\)").unwrap(),
        Regex::new(r"logger\.\w+\([^)]*\)").unwrap(),
        Regex::new(r"logging\.\w+\([^)]*\)").unwrap(),
    ]
});

static JAVA_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"System\.(?:out|err)\.print(?:ln|f)?\([^)]*\);?").unwrap(),
        Regex::new(r"\b(?:log|logger|LOG|LOGGER)\.(?:trace|debug|info|warn|error)\([^)]*\);?")
            .unwrap(),
        Regex::new(r"(?s)/\*.*?\*/").unwrap(),
    ]
});

static RUBY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?m)\bputs[ \t]+.*$").unwrap(),
        Regex::new(r"(?m)Rails\.logger\.\w+.*$").unwrap(),
        Regex::new(r"(?ms)^=begin\b.*?^=end\b[^\n]*").unwrap(),
    ]
});

fn patterns_for(language: Language) -> &'static [Regex] {
    match language {
        Language::JavaScript => &JAVASCRIPT_PATTERNS,
        Language::Python => &PYTHON_PATTERNS,
        Language::Java => &JAVA_PATTERNS,
        Language::Ruby => &RUBY_PATTERNS,
        Language::Unknown => &[],
    }
}

/// Strip logging and block comments for `language`, then keep the first
/// [`MAX_HANDLER_LINES`] lines.
///
/// Stripping repeats until nothing matches, so a removal cannot expose a new
/// match for the next call. Together with the prefix-only truncation this
/// makes `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str, language: Language) -> String {
    let stripped = strip_to_fixpoint(raw, patterns_for(language));
    truncate_lines(&stripped, MAX_HANDLER_LINES)
}

fn strip_to_fixpoint(raw: &str, patterns: &[Regex]) -> String {
    let mut text = raw.to_string();
    loop {
        let mut changed = false;
        for pattern in patterns {
            if let Cow::Owned(replaced) = pattern.replace_all(&text, "") {
                text = replaced;
                changed = true;
            }
        }
        if !changed {
            return text;
        }
    }
}

fn truncate_lines(text: &str, max_lines: usize) -> String {
    text.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
}
