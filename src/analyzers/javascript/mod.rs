//! JavaScript/TypeScript syntax trees
//!
//! Route extraction and declaration extraction share this parse step: one
//! tree-sitter grammar per file variant, with trees containing syntax errors
//! rejected so callers can skip the file.

pub mod parser;

pub use parser::{
    detect_variant, for_each_node, has_parse_errors, node_text, parse_file, parse_source,
    string_literal_value, JsAst, JsLanguageVariant,
};
