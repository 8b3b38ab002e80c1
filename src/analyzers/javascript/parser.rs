//! Tree-sitter parser integration for JavaScript/TypeScript
//!
//! Provides parsing using tree-sitter grammars for JS/TS/JSX/TSX.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Language as TsLanguage, Node, Parser, Tree};

/// Grammar variant used for a JS-family file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsLanguageVariant {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl JsLanguageVariant {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }
}

/// A parsed JS/TS file together with the source it was parsed from
#[derive(Debug)]
pub struct JsAst {
    pub tree: Tree,
    pub path: PathBuf,
    pub source: String,
    pub language_variant: JsLanguageVariant,
}

impl JsAst {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: &Node) -> &str {
        node_text(node, &self.source)
    }
}

/// Get the tree-sitter language for a JS variant
fn get_language(variant: JsLanguageVariant) -> TsLanguage {
    match variant {
        JsLanguageVariant::JavaScript | JsLanguageVariant::Jsx => {
            tree_sitter_javascript::LANGUAGE.into()
        }
        JsLanguageVariant::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        JsLanguageVariant::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Parse JavaScript/TypeScript source code into a tree-sitter AST
pub fn parse_source(content: &str, path: &Path, variant: JsLanguageVariant) -> Result<JsAst> {
    let mut parser = Parser::new();
    let language = get_language(variant);

    parser
        .set_language(&language)
        .context("Failed to set tree-sitter language")?;

    let tree = parser
        .parse(content, None)
        .context("Failed to parse source code")?;

    Ok(JsAst {
        tree,
        path: path.to_path_buf(),
        source: content.to_string(),
        language_variant: variant,
    })
}

/// Parse a file, choosing the grammar from its extension and rejecting trees
/// that contain syntax errors.
pub fn parse_file(content: &str, path: &Path) -> Result<JsAst> {
    let ast = parse_source(content, path, detect_variant(path))?;
    if has_parse_errors(&ast.tree) {
        let line = first_error_line(ast.root()).unwrap_or(1);
        bail!("syntax error near line {line}");
    }
    Ok(ast)
}

/// Determine language variant from file path
pub fn detect_variant(path: &Path) -> JsLanguageVariant {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(JsLanguageVariant::from_extension)
        .unwrap_or(JsLanguageVariant::JavaScript)
}

/// Check if a parse tree has errors
pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

fn first_error_line(root: Node) -> Option<usize> {
    let mut line = None;
    for_each_node(root, |node| {
        if line.is_none() && (node.is_error() || node.is_missing()) {
            line = Some(node.start_position().row + 1);
        }
    });
    line
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    &source[start..end]
}

/// Contents of a plain quoted string literal, without the quotes.
///
/// Template strings are not plain literals and yield `None`.
pub fn string_literal_value<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    if node.kind() != "string" {
        return None;
    }
    let text = node_text(node, source);
    if text.len() < 2 {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Pre-order visit of every node under `root`, without recursion.
pub fn for_each_node<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_variant() {
        assert_eq!(
            detect_variant(Path::new("test.js")),
            JsLanguageVariant::JavaScript
        );
        assert_eq!(
            detect_variant(Path::new("test.mjs")),
            JsLanguageVariant::JavaScript
        );
        assert_eq!(
            detect_variant(Path::new("test.jsx")),
            JsLanguageVariant::Jsx
        );
        assert_eq!(
            detect_variant(Path::new("test.TS")),
            JsLanguageVariant::TypeScript
        );
        assert_eq!(
            detect_variant(Path::new("test.tsx")),
            JsLanguageVariant::Tsx
        );
    }

    #[test]
    fn test_parse_typescript() {
        let source = "function hello(name: string): string { return `Hello ${name}`; }";
        let ast = parse_file(source, Path::new("test.ts")).unwrap();
        assert!(!has_parse_errors(&ast.tree));
        assert_eq!(ast.language_variant, JsLanguageVariant::TypeScript);
    }

    #[test]
    fn test_parse_jsx() {
        let source = "const App = () => <div>Hello</div>;";
        let ast = parse_file(source, Path::new("test.jsx")).unwrap();
        assert_eq!(ast.language_variant, JsLanguageVariant::Jsx);
    }

    #[test]
    fn test_parse_file_rejects_syntax_errors() {
        let source = "app.get('/broken', (req, res) => {\n  res.send(\n";
        let err = parse_file(source, Path::new("broken.js")).unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_node_text() {
        let source = "const x = 42;";
        let ast = parse_file(source, Path::new("test.js")).unwrap();
        assert_eq!(ast.text(&ast.root()), source);
    }

    #[test]
    fn test_string_literal_value() {
        let source = "f('single', \"double\", `tmpl`);";
        let ast = parse_file(source, Path::new("test.js")).unwrap();
        let mut strings = Vec::new();
        let mut templates = 0;
        for_each_node(ast.root(), |node| {
            if let Some(value) = string_literal_value(&node, &ast.source) {
                strings.push(value.to_string());
            }
            if node.kind() == "template_string" {
                templates += 1;
            }
        });
        assert_eq!(strings, vec!["single", "double"]);
        assert_eq!(templates, 1);
    }

    #[test]
    fn test_for_each_node_visits_nested_nodes() {
        let source = "function a() { function b() { return 1; } }";
        let ast = parse_file(source, Path::new("test.js")).unwrap();
        let mut functions = 0;
        for_each_node(ast.root(), |node| {
            if node.kind() == "function_declaration" {
                functions += 1;
            }
        });
        assert_eq!(functions, 2);
    }
}
