//! Declaration extraction for architecture diagrams.
//!
//! Each JS/TS file is parsed once with the shared tree-sitter layer and
//! three kinds of declaration are collected:
//!
//! - **models**: `<layer>.<fn>('<Name>', { field: ..., ... })` where `<layer>`
//!   is one of the [`DataLayer`] namespaces;
//! - **controllers**: classes whose name contains `controller`
//!   (case-insensitive), with their method names;
//! - **types**: interfaces and object-shaped type aliases, with their
//!   property names.
//!
//! Files are parsed in parallel; results are merged back in walk order.

use crate::analyzers::javascript::{for_each_node, parse_file, string_literal_value, JsAst};
use crate::config::ScanConfig;
use crate::core::{ControllerInfo, DataLayer, DeclarationSet, Language, ModelInfo, TypeInfo};
use crate::errors::SkippedFile;
use crate::io::FileWalker;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, info_span, warn};
use tree_sitter::Node;

const UNKNOWN_MODEL: &str = "Unknown";

/// Declarations found under one root, plus the files that were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeclarationScan {
    pub declarations: DeclarationSet,
    pub skipped: Vec<SkippedFile>,
    pub truncated: bool,
}

pub fn extract_declarations(root: &Path, config: &ScanConfig) -> DeclarationScan {
    let _span = info_span!("declarations").entered();
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let walk = FileWalker::new(&root)
        .with_extensions(Language::JavaScript.extensions())
        .with_config(config)
        .walk();

    let results: Vec<std::result::Result<DeclarationSet, SkippedFile>> = walk
        .files
        .par_iter()
        .map(|path| extract_file(&root, path))
        .collect();

    let mut scan = DeclarationScan {
        skipped: walk.skipped,
        truncated: walk.truncated,
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(declarations) => scan.declarations.merge(declarations),
            Err(skipped) => {
                warn!("Skipping {}: {}", skipped.file.display(), skipped.reason);
                scan.skipped.push(skipped);
            }
        }
    }

    info!(
        "Found {} model(s), {} controller(s), {} type(s)",
        scan.declarations.models.len(),
        scan.declarations.controllers.len(),
        scan.declarations.types.len()
    );
    scan
}

fn extract_file(root: &Path, path: &Path) -> std::result::Result<DeclarationSet, SkippedFile> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| SkippedFile::new(root, path, format!("read failed: {e}")))?;
    let declarations = declarations_from_source(&source, path)
        .map_err(|e| SkippedFile::new(root, path, format!("parse failed: {e}")))?;
    debug!(
        "{}: {} model(s), {} controller(s), {} type(s)",
        path.display(),
        declarations.models.len(),
        declarations.controllers.len(),
        declarations.types.len()
    );
    Ok(declarations)
}

/// Declarations in one file. The grammar is chosen from the path's extension.
pub fn declarations_from_source(source: &str, path: &Path) -> Result<DeclarationSet> {
    let ast = parse_file(source, path)?;
    let mut declarations = DeclarationSet::default();

    for_each_node(ast.root(), |node| match node.kind() {
        "call_expression" => {
            if let Some(model) = model_from_call(&ast, node) {
                declarations.models.push(model);
            }
        }
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(controller) = controller_from_class(&ast, node) {
                declarations.controllers.push(controller);
            }
        }
        "interface_declaration" => {
            if let Some(ty) = type_from_interface(&ast, node) {
                declarations.types.push(ty);
            }
        }
        "type_alias_declaration" => {
            if let Some(ty) = type_from_alias(&ast, node) {
                declarations.types.push(ty);
            }
        }
        _ => {}
    });

    Ok(declarations)
}

fn model_from_call(ast: &JsAst, node: Node) -> Option<ModelInfo> {
    let function = node.child_by_field_name("function")?;
    if function.kind() != "member_expression" {
        return None;
    }
    let object = function.child_by_field_name("object")?;
    if object.kind() != "identifier" {
        return None;
    }
    let layer = DataLayer::from_identifier(ast.text(&object))?;

    let arguments = node.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let args: Vec<Node> = arguments
        .named_children(&mut cursor)
        .filter(|arg| arg.kind() != "comment")
        .collect();

    let name = args
        .first()
        .and_then(|arg| string_literal_value(arg, &ast.source))
        .unwrap_or(UNKNOWN_MODEL)
        .to_string();
    let fields = args
        .get(1)
        .filter(|arg| arg.kind() == "object")
        .map(|object| object_keys(ast, *object))
        .unwrap_or_default();

    Some(ModelInfo {
        name,
        layer,
        fields,
    })
}

/// Plain identifier keys of an object literal, shorthand included.
fn object_keys(ast: &JsAst, object: Node) -> Vec<String> {
    let mut cursor = object.walk();
    object
        .named_children(&mut cursor)
        .filter_map(|member| match member.kind() {
            "pair" => member
                .child_by_field_name("key")
                .filter(|key| key.kind() == "property_identifier"),
            "shorthand_property_identifier" => Some(member),
            _ => None,
        })
        .map(|key| ast.text(&key).to_string())
        .collect()
}

fn controller_from_class(ast: &JsAst, node: Node) -> Option<ControllerInfo> {
    let name = ast.text(&node.child_by_field_name("name")?);
    if !name.to_lowercase().contains("controller") {
        return None;
    }
    let body = node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let methods = body
        .named_children(&mut cursor)
        .filter(|member| member.kind() == "method_definition")
        .filter_map(|method| method.child_by_field_name("name"))
        .filter(|key| key.kind() == "property_identifier")
        .map(|key| ast.text(&key).to_string())
        .collect();

    Some(ControllerInfo {
        name: name.to_string(),
        methods,
    })
}

fn type_from_interface(ast: &JsAst, node: Node) -> Option<TypeInfo> {
    let name = node.child_by_field_name("name")?;
    let body = node.child_by_field_name("body")?;
    Some(TypeInfo {
        name: ast.text(&name).to_string(),
        properties: property_signatures(ast, body),
    })
}

/// Only aliases of an object type literal describe a shape.
fn type_from_alias(ast: &JsAst, node: Node) -> Option<TypeInfo> {
    let name = node.child_by_field_name("name")?;
    let value = node.child_by_field_name("value")?;
    if value.kind() != "object_type" {
        debug!(
            "Skipping non-object type alias {} in {}",
            ast.text(&name),
            ast.path.display()
        );
        return None;
    }
    Some(TypeInfo {
        name: ast.text(&name).to_string(),
        properties: property_signatures(ast, value),
    })
}

fn property_signatures(ast: &JsAst, body: Node) -> Vec<String> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|member| member.kind() == "property_signature")
        .filter_map(|member| member.child_by_field_name("name"))
        .filter(|key| key.kind() == "property_identifier")
        .map(|key| ast.text(&key).to_string())
        .collect()
}
