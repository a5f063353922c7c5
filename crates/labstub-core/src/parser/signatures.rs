//! Signature extraction from decorated Python definitions.
//!
//! Every `decorated_definition` in the tree is visited in source order; the
//! first decorator decides what gets built. Actions and dataclasses feed the
//! adapter stub generator, assistants feed reconciliation.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tree_sitter::Node;

use super::decorators::{clean_quotes, read_decorators, Decorator, DecoratorKind};
use super::source::{node_text, parse_file, ParsedSource};
use crate::errors::LabstubResult;
use crate::models::{
    AssistantParam, AssistantSignature, Dataclass, FileData, FunctionSignature, Param,
    DEFAULT_MODULE,
};

static QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\.").unwrap());

static SUPER_MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)super\s*\(.*?["']([^"']*)["']"#).unwrap());

/// One recognized definition, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extracted {
    Function(FunctionSignature),
    Assistant(AssistantSignature),
    Dataclass(Dataclass),
}

/// Drop dotted module qualifiers from an annotation: `t.List[t.Foo]` -> `List[Foo]`.
pub fn strip_module_qualifier(annotation: &str) -> String {
    QUALIFIER_RE.replace_all(annotation.trim(), "").into_owned()
}

/// Walk the whole tree and collect every recognized decorated definition.
pub fn extract_definitions(parsed: &ParsedSource) -> Vec<Extracted> {
    let mut out = Vec::new();
    visit(parsed.root(), &parsed.source, &mut out);
    out
}

fn visit(node: Node<'_>, source: &str, out: &mut Vec<Extracted>) {
    if node.kind() == "decorated_definition" {
        if let Some(extracted) = extract_decorated(node, source) {
            out.push(extracted);
        }
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, source, out);
    }
}

fn extract_decorated(node: Node<'_>, source: &str) -> Option<Extracted> {
    let decorators = read_decorators(node, source);
    let first = decorators.first()?;
    let definition = node.child_by_field_name("definition")?;

    match first.kind {
        kind if kind.is_action() => {
            if definition.kind() != "function_definition" {
                return None;
            }
            Some(Extracted::Function(build_function(first, definition, source)))
        }
        DecoratorKind::Assistant => {
            if definition.kind() != "function_definition" {
                return None;
            }
            Some(Extracted::Assistant(build_assistant(
                &decorators,
                definition,
                source,
            )))
        }
        DecoratorKind::Dataclass => {
            if definition.kind() != "class_definition" {
                return None;
            }
            Some(Extracted::Dataclass(build_dataclass(definition, source)))
        }
        _ => {
            debug!(decorator = %first.name, line = node.start_position().row + 1, "ignoring decorated definition");
            None
        }
    }
}

fn definition_name(definition: Node<'_>, source: &str) -> String {
    definition
        .child_by_field_name("name")
        .map(|n| clean_quotes(node_text(n, source)))
        .unwrap_or_default()
}

/// `(name, raw annotation)` for every named argument, in declaration order.
/// Splat and separator markers are skipped.
fn typed_arguments(function: Node<'_>, source: &str) -> Vec<Param> {
    let Some(parameters) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        let (name_node, type_node) = match parameter.kind() {
            "identifier" => (Some(parameter), None),
            "typed_parameter" => (
                parameter.named_child(0).filter(|n| n.kind() == "identifier"),
                parameter.child_by_field_name("type"),
            ),
            "default_parameter" => (parameter.child_by_field_name("name"), None),
            "typed_default_parameter" => (
                parameter.child_by_field_name("name"),
                parameter.child_by_field_name("type"),
            ),
            _ => (None, None),
        };
        if let Some(name_node) = name_node {
            params.push(Param::new(
                node_text(name_node, source),
                type_node.map(|t| node_text(t, source)).unwrap_or(""),
            ));
        }
    }
    params
}

fn build_function(decorator: &Decorator, function: Node<'_>, source: &str) -> FunctionSignature {
    let module = decorator
        .keyword("name")
        .filter(|value| value.contains('/'))
        .and_then(|value| value.split('/').next())
        .map(clean_quotes)
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());

    let parameters = typed_arguments(function, source)
        .into_iter()
        .map(|p| Param::new(p.name, strip_module_qualifier(&p.type_)))
        .collect();

    let return_type = function
        .child_by_field_name("return_type")
        .map(|t| strip_module_qualifier(node_text(t, source)))
        .unwrap_or_default();

    FunctionSignature {
        name: definition_name(function, source),
        parameters,
        return_type,
        module,
    }
}

fn build_assistant(decorators: &[Decorator], function: Node<'_>, source: &str) -> AssistantSignature {
    let arguments = typed_arguments(function, source);
    let parameters = decorators[1..]
        .iter()
        .filter(|d| d.kind == DecoratorKind::Parameter)
        .map(|d| {
            let name = d.argument(0).unwrap_or_default();
            let type_ = arguments
                .iter()
                .find(|a| !name.is_empty() && a.name == name)
                .map(|a| a.type_.clone())
                .unwrap_or_default();
            AssistantParam {
                name,
                type_,
                assistant_name: d.argument(1).unwrap_or_default(),
            }
        })
        .collect();

    AssistantSignature {
        action_id: decorators[0].argument(0).unwrap_or_default(),
        name: definition_name(function, source),
        parameters,
    }
}

fn build_dataclass(class: Node<'_>, source: &str) -> Dataclass {
    let mut members = Vec::new();
    if let Some(body) = class.child_by_field_name("body") {
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(assignment) = statement.named_child(0).filter(|n| n.kind() == "assignment")
            else {
                continue;
            };
            let Some(left) = assignment.child_by_field_name("left") else {
                continue;
            };
            let type_ = assignment
                .child_by_field_name("type")
                .map(|t| strip_module_qualifier(node_text(t, source)))
                .unwrap_or_default();
            members.push(Param::new(node_text(left, source), type_));
        }
    }
    Dataclass {
        name: definition_name(class, source),
        members,
    }
}

/// Module declared by an adapter's `__init__` through `super().__init__("...")`.
pub fn find_adapter_module(parsed: &ParsedSource) -> String {
    let mut module = String::new();
    find_module_in(parsed.root(), &parsed.source, &mut module);
    module
}

fn find_module_in(node: Node<'_>, source: &str, module: &mut String) {
    if node.kind() == "function_definition" && definition_name(node, source) == "__init__" {
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for statement in body.named_children(&mut cursor) {
                if let Some(caps) = SUPER_MODULE_RE.captures(node_text(statement, source)) {
                    *module = caps[1].to_string();
                }
            }
        }
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        find_module_in(child, source, module);
    }
}

/// Actions, dataclasses and adapter module of one parsed file.
pub fn extract_file_data(parsed: &ParsedSource) -> FileData {
    let mut data = FileData {
        path: parsed.path.clone(),
        module: find_adapter_module(parsed),
        ..Default::default()
    };
    for extracted in extract_definitions(parsed) {
        match extracted {
            Extracted::Function(f) => data.functions.push(f),
            Extracted::Dataclass(d) => data.dataclasses.push(d),
            Extracted::Assistant(_) => {}
        }
    }
    data
}

pub fn extract_assistant_signatures(parsed: &ParsedSource) -> Vec<AssistantSignature> {
    extract_definitions(parsed)
        .into_iter()
        .filter_map(|e| match e {
            Extracted::Assistant(a) => Some(a),
            _ => None,
        })
        .collect()
}

/// Adapter file data, or `None` when the file is absent or holds nothing
/// relevant. Parse failures propagate.
pub fn build_file_data(path: &Path) -> LabstubResult<Option<FileData>> {
    let Some(parsed) = parse_file(path)? else {
        debug!(path = %path.display(), "adapter file missing");
        return Ok(None);
    };
    let data = extract_file_data(&parsed);
    if data.is_empty() {
        return Ok(None);
    }
    debug!(
        path = %path.display(),
        functions = data.functions.len(),
        dataclasses = data.dataclasses.len(),
        "extracted adapter signatures"
    );
    Ok(Some(data))
}

/// Assistant stubs in `path`; a missing file yields an empty list.
pub fn build_assistant_signatures(path: &Path) -> LabstubResult<Vec<AssistantSignature>> {
    match parse_file(path)? {
        Some(parsed) => Ok(extract_assistant_signatures(&parsed)),
        None => {
            debug!(path = %path.display(), "assistant stub file missing");
            Ok(Vec::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
