//! Adapter action stub file.

use crate::models::{Dataclass, FileData, FunctionSignature, Param};

const ACTION_IMPORTS: &str = "from typing import Any, Dict, List, Tuple\n\
from dataclasses import dataclass\n\
from artificial.workflows.decorators import action, return_parameter\n";

/// Context-only and self parameters never appear in a stub.
pub fn is_stub_parameter(param: &Param) -> bool {
    param.name != "self" && param.type_ != "ActionContext" && !param.name.contains("ioraw_")
}

fn render_param(param: &Param) -> String {
    if param.type_.is_empty() {
        param.name.clone()
    } else {
        format!("{}: {}", param.name, param.type_)
    }
}

/// `(action name, python function name)` for a signature in a file whose
/// adapter module is `module`.
pub fn action_names(signature: &FunctionSignature, module: &str) -> (String, String) {
    if module.is_empty() {
        (signature.name.clone(), signature.name.clone())
    } else {
        (
            format!("{module}/{}", signature.name),
            format!("{module}_{}", signature.name),
        )
    }
}

pub fn render_action(signature: &FunctionSignature, module: &str) -> String {
    let (action_name, function_name) = action_names(signature, module);
    let params: Vec<String> = signature
        .parameters
        .iter()
        .filter(|p| is_stub_parameter(p))
        .map(render_param)
        .collect();

    let mut out = String::from("\n");
    out.push_str(&format!(
        "@action(capability='', name='{action_name}', display_name=\"{}\")\n",
        signature.name
    ));
    out.push_str(&format!("async def {function_name}({})", params.join(", ")));
    if !signature.return_type.is_empty() {
        out.push_str(&format!(" -> {}", signature.return_type));
    }
    out.push_str(":\n    pass\n\n");
    out
}

pub fn render_dataclass(dataclass: &Dataclass) -> String {
    let mut out = format!("\n@dataclass\nclass {}:\n", dataclass.name);
    if dataclass.members.is_empty() {
        out.push_str("    pass\n");
    }
    for member in &dataclass.members {
        let type_ = if member.type_.is_empty() {
            "Any"
        } else {
            member.type_.as_str()
        };
        out.push_str(&format!("    {}: {}\n", member.name, type_));
    }
    out
}

/// Whether any action parameter or dataclass member across `all` mentions
/// `dataclass` by name.
pub fn is_referenced(dataclass: &Dataclass, all: &[FileData]) -> bool {
    all.iter().any(|file| {
        file.functions
            .iter()
            .flat_map(|f| f.parameters.iter())
            .chain(file.dataclasses.iter().flat_map(|d| d.members.iter()))
            .any(|p| p.type_.contains(&dataclass.name))
    })
}

/// Full stub file text for every extracted adapter file.
pub fn generate_action_stubs(files: &[FileData]) -> String {
    let mut out = super::banner();
    out.push_str(ACTION_IMPORTS);
    out.push('\n');
    for file in files {
        for dataclass in &file.dataclasses {
            if is_referenced(dataclass, files) {
                out.push_str(&render_dataclass(dataclass));
            }
        }
        for signature in &file.functions {
            out.push_str(&render_action(signature, &file.module));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
