//! Call-site snippets for inserting an action or assistant call.

use indexmap::IndexMap;

use super::actions::action_names;
use crate::models::{AssistantSignature, FileData, FunctionSignature};

fn render_call<'a>(name: &str, class_name: &str, params: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = if class_name.is_empty() {
        format!("await {name}(\n")
    } else {
        format!("await {class_name}.{name}(\n")
    };
    for (param, type_) in params {
        if param == "self" || type_ == "ActionContext" {
            continue;
        }
        out.push_str(&format!("\t\t{param}= ,\n"));
    }
    out.push_str("\t)");
    out
}

pub fn function_call(signature: &FunctionSignature, class_name: &str) -> String {
    render_call(
        &signature.name,
        class_name,
        signature
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_.as_str())),
    )
}

pub fn assistant_call(signature: &AssistantSignature, class_name: &str) -> String {
    render_call(
        &signature.name,
        class_name,
        signature
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_.as_str())),
    )
}

/// Snippets calling each generated action stub of `file`, grouped by the
/// action's module tag.
pub fn action_calls(file: &FileData) -> IndexMap<String, Vec<String>> {
    file.functions_by_module()
        .into_iter()
        .map(|(module, functions)| {
            let calls = functions
                .into_iter()
                .map(|signature| {
                    let (_, stub_name) = action_names(signature, &file.module);
                    let stub = FunctionSignature {
                        name: stub_name,
                        ..signature.clone()
                    };
                    function_call(&stub, "")
                })
                .collect();
            (module.to_string(), calls)
        })
        .collect()
}
