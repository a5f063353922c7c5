//! Assistant stub file built from remote assistant definitions.
//!
//! Parameters a local stub already declares keep their local position and
//! argument name; parameters only the remote side knows are appended with a
//! generated `arg_<snake>` name. Regeneration therefore never renames an
//! argument the operator chose, even when it differs from `arg_<snake>`.

use std::collections::HashSet;

use crate::models::{AssistantSignature, RemoteAssistant, RemoteParameter};
use crate::naming::{argument_name, assistant_function_name};
use crate::reconcile::types::python_type_for;

const ASSISTANT_IMPORTS: &str = "# flake8: noqa\n\
from typing import Any, List\n\
\n\
from artificial.workflows.decorators import assistant, parameter\n\
\n\
\n";

/// One parameter in output order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedParam<'a> {
    pub arg_name: String,
    pub remote: &'a RemoteParameter,
}

/// Locally known parameters first (local declaration order), then the
/// remote-only ones (remote order).
pub fn ordered_parameters<'a>(
    remote: &'a RemoteAssistant,
    local: Option<&AssistantSignature>,
) -> Vec<OrderedParam<'a>> {
    let mut ordered = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();

    if let Some(local) = local {
        for param in &local.parameters {
            let Some(remote_param) = remote.input_parameter(&param.assistant_name) else {
                continue;
            };
            if !placed.insert(remote_param.type_info.name.as_str()) {
                continue;
            }
            let arg_name = if param.name.is_empty() {
                argument_name(&remote_param.type_info.name)
            } else {
                param.name.clone()
            };
            ordered.push(OrderedParam {
                arg_name,
                remote: remote_param,
            });
        }
    }

    for remote_param in remote.input_parameters() {
        if placed.insert(remote_param.type_info.name.as_str()) {
            ordered.push(OrderedParam {
                arg_name: argument_name(&remote_param.type_info.name),
                remote: remote_param,
            });
        }
    }
    ordered
}

pub fn render_assistant(remote: &RemoteAssistant, local: Option<&AssistantSignature>) -> String {
    let params = ordered_parameters(remote, local);
    let mut out = format!("@assistant('{}')\n", remote.id);
    for param in &params {
        out.push_str(&format!(
            "@parameter('{}', action_parameter_name='{}')\n",
            param.arg_name, param.remote.type_info.name
        ));
    }
    out.push_str(&format!("async def {}(\n", assistant_function_name(&remote.name)));
    for param in &params {
        out.push_str(&format!(
            "    {}: {},\n",
            param.arg_name,
            python_type_for(&param.remote.type_info)
        ));
    }
    out.push_str(") -> None:\n    pass\n\n\n");
    out
}

/// Full assistant stub file. The first local stub carrying a remote id
/// decides that assistant's parameter order.
pub fn generate_assistant_stubs(remotes: &[RemoteAssistant], locals: &[AssistantSignature]) -> String {
    let mut out = super::banner();
    out.push_str(ASSISTANT_IMPORTS);
    for remote in remotes {
        let local = locals.iter().find(|s| s.action_id == remote.id);
        out.push_str(&render_assistant(remote, local));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::BANNER;
    use crate::parser::signatures::extract_assistant_signatures;
    use crate::parser::source::parse_source;
    use crate::reconcile::reconcile;
    use crate::reconcile::tests::{local, remote};

    #[test]
    fn test_local_parameters_come_first() {
        let mut assistant = remote(
            "X1",
            &[
                ("Alpha", "STRING", &[]),
                ("Beta", "INT", &[]),
                ("Gamma", "ARRAY", &["FLOAT"]),
            ],
        );
        assistant.name = "Plate Reader".into();
        let stub = local("X1", &[("my_gamma", "List[float]", "Gamma"), ("gone", "str", "Removed")]);

        let names: Vec<String> = ordered_parameters(&assistant, Some(&stub))
            .into_iter()
            .map(|p| p.arg_name)
            .collect();
        assert_eq!(names, vec!["my_gamma", "arg_alpha", "arg_beta"]);
    }

    #[test]
    fn test_regeneration_keeps_hand_renamed_argument() {
        let mut assistant = remote("X1", &[("Target Volume", "FLOAT", &[]), ("Plate", "EQUIPMENT_REF", &[])]);
        assistant.name = "Dispense".into();
        let stub = local("X1", &[("volume_ul", "float", "Target Volume")]);

        let text = render_assistant(&assistant, Some(&stub));
        assert!(text.contains("@parameter('volume_ul', action_parameter_name='Target Volume')\n"));
        assert!(text.contains("@parameter('arg_plate', action_parameter_name='Plate')\n"));
        assert!(text.contains("    volume_ul: float,\n    arg_plate: str,\n"));
        assert!(!text.contains("arg_target_volume"));
    }

    #[test]
    fn test_render_assistant_layout() {
        let mut assistant = remote("X1", &[("Target Volume", "FLOAT", &[])]);
        assistant.name = "Plate Reader".into();
        assert_eq!(
            render_assistant(&assistant, None),
            "@assistant('X1')\n\
             @parameter('arg_target_volume', action_parameter_name='Target Volume')\n\
             async def assistant_plate_reader(\n    arg_target_volume: float,\n) -> None:\n    pass\n\n\n"
        );
    }

    #[test]
    fn test_generated_file_reconciles_cleanly() {
        let mut wells = remote("X1", &[("Wells", "ARRAY", &["INT"]), ("Plate", "EQUIPMENT_REF", &[])]);
        wells.name = "Read Wells".into();
        let mut shake = remote("X2", &[("Seconds", "INT", &[])]);
        shake.name = "Shake".into();
        let remotes = vec![wells, shake];

        let text = generate_assistant_stubs(&remotes, &[]);
        let lines: Vec<&str> = text.lines().take(2).collect();
        assert_eq!(lines, BANNER.to_vec());

        let parsed = parse_source(&text, "assistants.py").unwrap();
        let stubs = extract_assistant_signatures(&parsed);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].name, "assistant_read_wells");
        for stub in &stubs {
            assert!(reconcile(stub, &remotes).is_valid(), "{}", stub.name);
        }
    }
}
