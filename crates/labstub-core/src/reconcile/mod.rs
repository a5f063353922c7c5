//! Reconciliation of local assistant stubs against remote assistant definitions.
//!
//! A stub stays valid while its `@parameter` names are exactly the remote
//! input parameter names and every pair passes the type table in [`types`].

pub mod labs;
pub mod types;

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::models::{AssistantSignature, ReconciliationResult, RemoteAssistant};

pub const PARAMETER_MISMATCH: &str = "Param length or naming mismatch between stub & cloud";
pub const UNKNOWN_ASSISTANT: &str = "Assistant does not match a known lab or assistant in the cloud";

/// Outcome of checking one local stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Local and remote parameter-name sets differ (either direction).
    ParameterMismatch,
    /// Names agree but these local parameter positions have incompatible types.
    BadTypes(Vec<usize>),
    /// No remote assistant carries the stub's action id.
    UnknownAssistant,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn message(&self) -> String {
        match self {
            Verdict::Valid => String::new(),
            Verdict::ParameterMismatch => PARAMETER_MISMATCH.to_string(),
            Verdict::BadTypes(indices) => {
                let joined: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                format!("Bad type on param at indices {}", joined.join(","))
            }
            Verdict::UnknownAssistant => UNKNOWN_ASSISTANT.to_string(),
        }
    }

    pub fn result(&self) -> ReconciliationResult {
        match self {
            Verdict::Valid => ReconciliationResult::ok(),
            other => ReconciliationResult::fail(other.message()),
        }
    }
}

/// Check a stub against the remote assistant it claims to implement.
pub fn check_signature(local: &AssistantSignature, remote: &RemoteAssistant) -> Verdict {
    let local_names: HashSet<&str> = local
        .parameters
        .iter()
        .map(|p| p.assistant_name.as_str())
        .collect();
    let remote_names: HashSet<&str> = remote
        .input_parameters()
        .map(|p| p.type_info.name.as_str())
        .collect();
    if local_names != remote_names {
        return Verdict::ParameterMismatch;
    }

    let bad: Vec<usize> = local
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, param)| {
            remote
                .input_parameter(&param.assistant_name)
                .map(|rp| !types::compatible(&param.type_, &rp.type_info))
                .unwrap_or(true)
        })
        .map(|(index, _)| index)
        .collect();

    if bad.is_empty() {
        Verdict::Valid
    } else {
        Verdict::BadTypes(bad)
    }
}

/// Find the remote assistant whose id equals the stub's action id, then check it.
pub fn reconcile(local: &AssistantSignature, remotes: &[RemoteAssistant]) -> Verdict {
    match remotes.iter().find(|r| r.id == local.action_id) {
        Some(remote) => check_signature(local, remote),
        None => Verdict::UnknownAssistant,
    }
}

/// Action ids used by more than one local stub, with the positions of every use.
pub fn find_duplicate_action_ids(locals: &[AssistantSignature]) -> IndexMap<String, Vec<usize>> {
    let mut seen: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, signature) in locals.iter().enumerate() {
        seen.entry(signature.action_id.clone())
            .or_default()
            .push(index);
    }
    seen.retain(|_, positions| positions.len() > 1);
    for (action_id, positions) in &seen {
        let names: Vec<&str> = positions.iter().map(|&i| locals[i].name.as_str()).collect();
        warn!(%action_id, stubs = ?names, "assistant id declared by more than one stub");
    }
    seen
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{AssistantParam, RemoteParameter, SubType, TypeInfo};

    pub(crate) fn local(action_id: &str, params: &[(&str, &str, &str)]) -> AssistantSignature {
        AssistantSignature {
            action_id: action_id.into(),
            name: "foo".into(),
            parameters: params
                .iter()
                .map(|(name, type_, assistant_name)| AssistantParam {
                    name: name.to_string(),
                    type_: type_.to_string(),
                    assistant_name: assistant_name.to_string(),
                })
                .collect(),
        }
    }

    pub(crate) fn remote(id: &str, params: &[(&str, &str, &[&str])]) -> RemoteAssistant {
        RemoteAssistant {
            id: id.into(),
            name: format!("Remote {id}"),
            constraint: None,
            parameters: params
                .iter()
                .map(|(name, type_, subs)| RemoteParameter {
                    id: None,
                    input: true,
                    index: None,
                    type_info: TypeInfo {
                        name: name.to_string(),
                        type_: type_.to_string(),
                        sub_types: subs
                            .iter()
                            .map(|s| SubType {
                                type_: s.to_string(),
                            })
                            .collect(),
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_matching_signature_is_valid() {
        let result = reconcile(
            &local("X1", &[("a", "str", "Alpha")]),
            &[remote("X1", &[("Alpha", "STRING", &[])])],
        )
        .result();
        assert_eq!(result, ReconciliationResult::ok());
        assert_eq!(result.error, "");
    }

    #[test]
    fn test_type_mismatch_reports_indices() {
        let result = reconcile(
            &local("X1", &[("a", "str", "Alpha")]),
            &[remote("X1", &[("Alpha", "INT", &[])])],
        )
        .result();
        assert_eq!(result.code, 1);
        assert!(result.error.contains("indices 0"), "{}", result.error);
    }

    #[test]
    fn test_multiple_bad_indices_reported_together() {
        let verdict = reconcile(
            &local(
                "X1",
                &[
                    ("a", "int", "Alpha"),
                    ("b", "str", "Beta"),
                    ("c", "List[int]", "Gamma"),
                ],
            ),
            &[remote(
                "X1",
                &[
                    ("Gamma", "ARRAY", &["STRING"]),
                    ("Beta", "STRING", &[]),
                    ("Alpha", "FLOAT", &[]),
                ],
            )],
        );
        assert_eq!(verdict, Verdict::BadTypes(vec![0, 2]));
        assert_eq!(verdict.message(), "Bad type on param at indices 0,2");
    }

    #[test]
    fn test_name_mismatch_in_either_direction() {
        let a_b = local("X1", &[("a", "str", "a"), ("b", "str", "b")]);
        let a_c = remote("X1", &[("a", "STRING", &[]), ("c", "STRING", &[])]);
        assert_eq!(check_signature(&a_b, &a_c), Verdict::ParameterMismatch);

        let longer_remote = remote(
            "X1",
            &[("a", "STRING", &[]), ("b", "STRING", &[]), ("c", "STRING", &[])],
        );
        assert_eq!(check_signature(&a_b, &longer_remote), Verdict::ParameterMismatch);

        let a_only = remote("X1", &[("a", "STRING", &[])]);
        assert_eq!(check_signature(&a_b, &a_only), Verdict::ParameterMismatch);
        assert_eq!(
            Verdict::ParameterMismatch.result().error,
            PARAMETER_MISMATCH
        );
    }

    #[test]
    fn test_output_parameters_are_not_part_of_the_contract() {
        let mut assistant = remote("X1", &[("Alpha", "STRING", &[]), ("Result", "INT", &[])]);
        assistant.parameters[1].input = false;
        let verdict = check_signature(&local("X1", &[("a", "str", "Alpha")]), &assistant);
        assert!(verdict.is_valid());
    }

    #[test]
    fn test_unknown_assistant() {
        let verdict = reconcile(
            &local("X2", &[("a", "str", "Alpha")]),
            &[remote("X1", &[("Alpha", "STRING", &[])])],
        );
        assert_eq!(verdict, Verdict::UnknownAssistant);
        assert_eq!(verdict.result().code, 1);
        assert_eq!(verdict.result().error, UNKNOWN_ASSISTANT);
    }

    #[test]
    fn test_empty_signatures_match() {
        assert!(reconcile(&local("X1", &[]), &[remote("X1", &[])]).is_valid());
    }

    #[test]
    fn test_find_duplicate_action_ids() {
        let locals = vec![local("A", &[]), local("B", &[]), local("A", &[]), local("C", &[])];
        let dups = find_duplicate_action_ids(&locals);
        assert_eq!(dups.len(), 1);
        assert_eq!(dups["A"], vec![0, 2]);
        assert!(find_duplicate_action_ids(&locals[1..]).is_empty());
    }
}
