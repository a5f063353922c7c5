//! Per-lab status rows for assistant stubs.
//!
//! Plain data only: a presentation layer renders these however it likes.

use std::collections::HashSet;

use serde::Serialize;

use super::{find_duplicate_action_ids, reconcile, Verdict};
use crate::models::{AssistantSignature, Lab, RemoteAssistant};
use crate::naming::{lab_class_name, natural_cmp};

/// Synthetic lab holding stubs whose id matches no remote assistant.
pub const UNKNOWN_LAB: &str = "UNKNOWN";
pub const NO_STUB: &str = "No stub for cloud assistant";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum AssistantStatus {
    Valid,
    Invalid(String),
    /// Remote assistant in this lab that no local stub implements.
    NoStub,
    Unknown,
    /// A second (or later) stub reusing an already claimed action id.
    Duplicate(String),
}

impl AssistantStatus {
    pub fn reason(&self) -> Option<String> {
        match self {
            AssistantStatus::Valid => None,
            AssistantStatus::Invalid(reason) => Some(reason.clone()),
            AssistantStatus::NoStub => Some(NO_STUB.to_string()),
            AssistantStatus::Unknown => Some(Verdict::UnknownAssistant.message()),
            AssistantStatus::Duplicate(action_id) => {
                Some(format!("Assistant id {action_id} is already used by another stub"))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRow {
    pub label: String,
    pub lab_id: String,
    pub lab_name: String,
    /// Absent for `NoStub` rows.
    pub signature: Option<AssistantSignature>,
    pub status: AssistantStatus,
}

impl AssistantRow {
    pub fn class_name(&self) -> String {
        lab_class_name(&self.lab_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabRow {
    pub lab: Lab,
    pub assistants: Vec<AssistantRow>,
}

/// Build status rows for every lab plus the `UNKNOWN` lab.
///
/// Labs without rows are dropped; labs and rows are naturally sorted by label.
/// A remote assistant without `constraint.labId` belongs to the `UNKNOWN` lab:
/// its stub is still reconciled there, and without a stub it is not listed.
pub fn build_lab_rows(
    labs: &[Lab],
    remotes: &[RemoteAssistant],
    locals: &[AssistantSignature],
) -> Vec<LabRow> {
    let duplicates: HashSet<usize> = find_duplicate_action_ids(locals)
        .values()
        .flat_map(|positions| positions.iter().skip(1).copied())
        .collect();

    let unknown = Lab {
        id: String::new(),
        name: UNKNOWN_LAB.to_string(),
    };

    let mut rows: Vec<LabRow> = labs
        .iter()
        .chain(std::iter::once(&unknown))
        .map(|lab| LabRow {
            lab: lab.clone(),
            assistants: rows_for_lab(lab, remotes, locals, &duplicates),
        })
        .filter(|row| !row.assistants.is_empty())
        .collect();

    rows.sort_by(|a, b| natural_cmp(&a.lab.name, &b.lab.name));
    for row in &mut rows {
        row.assistants.sort_by(|a, b| natural_cmp(&a.label, &b.label));
    }
    rows
}

fn rows_for_lab(
    lab: &Lab,
    remotes: &[RemoteAssistant],
    locals: &[AssistantSignature],
    duplicates: &HashSet<usize>,
) -> Vec<AssistantRow> {
    let is_unknown_lab = lab.name == UNKNOWN_LAB && lab.id.is_empty();
    let row = |label: &str, signature: Option<&AssistantSignature>, status| AssistantRow {
        label: label.to_string(),
        lab_id: lab.id.clone(),
        lab_name: lab.name.clone(),
        signature: signature.cloned(),
        status,
    };

    let mut rows = Vec::new();
    for (index, signature) in locals.iter().enumerate() {
        let found = remotes.iter().find(|r| r.id == signature.action_id);
        match found {
            Some(remote) if remote.lab_id() == lab.id => {
                let status = if duplicates.contains(&index) {
                    AssistantStatus::Duplicate(signature.action_id.clone())
                } else {
                    match reconcile(signature, remotes) {
                        Verdict::Valid => AssistantStatus::Valid,
                        verdict => AssistantStatus::Invalid(verdict.message()),
                    }
                };
                rows.push(row(&signature.name, Some(signature), status));
            }
            None if is_unknown_lab => {
                let status = if duplicates.contains(&index) {
                    AssistantStatus::Duplicate(signature.action_id.clone())
                } else {
                    AssistantStatus::Unknown
                };
                rows.push(row(&signature.name, Some(signature), status));
            }
            _ => {}
        }
    }

    if !is_unknown_lab {
        for remote in remotes.iter().filter(|r| r.lab_id() == lab.id) {
            let stubbed = rows
                .iter()
                .any(|r| r.signature.as_ref().map(|s| s.action_id == remote.id).unwrap_or(false));
            if !stubbed {
                rows.push(row(&remote.name, None, AssistantStatus::NoStub));
            }
        }
    }
    rows
}
