//! Shared typed models used across extraction, reconciliation, and generation.
//!
//! Local models are built by the extractor from Python source and are never
//! mutated afterwards. Remote models mirror the GraphQL replies one-to-one and
//! are read-only snapshots for the lifetime of a single refresh pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Grouping tag used when an action does not declare `name='<module>/...'`.
pub const DEFAULT_MODULE: &str = "Default";

// ---------------------------------------------------------------------------
// Local signatures
// ---------------------------------------------------------------------------

/// A single typed argument, or a dataclass member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Raw source spelling of the annotation; empty when absent.
    #[serde(rename = "type")]
    pub type_: String,
}

impl Param {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: type_.into(),
        }
    }
}

/// An `@action` / `@substrate_action` decorated function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    pub name: String,
    /// Declaration order is preserved; generated call sites depend on it.
    pub parameters: Vec<Param>,
    pub return_type: String,
    pub module: String,
}

/// A `@parameter` entry of an `@assistant` stub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantParam {
    /// Local Python argument name.
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    /// Name of the parameter in the remote assistant definition.
    pub assistant_name: String,
}

/// An `@assistant('<id>')` decorated function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSignature {
    pub action_id: String,
    pub name: String,
    pub parameters: Vec<AssistantParam>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataclass {
    pub name: String,
    pub members: Vec<Param>,
}

/// Everything extracted from one adapter source file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub path: String,
    /// Adapter module declared through `super().__init__("...")`, or empty.
    pub module: String,
    pub functions: Vec<FunctionSignature>,
    pub dataclasses: Vec<Dataclass>,
}

impl FileData {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.dataclasses.is_empty() && self.module.is_empty()
    }

    /// Actions grouped by their `module` tag, in first-seen order.
    pub fn functions_by_module(&self) -> IndexMap<&str, Vec<&FunctionSignature>> {
        let mut grouped: IndexMap<&str, Vec<&FunctionSignature>> = IndexMap::new();
        for function in &self.functions {
            grouped
                .entry(function.module.as_str())
                .or_default()
                .push(function);
        }
        grouped
    }
}

// ---------------------------------------------------------------------------
// Remote schema
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lab {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    #[serde(default)]
    pub lab_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubType {
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub sub_types: Vec<SubType>,
}

fn default_input() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteParameter {
    #[serde(default)]
    pub id: Option<String>,
    /// Outputs are flagged `false`; a reply that omits the flag is an input.
    #[serde(default = "default_input")]
    pub input: bool,
    #[serde(default)]
    pub index: Option<i64>,
    pub type_info: TypeInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAssistant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub constraint: Option<Constraint>,
    #[serde(default)]
    pub parameters: Vec<RemoteParameter>,
}

impl RemoteAssistant {
    pub fn lab_id(&self) -> &str {
        self.constraint
            .as_ref()
            .and_then(|c| c.lab_id.as_deref())
            .unwrap_or("")
    }

    /// Parameters taking part in the stub contract.
    pub fn input_parameters(&self) -> impl Iterator<Item = &RemoteParameter> {
        self.parameters.iter().filter(|p| p.input)
    }

    pub fn input_parameter(&self, name: &str) -> Option<&RemoteParameter> {
        self.input_parameters().find(|p| p.type_info.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub loading_config_id: Option<String>,
    #[serde(default)]
    pub loading_config_order: Option<i64>,
    #[serde(default)]
    pub lab_id: Option<String>,
}

/// Org or lab configuration document pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub config_values_document: String,
    #[serde(default)]
    pub schema_document: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRef {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Reconciliation outcome
// ---------------------------------------------------------------------------

/// Flat verdict handed to presentation code: `code` 0 on success, 1 otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub code: u8,
    pub error: String,
}

impl ReconciliationResult {
    pub fn ok() -> Self {
        Self {
            code: 0,
            error: String::new(),
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            code: 1,
            error: error.into(),
        }
    }
}
