//! GraphQL documents and reply envelopes.

use serde::{Deserialize, Serialize};

use crate::models::{ActionRef, Asset, ConfigDocument, Lab, RemoteAssistant};

pub const LABS: &str = "query labs { labs { id name } }";

pub const ASSISTANTS: &str = "query assistants { assistants { name id constraint { labId } \
parameters { id input index typeInfo { name type subTypes { type } } } } }";

pub const CONFIGS: &str = "query configs($labId: ID!) { lab(id: $labId) { assets { id name \
loadingConfigId loadingConfigOrder labId } } }";

pub const ORG_CONFIG: &str =
    "query orgConfig { getCurrentOrgConfiguration { configValuesDocument schemaDocument } }";

pub const LAB_CONFIG: &str = "query labConfigs($labId: ID!) { getCurrentLabConfiguration(labId: $labId) \
{ configValuesDocument schemaDocument } }";

pub const ACTION: &str = "query action($actionId: ID!) { action(id: $actionId) { id } }";

pub const DELETE_ACTION: &str = "mutation deleteAction($actionId: ID!) { deleteAction(id: $actionId) }";

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LabsReply {
    pub labs: Vec<Lab>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantsReply {
    pub assistants: Vec<RemoteAssistant>,
}

#[derive(Debug, Deserialize)]
pub struct LabAssets {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigsReply {
    pub lab: Option<LabAssets>,
}

#[derive(Debug, Deserialize)]
pub struct OrgConfigReply {
    #[serde(rename = "getCurrentOrgConfiguration")]
    pub current: Option<ConfigDocument>,
}

#[derive(Debug, Deserialize)]
pub struct LabConfigReply {
    #[serde(rename = "getCurrentLabConfiguration")]
    pub current: Option<ConfigDocument>,
}

#[derive(Debug, Deserialize)]
pub struct ActionReply {
    pub action: Option<ActionRef>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteActionReply {
    #[serde(rename = "deleteAction")]
    pub deleted: Option<serde_json::Value>,
}

impl DeleteActionReply {
    /// The mutation returns a bare scalar; `false` and `null` mean nothing was deleted.
    pub fn was_deleted(&self) -> bool {
        match &self.deleted {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(_) => true,
        }
    }
}
