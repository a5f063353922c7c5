//! GraphQL client for the lab management backend.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use super::queries::{
    self, ActionReply, AssistantsReply, ConfigsReply, DeleteActionReply, GraphQlRequest, GraphQlResponse,
    LabConfigReply, LabsReply, OrgConfigReply,
};
use super::retry::{execute_with_retry, RetryConfig};
use crate::config::Config;
use crate::errors::{LabstubError, LabstubResult};
use crate::models::{ActionRef, Asset, ConfigDocument, Lab, RemoteAssistant};

/// Everything the tooling reads from or changes on the backend.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn list_labs(&self) -> LabstubResult<Vec<Lab>>;
    async fn list_assistants(&self) -> LabstubResult<Vec<RemoteAssistant>>;
    /// Assets of one lab. An unknown lab yields an empty list.
    async fn get_configs(&self, lab_id: &str) -> LabstubResult<Vec<Asset>>;
    async fn get_org_config(&self) -> LabstubResult<Option<ConfigDocument>>;
    async fn get_lab_config(&self, lab_id: &str) -> LabstubResult<Option<ConfigDocument>>;
    async fn get_action(&self, action_id: &str) -> LabstubResult<Option<ActionRef>>;
    /// Returns whether the backend reported a deletion.
    async fn delete_action(&self, action_id: &str) -> LabstubResult<bool>;
}

#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    org: String,
    retry: RetryConfig,
}

impl GraphQlClient {
    pub fn new(config: &Config) -> LabstubResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LabstubError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
            token: config.token.clone(),
            org: config.org().to_string(),
            retry: config.retry.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> LabstubResult<T> {
        execute_with_retry(&self.retry, operation, || self.send_once(query, &variables)).await
    }

    async fn send_once<T: DeserializeOwned>(&self, query: &str, variables: &serde_json::Value) -> LabstubResult<T> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(COOKIE, format!("artificial-org={}", self.org))
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LabstubError::Transport(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LabstubError::Api(format!("HTTP {status}: {}", body.trim())));
        }

        let reply: GraphQlResponse<T> = response.json().await?;
        if !reply.errors.is_empty() {
            let messages: Vec<&str> = reply.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(LabstubError::Api(messages.join("; ")));
        }
        reply
            .data
            .ok_or_else(|| LabstubError::Api("response carried no data".into()))
    }
}

#[async_trait]
impl SchemaSource for GraphQlClient {
    #[instrument(skip(self))]
    async fn list_labs(&self) -> LabstubResult<Vec<Lab>> {
        let reply: LabsReply = self.execute("labs", queries::LABS, json!({})).await?;
        debug!(count = reply.labs.len(), "fetched labs");
        Ok(reply.labs)
    }

    #[instrument(skip(self))]
    async fn list_assistants(&self) -> LabstubResult<Vec<RemoteAssistant>> {
        let reply: AssistantsReply = self.execute("assistants", queries::ASSISTANTS, json!({})).await?;
        debug!(count = reply.assistants.len(), "fetched assistants");
        Ok(reply.assistants)
    }

    #[instrument(skip(self))]
    async fn get_configs(&self, lab_id: &str) -> LabstubResult<Vec<Asset>> {
        let reply: ConfigsReply = self
            .execute("configs", queries::CONFIGS, json!({ "labId": lab_id }))
            .await?;
        Ok(reply.lab.map(|lab| lab.assets).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_org_config(&self) -> LabstubResult<Option<ConfigDocument>> {
        let reply: OrgConfigReply = self.execute("orgConfig", queries::ORG_CONFIG, json!({})).await?;
        Ok(reply.current)
    }

    #[instrument(skip(self))]
    async fn get_lab_config(&self, lab_id: &str) -> LabstubResult<Option<ConfigDocument>> {
        let reply: LabConfigReply = self
            .execute("labConfigs", queries::LAB_CONFIG, json!({ "labId": lab_id }))
            .await?;
        Ok(reply.current)
    }

    #[instrument(skip(self))]
    async fn get_action(&self, action_id: &str) -> LabstubResult<Option<ActionRef>> {
        let reply: ActionReply = self
            .execute("action", queries::ACTION, json!({ "actionId": action_id }))
            .await?;
        Ok(reply.action)
    }

    #[instrument(skip(self))]
    async fn delete_action(&self, action_id: &str) -> LabstubResult<bool> {
        let reply: DeleteActionReply = self
            .execute("deleteAction", queries::DELETE_ACTION, json!({ "actionId": action_id }))
            .await?;
        Ok(reply.was_deleted())
    }
}
