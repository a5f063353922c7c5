//! Workspace configuration.
//!
//! Read from `<workspace>/tmp/merged.yaml`. The `artificial:` mapping holds
//! the connection settings, the optional `labstub:` mapping holds output
//! paths and network tuning. `LABSTUB_HOST` and `LABSTUB_TOKEN` override the
//! file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{LabstubError, LabstubResult};
use crate::remote::retry::RetryConfig;

pub const CONFIG_RELATIVE_PATH: &str = "tmp/merged.yaml";
pub const DEFAULT_ACTION_STUB_PATH: &str = "workflow/stubs_actions.py";
pub const DEFAULT_ASSISTANT_STUB_PATH: &str = "workflow/stubs_assistants.py";
pub const DEFAULT_ADAPTER_DIR: &str = "adapter";
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_ORG: &str = "artificial";

#[derive(Debug, Default, Deserialize)]
struct RawFile {
    #[serde(default)]
    artificial: Option<RawConnection>,
    #[serde(default)]
    labstub: Option<RawTooling>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnection {
    host: Option<String>,
    token: Option<String>,
    prefix: Option<String>,
    org_id: Option<String>,
    lab_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTooling {
    adapter_action_stub_path: Option<String>,
    assistant_stub_path: Option<String>,
    adapter_dir: Option<String>,
    timeout_ms: Option<u64>,
    retry: Option<RawRetry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRetry {
    initial_delay_ms: Option<u64>,
    max_delay_ms: Option<u64>,
    max_attempts: Option<u32>,
    jitter: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_root: PathBuf,
    pub host: String,
    pub token: String,
    pub prefix: String,
    pub org_id: String,
    pub lab_id: String,
    pub adapter_dir: PathBuf,
    pub action_stub_path: PathBuf,
    pub assistant_stub_path: PathBuf,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Config {
    /// Load from the workspace, falling back to defaults when the file is
    /// absent, then apply environment overrides.
    pub fn load(workspace_root: &Path) -> LabstubResult<Self> {
        let path = workspace_root.join(CONFIG_RELATIVE_PATH);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "reading config");
                Self::from_yaml_str(workspace_root, &text)?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::from_yaml_str(workspace_root, "")?
            }
            Err(err) => return Err(err.into()),
        };
        config.apply_overrides(
            std::env::var("LABSTUB_HOST").ok(),
            std::env::var("LABSTUB_TOKEN").ok(),
        );
        Ok(config)
    }

    pub fn from_yaml_str(workspace_root: &Path, text: &str) -> LabstubResult<Self> {
        let raw: RawFile = if text.trim().is_empty() {
            RawFile::default()
        } else {
            serde_yaml::from_str::<Option<RawFile>>(text)?.unwrap_or_default()
        };
        let connection = raw.artificial.unwrap_or_default();
        let tooling = raw.labstub.unwrap_or_default();
        let retry = tooling.retry.unwrap_or_default();

        let defaults = RetryConfig::default();
        let retry = RetryConfig::new()
            .with_max_attempts(retry.max_attempts.unwrap_or(defaults.max_attempts))
            .with_initial_delay(
                retry
                    .initial_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.initial_delay),
            )
            .with_max_delay(
                retry
                    .max_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.max_delay),
            )
            .with_jitter(retry.jitter.unwrap_or(defaults.jitter));

        let resolve = |value: Option<String>, default: &str| -> PathBuf {
            let value = value.filter(|v| !v.trim().is_empty());
            let relative = PathBuf::from(value.as_deref().unwrap_or(default));
            if relative.is_absolute() {
                relative
            } else {
                workspace_root.join(relative)
            }
        };

        Ok(Self {
            workspace_root: workspace_root.to_path_buf(),
            host: connection.host.unwrap_or_default(),
            token: connection.token.unwrap_or_default(),
            prefix: connection.prefix.unwrap_or_default(),
            org_id: connection.org_id.unwrap_or_default(),
            lab_id: connection.lab_id.unwrap_or_default(),
            adapter_dir: resolve(tooling.adapter_dir, DEFAULT_ADAPTER_DIR),
            action_stub_path: resolve(tooling.adapter_action_stub_path, DEFAULT_ACTION_STUB_PATH),
            assistant_stub_path: resolve(tooling.assistant_stub_path, DEFAULT_ASSISTANT_STUB_PATH),
            timeout: Duration::from_millis(tooling.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            retry,
        })
    }

    /// Non-empty overrides replace the file values.
    pub fn apply_overrides(&mut self, host: Option<String>, token: Option<String>) {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            debug!(%host, "host overridden from environment");
            self.host = host;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = token;
        }
    }

    /// GraphQL endpoint derived from `host`. A bare host gets `https://`.
    pub fn endpoint(&self) -> LabstubResult<String> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(LabstubError::Config(
                "no host configured; set artificial.host or LABSTUB_HOST".into(),
            ));
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(format!("{host}/graphql"))
        } else {
            Ok(format!("https://{host}/graphql"))
        }
    }

    /// Value for the organization cookie.
    pub fn org(&self) -> &str {
        if self.org_id.is_empty() {
            DEFAULT_ORG
        } else {
            &self.org_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_yaml_str(dir.path(), "").unwrap();
        assert_eq!(config.adapter_dir, dir.path().join("adapter"));
        assert_eq!(config.action_stub_path, dir.path().join("workflow/stubs_actions.py"));
        assert_eq!(config.assistant_stub_path, dir.path().join("workflow/stubs_assistants.py"));
        assert_eq!(config.timeout, Duration::from_millis(3000));
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.org(), "artificial");
    }

    #[test]
    fn test_reads_connection_and_tooling() {
        let dir = TempDir::new().unwrap();
        let yaml = "\
artificial:
  host: lab.example.com
  token: secret
  prefix: dev
  orgId: acme
  labId: lab-1
labstub:
  assistantStubPath: stubs/assistants.py
  timeoutMs: 500
  retry:
    maxAttempts: 5
    jitter: false
";
        let config = Config::from_yaml_str(dir.path(), yaml).unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.lab_id, "lab-1");
        assert_eq!(config.org(), "acme");
        assert_eq!(config.assistant_stub_path, dir.path().join("stubs/assistants.py"));
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.retry.max_attempts, 5);
        assert!(!config.retry.jitter);
        assert_eq!(config.retry.initial_delay, Duration::from_millis(100));
        assert_eq!(config.endpoint().unwrap(), "https://lab.example.com/graphql");
    }

    #[test]
    fn test_load_reads_workspace_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("tmp")).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_RELATIVE_PATH),
            "artificial:\n  labId: from-file\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.lab_id, "from-file");
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_yaml_str(dir.path(), "artificial: [unclosed").unwrap_err();
        assert_eq!(err.kind(), "yaml");
    }

    #[test]
    fn test_empty_sections_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_yaml_str(dir.path(), "artificial:\nlabstub:\n").unwrap();
        assert!(config.host.is_empty());
    }

    #[test]
    fn test_overrides_and_endpoint() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::from_yaml_str(dir.path(), "artificial:\n  host: file-host\n").unwrap();
        config.apply_overrides(Some(String::new()), None);
        assert_eq!(config.host, "file-host");
        config.apply_overrides(Some("http://127.0.0.1:8080/".into()), Some("t".into()));
        assert_eq!(config.endpoint().unwrap(), "http://127.0.0.1:8080/graphql");
        assert_eq!(config.token, "t");

        config.host.clear();
        assert!(matches!(config.endpoint(), Err(LabstubError::Config(_))));
    }
}
