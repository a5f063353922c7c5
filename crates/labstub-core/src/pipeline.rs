//! Refresh and generation passes.
//!
//! Each pass is one async unit of work that suspends at remote fetches and
//! file reads/writes. Passes are not re-entrant; callers serialize them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::LabstubResult;
use crate::filesystem::{iter_python_files, relative_path};
use crate::generate::{actions, assistants, write_stub_file};
use crate::models::{Asset, AssistantSignature, FileData, Lab, RemoteAssistant};
use crate::parser::signatures::{build_assistant_signatures, extract_file_data};
use crate::parser::source::parse_source;
use crate::reconcile::labs::{build_lab_rows, LabRow};
use crate::remote::{GraphQlClient, SchemaSource};

pub struct Context {
    pub config: Config,
    pub source: Arc<dyn SchemaSource>,
}

impl Context {
    pub fn new(config: Config, source: Arc<dyn SchemaSource>) -> Self {
        Self { config, source }
    }

    /// Context backed by the GraphQL client for `config`.
    pub fn connect(config: Config) -> LabstubResult<Self> {
        let client = GraphQlClient::new(&config)?;
        info!(endpoint = client.endpoint(), "remote client ready");
        Ok(Self::new(config, Arc::new(client)))
    }
}

/// Everything one refresh of the assistant view fetched and derived.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub labs: Vec<Lab>,
    pub remotes: Vec<RemoteAssistant>,
    pub locals: Vec<AssistantSignature>,
    pub rows: Vec<LabRow>,
}

/// Labs, then assistants, then the local assistant stubs, then status rows.
pub async fn refresh(ctx: &Context) -> LabstubResult<Snapshot> {
    let started = Instant::now();
    let labs = ctx.source.list_labs().await?;
    let remotes = ctx.source.list_assistants().await?;
    let locals = read_assistant_stubs(&ctx.config.assistant_stub_path).await?;
    let rows = build_lab_rows(&labs, &remotes, &locals);
    info!(
        labs = labs.len(),
        remotes = remotes.len(),
        locals = locals.len(),
        elapsed = ?started.elapsed(),
        "refreshed assistant view"
    );
    Ok(Snapshot {
        labs,
        remotes,
        locals,
        rows,
    })
}

/// Assistant stubs at `path`. Missing file is empty; a parse failure is fatal.
pub async fn read_assistant_stubs(path: &Path) -> LabstubResult<Vec<AssistantSignature>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || build_assistant_signatures(&path))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub output: PathBuf,
    pub content: String,
    pub written: bool,
    /// Set when the persist step failed; the content is still complete.
    pub write_error: Option<String>,
    pub cancelled: bool,
    pub files_scanned: usize,
    pub entries: usize,
}

impl GenerationReport {
    fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            content: String::new(),
            written: false,
            write_error: None,
            cancelled: false,
            files_scanned: 0,
            entries: 0,
        }
    }

    fn persist(&mut self) {
        match write_stub_file(&self.output, &self.content) {
            Ok(()) => self.written = true,
            Err(err) => self.write_error = Some(err.to_string()),
        }
    }
}

/// Extract every adapter file under `root`, in path order.
///
/// Returns the accumulated data and whether `cancel` fired. No further file
/// is read once it has.
pub async fn collect_adapter_files(root: &Path, cancel: &CancellationToken) -> LabstubResult<(Vec<FileData>, usize, bool)> {
    let files = iter_python_files(root);
    let mut collected = Vec::new();
    let mut scanned = 0;

    for path in &files {
        if cancel.is_cancelled() {
            warn!(scanned, total = files.len(), "adapter scan cancelled");
            return Ok((collected, scanned, true));
        }
        scanned += 1;
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "adapter file vanished");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let relative = relative_path(path, root);
        let parsed = parse_source(&text, &relative)?;
        let data = extract_file_data(&parsed);
        if !data.is_empty() {
            collected.push(data);
        }
    }
    Ok((collected, scanned, false))
}

/// Scan the adapter directory and rewrite the action stub file.
/// Needs no remote access.
pub async fn generate_action_stubs(config: &Config, cancel: &CancellationToken) -> LabstubResult<GenerationReport> {
    let mut report = GenerationReport::new(&config.action_stub_path);
    let (files, scanned, cancelled) = collect_adapter_files(&config.adapter_dir, cancel).await?;
    report.files_scanned = scanned;
    report.entries = files.iter().map(|f| f.functions.len()).sum();
    report.content = actions::generate_action_stubs(&files);
    report.cancelled = cancelled;

    if cancelled {
        info!("action stub generation cancelled; output left untouched");
        return Ok(report);
    }
    report.persist();
    info!(
        files = scanned,
        actions = report.entries,
        written = report.written,
        "action stub pass finished"
    );
    Ok(report)
}

/// Fetch assistants and rewrite the assistant stub file, keeping the
/// parameter order of any stubs already there.
pub async fn generate_assistant_stubs(ctx: &Context) -> LabstubResult<GenerationReport> {
    let mut report = GenerationReport::new(&ctx.config.assistant_stub_path);
    let remotes = ctx.source.list_assistants().await?;
    let locals = read_assistant_stubs(&ctx.config.assistant_stub_path).await?;
    report.entries = remotes.len();
    report.content = assistants::generate_assistant_stubs(&remotes, &locals);
    report.persist();
    info!(
        assistants = report.entries,
        written = report.written,
        "assistant stub pass finished"
    );
    Ok(report)
}

/// Both passes. A write failure in the first does not stop the second.
pub async fn generate_all(ctx: &Context, cancel: &CancellationToken) -> LabstubResult<Vec<GenerationReport>> {
    let actions = generate_action_stubs(&ctx.config, cancel).await?;
    if actions.cancelled {
        return Ok(vec![actions]);
    }
    let assistants = generate_assistant_stubs(ctx).await?;
    Ok(vec![actions, assistants])
}

/// Assets with a non-empty loading config id, grouped by that id in
/// first-seen order, each group sorted by loading order.
pub fn group_loading_configs(assets: Vec<Asset>) -> IndexMap<String, Vec<Asset>> {
    let mut groups: IndexMap<String, Vec<Asset>> = IndexMap::new();
    for asset in assets {
        let Some(id) = asset.loading_config_id.clone().filter(|id| !id.is_empty()) else {
            continue;
        };
        groups.entry(id).or_default().push(asset);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|a| a.loading_config_order.unwrap_or(i64::MAX));
    }
    groups
}

pub async fn loading_configs(ctx: &Context, lab_id: &str) -> LabstubResult<IndexMap<String, Vec<Asset>>> {
    let assets = ctx.source.get_configs(lab_id).await?;
    let groups = group_loading_configs(assets);
    debug!(lab_id, groups = groups.len(), "grouped loading configs");
    Ok(groups)
}
