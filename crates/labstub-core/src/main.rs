use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use labstub_core::generate::call::{action_calls, assistant_call};
use labstub_core::parser::signatures::{build_assistant_signatures, build_file_data};
use labstub_core::pipeline::{self, GenerationReport};
use labstub_core::reconcile::labs::AssistantStatus;
use labstub_core::{Config, Context};

#[derive(Parser)]
#[command(name = "labstub")]
#[command(about = "Generate and check lab assistant and adapter action stubs")]
#[command(version)]
struct Cli {
    /// Workspace root holding tmp/merged.yaml
    #[arg(long, short, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signatures found in one Python file as JSON
    Extract {
        file: PathBuf,
        /// Read assistant stubs instead of adapter actions
        #[arg(long)]
        assistants: bool,
        /// Print call snippets for the action stubs instead of JSON
        #[arg(long, conflicts_with = "assistants")]
        calls: bool,
    },
    /// Rewrite the adapter action stub file from the adapter directory
    GenerateActions,
    /// Rewrite the assistant stub file from the remote assistants
    GenerateAssistants,
    /// Check local assistant stubs against the remote schema
    Check {
        /// Emit the status rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show loading configs of a lab, grouped by config id
    Configs { lab_id: String },
    /// Show the org configuration, or a lab's with --lab
    ConfigDoc {
        #[arg(long)]
        lab: Option<String>,
    },
    /// Look up an action, optionally deleting it
    Action {
        action_id: String,
        #[arg(long)]
        delete: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("LABSTUB_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, calls: true, .. } => {
            let Some(data) = build_file_data(&file)? else {
                bail!("no actions found in {}", file.display());
            };
            for (module, snippets) in action_calls(&data) {
                println!("# {module}");
                for snippet in snippets {
                    println!("{snippet}");
                }
            }
        }
        Commands::Extract { file, assistants, calls: false } => {
            let json = if assistants {
                serde_json::to_string_pretty(&build_assistant_signatures(&file)?)?
            } else {
                serde_json::to_string_pretty(&build_file_data(&file)?)?
            };
            println!("{json}");
        }
        Commands::GenerateActions => {
            let config = Config::load(&cli.workspace)?;
            let cancel = CancellationToken::new();
            let watcher = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, stopping adapter scan");
                    watcher.cancel();
                }
            });
            let report = pipeline::generate_action_stubs(&config, &cancel).await?;
            finish(&report)?;
        }
        Commands::GenerateAssistants => {
            let ctx = connect(&cli.workspace)?;
            let report = pipeline::generate_assistant_stubs(&ctx).await?;
            finish(&report)?;
        }
        Commands::Check { json } => {
            let ctx = connect(&cli.workspace)?;
            let snapshot = pipeline::refresh(&ctx).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.rows)?);
            } else {
                let mut failures = 0;
                for row in &snapshot.rows {
                    println!("{}", row.lab.name);
                    for assistant in &row.assistants {
                        let marker = match assistant.status {
                            AssistantStatus::Valid => "ok",
                            _ => {
                                failures += 1;
                                "!!"
                            }
                        };
                        match assistant.status.reason() {
                            Some(reason) => println!("  [{marker}] {}: {reason}", assistant.label),
                            None => println!("  [{marker}] {}", assistant.label),
                        }
                        if let Some(signature) = &assistant.signature {
                            for line in assistant_call(signature, &assistant.class_name()).lines() {
                                println!("       {line}");
                            }
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} assistant stub(s) need attention");
                }
            }
        }
        Commands::Configs { lab_id } => {
            let ctx = connect(&cli.workspace)?;
            let groups = pipeline::loading_configs(&ctx, &lab_id).await?;
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Commands::ConfigDoc { lab } => {
            let ctx = connect(&cli.workspace)?;
            let document = match lab {
                Some(lab_id) => ctx.source.get_lab_config(&lab_id).await?,
                None => ctx.source.get_org_config().await?,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Commands::Action { action_id, delete } => {
            let ctx = connect(&cli.workspace)?;
            let Some(action) = ctx.source.get_action(&action_id).await? else {
                bail!("action {action_id} not found");
            };
            if delete {
                let deleted = ctx.source.delete_action(&action.id).await?;
                println!("{}", if deleted { "deleted" } else { "not deleted" });
            } else {
                println!("{}", serde_json::to_string_pretty(&action)?);
            }
        }
    }

    Ok(())
}

fn connect(workspace: &std::path::Path) -> Result<Context> {
    let config = Config::load(workspace)?;
    Context::connect(config).context("cannot reach the lab backend")
}

fn finish(report: &GenerationReport) -> Result<()> {
    if report.cancelled {
        bail!("cancelled after {} file(s); {} left untouched", report.files_scanned, report.output.display());
    }
    if let Some(err) = &report.write_error {
        error!(path = %report.output.display(), "stub file not written");
        bail!("{err}");
    }
    println!("wrote {} ({} entries)", report.output.display(), report.entries);
    Ok(())
}
