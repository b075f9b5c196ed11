mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chainly_builder::WorkflowBuilder;
use chainly_workflow::{StepConfig, StepKind, WorkflowDefinition, WorkflowSummary};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::settings::{Gateways, Settings, build_gateways, load_settings};

/// Chainly - build, test and publish trigger/action workflows
#[derive(Parser)]
#[command(name = "chainly")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.chainly)
  #[arg(long, global = true, env = "CHAINLY_DATA_DIR")]
  data_dir: Option<PathBuf>,

  /// Base url of the remote store and executor
  #[arg(long, global = true, env = "CHAINLY_REMOTE_URL")]
  remote_url: Option<String>,

  /// How long to wait for the remote before falling back
  #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
  remote_timeout_ms: Option<u64>,

  /// Ignore any configured remote and work against the local cache
  #[arg(long, global = true)]
  offline: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List saved workflows
  List,

  /// Test a single step
  TestStep {
    /// Step kind: trigger or action
    #[arg(long)]
    kind: StepKind,

    /// Step config as a JSON object
    #[arg(long)]
    config: Option<String>,
  },

  /// Build a workflow step by step and publish it
  New {
    /// Workflow name
    #[arg(long)]
    name: Option<String>,

    /// Display name of the trigger step
    #[arg(long)]
    trigger: Option<String>,

    /// Display name of an action step (repeatable, in order)
    #[arg(long = "action")]
    actions: Vec<String>,

    /// Test every step before publishing
    #[arg(long)]
    test: bool,
  },

  /// Publish a workflow definition from a JSON file
  Publish {
    /// Path to the workflow file
    workflow_file: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let data_dir = match cli.data_dir.clone() {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".chainly"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(cli, data_dir).await })
}

async fn run(cli: Cli, data_dir: PathBuf) -> Result<()> {
  let Some(command) = cli.command else {
    println!("chainly - use --help to see available commands");
    return Ok(());
  };

  let mut settings = load_settings(&data_dir).await;
  apply_overrides(&mut settings, cli.remote_url, cli.remote_timeout_ms, cli.offline);
  let gateways = build_gateways(&settings, &data_dir)?;

  match command {
    Commands::List => list(&gateways).await,
    Commands::TestStep { kind, config } => test_step(&gateways, kind, config).await,
    Commands::New {
      name,
      trigger,
      actions,
      test,
    } => new_workflow(&gateways, name, trigger, actions, test).await,
    Commands::Publish { workflow_file } => publish_file(&gateways, workflow_file).await,
  }
}

fn apply_overrides(
  settings: &mut Settings,
  remote_url: Option<String>,
  remote_timeout_ms: Option<u64>,
  offline: bool,
) {
  if remote_url.is_some() {
    settings.remote_url = remote_url;
  }
  if let Some(ms) = remote_timeout_ms {
    settings.remote_timeout_ms = ms;
  }
  if offline {
    settings.remote_url = None;
  }
}

async fn list(gateways: &Gateways) -> Result<()> {
  let workflows = gateways.store.load_all().await;

  if workflows.is_empty() {
    println!("No workflows yet. Create one with `chainly new`.");
    return Ok(());
  }

  for workflow in &workflows {
    println!("{}", WorkflowSummary::from(workflow));
  }

  Ok(())
}

async fn test_step(gateways: &Gateways, kind: StepKind, config: Option<String>) -> Result<()> {
  let config = parse_config(config.as_deref())?;
  let result = gateways.executor.test_step(kind, &config).await;

  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}

async fn new_workflow(
  gateways: &Gateways,
  name: Option<String>,
  trigger: Option<String>,
  actions: Vec<String>,
  test: bool,
) -> Result<()> {
  let mut builder = WorkflowBuilder::new();

  if let Some(name) = name {
    builder.rename_workflow(name);
  }
  if let Some(trigger) = trigger {
    builder.rename_selected_step(trigger);
  }

  for (index, action) in actions.into_iter().enumerate() {
    if index == 0 {
      // The session starts with one placeholder action; fill it first.
      let placeholder = builder.steps()[1].id.clone();
      builder.select_step(&placeholder)?;
    } else {
      builder.add_action_step();
    }
    builder.rename_selected_step(action);
  }

  if test {
    let step_ids: Vec<String> = builder.steps().iter().map(|s| s.id.clone()).collect();
    for step_id in step_ids {
      builder.select_step(&step_id)?;
      let result = builder.test_selected_step(&gateways.executor).await?;
      eprintln!("[{}] {}", step_id, result.message);
    }
  }

  let published = builder.publish(&gateways.store).await?;
  println!("{}", serde_json::to_string_pretty(&published)?);
  Ok(())
}

async fn publish_file(gateways: &Gateways, workflow_file: PathBuf) -> Result<()> {
  let content = tokio::fs::read_to_string(&workflow_file)
    .await
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let mut workflow: WorkflowDefinition = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  if workflow.id.is_none() {
    workflow.id = Some(uuid::Uuid::new_v4().to_string());
  }

  let saved = gateways
    .store
    .save(workflow)
    .await
    .context("failed to publish workflow")?;

  println!("{}", serde_json::to_string_pretty(&saved)?);
  Ok(())
}

fn parse_config(raw: Option<&str>) -> Result<StepConfig> {
  let Some(raw) = raw else {
    return Ok(StepConfig::new());
  };

  match serde_json::from_str::<serde_json::Value>(raw).context("failed to parse step config")? {
    serde_json::Value::Object(map) => Ok(map),
    other => bail!("step config must be a JSON object, got {}", other),
  }
}
