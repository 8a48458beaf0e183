use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use exercise_sync::{
  ActivationRunner, AssetEntry, FsCopier, GroupListing, JsonManifestStore, ManifestStats,
  ManifestStore, ProjectConfig, RunMode, Selection, SyncLayout,
};

/// Copy exercise animations into the served directory and track them in the manifest
#[derive(Parser)]
#[command(name = "exercise-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  paths: PathArgs,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Args)]
struct PathArgs {
  /// Project root that configured and overridden paths are relative to
  #[arg(long, global = true, env = "EXERCISE_SYNC_ROOT", default_value = ".")]
  root: PathBuf,

  /// Configuration file (default: <root>/exercise-sync.config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Manifest JSON file
  #[arg(long, global = true, env = "EXERCISE_SYNC_MANIFEST")]
  manifest: Option<PathBuf>,

  /// Directory activated files are copied into
  #[arg(long, global = true, env = "EXERCISE_SYNC_SERVED_DIR")]
  served_dir: Option<PathBuf>,

  /// Directory holding the original files
  #[arg(long, global = true, env = "EXERCISE_SYNC_SOURCE_ROOT")]
  source_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Copy exercises from the source folder and mark them active
  #[command(arg_required_else_help = true)]
  #[command(group(ArgGroup::new("targets").required(true).args(["names", "group", "all"])))]
  Activate {
    /// Exercise names to activate (case-insensitive)
    names: Vec<String>,

    /// Activate every inactive exercise in a muscle group
    #[arg(long)]
    group: Option<String>,

    /// Activate every inactive exercise
    #[arg(long)]
    all: bool,

    /// Show what would change without copying files or saving the manifest
    #[arg(long)]
    dry_run: bool,
  },

  /// List muscle groups with their exercise counts
  ListGroups {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
  },

  /// Show overall and per-group activation counts
  Stats {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err}");
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("exercise_sync=debug")
  } else {
    EnvFilter::from_default_env()
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let Some(command) = cli.command else {
    Cli::command().print_help().context("failed to print help")?;
    return Ok(());
  };
  let layout = cli.paths.resolve()?;

  match command {
    Commands::Activate {
      names,
      group,
      all,
      dry_run,
    } => {
      let selection = if all {
        Selection::All
      } else if let Some(group) = group {
        Selection::by_group(group)
      } else {
        Selection::by_names(names)
      };

      let store = JsonManifestStore::new(&layout.manifest_path);
      let runner = ActivationRunner::new(&layout, store, FsCopier);
      let report = runner.run(&selection, RunMode::from_dry_run(dry_run))?;
      print!("{report}");
    }
    Commands::ListGroups { json } => {
      let listing = GroupListing::from_entries(&load_entries(&layout)?);
      if json {
        print_json(&listing)?;
      } else {
        print!("{listing}");
      }
    }
    Commands::Stats { json } => {
      let stats = ManifestStats::from_entries(&load_entries(&layout)?);
      if json {
        print_json(&stats)?;
      } else {
        print!("{stats}");
      }
    }
  }

  Ok(())
}

impl PathArgs {
  /// Build the layout from the config file, then apply command-line overrides.
  fn resolve(&self) -> Result<SyncLayout> {
    let config = match &self.config {
      Some(path) => ProjectConfig::from_path(path)
        .with_context(|| format!("failed to load config {}", path.display()))?,
      None => ProjectConfig::discover(&self.root),
    };

    let mut layout = config.into_layout(&self.root);
    if let Some(manifest) = &self.manifest {
      layout.manifest_path = self.root.join(manifest);
    }
    if let Some(served_dir) = &self.served_dir {
      layout.served_dir = self.root.join(served_dir);
    }
    if let Some(source_root) = &self.source_root {
      layout.source_root = self.root.join(source_root);
    }
    Ok(layout)
  }
}

fn load_entries(layout: &SyncLayout) -> Result<Vec<AssetEntry>> {
  let entries = JsonManifestStore::new(&layout.manifest_path).load()?;
  Ok(entries)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let json = serde_json::to_string_pretty(value).context("failed to serialize to JSON")?;
  println!("{json}");
  Ok(())
}
