use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qrd_registry::{default_registry_path, ensure_registry, DeleteOutcome, Registry};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::launch::Opener;

mod launch;

#[derive(Parser)]
#[command(name = "qrd")]
#[command(about = "Quick reference documents: a catalog of files and URLs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Registry file (default: ~/.config/qrd/registry)
    #[arg(long, global = true, env = "QRD_REGISTRY")]
    registry: Option<PathBuf>,

    /// Program used to open documents (default: platform opener)
    #[arg(long, global = true, env = "QRD_OPENER")]
    opener: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a document to the registry
    #[command(short_flag = 'a', short_flag_alias = 'A')]
    Add(AddArgs),

    /// List documents, optionally only those of one type
    #[command(short_flag = 'l', short_flag_alias = 'L')]
    List(ListArgs),

    /// Open a document with the platform opener
    #[command(short_flag = 'o', short_flag_alias = 'O')]
    Open(AliasArgs),

    /// Remove a document (the previous registry is kept as <registry>.backup)
    #[command(short_flag = 'd', short_flag_alias = 'D', visible_alias = "delete")]
    Remove(AliasArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Document type, e.g. pdf (stored lowercase)
    #[arg(value_name = "TYPE")]
    kind: String,

    /// Short name used to open or remove the document
    alias: String,

    /// File path or URL
    location: String,
}

#[derive(Args)]
struct ListArgs {
    /// Only list documents of this type (case-insensitive)
    #[arg(value_name = "TYPE")]
    kind: Option<String>,

    /// Print records as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct AliasArgs {
    alias: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let path = match cli.registry {
        Some(path) => path,
        None => default_registry_path()
            .context("Cannot locate home directory; pass --registry or set QRD_REGISTRY")?,
    };
    ensure_registry(&path)
        .with_context(|| format!("Cannot initialize registry {}", path.display()))?;
    log::debug!("Using registry {}", path.display());
    let registry = Registry::new(path);

    match cli.command {
        Commands::Add(args) => run_add(&registry, args),
        Commands::List(args) => run_list(&registry, args),
        Commands::Open(args) => run_open(&registry, &Opener::new(cli.opener), &args.alias),
        Commands::Remove(args) => run_remove(&registry, &args.alias),
    }
}

fn run_add(registry: &Registry, args: AddArgs) -> Result<ExitCode> {
    let record = registry
        .append(&args.kind, &args.alias, &args.location)
        .context("Failed to add document")?;
    println!("{} added successfully.", record.alias);
    Ok(ExitCode::SUCCESS)
}

fn run_list(registry: &Registry, args: ListArgs) -> Result<ExitCode> {
    if args.json {
        let records = registry.records(args.kind.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", registry.list(args.kind.as_deref())?);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_open(registry: &Registry, opener: &Opener, alias: &str) -> Result<ExitCode> {
    let Some(location) = registry.find_by_alias(alias) else {
        eprintln!("No {alias} found.");
        return Ok(ExitCode::FAILURE);
    };

    if opener.launch(&location)? {
        println!("Opened: {alias}");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Can't open {alias}.");
        Ok(ExitCode::FAILURE)
    }
}

fn run_remove(registry: &Registry, alias: &str) -> Result<ExitCode> {
    let outcome = registry
        .delete(alias)
        .with_context(|| format!("Failed to remove {alias}"))?;
    log::info!("Previous registry kept at {}", registry.backup_path().display());

    match outcome {
        DeleteOutcome::Deleted => {
            println!("Removed: {alias}");
            Ok(ExitCode::SUCCESS)
        }
        DeleteOutcome::NotFound => {
            eprintln!("No {alias} found.");
            Ok(ExitCode::FAILURE)
        }
    }
}
