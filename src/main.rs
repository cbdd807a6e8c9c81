use abapdocgen::{
    archive::{build_metadata_context, ArchiveParseResult, ExtractedObject},
    context::RequestContext,
    error::Result,
    loader,
    logging,
    render::render_tree,
    tree::{count_nodes, ExpansionState},
    utils::normalize_input_paths,
    Config, Workspace,
};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use yansi::Paint;

#[derive(Parser)]
#[command(author, version, about = "Navigate ABAP sources and build documentation context", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Package name shown at the tree root
    #[arg(short, long, global = true)]
    package: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the object tree for files, directories and archives
    Tree(TreeArgs),
    /// Summarize an abapGit archive
    Archive(ArchiveArgs),
    /// Write the request payload for a subtree
    Context(ContextArgs),
}

#[derive(Args)]
struct TreeArgs {
    /// Files, directories or .zip archives
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Print the tree as JSON
    #[arg(long)]
    json: bool,

    /// Show every node expanded
    #[arg(long)]
    expand_all: bool,
}

#[derive(Args)]
struct ArchiveArgs {
    /// abapGit .zip export
    archive: String,

    /// Print the full parse result as JSON
    #[arg(long, conflicts_with = "metadata")]
    json: bool,

    /// Print the metadata context
    #[arg(long)]
    metadata: bool,
}

#[derive(Args)]
struct ContextArgs {
    /// Files, directories or .zip archives
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Tree node id to scope the request to
    #[arg(short, long, default_value = "root")]
    node: String,

    /// Output file (defaults to the configured output directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level) {
        eprintln!("[WARNING] {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "[ERROR]".bright_red(), e.to_string().bright_red());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref(), cli.package)?;

    match cli.command {
        Command::Tree(args) => run_tree(args, &config).await,
        Command::Archive(args) => run_archive(args).await,
        Command::Context(args) => run_context(args, &config).await,
    }
}

fn resolve_config(path: Option<&Path>, package: Option<String>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(package) = package {
        config.package_name = package;
    }
    config.validate()?;
    Ok(config)
}

fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["-", "\\", "|", "/", "-", "\\", "|", "/"]),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message.to_string());
    pb
}

/// Loads all inputs into a fresh workspace; archives also contribute metadata
async fn load_workspace(inputs: &[String], config: &Config) -> Result<(Workspace, Vec<ArchiveParseResult>)> {
    let paths = normalize_input_paths(inputs);
    let input = loader::collect_input_files(&paths, config)?;

    let pb = create_progress_bar("Loading sources");
    let mut workspace = Workspace::new(config.package_name.clone());
    let report = loader::load_paths(&mut workspace, &input.files, config).await;
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let mut archives = Vec::with_capacity(input.archives.len());
    for path in &input.archives {
        pb.set_message(format!("Reading {}", path.display()));
        match loader::load_archive(path).await {
            Ok(result) => {
                workspace.add_archive_files(&result);
                archives.push(result);
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        }
    }

    pb.finish_with_message(format!(
        "{} {}",
        Paint::green("[OK]"),
        Paint::blue(format!("{} item(s) loaded, {} skipped", workspace.len(), report.skipped))
    ));
    info!("workspace ready with {} item(s)", workspace.len());
    Ok((workspace, archives))
}

fn combined_metadata_context(archives: &[ArchiveParseResult]) -> String {
    let objects: Vec<ExtractedObject> = archives
        .iter()
        .flat_map(|result| result.objects.iter().cloned())
        .collect();
    build_metadata_context(&objects)
}

async fn run_tree(args: TreeArgs, config: &Config) -> Result<()> {
    let (workspace, _) = load_workspace(&args.inputs, config).await?;
    let root = workspace.build_tree();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&root)?);
        return Ok(());
    }

    let mut expansion = ExpansionState::new();
    if args.expand_all {
        expansion.expand_all(&root);
    }
    print!("{}", render_tree(&root, &expansion));
    println!(
        "\n{} {}",
        "[TREE]".bright_green(),
        format!("{} node(s) over {} item(s)", count_nodes(&root), workspace.len()).bright_white()
    );
    Ok(())
}

async fn run_archive(args: ArchiveArgs) -> Result<()> {
    let path = abapdocgen::utils::normalize_user_input_path(&args.archive);
    let result = loader::load_archive(&path).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if args.metadata {
        print!("{}", result.metadata_context());
        return Ok(());
    }

    let stats = &result.stats;
    println!("{}", "Archive summary".bright_yellow().bold());
    println!("  {:<16} {}", "Files:".bright_white().bold(), stats.total_files);
    println!("  {:<16} {}", "ABAP sources:".bright_white().bold(), stats.abap_files);
    println!("  {:<16} {}", "XML metadata:".bright_white().bold(), stats.xml_files);
    for (object_type, count) in &stats.by_type {
        println!("  {:<16} {}", format!("{}:", object_type.label()).bright_white(), count);
    }

    println!("\n{}", "Objects".bright_yellow().bold());
    for object in &result.objects {
        let description = if object.description.is_empty() {
            String::new()
        } else {
            format!(" - {}", object.description)
        };
        println!(
            "  {:<5} {}{} ({} source file(s))",
            object.object_type.code().bright_cyan(),
            object.name.bright_white(),
            description,
            object.source_files.len()
        );
    }
    Ok(())
}

fn default_output_file(config: &Config, node_id: &str) -> PathBuf {
    let stem: String = node_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    config.output_dir.join(format!("{}_context.md", stem))
}

async fn run_context(args: ContextArgs, config: &Config) -> Result<()> {
    let (workspace, archives) = load_workspace(&args.inputs, config).await?;
    let root = workspace.build_tree();
    let metadata = combined_metadata_context(&archives);

    let context = RequestContext::for_node(&workspace, &root, &args.node, &metadata)?;
    if context.is_empty() {
        warn!("no source text below node {}", args.node);
    }

    let output = match args.output {
        Some(path) => path,
        None => {
            config.ensure_directories_exist().await?;
            default_output_file(config, &args.node)
        }
    };
    tokio::fs::write(&output, context.render()).await?;

    println!("{} {}", "[SCOPE]".bright_blue(), context.scope.bright_white());
    println!(
        "{} {}",
        "[SAVED]".bright_green(),
        format!("{} source file(s) written to {}", context.sources.len(), output.display()).bright_white()
    );
    Ok(())
}
