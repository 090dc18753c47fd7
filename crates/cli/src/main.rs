use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codemap_indexer::{
    build_index_with, render_report, serialize_index, FileStatus, IndexStats, IndexerConfig,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

mod http_api;

const REPORT_FILE_NAME: &str = "codebase-index.md";
const INDEX_FILE_NAME: &str = "codebase-index.json";

#[derive(Parser)]
#[command(name = "codemap")]
#[command(about = "Structural index of JavaScript/TypeScript codebases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with indexer settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the file name include regex
    #[arg(long, global = true)]
    include: Option<String>,

    /// Override the path exclude regex
    #[arg(long, global = true)]
    exclude: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a project and write the Markdown report and JSON index
    Index(IndexArgs),

    /// Show summary stats for one file of a project
    Status(StatusArgs),

    /// Serve the index over HTTP
    ServeHttp(ServeArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Project directory to index (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Directory for the two artifacts (defaults to <path>/src)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Project directory
    path: PathBuf,

    /// File to report on, as indexed or as a path suffix (e.g. src/index.ts)
    file: String,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Project directory (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,
}

#[derive(Serialize)]
struct IndexOutput {
    report_path: PathBuf,
    index_path: PathBuf,
    stats: IndexStats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Index(args) => args.json,
        Commands::Status(args) => args.json,
        Commands::ServeHttp(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Index(args) => run_index(args, &config)?,
        Commands::Status(args) => run_status(args, &config)?,
        Commands::ServeHttp(args) => serve_http(args, config).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<IndexerConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexerConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => IndexerConfig::default(),
    };
    if let Some(include) = &cli.include {
        config.include_pattern = include.clone();
    }
    if let Some(exclude) = &cli.exclude {
        config.exclude_pattern = exclude.clone();
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn run_index(args: IndexArgs, config: &IndexerConfig) -> Result<()> {
    let root = args.path.canonicalize().context("Invalid project path")?;

    let index = build_index_with(&root, config).context("Failed to index codebase")?;
    let report = render_report(&index, &root);
    let json = serialize_index(&index).context("Failed to serialize index")?;

    let out_dir = args.out_dir.unwrap_or_else(|| root.join("src"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let report_path = out_dir.join(REPORT_FILE_NAME);
    fs::write(&report_path, report)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    log::info!("Codebase index written to {}", report_path.display());

    let index_path = out_dir.join(INDEX_FILE_NAME);
    fs::write(&index_path, json)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    log::info!("Raw index written to {}", index_path.display());

    let stats = IndexStats::from_index(&index);
    if args.json {
        let output = IndexOutput {
            report_path,
            index_path,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!(
            "Indexed {} files ({} lines), {} routes, {} components",
            stats.files, stats.total_lines, stats.routes, stats.components
        );
    }
    Ok(())
}

fn run_status(args: StatusArgs, config: &IndexerConfig) -> Result<()> {
    let root = args.path.canonicalize().context("Invalid project path")?;
    let index = build_index_with(&root, config).context("Failed to index codebase")?;

    let file = index
        .file(&args.file)
        .with_context(|| format!("File not indexed: {}", args.file))?;
    let status = FileStatus::from_file(file);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", display_relative(&root, &status.file));
        println!("  lines:       {}", status.line_count);
        println!("  tokens:      {}", status.token_count);
        println!("  functions:   {}", status.functions);
        println!("  routes:      {}", status.routes);
        println!("  code blocks: {}", status.code_blocks);
    }
    Ok(())
}

async fn serve_http(args: ServeArgs, config: IndexerConfig) -> Result<()> {
    let root = args.path.canonicalize().context("Invalid project path")?;
    let state = http_api::AppState::new(root, config);
    let app = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    println!("Serving codebase index on http://{}", args.bind);
    axum::serve(listener, app).await?;
    Ok(())
}

fn display_relative(root: &Path, file: &str) -> String {
    Path::new(file)
        .strip_prefix(root)
        .map(|rel| rel.display().to_string())
        .unwrap_or_else(|_| file.to_string())
}
