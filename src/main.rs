mod commands;
#[cfg(feature = "mcp")]
mod mcp;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use portfolio_matcher::PortfolioPaths;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Match job skills to portfolio project links", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Portfolio CSV (default: ./portfolio.csv)")]
    dataset: Option<PathBuf>,
    #[arg(long, global = true, help = "Index store directory (default: ./portfolio_store)")]
    store: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset into the index (no-op when already loaded)
    Load {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Portfolio links for one or more skills
    Query {
        #[arg(required = true)]
        skills: Vec<String>,
        #[arg(long, help = "Merge matches of every skill (default: first skill only)")]
        merge: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show whether the portfolio is loaded and how many entries it has
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Attach portfolio links to extracted job postings
    #[command(name = "match")]
    Match {
        #[arg(long, help = "JSON file with job postings (array or single object)")]
        jobs: PathBuf,
        #[arg(long, help = "Merge matches of every skill (default: first skill only)")]
        merge: bool,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== MCP Server =====
    /// Start MCP server over stdio
    #[cfg(feature = "mcp")]
    Mcp,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries command output and the MCP transport
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = PortfolioPaths::new().with_overrides(cli.dataset, cli.store);

    match cli.command {
        Commands::Load { json } => commands::load::run(&paths, json),
        Commands::Query { skills, merge, json } => commands::query::run(&paths, skills, merge, json),
        Commands::Status { json } => commands::status::run(&paths, json),
        Commands::Match { jobs, merge, json } => commands::jobs::run(&paths, &jobs, merge, json),

        #[cfg(feature = "mcp")]
        Commands::Mcp => run_mcp_server(paths),
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server(paths: PortfolioPaths) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(paths))
}
