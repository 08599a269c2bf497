use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use mergelens::config::loader::load_config;
use mergelens::mcp::server::{run_server, MergeLensServer};
use mergelens::observability::init_logging;

#[derive(Parser)]
#[command(
    name = "mergelens",
    version,
    about = "Pre-merge branch comparison tools for AI assistants (MCP server)",
    long_about = "MergeLens exposes read-only git merge previews as MCP tools:\n  \
        show_merge_diff, quick_merge_summary, show_file_diff.\n\n\
        Run without arguments to serve over stdio."
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    ///
    /// Examples:
    ///   mergelens serve
    ///   mergelens serve --config review.yaml
    Serve {
        /// Path to a YAML config file (default: ./.mergelens.yaml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the tool catalog as JSON
    Tools,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => serve(config).await,
        Commands::Tools => {
            println!("{}", MergeLensServer::json_catalog());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir().ok();
    let config = load_config(config_path.as_deref(), cwd.as_deref())?;

    tracing::info!("MergeLens MCP server starting on stdio");
    run_server(config).await
}
