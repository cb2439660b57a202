use andphp_model::commands::ModelCommand;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "andphp")]
#[command(about = "Code generators for AndPHP projects")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory (defaults to current directory)
    #[arg(short = 'P', long, global = true)]
    project: Option<PathBuf>,

    /// Overwrite files that already exist
    #[arg(long, global = true)]
    force: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new model class from a database table
    Model(ModelCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let project_path = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Model(command) => command.execute(&project_path, cli.force).await,
    }
}
