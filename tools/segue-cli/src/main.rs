//! Segue CLI: create, inspect, build, and export timeline projects.
//!
//! Usage:
//!   segue init <NAME>          Create a new empty project
//!   segue validate <PATH>      Validate a project bundle
//!   segue info <PATH>          Show project information
//!   segue build <PATH>         Build the timeline and summarize it
//!   segue export <PATH>        Export the render plan

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::build::BuildOverrides;

#[derive(Parser)]
#[command(
    name = "segue",
    about = "Two-lane timeline layout with transitions and volume automation",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project seeded with the editor defaults
    Init {
        /// Project name
        name: String,

        /// Parent directory for the project
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Validate a project bundle
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Build the timeline and print a summary
    Build {
        /// Path to the project directory
        path: PathBuf,

        /// Print the full timeline as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: BuildOverrides,
    },

    /// Export the render plan for a backend
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame rate used for per-frame sampling
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Include per-frame compositions in the output
        #[arg(long)]
        frames: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = segue_common::config::AppConfig::load();
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    segue_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init { name, output } => commands::init::run(name, output, &config.editor),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Info { path } => commands::info::run(path),
        Commands::Build {
            path,
            json,
            overrides,
        } => commands::build::run(path, json, overrides),
        Commands::Export {
            path,
            output,
            fps,
            frames,
        } => commands::export::run(path, output, fps, frames).await,
    }
}
