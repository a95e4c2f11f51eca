//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Rigging - build-graph composition for multi-project C++ workspaces
#[derive(Parser)]
#[command(name = "rigging")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Rigging.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the workspace and print a summary
    Resolve(ResolveArgs),

    /// Emit the build plan as JSON
    Plan(PlanArgs),

    /// Display the project dependency tree
    Tree(TreeArgs),

    /// Show the identified toolset and its global options
    Toolset(ToolsetArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Print the build waves as well
    #[arg(long)]
    pub waves: bool,

    /// Print only the summary, not one line per project
    #[arg(long)]
    pub brief: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Write the plan to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Repeat the subtree of projects that were already shown
    #[arg(long)]
    pub duplicates: bool,

    /// List discovered projects without resolving the graph
    #[arg(long)]
    pub discovered: bool,
}

#[derive(Args)]
pub struct ToolsetArgs {}
