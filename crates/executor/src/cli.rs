//! Command-line surface of the `bf-oracle` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::types::ReportFormat;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "bf-oracle",
    about = "Sequential Bellman-Ford reference for validating shortest-path implementations."
)]
pub struct Cli {
    /// TOML configuration file (defaults to `crates/executor/Config.toml` if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute shortest distances for one or more graph files.
    Run(RunArgs),
    /// Check a candidate CSV report against the oracle.
    Verify(VerifyArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Edge-list graph files.
    #[arg(required_unless_present = "manifest", conflicts_with = "manifest")]
    pub graphs: Vec<PathBuf>,

    /// CSV file with `graph,source` columns, one job per row.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Source vertex; repeat to run several sources per graph.
    #[arg(long = "source", short = 's')]
    pub sources: Vec<usize>,

    /// Report format (overrides `report.format`).
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    #[command(flatten)]
    pub options: GraphOptions,
}

#[derive(Debug, Args, Clone)]
pub struct VerifyArgs {
    /// Edge-list graph file.
    pub graph: PathBuf,

    /// CSV report (`vertex,distance`) produced by the implementation under test.
    pub candidate: PathBuf,

    #[arg(long, short = 's')]
    pub source: Option<usize>,

    #[command(flatten)]
    pub options: GraphOptions,
}

/// Flags shared by every command that loads and solves a graph.
#[derive(Debug, Args, Clone, Copy)]
pub struct GraphOptions {
    /// Treat each edge line as a single directed arc.
    #[arg(long)]
    pub directed: bool,

    /// Stop relaxing after a pass with no change.
    #[arg(long)]
    pub early_exit: bool,
}
