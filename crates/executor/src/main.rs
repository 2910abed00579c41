pub mod cli;
pub mod config;
pub mod error;
pub mod list_streamer;
pub mod logging;
pub mod manifest_streamer;
pub mod pipeline;
pub mod producer;
pub mod report;
pub mod runner;
pub mod types;
pub mod verify;
pub mod writer;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use bf_oracle_core::{BellmanFordSolver, EdgeMode, GraphLoader};
use crate::cli::{Cli, Command, GraphOptions, RunArgs, VerifyArgs};
use crate::config::Config;
use crate::error::Error;
use crate::list_streamer::ListStreamer;
use crate::manifest_streamer::ManifestStreamer;
use crate::pipeline::{PipelineSettings, run_jobs};
use crate::types::ExitStatus;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("bf-oracle: {err}");
            ExitCode::from(ExitStatus::InputError.code())
        }
    }
}

async fn run(cli: Cli) -> Result<ExitStatus, Error> {
    let config = crate::config::load_config(cli.config.as_deref())?;
    logging::init_logging(&config.logging)?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Run(args) => run_command(args, &config).await,
        Command::Verify(args) => verify_command(&args, &config),
    }
}

/// Command-line flags can switch options on; they never switch off what the
/// configuration enables.
fn solver_and_loader(options: GraphOptions, config: &Config) -> (BellmanFordSolver, GraphLoader) {
    let solver = BellmanFordSolver::new(options.early_exit || config.solver.early_exit);
    let mode = if options.directed || config.loader.directed {
        EdgeMode::Directed
    } else {
        EdgeMode::Undirected
    };
    (solver, GraphLoader::new(mode))
}

async fn run_command(args: RunArgs, config: &Config) -> Result<ExitStatus, Error> {
    let (solver, loader) = solver_and_loader(args.options, config);

    let sources = if args.sources.is_empty() {
        vec![config.runner.default_source]
    } else {
        args.sources
    };

    let mut settings = PipelineSettings {
        solver,
        loader,
        format: args.format.unwrap_or(config.report.format),
        annotate: true,
        max_parallel_jobs: config.runner.max_parallel_jobs,
        channel_capacity: config.runner.channel_capacity,
    };

    let (summary, _) = match args.manifest {
        Some(manifest) => {
            let streamer = ManifestStreamer::new(manifest, sources[0]);
            run_jobs(streamer, settings, io::stdout()).await?
        }
        None => {
            settings.annotate = args.graphs.len() * sources.len() > 1;
            let streamer = ListStreamer::new(args.graphs, sources);
            run_jobs(streamer, settings, io::stdout()).await?
        }
    };

    Ok(summary.exit_status())
}

fn verify_command(args: &VerifyArgs, config: &Config) -> Result<ExitStatus, Error> {
    let (solver, loader) = solver_and_loader(args.options, config);
    let source = args.source.unwrap_or(config.runner.default_source);

    let outcome = verify::verify_candidate(&loader, &solver, &args.graph, &args.candidate, source)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    verify::render_verdict(&outcome, &mut out)
}
