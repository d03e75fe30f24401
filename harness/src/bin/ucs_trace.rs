//! `ucs_trace`: run an instrumented uniform cost search and print its trace.
//!
//! Reads graph text (`node: neighbor=cost, ...` per line) from a file, or
//! uses the built-in demo graph. Endpoints come from `--start`/`--goal`,
//! then `UCS_START`/`UCS_GOAL`, then the sorted node list. Log verbosity is
//! controlled by `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use ucs_harness::bundle::TRACE_ARTIFACT;
use ucs_harness::bundle_dir::write_bundle_dir;
use ucs_harness::config::RunConfigV1;
use ucs_harness::demo::DEMO_GRAPH;
use ucs_harness::runner::run_text;
use ucs_search::render::render_report;

#[derive(Parser, Debug)]
#[command(name = "ucs_trace", version, about = "Step-by-step uniform cost search")]
struct Cli {
    /// Graph text file. Defaults to the built-in demo graph.
    graph: Option<PathBuf>,

    /// Start node. Defaults to the first node in sorted order.
    #[arg(long)]
    start: Option<String>,

    /// Goal node. Defaults to the last node in sorted order.
    #[arg(long)]
    goal: Option<String>,

    /// Print the canonical trace JSON instead of the rendered steps.
    #[arg(long)]
    json: bool,

    /// Also write the artifact bundle to this directory.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("ucs_trace: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let text = match &cli.graph {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => DEMO_GRAPH.to_string(),
    };

    let config = RunConfigV1 {
        start: cli.start,
        goal: cli.goal,
    }
    .or(RunConfigV1::from_env());

    let output = run_text(&text, &config)?;

    if cli.json {
        let trace = output
            .bundle
            .artifact(TRACE_ARTIFACT)
            .with_context(|| format!("bundle has no {TRACE_ARTIFACT}"))?;
        println!("{}", String::from_utf8_lossy(&trace.content));
    } else {
        print!("{}", render_report(&output.result));
    }

    if let Some(dir) = &cli.out {
        write_bundle_dir(&output.bundle, dir)
            .with_context(|| format!("cannot write bundle to {}", dir.display()))?;
        eprintln!("bundle {} written to {}", output.bundle.digest, dir.display());
    }

    Ok(())
}
