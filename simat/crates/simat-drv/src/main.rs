//! simat - A Tool for Measuring String Similarity
//!
//! Computes a matrix of pairwise similarity or distance values over one
//! or two collections of strings, with the measure selected by name.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use simat_drv::{parse_range, Config, RunOptions};

/// Compute a matrix of pairwise string similarity values
#[derive(Parser, Debug)]
#[command(name = "simat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute a matrix of pairwise string similarity values", long_about = None)]
struct Cli {
    /// Input path: a file of lines, a directory, or a tar archive
    input: PathBuf,

    /// Output path (default: standard output)
    output: Option<PathBuf>,

    /// Measure to compute, e.g. dist_levenshtein, kern_spectrum
    #[arg(short, long)]
    measure: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "SIMAT_CONFIG")]
    config: Option<PathBuf>,

    /// Number of worker threads (default: available parallelism)
    #[arg(short, long)]
    num_threads: Option<usize>,

    /// Column range A:B into the input array
    #[arg(short, long, value_name = "A:B")]
    xrange: Option<String>,

    /// Row range A:B into the input array
    #[arg(short, long, value_name = "A:B")]
    yrange: Option<String>,

    /// Input format: dir, lines or archive (default: inferred)
    #[arg(short, long)]
    input_format: Option<String>,

    /// Output format: text, json or libsvm (default: text)
    #[arg(short, long)]
    output_format: Option<String>,

    /// Delimiter characters; switches comparison to token granularity
    #[arg(short, long)]
    delim: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the progress bar and all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Signal handlers only flip the flag; workers drain between slices.
    let abort = Arc::new(AtomicBool::new(false));
    for sig in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(sig, Arc::clone(&abort))?;
    }

    let opts = RunOptions {
        input: cli.input,
        output: cli.output,
        measure: cli.measure,
        num_threads: cli.num_threads,
        x_range: cli.xrange.as_deref().map(parse_range).transpose()?,
        y_range: cli.yrange.as_deref().map(parse_range).transpose()?,
        input_format: cli.input_format,
        output_format: cli.output_format,
        delim: cli.delim,
        quiet: cli.quiet,
    };

    simat_drv::run(cfg, opts, abort)?;
    Ok(())
}
