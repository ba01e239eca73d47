//! simat-drv - Driver Pipeline
//!
//! Glues the workspace together into the `simat` binary: load the
//! configuration, read the inputs, preprocess them in parallel, build the
//! selected measure, fill the matrix on the worker pool, and only then
//! open and write the output. The write happening strictly after the
//! completion barrier is what guarantees that an aborted or failed run
//! never leaves partial output behind.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use simat_io::{open_reader, open_writer};
use simat_matrix::{compute, ComputeConfig, Progress};
use simat_str::{HString, Preproc};
use simat_util::VCache;

pub mod config;
pub mod progress;

pub use config::Config;
pub use progress::StderrProgress;

/// Reader batch size; bounds peak allocation per read call, nothing else.
const READ_BATCH: usize = 256;

/// CLI-level overrides and positional arguments for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Output path; standard output when unset.
    pub output: Option<PathBuf>,
    pub measure: Option<String>,
    pub num_threads: Option<usize>,
    pub x_range: Option<(usize, usize)>,
    pub y_range: Option<(usize, usize)>,
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub delim: Option<String>,
    pub quiet: bool,
}

/// Parse an `A:B` range argument.
pub fn parse_range(s: &str) -> Result<(usize, usize)> {
    let (a, b) = s
        .split_once(':')
        .with_context(|| format!("range '{s}' is not of the form A:B"))?;
    let start = a.parse().with_context(|| format!("bad range start '{a}'"))?;
    let end = b.parse().with_context(|| format!("bad range end '{b}'"))?;
    Ok((start, end))
}

/// Fold the CLI overrides into the file configuration.
fn merge(mut cfg: Config, opts: &RunOptions) -> Config {
    if let Some(m) = &opts.measure {
        cfg.measures.measure = m.clone();
    }
    if let Some(n) = opts.num_threads {
        cfg.num_threads = Some(n);
    }
    if let Some(f) = &opts.input_format {
        cfg.input.format = f.clone();
    }
    if let Some(f) = &opts.output_format {
        cfg.output.format = f.clone();
    }
    if let Some(d) = &opts.delim {
        cfg.input.preproc.delim = d.clone();
    }
    cfg
}

/// Read every input string the reader can produce.
fn read_all(cfg: &Config, opts: &RunOptions) -> Result<Vec<HString>> {
    let reader_cfg = cfg.reader_config();
    let mut reader = open_reader(&cfg.input.format, &opts.input, &reader_cfg)
        .with_context(|| format!("cannot open input {}", opts.input.display()))?;

    let mut strings = Vec::new();
    loop {
        let batch = reader.read(READ_BATCH)?;
        if batch.is_empty() {
            break;
        }
        strings.extend(batch);
    }
    Ok(strings)
}

/// Execute one full run. Returns the number of values written.
pub fn run(mut cfg: Config, opts: RunOptions, abort: Arc<AtomicBool>) -> Result<usize> {
    cfg = merge(cfg, &opts);

    // Stop tokens from a file merge into the configured list.
    if let Some(path) = &cfg.input.stopword_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read stopword file {}", path.display()))?;
        cfg.input
            .preproc
            .stopwords
            .extend(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }

    let started = Instant::now();
    let raw = read_all(&cfg, &opts)?;
    if raw.is_empty() {
        bail!("no input strings in {}", opts.input.display());
    }
    tracing::info!(count = raw.len(), "read input strings");

    let preproc = Preproc::new(&cfg.input.preproc);
    let strings: Vec<HString> = raw.into_par_iter().map(|s| preproc.apply(s)).collect();

    let measure = simat_measures::measure_for(&cfg.measures.measure, &cfg.measures)?;
    let cache = VCache::new(cfg.measures.cache_size);

    let compute_cfg = ComputeConfig {
        x_range: opts.x_range,
        y_range: opts.y_range,
        num_threads: cfg.num_threads,
        global_cache: cfg.measures.global_cache,
    };

    let bar = if opts.quiet {
        None
    } else {
        Some(StderrProgress::new())
    };
    let matrix = compute(
        &strings,
        measure.as_ref(),
        &cache,
        &compute_cfg,
        &abort,
        bar.as_ref().map(|b| b as &dyn Progress),
    )?;
    if let Some(bar) = &bar {
        bar.finish();
    }
    if abort.load(Ordering::Relaxed) {
        bail!("computation aborted");
    }

    let mut writer = open_writer(&cfg.output.format, opts.output.as_deref(), &cfg.output)?;
    let written = writer.write(&matrix, measure.name())?;

    let stats = cache.stats();
    tracing::info!(
        cells = matrix.cells(),
        written,
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        elapsed = ?started.elapsed(),
        "run complete"
    );
    Ok(written)
}
