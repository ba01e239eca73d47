//! Slice partitioning and the worker pool.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam::channel;
use simat_measures::{Flavor, Measure, MeasureContext};
use simat_str::HString;
use simat_util::hash::{hash_bytes, pair_fingerprint};
use simat_util::VCache;

use crate::hmatrix::{HMatrix, Span};
use crate::{MatrixError, Result};

/// Target number of cells per slice. Large enough to amortize claim
/// overhead, small enough to keep workers balanced at matrix edges.
const SLICE_CELLS: usize = 4096;

/// Sink for monotonic progress updates.
///
/// Implementations live outside this crate (the CLI draws a bar); updates
/// may lag arbitrarily behind the actual computation.
pub trait Progress: Sync {
    fn update(&self, done_cells: u64, total_cells: u64);
}

/// Orchestration knobs, resolved by the driver from config and CLI.
#[derive(Debug, Clone, Default)]
pub struct ComputeConfig {
    /// Column range into the input array; full range when `None`.
    pub x_range: Option<(usize, usize)>,
    /// Row range into the input array; full range when `None`.
    pub y_range: Option<(usize, usize)>,
    /// Worker count; available parallelism when `None`.
    pub num_threads: Option<usize>,
    /// Memoize whole-pair results by fingerprint.
    pub global_cache: bool,
}

struct Job<'v> {
    first: usize,
    cells: &'v mut [f32],
}

/// Shared, read-only state for one matrix computation.
struct Pass<'a, 'm> {
    strings: &'a [HString],
    measure: &'m dyn Measure,
    tag: u64,
    cache: &'m VCache,
    x: Span,
    y: Span,
    triangular: bool,
    global_cache: bool,
}

impl Pass<'_, '_> {
    /// Compute one cell at absolute `(col, row)`.
    fn cell(&self, col: usize, row: usize) -> f32 {
        let cx = MeasureContext::new(self.cache);
        let sx = &self.strings[col];
        let sy = &self.strings[row];

        // The diagonal of a triangular matrix is fixed by the measure
        // flavor: distances are 0 on self, kernels carry K(s, s).
        if self.triangular && col == row {
            return match self.measure.traits().flavor {
                Flavor::Distance => 0.0,
                Flavor::Kernel => self.measure.compare(&cx, sx, sx),
            };
        }

        if self.global_cache {
            let fp = pair_fingerprint(
                self.tag,
                sx.hash(),
                sy.hash(),
                self.measure.traits().symmetric,
            );
            self.cache.memo(fp, || self.measure.compare(&cx, sx, sy))
        } else {
            self.measure.compare(&cx, sx, sy)
        }
    }
}

fn resolve_span(range: Option<(usize, usize)>, count: usize) -> Result<Span> {
    let (start, end) = range.unwrap_or((0, count));
    if start > end || end > count {
        return Err(MatrixError::InvalidRange { start, end, count });
    }
    Ok(Span::new(start, end))
}

/// Fill the pairwise matrix for `strings` under `measure`.
///
/// Blocks until every slice is done, then returns the filled matrix. On
/// abort the workers drain without storing further cells and the partial
/// matrix is discarded.
pub fn compute<'a>(
    strings: &'a [HString],
    measure: &dyn Measure,
    cache: &VCache,
    cfg: &ComputeConfig,
    abort: &AtomicBool,
    progress: Option<&dyn Progress>,
) -> Result<HMatrix<'a>> {
    let x = resolve_span(cfg.x_range, strings.len())?;
    let y = resolve_span(cfg.y_range, strings.len())?;
    let triangular = x == y && measure.traits().symmetric;

    let mut matrix = HMatrix::new(strings, x, y, triangular);
    let total_cells = matrix.cells() as u64;
    let threads = cfg
        .num_threads
        .unwrap_or_else(num_cpus::get)
        .clamp(1, 1024);

    tracing::debug!(
        cols = x.len(),
        rows = y.len(),
        cells = total_cells,
        triangular,
        threads,
        measure = measure.name(),
        "computing matrix"
    );

    let pass = Pass {
        strings,
        measure,
        tag: hash_bytes(measure.name().as_bytes()),
        cache,
        x,
        y,
        triangular,
        global_cache: cfg.global_cache,
    };

    // Pre-partition the value buffer into disjoint slices. Each job owns
    // its chunk, so workers never contend on the matrix.
    let coords = move |k: usize| crate::hmatrix::cell_coords(x, y, triangular, k);

    let done_cells = AtomicU64::new(0);
    {
        let (tx, rx) = channel::unbounded::<Job<'_>>();
        for (idx, chunk) in matrix.values_mut().chunks_mut(SLICE_CELLS).enumerate() {
            tx.send(Job {
                first: idx * SLICE_CELLS,
                cells: chunk,
            })
            .expect("unbounded channel send cannot fail while rx lives");
        }
        drop(tx);

        std::thread::scope(|scope| -> Result<()> {
            let mut handles = Vec::with_capacity(threads);
            for t in 0..threads {
                let rx = rx.clone();
                let pass = &pass;
                let coords = &coords;
                let done_cells = &done_cells;
                let handle = std::thread::Builder::new()
                    .name(format!("simat-worker-{t}"))
                    .spawn_scoped(scope, move || {
                        while let Ok(job) = rx.recv() {
                            if abort.load(Ordering::Relaxed) {
                                // Drain without storing further cells.
                                continue;
                            }
                            for (off, cell) in job.cells.iter_mut().enumerate() {
                                let (col, row) = coords(job.first + off);
                                *cell = pass.cell(col, row);
                            }
                            let done = done_cells
                                .fetch_add(job.cells.len() as u64, Ordering::Relaxed)
                                + job.cells.len() as u64;
                            if let Some(p) = progress {
                                p.update(done, total_cells);
                            }
                        }
                    })?;
                handles.push(handle);
            }
            Ok(())
        })?;
    }

    if abort.load(Ordering::Relaxed) {
        return Err(MatrixError::Aborted);
    }
    Ok(matrix)
}
