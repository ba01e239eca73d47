//! simat-matrix - Result Matrix and Parallel Orchestration
//!
//! Given the preprocessed input array and a configured measure, this crate
//! allocates the result matrix, partitions its cells into slices, and
//! drives a fixed pool of worker threads that fill them:
//!
//! ```text
//!   inputs ──▶ [allocate HMatrix] ──▶ [partition into slices]
//!                                            │
//!                    ┌───────────┬───────────┤
//!                    ▼           ▼           ▼
//!               worker 0    worker 1 ...  worker P-1
//!                    │           │           │
//!                    └───────────┴─────┬─────┘
//!                                      ▼
//!                            completion barrier ──▶ HMatrix
//! ```
//!
//! When the row and column ranges coincide and the measure is symmetric,
//! only the lower triangle including the diagonal is stored and computed.
//! Workers write disjoint sub-slices of the value buffer, so no locking is
//! needed on the matrix itself; an abort flag is polled between slices.

pub mod hmatrix;
pub mod orchestrator;

pub use hmatrix::{HMatrix, Span};
pub use orchestrator::{compute, ComputeConfig, Progress};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("invalid range {start}..{end} for {count} strings")]
    InvalidRange {
        start: usize,
        end: usize,
        count: usize,
    },

    #[error("computation aborted")]
    Aborted,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
