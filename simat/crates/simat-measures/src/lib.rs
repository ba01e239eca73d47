//! simat-measures - Pairwise Similarity and Distance Measures
//!
//! Every measure exposes the same contract: it is constructed once from its
//! config subsection by [`measure_for`], and then [`Measure::compare`] maps
//! a pair of preprocessed strings to a single float, any number of times,
//! from any thread. A [`MeasureTraits`] value declares up front whether the
//! measure is symmetric and whether it is a kernel (higher = more similar)
//! or a distance (higher = more dissimilar); the matrix orchestrator keys
//! its optimizations off these traits and they never change per pair.
//!
//! Measures that decompose a pair into sub-pair values (self-kernels for
//! normalization, per-string compressed sizes) memoize those through the
//! value cache carried in [`MeasureContext`]. The context is passed
//! explicitly on every call; there is no global state anywhere in this
//! crate.
//!
//! Shipped families:
//!
//! - edit distances: `dist_levenshtein`, `dist_osa` (alias `dist_damerau`),
//!   `dist_hamming`, `dist_lee`, `dist_jaro`, `dist_jarowinkler`
//! - compression distance: `dist_compression`
//! - bag/set distances: `dist_bag`, `dist_jaccard`
//! - string kernels: `kern_spectrum`, `kern_wdegree`, `kern_subsequence`
//! - kernel-derived distance: `dist_kernel`

use std::sync::atomic::{AtomicBool, Ordering};

use simat_str::HString;
use simat_util::VCache;

pub mod config;
pub mod dist_bag;
pub mod dist_compression;
pub mod dist_hamming;
pub mod dist_jaccard;
pub mod dist_jaro;
pub mod dist_kernel;
pub mod dist_lee;
pub mod dist_levenshtein;
pub mod dist_osa;
pub mod kern_spectrum;
pub mod kern_subsequence;
pub mod kern_wdegree;
pub mod norm;

#[cfg(test)]
mod edge_cases;

pub use config::MeasuresConfig;
pub use norm::{KernNorm, Norm};

use thiserror::Error;

/// Errors surfaced while building a measure from its configuration.
///
/// Once constructed, a measure never reports user-visible errors from
/// `compare`; in-loop anomalies degrade to finite values instead.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("unknown measure '{0}'")]
    UnknownMeasure(String),

    #[error("measure '{0}' is not a kernel and cannot back dist_kernel")]
    NotAKernel(String),
}

pub type Result<T> = std::result::Result<T, MeasureError>;

/// Whether higher compare values mean more similar or more dissimilar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Higher = more dissimilar; `compare(x, x) == 0`.
    Distance,
    /// Higher = more similar; `compare(x, x)` is the self-similarity.
    Kernel,
}

/// Static properties of a measure, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureTraits {
    pub symmetric: bool,
    pub flavor: Flavor,
}

impl MeasureTraits {
    pub const SYMMETRIC_DISTANCE: Self = Self {
        symmetric: true,
        flavor: Flavor::Distance,
    };
    pub const SYMMETRIC_KERNEL: Self = Self {
        symmetric: true,
        flavor: Flavor::Kernel,
    };
}

/// Per-call environment a measure computes in.
///
/// Carries the shared value cache; constructed by the orchestrator and
/// threaded through every `compare` call instead of living in a global.
pub struct MeasureContext<'a> {
    pub cache: &'a VCache,
}

impl<'a> MeasureContext<'a> {
    pub fn new(cache: &'a VCache) -> Self {
        Self { cache }
    }
}

/// A configured pairwise measure.
pub trait Measure: Send + Sync {
    /// Canonical name the measure was selected by.
    fn name(&self) -> &'static str;

    fn traits(&self) -> MeasureTraits;

    /// Compare two preprocessed strings.
    ///
    /// The returned value is always finite; see [`measure_for`] for the
    /// guard that enforces this.
    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32;
}

/// Finiteness guard wrapped around every registered measure.
///
/// Replaces a non-finite result by 0 for kernels and `|x| + |y|` for
/// distances, warning once per run per measure.
struct Guarded<M> {
    inner: M,
    warned: AtomicBool,
}

impl<M> Guarded<M> {
    fn new(inner: M) -> Self {
        Self {
            inner,
            warned: AtomicBool::new(false),
        }
    }
}

impl<M: Measure> Measure for Guarded<M> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn traits(&self) -> MeasureTraits {
        self.inner.traits()
    }

    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        let v = self.inner.compare(cx, x, y);
        if v.is_finite() {
            return v;
        }
        if !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                measure = self.inner.name(),
                value = f64::from(v),
                "non-finite result replaced"
            );
        }
        match self.inner.traits().flavor {
            Flavor::Kernel => 0.0,
            Flavor::Distance => (x.len() + y.len()) as f32,
        }
    }
}

/// Build the measure registered under `name`, latching its parameters from
/// the matching config subsection.
pub fn measure_for(name: &str, cfg: &MeasuresConfig) -> Result<Box<dyn Measure>> {
    let m: Box<dyn Measure> = match name {
        "dist_levenshtein" => Box::new(Guarded::new(dist_levenshtein::Levenshtein::new(
            &cfg.dist_levenshtein,
        ))),
        "dist_osa" | "dist_damerau" => Box::new(Guarded::new(dist_osa::Osa::new(&cfg.dist_osa))),
        "dist_hamming" => Box::new(Guarded::new(dist_hamming::Hamming::new(&cfg.dist_hamming))),
        "dist_lee" => Box::new(Guarded::new(dist_lee::Lee::new(&cfg.dist_lee))),
        "dist_jaro" => Box::new(Guarded::new(dist_jaro::Jaro::new())),
        "dist_jarowinkler" => Box::new(Guarded::new(dist_jaro::JaroWinkler::new(
            &cfg.dist_jarowinkler,
        ))),
        "dist_compression" => Box::new(Guarded::new(dist_compression::CompressionDist::new(
            &cfg.dist_compression,
        ))),
        "dist_bag" => Box::new(Guarded::new(dist_bag::Bag::new(&cfg.dist_bag))),
        "dist_jaccard" => Box::new(Guarded::new(dist_jaccard::Jaccard::new())),
        "kern_spectrum" => Box::new(Guarded::new(kern_spectrum::Spectrum::new(
            &cfg.kern_spectrum,
        ))),
        "kern_wdegree" => Box::new(Guarded::new(kern_wdegree::WeightedDegree::new(
            &cfg.kern_wdegree,
        ))),
        "kern_subsequence" => Box::new(Guarded::new(kern_subsequence::Subsequence::new(
            &cfg.kern_subsequence,
        ))),
        "dist_kernel" => Box::new(Guarded::new(dist_kernel::KernelDistance::new(
            &cfg.dist_kernel,
            cfg,
        )?)),
        _ => return Err(MeasureError::UnknownMeasure(name.to_string())),
    };
    Ok(m)
}

/// All canonical measure names, for diagnostics and completion.
pub const MEASURE_NAMES: &[&str] = &[
    "dist_levenshtein",
    "dist_osa",
    "dist_damerau",
    "dist_hamming",
    "dist_lee",
    "dist_jaro",
    "dist_jarowinkler",
    "dist_compression",
    "dist_bag",
    "dist_jaccard",
    "kern_spectrum",
    "kern_wdegree",
    "kern_subsequence",
    "dist_kernel",
];

#[cfg(test)]
pub(crate) mod testutil {
    use simat_str::{HString, Preproc, PreprocConfig};

    /// Byte-form string straight through the default preprocessor.
    pub fn hs(s: &str) -> HString {
        Preproc::new(&PreprocConfig::default()).apply(HString::new(s.as_bytes().to_vec()))
    }

    /// Token-form string split on spaces.
    pub fn toks(s: &str) -> HString {
        let cfg = PreprocConfig {
            delim: " ".into(),
            ..Default::default()
        };
        Preproc::new(&cfg).apply(HString::new(s.as_bytes().to_vec()))
    }
}
