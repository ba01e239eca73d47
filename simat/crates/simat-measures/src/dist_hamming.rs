//! Hamming distance.

use simat_str::HString;

use crate::config::HammingConfig;
use crate::norm::Norm;
use crate::{Measure, MeasureContext, MeasureTraits};

/// Positionwise mismatch count.
///
/// Defined only for equal lengths; a pair of different lengths yields the
/// raw value `|x| + |y|` so that normalization maps incomparable pairs to
/// the top of the scale.
pub struct Hamming {
    norm: Norm,
}

impl Hamming {
    pub fn new(cfg: &HammingConfig) -> Self {
        Self { norm: cfg.norm }
    }
}

impl Measure for Hamming {
    fn name(&self) -> &'static str {
        "dist_hamming"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        let raw = if x.len() != y.len() {
            (x.len() + y.len()) as f32
        } else {
            (0..x.len()).filter(|&i| !x.sym_eq(i, y, i)).count() as f32
        };
        self.norm.apply(raw, x.len(), y.len())
    }
}
