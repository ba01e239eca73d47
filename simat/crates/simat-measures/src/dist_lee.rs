//! Lee distance on a modular alphabet.

use simat_str::HString;

use crate::config::LeeConfig;
use crate::norm::Norm;
use crate::{Measure, MeasureContext, MeasureTraits};

/// Sum of cyclic per-position symbol differences on an alphabet of size
/// `alph`: each position contributes `min(|a-b|, alph - |a-b|)`.
///
/// Like Hamming, the distance is only defined for equal lengths; unequal
/// pairs yield the raw value `|x| + |y|`. When a normalization is selected
/// the raw sum is first scaled by the per-position maximum `alph / 2`, so
/// the normalized value stays within `[0, 1]`.
pub struct Lee {
    norm: Norm,
    alph: u64,
}

impl Lee {
    pub fn new(cfg: &LeeConfig) -> Self {
        Self {
            norm: cfg.norm,
            alph: cfg.alph.max(2),
        }
    }
}

impl Measure for Lee {
    fn name(&self) -> &'static str {
        "dist_lee"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        if x.len() != y.len() {
            return self
                .norm
                .apply((x.len() + y.len()) as f32, x.len(), y.len());
        }
        let mut sum = 0u64;
        for i in 0..x.len() {
            let a = x.sym(i) % self.alph;
            let b = y.sym(i) % self.alph;
            let d = a.abs_diff(b);
            sum += d.min(self.alph - d);
        }
        let mut raw = sum as f32;
        if self.norm != Norm::None {
            raw /= (self.alph / 2) as f32;
        }
        self.norm.apply(raw, x.len(), y.len())
    }
}
