//! Jaccard distance over symbol sets.

use rustc_hash::FxHashSet;
use simat_str::HString;

use crate::{Measure, MeasureContext, MeasureTraits};

/// `1 - |X ∩ Y| / |X ∪ Y|` over the sets of distinct symbols. Already in
/// `[0, 1]`, so there is no normalization knob.
pub struct Jaccard;

impl Jaccard {
    pub fn new() -> Self {
        Jaccard
    }
}

impl Default for Jaccard {
    fn default() -> Self {
        Self::new()
    }
}

fn symbol_set(s: &HString) -> FxHashSet<u64> {
    (0..s.len()).map(|i| s.sym(i)).collect()
}

impl Measure for Jaccard {
    fn name(&self) -> &'static str {
        "dist_jaccard"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        let sx = symbol_set(x);
        let sy = symbol_set(y);
        let inter = sx.intersection(&sy).count();
        let union = sx.len() + sy.len() - inter;
        if union == 0 {
            return 0.0;
        }
        1.0 - inter as f32 / union as f32
    }
}
