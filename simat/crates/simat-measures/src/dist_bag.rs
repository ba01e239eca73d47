//! Bag distance over symbol multisets.

use rustc_hash::FxHashMap;
use simat_str::HString;

use crate::config::BagConfig;
use crate::norm::Norm;
use crate::{Measure, MeasureContext, MeasureTraits};

/// Multiset difference distance: `max(|X \ Y|, |Y \ X|)` over the bags of
/// symbols. A cheap lower bound of the edit distance, mostly useful on
/// token form; on byte form it degenerates to byte histograms.
pub struct Bag {
    norm: Norm,
}

impl Bag {
    pub fn new(cfg: &BagConfig) -> Self {
        Self { norm: cfg.norm }
    }
}

fn histogram(s: &HString) -> FxHashMap<u64, i64> {
    let mut h = FxHashMap::default();
    for i in 0..s.len() {
        *h.entry(s.sym(i)).or_insert(0) += 1;
    }
    h
}

impl Measure for Bag {
    fn name(&self) -> &'static str {
        "dist_bag"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        let hx = histogram(x);
        let hy = histogram(y);

        let mut x_minus_y = 0i64;
        for (sym, &cnt) in &hx {
            x_minus_y += (cnt - hy.get(sym).copied().unwrap_or(0)).max(0);
        }
        let mut y_minus_x = 0i64;
        for (sym, &cnt) in &hy {
            y_minus_x += (cnt - hx.get(sym).copied().unwrap_or(0)).max(0);
        }

        self.norm
            .apply(x_minus_y.max(y_minus_x) as f32, x.len(), y.len())
    }
}
