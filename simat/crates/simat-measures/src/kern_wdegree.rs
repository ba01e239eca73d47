//! Weighted-degree kernel: position-dependent k-gram matches.

use simat_str::HString;
use simat_util::hash::{hash_bytes, string_fingerprint};

use crate::config::WdegreeConfig;
use crate::norm::KernNorm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits};

/// Sums, over block lengths `d = 1..=degree`, the weighted count of
/// positions where `x` and `y` carry an identical block of length `d`,
/// with the standard weight `β_d = 2 (degree - d + 1) / (degree (degree + 1))`.
///
/// Positions beyond the shorter string do not contribute. Instead of
/// testing every `(position, d)` pair, the run length of matching symbols
/// at each position is computed once; a block of length `d` starting at
/// `i` matches iff `run[i] >= d`, so position `i` contributes the prefix
/// sum `B[min(run[i], degree)]` of the weights.
pub struct WeightedDegree {
    degree: usize,
    weight_prefix: Vec<f64>,
    norm: KernNorm,
    tag: u64,
}

impl WeightedDegree {
    pub fn new(cfg: &WdegreeConfig) -> Self {
        let degree = cfg.degree.max(1);
        let d = degree as f64;
        let mut weight_prefix = vec![0.0f64; degree + 1];
        for k in 1..=degree {
            let beta = 2.0 * (d - k as f64 + 1.0) / (d * (d + 1.0));
            weight_prefix[k] = weight_prefix[k - 1] + beta;
        }
        Self {
            degree,
            weight_prefix,
            norm: cfg.norm,
            tag: hash_bytes(b"kern_wdegree"),
        }
    }

    fn raw(&self, x: &HString, y: &HString) -> f32 {
        let len = x.len().min(y.len());
        if len == 0 {
            return 0.0;
        }
        // run[i]: length of the matching symbol run starting at i.
        let mut run = vec![0usize; len];
        let mut r = 0usize;
        for i in (0..len).rev() {
            r = if x.sym_eq(i, y, i) { r + 1 } else { 0 };
            run[i] = r;
        }
        let mut k = 0.0f64;
        for &r in &run {
            k += self.weight_prefix[r.min(self.degree)];
        }
        k as f32
    }

    fn self_kernel(&self, cx: &MeasureContext<'_>, s: &HString) -> f32 {
        cx.cache
            .memo(string_fingerprint(self.tag, s.hash()), || self.raw(s, s))
    }
}

impl Measure for WeightedDegree {
    fn name(&self) -> &'static str {
        "kern_wdegree"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits {
            symmetric: true,
            flavor: Flavor::Kernel,
        }
    }

    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        let kxy = self.raw(x, y);
        match self.norm {
            KernNorm::None => kxy,
            KernNorm::L2 => {
                self.norm
                    .apply(kxy, self.self_kernel(cx, x), self.self_kernel(cx, y))
            }
        }
    }
}
