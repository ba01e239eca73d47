//! Gap-weighted subsequence kernel (SSK).

use simat_str::HString;
use simat_util::hash::{hash_bytes, string_fingerprint};

use crate::config::SubsequenceConfig;
use crate::norm::KernNorm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits};

/// Counts common subsequences of exactly `length` symbols, each occurrence
/// weighted by `decay^span` over the total span it stretches across both
/// strings (Lodhi et al. recurrence).
///
/// The DP runs over `(length, |x|, |y|)` in `f64` to keep the repeated
/// decay products stable, and needs two `(|x|+1) × (|y|+1)` scratch
/// layers, allocated per call.
pub struct Subsequence {
    k: usize,
    decay: f64,
    norm: KernNorm,
    tag: u64,
}

impl Subsequence {
    pub fn new(cfg: &SubsequenceConfig) -> Self {
        Self {
            k: cfg.length.max(1),
            decay: f64::from(cfg.decay).clamp(f64::MIN_POSITIVE, 1.0),
            norm: cfg.norm,
            tag: hash_bytes(b"kern_subsequence"),
        }
    }

    fn raw(&self, x: &HString, y: &HString) -> f32 {
        let (n, m) = (x.len(), y.len());
        if n < self.k || m < self.k {
            return 0.0;
        }
        let lam = self.decay;
        let lam2 = lam * lam;
        let width = m + 1;
        let idx = |i: usize, j: usize| i * width + j;

        // kp[idx(i, j)] = K'_{l-1}(x[..i], y[..j]); level l-1 = 0 is all-ones.
        let mut kp = vec![1.0f64; (n + 1) * width];
        let mut kp_next = vec![0.0f64; (n + 1) * width];
        let mut result = 0.0f64;

        for l in 1..=self.k {
            // Final level: accumulate K_k directly from K'_{k-1}.
            if l == self.k {
                for i in l..=n {
                    let mut sum = 0.0f64;
                    for j in l..=m {
                        if x.sym_eq(i - 1, y, j - 1) {
                            sum += lam2 * kp[idx(i - 1, j - 1)];
                        }
                    }
                    result += sum;
                }
                break;
            }

            // Intermediate level: K'_l from K'_{l-1}.
            for v in kp_next.iter_mut() {
                *v = 0.0;
            }
            for i in l..=n {
                // kpp = K''_l(x[..i], y[..j]), built incrementally in j.
                let mut kpp = 0.0f64;
                for j in l..=m {
                    kpp *= lam;
                    if x.sym_eq(i - 1, y, j - 1) {
                        kpp += lam2 * kp[idx(i - 1, j - 1)];
                    }
                    kp_next[idx(i, j)] = lam * kp_next[idx(i - 1, j)] + kpp;
                }
            }
            std::mem::swap(&mut kp, &mut kp_next);
        }
        result as f32
    }

    fn self_kernel(&self, cx: &MeasureContext<'_>, s: &HString) -> f32 {
        cx.cache
            .memo(string_fingerprint(self.tag, s.hash()), || self.raw(s, s))
    }
}

impl Measure for Subsequence {
    fn name(&self) -> &'static str {
        "kern_subsequence"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits {
            symmetric: true,
            flavor: Flavor::Kernel,
        }
    }

    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        // The DP accumulates in axis order, so swapped arguments would sum
        // the same terms differently; fix the orientation by content hash
        // to keep symmetry bit-exact.
        let (x, y) = if x.hash() <= y.hash() { (x, y) } else { (y, x) };
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
