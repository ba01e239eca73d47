//! Spectrum kernel: inner product of k-gram frequency vectors.

use rustc_hash::FxHashMap;
use simat_str::HString;
use simat_util::hash::{hash_bytes, hash_symbols, string_fingerprint};

use crate::config::SpectrumConfig;
use crate::norm::KernNorm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits};

/// Counts every contiguous k-gram and takes the inner product of the two
/// count vectors. A string shorter than `k` has no k-grams, so its
/// self-kernel (and any kernel against it) is 0.
///
/// k-grams are identified by a 64-bit hash of their symbol window, which
/// keeps the frequency map flat regardless of the symbol domain.
pub struct Spectrum {
    k: usize,
    norm: KernNorm,
    tag: u64,
}

impl Spectrum {
    pub fn new(cfg: &SpectrumConfig) -> Self {
        Self {
            k: cfg.length.max(1),
            norm: cfg.norm,
            tag: hash_bytes(b"kern_spectrum"),
        }
    }

    fn grams(&self, s: &HString) -> FxHashMap<u64, u32> {
        let mut counts = FxHashMap::default();
        if s.len() < self.k {
            return counts;
        }
        let mut window = vec![0u64; self.k];
        for i in 0..=(s.len() - self.k) {
            for (w, j) in window.iter_mut().zip(i..i + self.k) {
                *w = s.sym(j);
            }
            *counts.entry(hash_symbols(&window)).or_insert(0) += 1;
        }
        counts
    }

    fn raw(&self, x: &HString, y: &HString) -> f32 {
        let gx = self.grams(x);
        let gy = self.grams(y);
        // Iterate the smaller map.
        let (small, large) = if gx.len() <= gy.len() {
            (&gx, &gy)
        } else {
            (&gy, &gx)
        };
        let mut k = 0.0f64;
        for (gram, &ca) in small {
            if let Some(&cb) = large.get(gram) {
                k += ca as f64 * cb as f64;
            }
        }
        k as f32
    }

    fn self_kernel(&self, cx: &MeasureContext<'_>, s: &HString) -> f32 {
        cx.cache
            .memo(string_fingerprint(self.tag, s.hash()), || self.raw(s, s))
    }
}

impl Measure for Spectrum {
    fn name(&self) -> &'static str {
        "kern_spectrum"
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
