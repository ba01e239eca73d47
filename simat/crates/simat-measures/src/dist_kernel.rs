//! Distance induced by a kernel in feature space.

use simat_str::HString;
use simat_util::hash::{hash_bytes, string_fingerprint};

use crate::config::{KernelDistConfig, MeasuresConfig};
use crate::norm::Norm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits, MeasureError, Result};

/// `d(x, y) = sqrt(K(x,x) + K(y,y) - 2 K(x,y))` for a kernel `K` selected
/// by name. Tiny negative radicands from floating-point error are clamped
/// to 0; `squared` skips the final square root.
///
/// The self-kernels are memoized through the value cache under this
/// measure's own tag, so they survive across the whole matrix regardless
/// of how the inner kernel is configured.
pub struct KernelDistance {
    inner: Box<dyn Measure>,
    norm: Norm,
    squared: bool,
    tag: u64,
}

impl KernelDistance {
    pub fn new(cfg: &KernelDistConfig, measures: &MeasuresConfig) -> Result<Self> {
        let inner = crate::measure_for(&cfg.kern, measures)?;
        if inner.traits().flavor != Flavor::Kernel {
            return Err(MeasureError::NotAKernel(cfg.kern.clone()));
        }
        let tag = hash_bytes(format!("dist_kernel:{}", cfg.kern).as_bytes());
        Ok(Self {
            inner,
            norm: cfg.norm,
            squared: cfg.squared,
            tag,
        })
    }

    fn self_kernel(&self, cx: &MeasureContext<'_>, s: &HString) -> f32 {
        cx.cache
            .memo(string_fingerprint(self.tag, s.hash()), || {
                self.inner.compare(cx, s, s)
            })
    }
}

impl Measure for KernelDistance {
    fn name(&self) -> &'static str {
        "dist_kernel"
    }

    fn traits(&self) -> MeasureTraits {
        // The induced distance inherits whatever symmetry the backing
        // kernel actually has.
        MeasureTraits {
            symmetric: self.inner.traits().symmetric,
            flavor: Flavor::Distance,
        }
    }

    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        let kxx = self.self_kernel(cx, x) as f64;
        let kyy = self.self_kernel(cx, y) as f64;
        let kxy = self.inner.compare(cx, x, y) as f64;

        let sq = (kxx + kyy - 2.0 * kxy).max(0.0);
        let raw = if self.squared { sq } else { sq.sqrt() };
        self.norm.apply(raw as f32, x.len(), y.len())
    }
}
