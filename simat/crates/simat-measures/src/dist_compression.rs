//! Normalized compression distance.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use simat_str::HString;
use simat_util::hash::{hash_bytes, string_fingerprint};

use crate::config::CompressionConfig;
use crate::{Measure, MeasureContext, MeasureTraits};

/// Normalized compression distance over zlib stream sizes:
///
/// `NCD(x, y) = (C(xy) - min(C(x), C(y))) / max(C(x), C(y))`
///
/// where `C` is the compressed length of the symbol bytes. `C(x)` and
/// `C(y)` are memoized through the value cache under single-string
/// fingerprints; the concatenation is compressed fresh on every call.
///
/// Note that NCD is not a metric: `compare(x, x)` is positive, because a
/// real compressor cannot fully exploit the duplication. The matrix
/// orchestrator still pins the diagonal of a triangular matrix to 0.
pub struct CompressionDist {
    level: Compression,
    tag: u64,
}

impl CompressionDist {
    pub fn new(cfg: &CompressionConfig) -> Self {
        Self {
            level: Compression::new(cfg.level.clamp(1, 9)),
            tag: hash_bytes(b"dist_compression"),
        }
    }

    /// Compressed size of `data` in bytes.
    fn csize(&self, data: &[u8]) -> f32 {
        let mut enc = ZlibEncoder::new(Vec::new(), self.level);
        // Writing into a Vec cannot fail; a broken encoder state would
        // surface as a non-finite result and be caught by the guard.
        if enc.write_all(data).is_err() {
            return f32::NAN;
        }
        match enc.finish() {
            Ok(out) => out.len() as f32,
            Err(_) => f32::NAN,
        }
    }
}

impl Measure for CompressionDist {
    fn name(&self) -> &'static str {
        "dist_compression"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        // Real compressors are not order-blind: C(xy) and C(yx) can differ
        // by a byte or two. Ordering the pair by content hash keeps the
        // measure exactly symmetric.
        let (x, y) = if x.hash() <= y.hash() { (x, y) } else { (y, x) };
        let bx = x.symbol_bytes();
        let by = y.symbol_bytes();

        let cxs = cx
            .cache
            .memo(string_fingerprint(self.tag, x.hash()), || self.csize(&bx));
        let cys = cx
            .cache
            .memo(string_fingerprint(self.tag, y.hash()), || self.csize(&by));

        let mut joined = Vec::with_capacity(bx.len() + by.len());
        joined.extend_from_slice(&bx);
        joined.extend_from_slice(&by);
        let cxy = self.csize(&joined);

        (cxy - cxs.min(cys)) / cxs.max(cys)
    }
}
