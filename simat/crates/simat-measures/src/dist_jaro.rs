//! Jaro and Jaro-Winkler distances.

use simat_str::HString;

use crate::config::JaroWinklerConfig;
use crate::{Measure, MeasureContext, MeasureTraits};

/// Jaro similarity via the matching-window algorithm.
///
/// Symbols match when equal and at most `max(|x|, |y|) / 2 - 1` positions
/// apart; transpositions are half the number of matched symbols that ended
/// up in a different order.
pub fn jaro_similarity(x: &HString, y: &HString) -> f32 {
    let (lx, ly) = (x.len(), y.len());
    if lx == 0 && ly == 0 {
        return 1.0;
    }
    if lx == 0 || ly == 0 {
        return 0.0;
    }

    let window = (lx.max(ly) / 2).saturating_sub(1);
    let mut x_matched = vec![false; lx];
    let mut y_matched = vec![false; ly];

    let mut matches = 0usize;
    for i in 0..lx {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(ly);
        for j in lo..hi {
            if !y_matched[j] && x.sym_eq(i, y, j) {
                x_matched[i] = true;
                y_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut j = 0usize;
    for i in 0..lx {
        if !x_matched[i] {
            continue;
        }
        while !y_matched[j] {
            j += 1;
        }
        if !x.sym_eq(i, y, j) {
            transpositions += 1;
        }
        j += 1;
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;
    ((m / lx as f64 + m / ly as f64 + (m - t) / m) / 3.0) as f32
}

/// Jaro similarity boosted by a shared-prefix reward of up to `prefix_len`
/// symbols, weighted by `scaling`.
pub fn jarowinkler_similarity(
    x: &HString,
    y: &HString,
    prefix_len: usize,
    scaling: f32,
) -> f32 {
    let sim = jaro_similarity(x, y);
    let max_prefix = prefix_len.min(x.len()).min(y.len());
    let mut prefix = 0usize;
    while prefix < max_prefix && x.sym_eq(prefix, y, prefix) {
        prefix += 1;
    }
    sim + prefix as f32 * scaling * (1.0 - sim)
}

/// Jaro distance, `1 - similarity`.
pub struct Jaro;

impl Jaro {
    pub fn new() -> Self {
        Jaro
    }
}

impl Default for Jaro {
    fn default() -> Self {
        Self::new()
    }
}

impl Measure for Jaro {
    fn name(&self) -> &'static str {
        "dist_jaro"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        1.0 - jaro_similarity(x, y)
    }
}

/// Jaro-Winkler distance, `1 - similarity`.
pub struct JaroWinkler {
    prefix_len: usize,
    scaling: f32,
}

impl JaroWinkler {
    pub fn new(cfg: &JaroWinklerConfig) -> Self {
        // The prefix reward adds up to prefix_len * scaling of the
        // remaining gap to 1, so scaling above 1/prefix_len would push
        // the similarity past 1 and the distance below 0.
        let bound = (1.0 / cfg.prefix_len.max(1) as f32).min(1.0);
        Self {
            prefix_len: cfg.prefix_len,
            scaling: cfg.scaling.clamp(0.0, bound),
        }
    }
}

impl Measure for JaroWinkler {
    fn name(&self) -> &'static str {
        "dist_jarowinkler"
    }

    fn traits(&self) -> MeasureTraits {
        MeasureTraits::SYMMETRIC_DISTANCE
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        1.0 - jarowinkler_similarity(x, y, self.prefix_len, self.scaling)
    }
}
