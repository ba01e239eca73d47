//! Levenshtein distance with configurable operation costs.

use simat_str::HString;

use crate::config::EditCosts;
use crate::norm::Norm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits};

/// Classical edit distance over insertions, deletions and substitutions.
///
/// The DP grid is `(|x|+1) × (|y|+1)`; only two rolling rows are kept, so
/// scratch space is `O(|y|)` per call regardless of `|x|`.
pub struct Levenshtein {
    norm: Norm,
    cost_ins: f32,
    cost_del: f32,
    cost_sub: f32,
}

impl Levenshtein {
    pub fn new(cfg: &EditCosts) -> Self {
        Self {
            norm: cfg.norm,
            cost_ins: cfg.cost_ins,
            cost_del: cfg.cost_del,
            cost_sub: cfg.cost_sub,
        }
    }

    fn raw(&self, x: &HString, y: &HString) -> f32 {
        let (lx, ly) = (x.len(), y.len());
        if lx == 0 {
            return ly as f32 * self.cost_ins;
        }
        if ly == 0 {
            return lx as f32 * self.cost_del;
        }

        let mut prev: Vec<f32> = (0..=ly).map(|j| j as f32 * self.cost_ins).collect();
        let mut cur = vec![0.0f32; ly + 1];

        for i in 1..=lx {
            cur[0] = i as f32 * self.cost_del;
            for j in 1..=ly {
                let sub = prev[j - 1]
                    + if x.sym_eq(i - 1, y, j - 1) {
                        0.0
                    } else {
                        self.cost_sub
                    };
                let del = prev[j] + self.cost_del;
                let ins = cur[j - 1] + self.cost_ins;
                cur[j] = sub.min(del).min(ins);
            }
            std::mem::swap(&mut prev, &mut cur);
        }
        prev[ly]
    }
}

impl Measure for Levenshtein {
    fn name(&self) -> &'static str {
        "dist_levenshtein"
    }

    fn traits(&self) -> MeasureTraits {
        // Unequal insertion and deletion costs make the two directions
        // genuinely differ, so the matrix must not be folded triangular.
        MeasureTraits {
            symmetric: self.cost_ins == self.cost_del,
            flavor: Flavor::Distance,
        }
    }

    fn compare(&self, _cx: &MeasureContext<'_>, x: &HString, y: &HString) -> f32 {
        if x.hash() == y.hash() {
            return 0.0;
        }
        self.norm.apply(self.raw(x, y), x.len(), y.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{hs, toks};
    use simat_util::VCache;

    fn lev(x: &str, y: &str) -> f32 {
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        Levenshtein::new(&EditCosts::default()).compare(&cx, &hs(x), &hs(y))
    }

    #[test]
    fn kitten_sitting_is_three() {
        assert_eq!(lev("kitten", "sitting"), 3.0);
        assert_eq!(lev("sitting", "kitten"), 3.0);
    }

    #[test]
    fn empty_against_nonempty_counts_insertions() {
        assert_eq!(lev("", "abc"), 3.0);
        assert_eq!(lev("abc", ""), 3.0);
        assert_eq!(lev("", ""), 0.0);
    }

    #[test]
    fn identical_inputs_are_zero() {
        assert_eq!(lev("same", "same"), 0.0);
    }

    #[test]
    fn asymmetric_costs_weight_directions() {
        let cfg = EditCosts {
            cost_ins: 2.0,
            cost_del: 3.0,
            ..Default::default()
        };
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        let m = Levenshtein::new(&cfg);
        // Turning "ab" into "abc" inserts one symbol into x.
        assert_eq!(m.compare(&cx, &hs("ab"), &hs("abc")), 2.0);
        // The other direction deletes one.
        assert_eq!(m.compare(&cx, &hs("abc"), &hs("ab")), 3.0);
        // The two directions differ, and the traits say so.
        assert!(!m.traits().symmetric);
    }

    #[test]
    fn symmetry_trait_follows_the_costs() {
        assert!(Levenshtein::new(&EditCosts::default()).traits().symmetric);
        let skewed = EditCosts {
            cost_ins: 0.5,
            ..Default::default()
        };
        assert!(!Levenshtein::new(&skewed).traits().symmetric);
        // Substitution cost does not distinguish directions.
        let subbed = EditCosts {
            cost_sub: 2.0,
            ..Default::default()
        };
        assert!(Levenshtein::new(&subbed).traits().symmetric);
    }

    #[test]
    fn max_norm_bounds_to_unit_interval() {
        let cfg = EditCosts {
            norm: Norm::Max,
            ..Default::default()
        };
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        let m = Levenshtein::new(&cfg);
        let d = m.compare(&cx, &hs("abcd"), &hs("wxyz"));
        assert_eq!(d, 1.0);
    }

    #[test]
    fn token_form_compares_whole_tokens() {
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        let m = Levenshtein::new(&EditCosts::default());
        let d = m.compare(&cx, &toks("the quick fox"), &toks("the slow fox"));
        assert_eq!(d, 1.0);
    }
}
