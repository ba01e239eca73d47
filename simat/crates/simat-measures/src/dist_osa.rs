//! Optimal string alignment distance (restricted Damerau-Levenshtein).

use simat_str::HString;

use crate::config::OsaCosts;
use crate::norm::Norm;
use crate::{Flavor, Measure, MeasureContext, MeasureTraits};

/// Edit distance with adjacent transpositions, under the restriction that
/// no substring is edited more than once. Registered as both `dist_osa`
/// and `dist_damerau`.
///
/// Three rolling rows: the transposition case reaches back two rows.
pub struct Osa {
    norm: Norm,
    cost_ins: f32,
    cost_del: f32,
    cost_sub: f32,
    cost_tra: f32,
}

impl Osa {
    pub fn new(cfg: &OsaCosts) -> Self {
        Self {
            norm: cfg.norm,
            cost_ins: cfg.cost_ins,
            cost_del: cfg.cost_del,
            cost_sub: cfg.cost_sub,
            cost_tra: cfg.cost_tra,
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

        let mut prev2 = vec![0.0f32; ly + 1];
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
                let mut best = sub.min(del).min(ins);
                if i > 1
                    && j > 1
                    && x.sym_eq(i - 1, y, j - 2)
                    && x.sym_eq(i - 2, y, j - 1)
                {
                    best = best.min(prev2[j - 2] + self.cost_tra);
                }
                cur[j] = best;
            }
            std::mem::swap(&mut prev2, &mut prev);
            std::mem::swap(&mut prev, &mut cur);
        }
        prev[ly]
    }
}

impl Measure for Osa {
    fn name(&self) -> &'static str {
        "dist_osa"
    }

    fn traits(&self) -> MeasureTraits {
        // As for Levenshtein, skewed insert/delete costs break symmetry;
        // transpositions swap a pair in place, so cost_tra never does.
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
    use crate::testutil::hs;
    use simat_util::VCache;

    fn osa(x: &str, y: &str) -> f32 {
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        Osa::new(&OsaCosts::default()).compare(&cx, &hs(x), &hs(y))
    }

    #[test]
    fn unit_cost_vectors() {
        assert_eq!(osa("", ""), 0.0);
        assert_eq!(osa("a", ""), 1.0);
        assert_eq!(osa("", "a"), 1.0);
        assert_eq!(osa("a", "a"), 0.0);
        // The restriction forbids editing the transposed pair again, so
        // this stays at 3 where unrestricted Damerau would give 2.
        assert_eq!(osa("ca", "abc"), 3.0);
        assert_eq!(osa("abc", "ca"), 3.0);
    }

    #[test]
    fn adjacent_swap_costs_one() {
        assert_eq!(osa("ab", "ba"), 1.0);
        assert_eq!(osa("abcdef", "abcdfe"), 1.0);
    }

    #[test]
    fn symmetry_trait_follows_the_costs() {
        assert!(Osa::new(&OsaCosts::default()).traits().symmetric);
        let skewed = OsaCosts {
            cost_ins: 2.0,
            cost_del: 3.0,
            ..Default::default()
        };
        assert!(!Osa::new(&skewed).traits().symmetric);
        // cost_tra alone leaves both directions identical.
        let swappy = OsaCosts {
            cost_tra: 5.0,
            ..Default::default()
        };
        assert!(Osa::new(&swappy).traits().symmetric);
    }

    #[test]
    fn transposition_cost_knob_applies() {
        let cfg = OsaCosts {
            cost_tra: 5.0,
            ..Default::default()
        };
        let cache = VCache::new(64);
        let cx = MeasureContext::new(&cache);
        let m = Osa::new(&cfg);
        // Swap now costs more than two substitutions.
        assert_eq!(m.compare(&cx, &hs("ab"), &hs("ba")), 2.0);
    }

    #[test]
    fn falls_back_to_levenshtein_without_swaps() {
        assert_eq!(osa("kitten", "sitting"), 3.0);
    }
}
