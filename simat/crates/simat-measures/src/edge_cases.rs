//! Edge case and property tests across all measures.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use crate::testutil::hs;
use crate::{measure_for, Flavor, MeasureContext, MeasuresConfig, Norm};
use simat_util::VCache;

fn all_measures() -> Vec<Box<dyn crate::Measure>> {
    let cfg = MeasuresConfig::default();
    crate::MEASURE_NAMES
        .iter()
        .map(|n| measure_for(n, &cfg).unwrap())
        .collect()
}

// ==================== EDGE CASES ====================

#[test]
fn edge_empty_pairs_never_panic_and_stay_finite() {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    let cases = [("", ""), ("", "abc"), ("abc", ""), ("", "a b c")];
    for m in all_measures() {
        for (x, y) in cases {
            let v = m.compare(&cx, &hs(x), &hs(y));
            assert!(v.is_finite(), "{} on ({x:?}, {y:?}) gave {v}", m.name());
        }
    }
}

#[test]
fn edge_distances_are_zero_on_self_except_compression() {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    let s = hs("self-similarity probe");
    for m in all_measures() {
        if m.traits().flavor != Flavor::Distance || m.name() == "dist_compression" {
            continue;
        }
        assert_eq!(m.compare(&cx, &s, &s), 0.0, "{}", m.name());
    }
}

#[test]
fn edge_long_inputs_do_not_overflow_scratch() {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    let x = hs(&"ab".repeat(2000));
    let y = hs(&"ba".repeat(1999));
    for name in ["dist_levenshtein", "dist_osa", "kern_spectrum"] {
        let m = measure_for(name, &MeasuresConfig::default()).unwrap();
        assert!(m.compare(&cx, &x, &y).is_finite());
    }
}

#[test]
fn edge_binary_symbols_are_ordinary() {
    use simat_str::{HString, Preproc, PreprocConfig};

    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    let p = Preproc::new(&PreprocConfig::default());
    let x = p.apply(HString::new(vec![b'a', 0x00, b'b', 0xff]));
    let y = p.apply(HString::new(vec![b'a', 0x00, b'c', 0xff]));
    let m = measure_for("dist_levenshtein", &MeasuresConfig::default()).unwrap();
    assert_eq!(m.compare(&cx, &x, &y), 1.0);
}

// ==================== PROPERTIES ====================

/// Printable ASCII strings up to a modest length; enough to exercise the
/// DP paths without making quickcheck rounds slow.
#[derive(Debug, Clone)]
struct Ascii(String);

impl Arbitrary for Ascii {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 24;
        let s = (0..len)
            .map(|_| char::from(b' ' + (u8::arbitrary(g) % 95)))
            .collect();
        Ascii(s)
    }
}

#[quickcheck]
fn prop_symmetric_measures_commute(x: Ascii, y: Ascii) -> bool {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    all_measures().iter().all(|m| {
        !m.traits().symmetric
            || m.compare(&cx, &hs(&x.0), &hs(&y.0)) == m.compare(&cx, &hs(&y.0), &hs(&x.0))
    })
}

#[quickcheck]
fn prop_results_are_finite(x: Ascii, y: Ascii) -> bool {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    all_measures()
        .iter()
        .all(|m| m.compare(&cx, &hs(&x.0), &hs(&y.0)).is_finite())
}

#[quickcheck]
fn prop_distances_are_non_negative(x: Ascii, y: Ascii) -> bool {
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    all_measures().iter().all(|m| {
        m.traits().flavor != Flavor::Distance || m.compare(&cx, &hs(&x.0), &hs(&y.0)) >= 0.0
    })
}

#[quickcheck]
fn prop_length_norm_bounds_edit_distances(x: Ascii, y: Ascii) -> bool {
    let mut cfg = MeasuresConfig::default();
    cfg.dist_levenshtein.norm = Norm::Length;
    cfg.dist_osa.norm = Norm::Length;
    cfg.dist_hamming.norm = Norm::Length;
    cfg.dist_bag.norm = Norm::Length;
    let cache = VCache::new(4096);
    let cx = MeasureContext::new(&cache);
    ["dist_levenshtein", "dist_osa", "dist_hamming", "dist_bag"]
        .iter()
        .all(|n| {
            let m = measure_for(n, &cfg).unwrap();
            let d = m.compare(&cx, &hs(&x.0), &hs(&y.0));
            (0.0..=1.0).contains(&d)
        })
}
