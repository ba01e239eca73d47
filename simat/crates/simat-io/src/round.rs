//! Significant-digit rounding for the output writers.

/// Round `v` to `precision` significant digits.
///
/// The scale exponent is chosen from the magnitude of `v` so the most
/// significant digit survives: `round(v * 10^p) / 10^p` with
/// `p = precision - 1 - floor(log10 |v|)`. A `precision` of 0 means no
/// rounding at all.
pub fn round_sig(v: f32, precision: usize) -> f32 {
    if precision == 0 || v == 0.0 || !v.is_finite() {
        return v;
    }
    let exp = (v.abs() as f64).log10().floor() as i32;
    let p = precision as i32 - 1 - exp;
    let scale = 10f64.powi(p);
    ((v as f64 * scale).round() / scale) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_precision_is_identity() {
        assert_eq!(round_sig(0.123456, 0), 0.123456);
        assert_eq!(round_sig(12345.6, 0), 12345.6);
    }

    #[test]
    fn rounds_to_significant_digits() {
        assert_eq!(round_sig(0.123456, 3), 0.123);
        assert_eq!(round_sig(0.126, 2), 0.13);
        assert_eq!(round_sig(1234.5, 2), 1200.0);
        assert_eq!(round_sig(9.99, 1), 10.0);
    }

    #[test]
    fn magnitude_does_not_matter() {
        assert_eq!(round_sig(0.00012345, 3), 0.000123);
        assert_eq!(round_sig(12345000.0, 3), 12300000.0);
    }

    #[test]
    fn zero_and_negatives() {
        assert_eq!(round_sig(0.0, 4), 0.0);
        assert_eq!(round_sig(-0.123456, 3), -0.123);
    }
}
