//! Small numeric kernels used by the precision time arithmetic.
//!
//! Knuth's `two_sum` returns the rounded sum together with the exact rounding
//! error, so callers can carry the residual instead of dropping it.

#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

/// Error-free sum: `s + e == a + b` exactly, with `s = fl(a + b)`.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let v = s - a;
    let e = (a - (s - v)) + (b - v);
    (s, e)
}

/// Splits `x` into `(floor(x), x - floor(x))`.
///
/// The remainder is exact for `x >= 0`. For tiny negative `x` it can round
/// up to `1.0`.
#[inline]
pub fn split_floor(x: f64) -> (f64, f64) {
    let whole = libm::floor(x);
    (whole, x - whole)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sum_recovers_lost_bits() {
        let (s, e) = two_sum(1.0, 1e-17);
        assert_eq!(s, 1.0);
        assert_eq!(e, 1e-17);

        let (s, e) = two_sum(1e-17, 1.0);
        assert_eq!(s, 1.0);
        assert_eq!(e, 1e-17);
    }

    #[test]
    fn test_two_sum_exact_when_representable() {
        let (s, e) = two_sum(0.5, 0.25);
        assert_eq!(s, 0.75);
        assert_eq!(e, 0.0);
    }

    #[test]
    fn test_split_floor_negative() {
        let (whole, frac) = split_floor(-1.25);
        assert_eq!(whole, -2.0);
        assert_eq!(frac, 0.75);
    }

    #[test]
    fn test_fmod_matches_libm() {
        assert_eq!(fmod(370.0, 360.0), 10.0);
        assert_eq!(fmod(-10.0, 360.0), -10.0);
    }
}
