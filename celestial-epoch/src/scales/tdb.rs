//! Barycentric Dynamical Time.
//!
//! TDB differs from TT by a periodic relativistic term dominated by a ~1.66 ms
//! annual oscillation from Earth's orbital eccentricity, plus smaller lunar,
//! planetary and diurnal contributions.
//!
//! Two models are available, selected by the parameter list:
//!
//! - no parameters: the two-term approximation
//!   `0.001658 sin g + 0.000014 sin 2g`, good to about 40 µs;
//! - `[elong, u, v]`: observer east longitude (rad) and geocentric
//!   cylindrical distances (km), as returned by
//!   [`Location::tdb_parameters`](celestial_core::Location::tdb_parameters).
//!   Uses the leading Fairhead & Bretagnon (1990) terms plus the topocentric
//!   terms, good to about a microsecond.

use celestial_core::constants::{
    DAYS_PER_JULIAN_MILLENNIUM, DEG_TO_RAD, SECONDS_PER_DAY_F64, TWOPI,
};
use celestial_core::math::fmod;

use super::tt::tt_seconds;
use super::{check_parameters, TimeScale};
use crate::constants::{FAIRHEAD_T0, FAIRHEAD_T1, FAIRHEAD_T2, FAIRHEAD_T3, TT_MINUS_TAI};
use crate::errors::TimeResult;
use crate::instant::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TDB;

impl TimeScale for TDB {
    fn name(&self) -> &str {
        "TDB"
    }

    fn accepts_parameters(&self, count: usize) -> bool {
        count == 0 || count == 3
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        check_parameters(self, params)?;
        let tt = tt_seconds(tai);
        let dtr = match params {
            [elong, u, v] => tdb_minus_tt_topocentric(tt, *elong, *u, *v),
            _ => tdb_minus_tt(tt),
        };
        Ok(TT_MINUS_TAI + dtr)
    }
}

/// TDB − TT in seconds from the mean anomaly of the Earth.
pub(crate) fn tdb_minus_tt(tt_seconds: f64) -> f64 {
    let days = tt_seconds / SECONDS_PER_DAY_F64;
    let g = (357.53 + 0.985_600_3 * days) * DEG_TO_RAD;
    0.001_658 * libm::sin(g) + 0.000_014 * libm::sin(2.0 * g)
}

/// TDB − TT in seconds for an observer, truncated Fairhead & Bretagnon series.
pub(crate) fn tdb_minus_tt_topocentric(tt_seconds: f64, elong: f64, u: f64, v: f64) -> f64 {
    let t = tt_seconds / SECONDS_PER_DAY_F64 / DAYS_PER_JULIAN_MILLENNIUM;

    // UT1 day fraction approximated by the TT one; the diurnal terms are
    // microsecond level so the ~1 min difference does not matter.
    let ut = fmod(tt_seconds + 43_200.0, SECONDS_PER_DAY_F64) / SECONDS_PER_DAY_F64;
    let tsol = fmod(ut, 1.0) * TWOPI + elong;

    let w = t / 3600.0;
    let elsun = fmod(280.46645683 + 1296027711.03429 * w, 360.0) * DEG_TO_RAD;
    let emsun = fmod(357.52910918 + 1295965810.481 * w, 360.0) * DEG_TO_RAD;
    let d = fmod(297.85019547 + 16029616012.090 * w, 360.0) * DEG_TO_RAD;
    let elj = fmod(34.35151874 + 109306899.89453 * w, 360.0) * DEG_TO_RAD;
    let els = fmod(50.07744430 + 44046398.47038 * w, 360.0) * DEG_TO_RAD;

    let wt = 0.00029e-10 * u * libm::sin(tsol + elsun - els)
        + 0.00100e-10 * u * libm::sin(tsol - 2.0 * emsun)
        + 0.00133e-10 * u * libm::sin(tsol - d)
        + 0.00133e-10 * u * libm::sin(tsol + elsun - elj)
        - 0.00229e-10 * u * libm::sin(tsol + 2.0 * elsun + emsun)
        - 0.02200e-10 * v * libm::cos(elsun + emsun)
        + 0.05312e-10 * u * libm::sin(tsol - emsun)
        - 0.13677e-10 * u * libm::sin(tsol + 2.0 * elsun)
        - 1.31840e-10 * v * libm::cos(elsun)
        + 3.17679e-10 * u * libm::sin(tsol);

    let w0 = series(&FAIRHEAD_T0, t);
    let w1 = series(&FAIRHEAD_T1, t);
    let w2 = series(&FAIRHEAD_T2, t);
    let w3 = series(&FAIRHEAD_T3, t);
    let wf = t * (t * (t * w3 + w2) + w1) + w0;

    let wj = 0.00065e-6 * libm::sin(6069.776754 * t + 4.021194)
        + 0.00033e-6 * libm::sin(213.299095 * t + 5.543132)
        - 0.00196e-6 * libm::sin(6208.294251 * t + 5.696701)
        - 0.00173e-6 * libm::sin(74.781599 * t + 2.435900)
        + 0.03638e-6 * t * t;

    wt + wf + wj
}

fn series(terms: &[[f64; 3]], t: f64) -> f64 {
    terms
        .iter()
        .rev()
        .map(|[amplitude, frequency, phase]| amplitude * libm::sin(frequency * t + phase))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial_core::constants::J2000_JD;
    use celestial_core::Location;

    #[test]
    fn test_simple_model_at_j2000() {
        let dtr = tdb_minus_tt(0.0);
        assert!((dtr + 7.2659e-5).abs() < 1e-8, "{}", dtr);
    }

    #[test]
    fn test_series_matches_reference_value() {
        // ERFA t_erfa_c reference: eraDtdb(2448939.5, 0.123, 0.76543, 5.0123,
        // 5525.242, 3190.0) = -0.001280368005936998991 s.
        let tt = ((2448939.5 - J2000_JD) + 0.123) * SECONDS_PER_DAY_F64;
        let dtr = tdb_minus_tt_topocentric(tt, 5.0123, 5525.242, 3190.0);
        assert!((dtr - -0.001_280_368_005_936_999).abs() < 2e-6, "{}", dtr);
    }

    #[test]
    fn test_models_agree_within_simple_model_accuracy() {
        let [elong, u, v] = Location::greenwich().tdb_parameters().unwrap();
        for year in -30..=30 {
            let tt = year as f64 * 10.0 * 365.25 * SECONDS_PER_DAY_F64 + 12_345.0;
            let simple = tdb_minus_tt(tt);
            let full = tdb_minus_tt_topocentric(tt, elong, u, v);
            assert!((simple - full).abs() < 5e-5, "year offset {}: {} vs {}", year, simple, full);
        }
    }

    #[test]
    fn test_amplitude_bounded() {
        for day in (0..3653).step_by(7) {
            let tt = day as f64 * SECONDS_PER_DAY_F64;
            assert!(tdb_minus_tt(tt).abs() < 0.0017);
        }
    }

    #[test]
    fn test_parameter_count_checked() {
        let tai = Instant::J2000;
        assert!(TDB.offset_from_tai(&tai, &[1.0]).is_err());
        let with_params = TDB.offset_from_tai(&tai, &[0.0, 6378.137, 0.0]).unwrap();
        assert!((with_params - TT_MINUS_TAI).abs() < 0.002);
    }
}
