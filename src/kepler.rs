//! # Kepler's equation
//!
//! Solvers for the eccentric anomaly `E` from the mean anomaly `M` and the eccentricity `e`:
//!
//! * elliptic orbits (`e < 1`): `M = E − e·sin E`,
//! * hyperbolic orbits (`e ≥ 1`): `M = e·sinh H − H`.
//!
//! ## Overview
//!
//! [`solve_eccentric_anomaly`] is the general solver used wherever full precision is
//! expected. It runs a Newton iteration safeguarded by a bisection bracket, stops once the
//! residual of Kepler's equation falls below [`KEPLER_TOLERANCE`] and gives up (with a
//! warning) after [`KEPLER_MAX_ITER`] steps.
//!
//! [`approximate_eccentric_anomaly`] is the cheap variant used by the planetary
//! element propagation: near-circular orbits only get the second-order series start value.
//!
//! [`true_and_eccentric_anomaly`] additionally returns the true anomaly and is used by the
//! solar longitude/distance series.

use std::f64::consts::PI;

use log::warn;

use crate::constants::{Radian, DPI, KEPLER_MAX_ITER, KEPLER_TOLERANCE};

/// Eccentricity under which [`approximate_eccentric_anomaly`] skips the iteration.
pub const NEAR_CIRCULAR_ECCENTRICITY: f64 = 0.05;

/// Principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Angle reduced to [-π, π).
pub fn signed_angle(a: f64) -> f64 {
    (a + PI).rem_euclid(DPI) - PI
}

/// If the iteration cap is reached the last iterate is returned and a warning is logged.
pub fn solve_eccentric_anomaly(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    if eccentricity >= 1.0 {
        return solve_hyperbolic_anomaly(mean_anomaly, eccentricity);
    }

    // Reduce to |M| in [0, π]; E is odd in M and shifts with it by whole revolutions.
    let reduced = signed_angle(mean_anomaly);
    let offset = mean_anomaly - reduced;
    let sign = if reduced < 0.0 { -1.0 } else { 1.0 };
    let m = reduced.abs();

    let (mut lo, mut hi) = (0.0, PI);
    let mut ea = series_start(m, eccentricity).clamp(lo, hi);

    for _ in 0..KEPLER_MAX_ITER {
        let residual = ea - eccentricity * ea.sin() - m;
        if residual.abs() < KEPLER_TOLERANCE {
            return offset + sign * ea;
        }

        if residual > 0.0 {
            hi = ea;
        } else {
            lo = ea;
        }

        let next = ea - residual / (1.0 - eccentricity * ea.cos());
        ea = if next > lo && next < hi {
            next
        } else {
            0.5 * (lo + hi)
        };
    }

    warn!(
        "Kepler solver hit {KEPLER_MAX_ITER} iterations (M = {mean_anomaly}, e = {eccentricity})"
    );
    offset + sign * ea
}

/// Newton iteration on `M = e·sinh H − H`.
fn solve_hyperbolic_anomaly(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    let mut h = (mean_anomaly / eccentricity).asinh();

    for _ in 0..KEPLER_MAX_ITER {
        let residual = eccentricity * h.sinh() - h - mean_anomaly;
        if residual.abs() < KEPLER_TOLERANCE {
            return h;
        }
        // e·cosh H − 1 ≥ 0 for e ≥ 1
        h -= residual / (eccentricity * h.cosh() - 1.0).max(f64::EPSILON);
    }

    warn!(
        "Hyperbolic Kepler solver hit {KEPLER_MAX_ITER} iterations (M = {mean_anomaly}, e = {eccentricity})"
    );
    h
}

/// Eccentric anomaly for the analytic element propagation.
///
/// Orbits with `e ≤ 0.05` use the series start value directly (error well under 1e-4 rad),
/// others go through [`solve_eccentric_anomaly`].
pub fn approximate_eccentric_anomaly(mean_anomaly: Radian, eccentricity: f64) -> Radian {
    if eccentricity <= NEAR_CIRCULAR_ECCENTRICITY {
        series_start(mean_anomaly, eccentricity)
    } else {
        solve_eccentric_anomaly(mean_anomaly, eccentricity)
    }
}

/// True anomaly and eccentric anomaly of a mean anomaly.
///
/// The mean anomaly is first reduced into [-π, π], so the eccentric anomaly is returned in
/// that interval as well.
///
/// Return
/// ------
/// * `(ν, E)`: true anomaly and eccentric (or hyperbolic) anomaly, in radians.
pub fn true_and_eccentric_anomaly(mean_anomaly: Radian, eccentricity: f64) -> (Radian, Radian) {
    let m = signed_angle(mean_anomaly);
    let ea = solve_eccentric_anomaly(m, eccentricity);

    let nu = if eccentricity < 1.0 {
        2.0 * (((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt() * (ea / 2.0).tan()).atan()
    } else {
        2.0 * (((eccentricity + 1.0) / (eccentricity - 1.0)).sqrt() * (ea / 2.0).tanh()).atan()
    };

    (nu, ea)
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn residual(m: f64, e: f64, ea: f64) -> f64 {
        ea - e * ea.sin() - m
    }

    #[test]
    fn test_principal_angle() {
        assert_abs_diff_eq!(principal_angle(-PI / 2.0), 1.5 * PI, epsilon = 1e-15);
        assert_abs_diff_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_angle(DPI + 0.2), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_angle(DPI - 0.2), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_angle(PI), -PI, epsilon = 1e-12);
    }

    #[test]
    fn test_convergence_grid() {
        for ie in 0..=99 {
            let e = ie as f64 / 100.0;
            for im in -36..=36 {
                let m = im as f64 * PI / 18.0;
                let ea = solve_eccentric_anomaly(m, e);
                assert!(
                    residual(m, e, ea).abs() < KEPLER_TOLERANCE,
                    "no convergence for M = {m}, e = {e}"
                );
                assert!((ea - m).abs() <= PI + 1e-12);
            }
        }
    }

    #[test]
    fn test_circular_orbit() {
        assert_abs_diff_eq!(solve_eccentric_anomaly(1.234, 0.0), 1.234, epsilon = 1e-12);
        assert_abs_diff_eq!(solve_eccentric_anomaly(0.0, 0.7), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(solve_eccentric_anomaly(PI, 0.7), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_odd_symmetry() {
        let e = 0.6;
        for m in [0.1, 0.8, 2.0, 3.0] {
            assert_abs_diff_eq!(
                solve_eccentric_anomaly(-m, e),
                -solve_eccentric_anomaly(m, e),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_hyperbolic() {
        for e in [1.0, 1.2, 2.5] {
            for m in [-5.0, -0.3, 0.0, 0.7, 10.0] {
                let h = solve_eccentric_anomaly(m, e);
                assert!((e * f64::sinh(h) - h - m).abs() < KEPLER_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_approximate_near_circular() {
        let e = 0.016709;
        for im in 0..36 {
            let m = im as f64 * PI / 18.0;
            let approx = approximate_eccentric_anomaly(m, e);
            let exact = solve_eccentric_anomaly(m, e);
            assert_abs_diff_eq!(approx, exact, epsilon = 1e-5);
        }

        let e = 0.2056;
        let ea = approximate_eccentric_anomaly(1.0, e);
        assert!(residual(1.0, e, ea).abs() < KEPLER_TOLERANCE);
    }

    #[test]
    fn test_true_anomaly() {
        let (nu, ea) = true_and_eccentric_anomaly(0.0, 0.3);
        assert_abs_diff_eq!(nu, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ea, 0.0, epsilon = 1e-12);

        let (nu, _) = true_and_eccentric_anomaly(PI, 0.3);
        assert_abs_diff_eq!(nu.abs(), PI, epsilon = 1e-9);

        // ν runs ahead of M near perihelion
        let (nu, ea) = true_and_eccentric_anomaly(0.5, 0.3);
        assert!(nu > ea && ea > 0.5);

        // wrapped input gives the reduced anomaly
        let (_, ea) = true_and_eccentric_anomaly(0.5 + 2.0 * DPI, 0.3);
        assert!(ea > 0.5 && ea < PI);
    }
}
