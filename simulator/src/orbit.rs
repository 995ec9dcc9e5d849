//! Osculating orbital elements, and turning them into state vectors.
//!
//! Angles are in radians here. Anything that reads degrees off a file
//! converts them before they get this far.

use crate::error::{SimError, SimResult};
use crate::units::{J2000, SECONDS_PER_DAY};

use euclid::default::{Point3D, Vector3D};
use std::fmt;
use tracing::trace;

/// How close successive anomaly estimates have to be before we call it solved.
pub const KEPLER_EPSILON: f64 = 1e-10;
/// Give up on Kepler's equation after this many rounds.
/// Fixed-point iteration contracts by roughly `e` per round, so e = 0.999 still
/// only needs a few tens of thousands.
pub const MAX_KEPLER_ITERATIONS: usize = 100_000;
/// Eccentricities this close to 1 are treated as parabolic and refused.
pub const PARABOLIC_TOLERANCE: f64 = 1e-12;

/// A two-body orbit, frozen at some epoch.
///
/// Build one with `Default` and the `with_*` methods; every unset field is zero
/// except the epoch, which is J2000.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    /// m. Negative for hyperbolic trajectories (positive is accepted too when e > 1).
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub arg_of_periapsis: f64,
    /// Right ascension of the ascending node
    pub raan: f64,
    /// Mean anomaly at `epoch`
    pub mean_anomaly: f64,
    /// Julian date
    pub epoch: f64,
}

impl Default for OrbitalElements {
    fn default() -> Self {
        OrbitalElements {
            semi_major_axis: 0.0,
            eccentricity: 0.0,
            inclination: 0.0,
            arg_of_periapsis: 0.0,
            raan: 0.0,
            mean_anomaly: 0.0,
            epoch: J2000,
        }
    }
}

impl OrbitalElements {
    pub fn with_semi_major_axis(self, semi_major_axis: f64) -> Self {
        Self {
            semi_major_axis,
            ..self
        }
    }

    pub fn with_eccentricity(self, eccentricity: f64) -> Self {
        Self {
            eccentricity,
            ..self
        }
    }

    pub fn with_inclination(self, inclination: f64) -> Self {
        Self {
            inclination,
            ..self
        }
    }

    pub fn with_arg_of_periapsis(self, arg_of_periapsis: f64) -> Self {
        Self {
            arg_of_periapsis,
            ..self
        }
    }

    pub fn with_raan(self, raan: f64) -> Self {
        Self { raan, ..self }
    }

    pub fn with_mean_anomaly(self, mean_anomaly: f64) -> Self {
        Self {
            mean_anomaly,
            ..self
        }
    }

    pub fn with_epoch(self, epoch: f64) -> Self {
        Self { epoch, ..self }
    }

    /// Open orbits: e > 1, or a non-positive semi-major axis.
    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity > 1.0 || self.semi_major_axis <= 0.0
    }

    /// Orbital period in seconds, or None if the orbit never comes back.
    pub fn period(&self, gm: f64) -> Option<f64> {
        if self.is_hyperbolic() {
            None
        } else {
            let a = self.semi_major_axis;
            Some(2.0 * std::f64::consts::PI * (a * a * a / gm).sqrt())
        }
    }

    /// Position and velocity at Julian date `t`, given `gm` = G * (mass pulling on this orbit).
    pub fn state_vectors(&self, gm: f64, t: f64) -> SimResult<(Point3D<f64>, Vector3D<f64>)> {
        self.validate(gm, t)?;
        let e = self.eccentricity;

        let (a, v) = if self.is_hyperbolic() {
            // Either sign works on input, but the geometry below wants a < 0.
            let a = -self.semi_major_axis.abs();
            let n = (gm / (-a * -a * -a)).sqrt();
            let m = self.mean_anomaly_at(n, t);
            let h_anom = solve_hyperbolic(m, e)?;
            let v = 2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (h_anom / 2.0).tanh()).atan();
            (a, v)
        } else {
            let a = self.semi_major_axis;
            let n = (gm / (a * a * a)).sqrt();
            let m = self.mean_anomaly_at(n, t);
            let e_anom = solve_elliptical(m, e)?;
            let v = 2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (e_anom / 2.0).tan()).atan();
            (a, v)
        };

        Ok(self.perifocal_to_inertial(gm, a, v))
    }

    /// Mean anomaly at `t`, given mean motion `n` in rad/s.
    fn mean_anomaly_at(&self, n: f64, t: f64) -> f64 {
        self.mean_anomaly + n * ((t - self.epoch) * SECONDS_PER_DAY)
    }

    /// Rotate the point at true anomaly `v` out of the orbital plane.
    fn perifocal_to_inertial(&self, gm: f64, a: f64, v: f64) -> (Point3D<f64>, Vector3D<f64>) {
        let e = self.eccentricity;
        let i = self.inclination;
        let raan = self.raan;
        let u = self.arg_of_periapsis + v;

        let p = a * (1.0 - e * e);
        let r = p / (1.0 + e * v.cos());
        let h = (gm * p).sqrt();

        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_i, cos_i) = i.sin_cos();

        let pos = Point3D::new(
            r * (cos_raan * cos_u - sin_raan * sin_u * cos_i),
            r * (sin_raan * cos_u + cos_raan * sin_u * cos_i),
            r * (sin_i * sin_u),
        );

        let radial = h * e * v.sin() / (r * p);
        let transverse = h / r;
        let vel = Vector3D::new(
            pos.x * radial - transverse * (cos_raan * sin_u + sin_raan * cos_u * cos_i),
            pos.y * radial - transverse * (sin_raan * sin_u - cos_raan * cos_u * cos_i),
            pos.z * radial + transverse * (cos_u * sin_i),
        );

        (pos, vel)
    }

    fn validate(&self, gm: f64, t: f64) -> SimResult<()> {
        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let all_finite = [
            a,
            e,
            self.inclination,
            self.arg_of_periapsis,
            self.raan,
            self.mean_anomaly,
            self.epoch,
            gm,
            t,
        ]
        .iter()
        .all(|x| x.is_finite());

        if !all_finite {
            return Err(SimError::InvalidElements(format!(
                "non-finite input in {} (GM = {}, t = {})",
                self, gm, t
            )));
        }
        if gm <= 0.0 {
            return Err(SimError::InvalidElements(format!(
                "gravitational parameter must be positive, got {}",
                gm
            )));
        }
        if e < 0.0 {
            return Err(SimError::InvalidElements(format!(
                "negative eccentricity {}",
                e
            )));
        }
        if (e - 1.0).abs() < PARABOLIC_TOLERANCE {
            return Err(SimError::Parabolic { eccentricity: e });
        }
        if a == 0.0 {
            return Err(SimError::InvalidElements(
                "semi-major axis of zero".to_string(),
            ));
        }
        if a < 0.0 && e < 1.0 {
            return Err(SimError::InvalidElements(format!(
                "negative semi-major axis {} on a closed orbit (e = {})",
                a, e
            )));
        }
        Ok(())
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ORB(SmA:{},Ecc:{},Inc:{},RAN:{},Arg:{},MAn:{})",
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_of_periapsis,
            self.mean_anomaly
        )
    }
}

/// Eccentric anomaly for `E = M + e sin E`, by fixed-point iteration.
pub fn solve_elliptical(m: f64, e: f64) -> SimResult<f64> {
    solve_elliptical_within(m, e, MAX_KEPLER_ITERATIONS)
}

fn solve_elliptical_within(m: f64, e: f64, max_iterations: usize) -> SimResult<f64> {
    let mut ea = m + e * m.sin();
    for iteration in 0..max_iterations {
        let next = m + e * ea.sin();
        if !next.is_finite() {
            return Err(SimError::NonConvergent {
                anomaly: m,
                iterations: iteration + 1,
            });
        }
        let delta = (ea - next).abs();
        ea = next;
        if delta < KEPLER_EPSILON {
            trace!(iteration, "elliptical anomaly converged");
            return Ok(ea);
        }
    }
    Err(SimError::NonConvergent {
        anomaly: m,
        iterations: max_iterations,
    })
}

/// Hyperbolic anomaly for `M = e sinh H - H`, by Newton's method.
pub fn solve_hyperbolic(m: f64, e: f64) -> SimResult<f64> {
    solve_hyperbolic_within(m, e, MAX_KEPLER_ITERATIONS)
}

fn solve_hyperbolic_within(m: f64, e: f64, max_iterations: usize) -> SimResult<f64> {
    // sinh(M) overflows once |M| passes ~710; asinh(M / e) stays near the root.
    let mut ha = (m / e).asinh();
    for iteration in 0..max_iterations {
        let next = ha + (m - e * ha.sinh() + ha) / (e * ha.cosh() - 1.0);
        if !next.is_finite() {
            return Err(SimError::NonConvergent {
                anomaly: m,
                iterations: iteration + 1,
            });
        }
        let delta = (ha - next).abs();
        ha = next;
        if delta < KEPLER_EPSILON {
            trace!(iteration, "hyperbolic anomaly converged");
            return Ok(ha);
        }
    }
    Err(SimError::NonConvergent {
        anomaly: m,
        iterations: max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AU, GRAV_CONSTANT, SOLAR_MASS};
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use std::f64::consts::PI;

    const GM_SUN: f64 = GRAV_CONSTANT * SOLAR_MASS;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn defaults_are_zero_at_j2000() {
        let orbit = OrbitalElements::default();
        assert_eq!(orbit.semi_major_axis, 0.0);
        assert_eq!(orbit.mean_anomaly, 0.0);
        assert_eq!(orbit.epoch, J2000);
    }

    #[test]
    fn with_methods_leave_the_base_untouched() {
        let base = OrbitalElements::default().with_semi_major_axis(AU);
        let tilted = base.with_inclination(0.5);
        assert_eq!(base.inclination, 0.0);
        assert_eq!(tilted.inclination, 0.5);
        assert_eq!(tilted.semi_major_axis, AU);
    }

    #[test]
    fn at_epoch_with_zero_anomaly_sits_at_periapsis() {
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(AU)
            .with_eccentricity(0.3)
            .with_arg_of_periapsis(0.7)
            .with_raan(1.1);
        let (pos, vel) = orbit.state_vectors(GM_SUN, orbit.epoch).unwrap();

        let r = pos.to_vector().length();
        assert!(close(r, AU * 0.7, 1e-12), "r = {}", r);
        // Planar orbit: periapsis points along raan + arg
        let angle = pos.y.atan2(pos.x);
        assert!(close(angle, 1.8, 1e-9), "angle = {}", angle);
        assert!(pos.z.abs() < 1e-3);
        // At periapsis velocity is perpendicular to the radius
        assert!(pos.to_vector().dot(vel).abs() / (r * vel.length()) < 1e-12);
    }

    #[test]
    fn at_epoch_with_half_turn_anomaly_sits_at_apoapsis() {
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(AU)
            .with_eccentricity(0.3)
            .with_arg_of_periapsis(0.7)
            .with_raan(1.1)
            .with_mean_anomaly(PI);
        let (pos, vel) = orbit.state_vectors(GM_SUN, orbit.epoch).unwrap();

        let r = pos.to_vector().length();
        assert!(close(r, AU * 1.3, 1e-12), "r = {}", r);
        // Opposite periapsis: along raan + arg + pi
        let (sin, cos) = (1.8 + PI).sin_cos();
        assert!((pos.x / r - cos).abs() < 1e-9 && (pos.y / r - sin).abs() < 1e-9);
        assert!(pos.z.abs() < 1e-3);
        assert!(pos.to_vector().dot(vel).abs() / (r * vel.length()) < 1e-12);
    }

    #[test]
    fn speed_matches_vis_viva() {
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(2.0 * AU)
            .with_eccentricity(0.45)
            .with_inclination(0.3)
            .with_mean_anomaly(2.0);
        let (pos, vel) = orbit.state_vectors(GM_SUN, J2000 + 17.0).unwrap();
        let r = pos.to_vector().length();
        let expected = GM_SUN * (2.0 / r - 1.0 / (2.0 * AU));
        assert!(close(vel.square_length(), expected, 1e-9));
    }

    #[test]
    fn elliptical_radius_stays_between_apsides() {
        let mut rng = SmallRng::seed_from_u64(0x0b17);
        for _ in 0..500 {
            let a = rng.gen_range(0.05, 40.0) * AU;
            let e = rng.gen_range(0.0, 0.95);
            let orbit = OrbitalElements::default()
                .with_semi_major_axis(a)
                .with_eccentricity(e)
                .with_inclination(rng.gen_range(0.0, PI))
                .with_arg_of_periapsis(rng.gen_range(0.0, 2.0 * PI))
                .with_raan(rng.gen_range(0.0, 2.0 * PI))
                .with_mean_anomaly(rng.gen_range(0.0, 2.0 * PI));
            let t = J2000 + rng.gen_range(-5000.0, 5000.0);
            let (pos, _) = orbit.state_vectors(GM_SUN, t).unwrap();
            let r = pos.to_vector().length();
            let slack = a * 1e-9;
            assert!(r >= a * (1.0 - e) - slack && r <= a * (1.0 + e) + slack,
                "r = {} outside [{}, {}] for {}", r, a * (1.0 - e), a * (1.0 + e), orbit);
        }
    }

    #[test]
    fn circular_orbit_advances_by_mean_motion() {
        let orbit = OrbitalElements::default().with_semi_major_axis(AU);
        let period = orbit.period(GM_SUN).unwrap();
        let quarter = orbit.epoch + period / 4.0 / SECONDS_PER_DAY;
        let (pos, _) = orbit.state_vectors(GM_SUN, quarter).unwrap();
        assert!(pos.x.abs() < AU * 1e-9);
        assert!(close(pos.y, AU, 1e-9));
    }

    #[test]
    fn elliptical_solution_satisfies_keplers_equation() {
        for &e in &[0.0, 0.1, 0.5, 0.9, 0.99] {
            for &m in &[0.0, 0.5, 3.0, 6.0] {
                let ea = solve_elliptical(m, e).unwrap();
                assert!((ea - e * ea.sin() - m).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn hyperbolic_solution_satisfies_keplers_equation() {
        for &e in &[1.1, 2.0, 5.0] {
            for &m in &[-3.0, 0.0, 0.5, 4.0] {
                let ha = solve_hyperbolic(m, e).unwrap();
                assert!((e * ha.sinh() - ha - m).abs() < 1e-7, "e = {}, m = {}", e, m);
            }
        }
    }

    #[test]
    fn hyperbolic_solution_survives_huge_mean_anomaly() {
        for &(m, e) in &[(800.0, 1.5), (-800.0, 1.5), (5000.0, 1.01), (1e6, 3.0)] {
            let ha = solve_hyperbolic(m, e).unwrap();
            let residual = e * ha.sinh() - ha - m;
            assert!(residual.abs() <= 1e-9 * m.abs(), "e = {}, m = {}, off by {}", e, m, residual);
        }
    }

    #[test]
    fn hyperbolic_state_decades_from_epoch() {
        let a = -0.1 * AU;
        let e = 1.5;
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(a)
            .with_eccentricity(e);
        let (pos, vel) = orbit.state_vectors(GM_SUN, J2000 + 9000.0).unwrap();

        let n = (GM_SUN / (-a * -a * -a)).sqrt();
        let ha = solve_hyperbolic(n * 9000.0 * SECONDS_PER_DAY, e).unwrap();
        let r = pos.to_vector().length();
        assert!(close(r, a.abs() * (e * ha.cosh() - 1.0), 1e-6), "r = {}", r);
        let expected = GM_SUN * (2.0 / r - 1.0 / a);
        assert!(close(vel.square_length(), expected, 1e-6));
    }

    #[test]
    fn solvers_give_up_at_the_iteration_cap() {
        assert_eq!(
            solve_elliptical_within(3.0, 0.99, 3),
            Err(SimError::NonConvergent { anomaly: 3.0, iterations: 3 })
        );
        assert_eq!(
            solve_hyperbolic_within(800.0, 1.5, 1),
            Err(SimError::NonConvergent { anomaly: 800.0, iterations: 1 })
        );
    }

    #[test]
    fn solvers_stop_early_on_non_finite_anomalies() {
        for result in vec![
            solve_elliptical(std::f64::NAN, 0.5),
            solve_hyperbolic(std::f64::NAN, 2.0),
            solve_hyperbolic(std::f64::INFINITY, 2.0),
        ] {
            match result {
                Err(SimError::NonConvergent { iterations, .. }) => assert_eq!(iterations, 1),
                other => panic!("expected NonConvergent, got {:?}", other),
            }
        }
    }

    #[test]
    fn hyperbolic_periapsis_and_speed() {
        let a = -AU;
        let e = 1.5;
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(a)
            .with_eccentricity(e);
        assert!(orbit.is_hyperbolic());
        assert_eq!(orbit.period(GM_SUN), None);

        let (pos, vel) = orbit.state_vectors(GM_SUN, orbit.epoch).unwrap();
        let r = pos.to_vector().length();
        assert!(close(r, a.abs() * (e - 1.0), 1e-12));
        let expected = GM_SUN * (2.0 / r - 1.0 / a);
        assert!(close(vel.square_length(), expected, 1e-9));

        // Positive semi-major axis means the same thing once e > 1
        let flipped = orbit.with_semi_major_axis(AU);
        let (pos2, _) = flipped.state_vectors(GM_SUN, orbit.epoch).unwrap();
        assert_eq!(pos, pos2);
    }

    #[test]
    fn parabolic_is_refused() {
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(AU)
            .with_eccentricity(1.0);
        assert_eq!(
            orbit.state_vectors(GM_SUN, J2000),
            Err(SimError::Parabolic { eccentricity: 1.0 })
        );
    }

    #[test]
    fn bad_elements_are_refused() {
        let zero = OrbitalElements::default();
        assert!(matches!(
            zero.state_vectors(GM_SUN, J2000),
            Err(SimError::InvalidElements(_))
        ));
        let negative_closed = OrbitalElements::default()
            .with_semi_major_axis(-AU)
            .with_eccentricity(0.2);
        assert!(matches!(
            negative_closed.state_vectors(GM_SUN, J2000),
            Err(SimError::InvalidElements(_))
        ));
        let nan = OrbitalElements::default()
            .with_semi_major_axis(AU)
            .with_raan(std::f64::NAN);
        assert!(matches!(
            nan.state_vectors(GM_SUN, J2000),
            Err(SimError::InvalidElements(_))
        ));
    }

    #[test]
    fn display_lists_every_element() {
        let orbit = OrbitalElements::default()
            .with_semi_major_axis(2.0)
            .with_eccentricity(0.5);
        assert_eq!(
            orbit.to_string(),
            "ORB(SmA:2,Ecc:0.5,Inc:0,RAN:0,Arg:0,MAn:0)"
        );
    }
}
