//! Handles the simulation of the solar system
//!
//! Bodies get placed once by a [`SolarSystemBuilder`], then [`SolarSystem::advance`]
//! pushes every one of them forward under everyone else's gravity.

pub mod bodies;
pub mod builder;
pub mod error;
pub mod integrator;
pub mod orbit;
pub mod units;

pub use builder::{BodyInfo, Orbiter, SolarSystemBuilder};
pub use error::{SimError, SimResult};
pub use orbit::OrbitalElements;
pub use units::GRAV_CONSTANT;

use crate::bodies::{Body, Kinemat};
use euclid::default::{Point3D, Vector3D};
use tracing::trace;

/// How many trail points each body keeps
pub const TRAIL_SIZE: usize = 80;
/// A trail point gets recorded once every this many steps
pub const TRAIL_TICK: usize = 100;

pub struct SolarSystem {
    /// The star is always at index 0.
    bodies: Vec<Body>,
    /// Record trails once every `trail_tick` steps.
    trail_tick: usize,
    /// Counts down to the next trail sample.
    ticks_to_trail: usize,
    /// Steps taken so far
    ticks: u64,
    /// Seconds simulated so far. Negative if time has been run backwards.
    elapsed: f64,
}

/// Where everything was, and how heavy it is, at the start of a step.
/// Nothing in here changes until the step is over.
type Snapshot = Vec<(Point3D<f64>, f64)>;

impl SolarSystem {
    /// Make a system out of bodies that are already where they should be.
    /// Nothing gets re-centered; see [`SolarSystemBuilder`] for that.
    pub fn new(bodies: Vec<Body>) -> Self {
        Self::with_trail_tick(bodies, TRAIL_TICK)
    }

    pub fn with_trail_tick(bodies: Vec<Body>, trail_tick: usize) -> Self {
        SolarSystem {
            bodies,
            trail_tick: trail_tick.max(1),
            ticks_to_trail: 0,
            ticks: 0,
            elapsed: 0.0,
        }
    }

    /// Step the whole system `iterations` times by `dt` seconds each.
    /// Returns how many seconds that was.
    pub fn advance(&mut self, iterations: usize, dt: f64) -> SimResult<f64> {
        let count = self.bodies.len();
        for _ in 0..iterations {
            self.step(dt, 0..count)?;
        }
        Ok(iterations as f64 * dt)
    }

    /// One step, visiting bodies in `order`.
    /// Every acceleration comes out of the snapshot, so the order makes no difference.
    fn step<I: IntoIterator<Item = usize>>(&mut self, dt: f64, order: I) -> SimResult<()> {
        let snapshot = self.snapshot();
        let mut next: Vec<Kinemat> = self.bodies.iter().map(|body| body.state).collect();

        for idx in order {
            let body = &self.bodies[idx];
            next[idx] = integrator::advance(
                &body.state,
                body.mass,
                |candidate, mass| gravity(&snapshot, idx, candidate, mass),
                dt,
            )?;
        }

        for (body, state) in self.bodies.iter_mut().zip(next) {
            body.state = state;
        }

        if self.ticks_to_trail == 0 {
            self.ticks_to_trail = self.trail_tick;
            for body in self.bodies.iter_mut() {
                body.trail.record(body.state.pos);
            }
            trace!(tick = self.ticks, "recorded trails");
        }
        self.ticks_to_trail -= 1;
        self.ticks += 1;
        self.elapsed += dt;
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        self.bodies
            .iter()
            .map(|body| (body.state.pos, body.mass))
            .collect()
    }

    /// Recompute every cached acceleration from where things are right now.
    /// Handy after moving bodies around by hand, so the first step isn't missing its kick.
    pub fn refresh_accelerations(&mut self) -> SimResult<()> {
        let snapshot = self.snapshot();
        for (idx, body) in self.bodies.iter_mut().enumerate() {
            body.state.acc = gravity(&snapshot, idx, &body.state, body.mass)?;
        }
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, idx: usize) -> Option<&Body> {
        self.bodies.get(idx)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Seconds simulated since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Steps taken since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn trail_tick(&self) -> usize {
        self.trail_tick
    }

    /// Twice the distance of the furthest body from the origin; good for picking a zoom level.
    /// Zero if nothing has left the origin.
    pub fn max_extent(&self) -> f64 {
        let furthest = self
            .bodies
            .iter()
            .map(|body| body.state.pos.to_vector().length())
            .filter(|&distance| distance > 0.0)
            .fold(0.0, f64::max);
        furthest * 2.0
    }

    /// Index `offset` places away from `current`, wrapping around both ends.
    /// None if there's nothing to point at.
    pub fn next_body_index(&self, current: usize, offset: isize) -> Option<usize> {
        if self.bodies.is_empty() {
            return None;
        }
        let len = self.bodies.len() as isize;
        Some((current as isize + offset).rem_euclid(len) as usize)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|body| body.mass).sum()
    }

    pub fn total_momentum(&self) -> Vector3D<f64> {
        self.bodies
            .iter()
            .fold(Vector3D::zero(), |acc, body| acc + body.momentum())
    }

    /// Mass-weighted centroid
    pub fn barycenter(&self) -> Point3D<f64> {
        let total_mass = self.total_mass();
        if total_mass <= 0.0 {
            return Point3D::origin();
        }
        let weighted = self.bodies.iter().fold(Vector3D::zero(), |acc, body| {
            acc + body.state.pos.to_vector() * body.mass
        });
        (weighted / total_mass).to_point()
    }

    /// Kinetic plus gravitational potential energy, in joules.
    /// Shouldn't wander much if `dt` is sensible.
    pub fn total_energy(&self) -> f64 {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();
        let mut potential = 0.0;
        for (idx, body) in self.bodies.iter().enumerate() {
            for other in self.bodies.iter().skip(idx + 1) {
                let distance = (other.state.pos - body.state.pos).length();
                potential -= GRAV_CONSTANT * body.mass * other.mass / distance;
            }
        }
        kinetic + potential
    }
}

/// Acceleration on a body of `mass` at `state`, pulled on by everything in the
/// snapshot except entry `exclude` (which is the body itself).
pub fn gravity(
    snapshot: &[(Point3D<f64>, f64)],
    exclude: usize,
    state: &Kinemat,
    mass: f64,
) -> SimResult<Vector3D<f64>> {
    let mut force = Vector3D::zero();
    for (other_idx, &(other_pos, other_mass)) in snapshot.iter().enumerate() {
        if other_idx == exclude {
            continue;
        }
        let ray = other_pos - state.pos;
        let dist_squared = ray.square_length();
        if !(dist_squared > 0.0) {
            return Err(SimError::DegenerateGeometry {
                first: exclude,
                second: other_idx,
            });
        }
        let magnitude = GRAV_CONSTANT * ((mass * other_mass) / dist_squared);
        force += ray / dist_squared.sqrt() * magnitude;
    }
    Ok(force / mass)
}
