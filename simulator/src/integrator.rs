//! Fixed-step integrator for a single body.
//!
//! The integrator knows nothing about the rest of the system: whoever calls it
//! passes a closure that works out the acceleration for a candidate state.

use crate::bodies::Kinemat;
use crate::error::SimResult;

use euclid::default::Vector3D;

/// Advance `state` by `dt` seconds.
///
/// Position gets a full step using the cached acceleration, velocity gets a half kick
/// on either side of a fresh acceleration evaluation at the new position.
/// The returned state carries the fresh acceleration for the next call.
pub fn advance<F>(state: &Kinemat, mass: f64, accelerate: F, dt: f64) -> SimResult<Kinemat>
where
    F: FnOnce(&Kinemat, f64) -> SimResult<Vector3D<f64>>,
{
    let half_dt = 0.5 * dt;

    let mut next = *state;
    next.pos += state.vel * dt + state.acc * (half_dt * dt);
    next.vel += state.acc * half_dt;
    next.acc = accelerate(&next, mass)?;
    next.vel += next.acc * half_dt;
    Ok(next)
}
