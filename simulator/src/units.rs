//! Physical constants.
//!
//! Internally everything is SI: meters, kilograms, seconds.
//! Epochs are Julian dates (days), so anything that mixes an epoch with a
//! time step has to go through `SECONDS_PER_DAY`.

pub const GRAV_CONSTANT: f64 = 6.674e-11;

/// kg
pub const SOLAR_MASS: f64 = 1.98855e30;
/// kg
pub const EARTH_MASS: f64 = 5.9722e24;
/// m
pub const AU: f64 = 149_597_870_700.0;
/// m
pub const SOLAR_RADIUS: f64 = 695_700_000.0;
/// m
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Julian date of the J2000 reference epoch
pub const J2000: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
