//! Turns a star and a list of orbits into a self-consistent SolarSystem.
//!
//! Every orbit's state vector depends on the total mass of the system, which isn't
//! known until everything has been placed, so placement happens twice:
//! once against the star alone, once against the whole system.
//! Afterwards the barycenter is moved to the origin and net momentum is removed.

use crate::bodies::{Body, Kinemat};
use crate::error::{SimError, SimResult};
use crate::orbit::OrbitalElements;
use crate::units::GRAV_CONSTANT;
use crate::{SolarSystem, TRAIL_SIZE, TRAIL_TICK};

use euclid::default::Vector3D;
use tracing::{debug, warn};

/// Everything about a body that isn't where it is.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    /// 0xRRGGBB
    pub color: u32,
    /// kg
    pub mass: f64,
    /// m
    pub radius: f64,
}

impl BodyInfo {
    pub fn new(name: impl Into<String>, color: u32, mass: f64, radius: f64) -> Self {
        BodyInfo {
            name: name.into(),
            color,
            mass,
            radius,
        }
    }

    fn check_mass(&self) -> SimResult<()> {
        if self.mass > 0.0 && self.mass.is_finite() {
            Ok(())
        } else {
            Err(SimError::InvalidMass {
                name: self.name.clone(),
                mass: self.mass,
            })
        }
    }
}

/// A body and the orbit it's on around the star.
#[derive(Clone, Debug, PartialEq)]
pub struct Orbiter(pub BodyInfo, pub OrbitalElements);

/// Use this struct to construct a solar system easily
pub struct SolarSystemBuilder {
    /// Always ends up at index 0
    star: BodyInfo,
    /// The stuff orbiting the star
    entries: Vec<Orbiter>,
    trail_size: usize,
    trail_tick: usize,
}

impl SolarSystemBuilder {
    /// Make a new Builder with nothing orbiting the star yet.
    pub fn new(star: BodyInfo) -> Self {
        SolarSystemBuilder {
            star,
            entries: Vec::new(),
            trail_size: TRAIL_SIZE,
            trail_tick: TRAIL_TICK,
        }
    }

    /// Add an entry to the Builder.
    pub fn add(&mut self, orbiter: Orbiter) -> &mut Self {
        self.entries.push(orbiter);
        self
    }

    /// Add a whole bunch of entries at once.
    pub fn add_bulk<T: IntoIterator<Item = Orbiter>>(&mut self, orbiters: T) -> &mut Self {
        self.entries.extend(orbiters);
        self
    }

    /// Keep `size` trail points per body, sampled every `tick` steps.
    pub fn trail(&mut self, size: usize, tick: usize) -> &mut Self {
        self.trail_size = size;
        self.trail_tick = tick.max(1);
        self
    }

    /// Place everything at Julian date `epoch` and hand back the finished system.
    pub fn construct(self, epoch: f64) -> SimResult<SolarSystem> {
        let SolarSystemBuilder {
            star,
            entries,
            trail_size,
            trail_tick,
        } = self;

        star.check_mass()?;
        for Orbiter(info, _) in entries.iter() {
            info.check_mass()?;
        }

        let mut bodies = Vec::with_capacity(entries.len() + 1);
        bodies.push(Body::new(
            star.name.clone(),
            star.color,
            star.mass,
            star.radius,
            Kinemat::zero(),
            trail_size,
        ));

        // First pass: two-body orbits around the star alone.
        // Good enough to tell us the layout, not good enough to simulate.
        for Orbiter(info, orbit) in entries.iter() {
            if orbit.eccentricity > 0.97 && orbit.eccentricity < 1.0 {
                warn!(body = %info.name, ecc = orbit.eccentricity, "very eccentric orbit, expect a slow solve");
            }
            let gm = GRAV_CONSTANT * (star.mass + info.mass);
            let (pos, vel) = orbit.state_vectors(gm, epoch)?;
            bodies.push(Body::new(
                info.name.clone(),
                info.color,
                info.mass,
                info.radius,
                Kinemat::new(pos, vel),
                trail_size,
            ));
        }

        let total_mass: f64 = bodies.iter().map(|body| body.mass).sum();

        // Second pass: the same orbits, now around the whole system's mass.
        let gm = GRAV_CONSTANT * total_mass;
        for (body, Orbiter(_, orbit)) in bodies.iter_mut().skip(1).zip(entries.iter()) {
            let (pos, vel) = orbit.state_vectors(gm, epoch)?;
            debug!(
                body = %body.name,
                shift = (pos - body.state.pos).length(),
                "placed {}",
                orbit
            );
            body.state = Kinemat::new(pos, vel);
        }

        // Park the barycenter at the origin and stop the whole thing drifting.
        let barycenter = bodies
            .iter()
            .fold(Vector3D::zero(), |acc, body| {
                acc + body.state.pos.to_vector() * body.mass
            })
            / total_mass;
        let momentum = bodies
            .iter()
            .fold(Vector3D::zero(), |acc, body| acc + body.momentum())
            / total_mass;
        for body in bodies.iter_mut() {
            body.state.pos = body.state.pos - barycenter;
            body.state.vel = body.state.vel - momentum;
        }
        debug!(
            total_mass,
            barycenter = barycenter.length(),
            drift = momentum.length(),
            "corrected {} bodies",
            bodies.len()
        );

        let mut system = SolarSystem::with_trail_tick(bodies, trail_tick);
        system.refresh_accelerations()?;
        Ok(system)
    }
}
