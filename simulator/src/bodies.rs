//! Handles bodies and such

use euclid::default::{Point3D, Vector3D};
use std::collections::{vec_deque, VecDeque};

/// A Kinemat holds all the kinematic information about something.
/// `acc` is whatever the integrator last computed; it's a cache, not a source of truth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Kinemat {
    pub pos: Point3D<f64>,
    pub vel: Vector3D<f64>,
    pub acc: Vector3D<f64>,
}

impl Kinemat {
    pub fn new(pos: Point3D<f64>, vel: Vector3D<f64>) -> Self {
        Self {
            pos,
            vel,
            acc: Vector3D::zero(),
        }
    }

    pub fn zero() -> Self {
        Self::new(Point3D::origin(), Vector3D::zero())
    }
}

/// The last few places a body has been, newest first.
/// Only the renderer cares about this.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Point3D<f64>>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a point to the front, dropping the oldest one if we're over capacity.
    pub fn record(&mut self, point: Point3D<f64>) {
        self.points.push_front(point);
        while self.points.len() > self.capacity {
            self.points.pop_back();
        }
    }

    /// Most recent first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Point3D<f64>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The representation of a body, like a star, planet, comet...
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    /// Color is stored as 0xRRGGBB. The simulator never looks at it.
    pub color: u32,
    pub state: Kinemat,
    /// kg
    pub mass: f64,
    /// m. Only used for drawing.
    pub radius: f64,
    pub trail: Trail,
}

impl Body {
    pub fn new(
        name: impl Into<String>,
        color: u32,
        mass: f64,
        radius: f64,
        state: Kinemat,
        trail_size: usize,
    ) -> Self {
        Body {
            name: name.into(),
            color,
            state,
            mass,
            radius,
            trail: Trail::new(trail_size),
        }
    }

    pub fn momentum(&self) -> Vector3D<f64> {
        self.state.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.state.vel.square_length()
    }
}
