//! Everything that can go wrong while placing or stepping bodies.

use thiserror::Error;

/// Result type for the simulator
pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Kepler's equation didn't settle within the iteration cap.
    #[error("Kepler's equation did not converge for mean anomaly {anomaly} after {iterations} iterations")]
    NonConvergent { anomaly: f64, iterations: usize },

    /// Exactly parabolic orbits have no semi-major axis to speak of.
    #[error("Parabolic orbits (e = {eccentricity}) are not supported")]
    Parabolic { eccentricity: f64 },

    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("Body {name} has a non-positive mass ({mass} kg)")]
    InvalidMass { name: String, mass: f64 },

    /// Two bodies sit on top of each other, so there's no direction to pull in.
    #[error("Bodies #{first} and #{second} share a position")]
    DegenerateGeometry { first: usize, second: usize },
}
