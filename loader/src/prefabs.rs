//! Prefabricated stars and planets.
//!
//! A system file can name one of these instead of spelling it out.
//! Planets carry their J2000 mean elements, so dropping them around a
//! different star gives you a very confused solar system. That's allowed.

use crate::deserialize::{PlanetConfig, StarConfig};
use std::collections::HashMap;

pub mod bodies {
    use super::*;
    use simulator::units::J2000;

    /// Shorthand for a planet in file units: earth masses/radii, AU and degrees.
    #[allow(clippy::too_many_arguments)]
    fn planet(
        name: &str,
        color: &str,
        mass: f64,
        radius: f64,
        sma: f64,
        ecc: f64,
        inc: f64,
        arg: f64,
        raan: f64,
        ma: f64,
    ) -> PlanetConfig {
        PlanetConfig {
            name: Some(name.to_string()),
            color: Some(color.to_string()),
            mass,
            radius,
            sma,
            ecc,
            inc,
            arg,
            raan,
            ma,
            epoch: J2000,
        }
    }

    // REAL BODIES

    /// Returns our Sun.
    pub fn sol() -> StarConfig {
        StarConfig {
            name: Some("Sol".to_string()),
            color: Some("YELLOW".to_string()),
            mass: 1.0,
            radius: 1.0,
        }
    }

    /// Returns Mercury.
    /// Apparently Mercury's orbit is going to be a little off. But I'm no Einstein.
    pub fn mercury() -> PlanetConfig {
        planet("Mercury", "KAKI", 0.0553, 0.383, 0.38709927, 0.20563593, 7.00497902, 29.12703035, 48.33076593, 174.79252722)
    }

    /// Returns Venus.
    pub fn venus() -> PlanetConfig {
        planet("Venus", "PASTEL_YELLOW", 0.815, 0.949, 0.72333566, 0.00677672, 3.39467605, 54.92262463, 76.67984255, 50.37663232)
    }

    /// Returns the Earth. Well, the Earth-Moon barycenter.
    pub fn earth() -> PlanetConfig {
        planet("Earth", "LIGHTBLUE", 1.0, 1.0, 1.00000261, 0.01671123, -0.00001531, 102.93768193, 0.0, 357.52688973)
    }

    /// Returns Mars
    pub fn mars() -> PlanetConfig {
        planet("Mars", "RED", 0.107, 0.532, 1.52371034, 0.09339410, 1.84969142, 286.49683150, 49.55953891, 19.39019754)
    }

    pub fn jupiter() -> PlanetConfig {
        planet("Jupiter", "PINK", 317.8, 11.21, 5.20288700, 0.04838624, 1.30439695, 274.25457074, 100.47390909, 19.66796068)
    }

    pub fn saturn() -> PlanetConfig {
        planet("Saturn", "PASTEL_YELLOW", 95.2, 9.45, 9.53667594, 0.05386179, 2.48599187, 338.93645383, 113.66242448, 317.35536592)
    }

    pub fn uranus() -> PlanetConfig {
        planet("Uranus", "TURQUOISE", 14.5, 4.01, 19.18916464, 0.04725744, 0.77263783, 96.93735127, 74.01692503, 142.28382821)
    }

    pub fn neptune() -> PlanetConfig {
        planet("Neptune", "PASTEL_BLUE", 17.1, 3.88, 30.06992276, 0.00859048, 1.77004347, 273.18053653, 131.78422574, 259.91520804)
    }
}

macro_rules! maker {
    (
        $kind:ty; $($name:ident),*
    ) => {
        {
            let mut h: HashMap<&'static str, fn() -> $kind> = HashMap::new();
            $( h.insert(stringify!($name), bodies::$name); )*
            h
        }
    };
}

lazy_static! {
    static ref STARS: HashMap<&'static str, fn() -> StarConfig> = maker![StarConfig; sol];
    static ref PLANETS: HashMap<&'static str, fn() -> PlanetConfig> = maker![
        PlanetConfig;
        mercury,
        venus,
        earth,
        mars,
        jupiter,
        saturn,
        uranus,
        neptune
    ];
}

/// Gets a premade star from its name, ignoring case
pub fn star(id: &str) -> Option<StarConfig> {
    STARS.get(id.to_lowercase().as_str()).map(|make| make())
}

/// Gets a premade planet from its name, ignoring case
pub fn planet(id: &str) -> Option<PlanetConfig> {
    PLANETS.get(id.to_lowercase().as_str()).map(|make| make())
}
