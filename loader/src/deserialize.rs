//! Lets you load a SolarSystem from a file.
//!
//! Files use friendly units: solar masses and radii for the star, earth masses
//! and radii for everything else, AU for distances, degrees for angles and
//! Julian dates for epochs. Everything gets converted to SI on the way out.

use crate::colors;
use crate::error::LoadError;
use crate::prefabs;

use serde::Deserialize;
use simulator::units::{AU, EARTH_MASS, EARTH_RADIUS, J2000, SOLAR_MASS, SOLAR_RADIUS};
use simulator::{BodyInfo, OrbitalElements, Orbiter, SolarSystem, SolarSystemBuilder};
use tracing::info;

/// Returns `1f64` because Serde needs a function
fn get_one_for_serde() -> f64 {
    1f64
}

/// Returns J2000 because Serde needs a function
fn get_j2000_for_serde() -> f64 {
    J2000
}

/// The star everything orbits around.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StarConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Solar masses
    #[serde(default = "get_one_for_serde")]
    pub mass: f64,
    /// Solar radii
    #[serde(default = "get_one_for_serde")]
    pub radius: f64,
}

/// Something orbiting the star.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlanetConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Earth masses
    #[serde(default = "get_one_for_serde")]
    pub mass: f64,
    /// Earth radii
    #[serde(default = "get_one_for_serde")]
    pub radius: f64,
    /// AU
    #[serde(default = "get_one_for_serde")]
    pub sma: f64,
    #[serde(default)]
    pub ecc: f64,
    /// Degrees
    #[serde(default)]
    pub inc: f64,
    /// Degrees
    #[serde(default)]
    pub arg: f64,
    /// Degrees
    #[serde(default)]
    pub raan: f64,
    /// Degrees
    #[serde(default)]
    pub ma: f64,
    /// Julian date
    #[serde(default = "get_j2000_for_serde")]
    pub epoch: f64,
}

impl StarConfig {
    pub fn info(&self) -> BodyInfo {
        BodyInfo::new(
            self.name.clone().unwrap_or_else(|| "Star".to_string()),
            colors::resolve(self.color.as_deref(), colors::YELLOW),
            self.mass * SOLAR_MASS,
            self.radius * SOLAR_RADIUS,
        )
    }
}

impl PlanetConfig {
    /// `default_name` only gets used if the file didn't name it.
    pub fn info(&self, default_name: String) -> BodyInfo {
        BodyInfo::new(
            self.name.clone().unwrap_or(default_name),
            colors::resolve(self.color.as_deref(), colors::LIGHTBLUE),
            self.mass * EARTH_MASS,
            self.radius * EARTH_RADIUS,
        )
    }

    pub fn orbit(&self) -> OrbitalElements {
        OrbitalElements::default()
            .with_semi_major_axis(self.sma * AU)
            .with_eccentricity(self.ecc)
            .with_inclination(self.inc.to_radians())
            .with_arg_of_periapsis(self.arg.to_radians())
            .with_raan(self.raan.to_radians())
            .with_mean_anomaly(self.ma.to_radians())
            .with_epoch(self.epoch)
    }
}

/// A star or planet can be written out in full, or just named after a prefab.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Prefab(String),
    Custom(T),
}

/// Serde needs you to define the thing to use it on...
/// Both halves are optional here so we can complain about them properly.
#[derive(Deserialize)]
struct RawSolarSystem {
    #[serde(default)]
    star: Option<Entry<StarConfig>>,
    #[serde(default)]
    bodies: Option<Vec<Entry<PlanetConfig>>>,
}

/// A system file, decoded and with every prefab filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub star: StarConfig,
    pub bodies: Vec<PlanetConfig>,
}

impl SystemConfig {
    /// Convert into SI units and queue everything up on a builder.
    pub fn into_builder(self) -> SolarSystemBuilder {
        let star = self.star.info();
        let prefix = star.name.clone();
        let mut builder = SolarSystemBuilder::new(star);
        builder.add_bulk(self.bodies.iter().enumerate().map(|(idx, planet)| {
            Orbiter(planet.info(default_planet_name(&prefix, idx)), planet.orbit())
        }));
        builder
    }
}

/// Planets get lettered after their star, starting at b.
fn default_planet_name(star: &str, idx: usize) -> String {
    const LETTERS: &[u8] = b"bcdefghijklmnopqrstuvwxyz";
    match LETTERS.get(idx) {
        Some(&letter) => format!("{} {}", star, letter as char),
        None => format!("{} #{}", star, idx + 1),
    }
}

/// Decode a system file without building anything yet.
pub fn parse(contents: &str) -> Result<SystemConfig, LoadError> {
    let raw: RawSolarSystem = json5::from_str(contents)?;

    let star = match raw.star.ok_or(LoadError::MissingStar)? {
        Entry::Prefab(id) => prefabs::star(&id).ok_or(LoadError::UnknownPrefab(id))?,
        Entry::Custom(star) => star,
    };
    let bodies = raw
        .bodies
        .ok_or(LoadError::MissingBodies)?
        .into_iter()
        .map(|entry| match entry {
            Entry::Prefab(id) => prefabs::planet(&id).ok_or(LoadError::UnknownPrefab(id)),
            Entry::Custom(planet) => Ok(planet),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SystemConfig { star, bodies })
}

/// Loads a file and builds the system it describes, as of Julian date `start_epoch`.
pub fn load(contents: &str, start_epoch: f64) -> Result<SolarSystem, LoadError> {
    let config = parse(contents)?;
    let count = config.bodies.len();
    let system = config.into_builder().construct(start_epoch)?;
    info!(
        star = %system.bodies()[0].name,
        bodies = count,
        epoch = start_epoch,
        "loaded solar system"
    );
    Ok(system)
}
