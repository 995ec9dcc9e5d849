use simulator::units::{AU, EARTH_MASS, EARTH_RADIUS, GRAV_CONSTANT, J2000, SOLAR_MASS, SOLAR_RADIUS};
use simulator::{BodyInfo, OrbitalElements, Orbiter, SolarSystem, SolarSystemBuilder};

/// A one-sun, one-earth system on a circular 1 AU orbit
fn sun_and_earth() -> SolarSystem {
    let mut builder = SolarSystemBuilder::new(BodyInfo::new("Sun", 0xFFFF00, SOLAR_MASS, SOLAR_RADIUS));
    builder.add(Orbiter(
        BodyInfo::new("Earth", 0x53D0F1, EARTH_MASS, EARTH_RADIUS),
        OrbitalElements::default().with_semi_major_axis(AU),
    ));
    builder.construct(J2000).unwrap()
}

/// Something busier: a small red dwarf with a handful of tilted, eccentric planets.
fn crowded(start: f64) -> SolarSystem {
    let mut builder = SolarSystemBuilder::new(BodyInfo::new(
        "Dwarf",
        0xFF0000,
        0.09 * SOLAR_MASS,
        0.12 * SOLAR_RADIUS,
    ));
    let planets = [
        ("b", 1.37, 0.0115, 0.006, 0.1, 0.3, 0.0, 0.0),
        ("c", 1.31, 0.0158, 0.007, 0.2, 2.1, 0.4, 1.0),
        ("d", 0.39, 0.0223, 0.08, 0.5, 4.0, 1.2, 2.5),
        ("e", 0.69, 0.0293, 0.2, 0.05, 0.9, 2.0, 5.5),
    ];
    builder.add_bulk(planets.iter().map(|&(name, mass, sma, ecc, inc, arg, raan, ma)| {
        Orbiter(
            BodyInfo::new(name, 0x53D0F1, mass * EARTH_MASS, EARTH_RADIUS),
            OrbitalElements::default()
                .with_semi_major_axis(sma * AU)
                .with_eccentricity(ecc)
                .with_inclination(inc)
                .with_arg_of_periapsis(arg)
                .with_raan(raan)
                .with_mean_anomaly(ma)
                .with_epoch(J2000),
        )
    }));
    builder.construct(start).unwrap()
}

#[test]
fn builder_zeroes_barycenter_and_momentum() {
    for &start in &[J2000, J2000 + 3.7, J2000 - 1234.5] {
        let system = crowded(start);
        let bodies = system.bodies();

        let weighted_scale: f64 = bodies
            .iter()
            .map(|b| b.mass * b.state.pos.to_vector().length())
            .sum();
        let momentum_scale: f64 = bodies.iter().map(|b| b.momentum().length()).sum();

        let barycenter = system.barycenter().to_vector() * system.total_mass();
        assert!(barycenter.length() <= weighted_scale * 1e-12, "barycenter off by {:?}", barycenter);
        assert!(system.total_momentum().length() <= momentum_scale * 1e-12);
    }
}

#[test]
fn circular_orbit_closes_after_one_period() {
    let dt = 60.0;
    let mut system = sun_and_earth();
    let start = system.bodies()[1].state.pos;

    let gm = GRAV_CONSTANT * system.total_mass();
    let period = OrbitalElements::default()
        .with_semi_major_axis(AU)
        .period(gm)
        .unwrap();
    let whole_steps = (period / dt).floor();
    let elapsed = system.advance(whole_steps as usize, dt).unwrap()
        + system.advance(1, period - whole_steps * dt).unwrap();
    assert!((elapsed - period).abs() < 1e-6);

    let end = system.bodies()[1].state.pos;
    let miss = (end - start).length();
    assert!(miss < 1e-5 * AU, "missed the starting point by {} m", miss);
    // and it actually went somewhere in between
    assert_eq!(system.bodies()[1].trail.len(), simulator::TRAIL_SIZE);
}

#[test]
fn identical_runs_are_bit_for_bit_identical() {
    let mut first = crowded(J2000 + 10.0);
    let mut second = crowded(J2000 + 10.0);
    first.advance(2000, 30.0).unwrap();
    second.advance(2000, 30.0).unwrap();
    for (a, b) in first.bodies().iter().zip(second.bodies()) {
        assert_eq!(a.state, b.state);
        assert!(a.trail.iter().eq(b.trail.iter()));
    }
}

#[test]
fn energy_holds_steady_over_an_inner_orbit() {
    let mut system = crowded(J2000);
    let before = system.total_energy();
    // trappist b goes round in about a day and a half
    system.advance(2 * 24 * 60, 60.0).unwrap();
    let after = system.total_energy();
    assert!(((after - before) / before).abs() < 1e-3, "drifted from {} to {}", before, after);
}

#[test]
fn running_backwards_retraces_the_path() {
    let mut system = sun_and_earth();
    let start = system.bodies()[1].state.pos;
    system.advance(5000, 60.0).unwrap();
    system.advance(5000, -60.0).unwrap();
    let back = system.bodies()[1].state.pos;
    assert!((back - start).length() < 1e-6 * AU);
    assert_eq!(system.elapsed(), 0.0);
}

#[test]
fn max_extent_covers_the_outermost_planet() {
    let system = crowded(J2000);
    let furthest = system
        .bodies()
        .iter()
        .map(|b| b.state.pos.to_vector().length())
        .fold(0.0, f64::max);
    assert_eq!(system.max_extent(), 2.0 * furthest);
    assert!(system.max_extent() > 2.0 * 0.0293 * (1.0 - 0.2) * AU * 0.99);
}
