use std::str::FromStr;

use crate::prelude::*;

const AQUA: &str = "AQUA
1 27424U 02022A   21033.23334491  .00000140  00000-0  10267-3 0  9998
2 27424  98.2046 128.9474 0002851  97.9550 262.1850 14.57113657462354
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn tle_to_cartesian() {
    init_logger();
    let cfg = Config::default();
    let tle = Tle::from_str(AQUA).unwrap();
    assert_eq!(tle.name.as_deref(), Some("AQUA"));

    let kepler = tle.elements(&cfg.gravity).unwrap();
    assert!((kepler.i - 98.2046_f64.to_radians()).abs() < 1.0E-12);
    assert_eq!(kepler.e, 0.0002851);

    let period = kepler.period(&cfg.gravity);
    assert!((period - 86_400.0 / 14.57113657).abs() < 1.0E-6, "period {}", period);

    let state = kepler.to_cartesian(&cfg.kepler, &cfg.gravity).unwrap();
    for (computed, expected) in [
        (state.position[0], -4449635.409291527),
        (state.position[1], 5508188.113912416),
        (state.position[2], 13165.964682607213),
    ] {
        let err = (computed - expected).abs();
        assert!(err < 1.0E-3, "position error too large {}", err);
    }

    let epoch = tle.epoch(cfg.year).unwrap();
    assert_eq!(epoch.to_string(), "2021-02-02T05:36:01 UTC");
}

#[test]
fn rk4_against_sgp4() {
    init_logger();
    let cfg = Config::default();
    let tle = Tle::from_str(AQUA).unwrap();

    let sgp4 = Sgp4Propagator::new(&tle).unwrap();
    let state = tle
        .elements(&cfg.gravity)
        .unwrap()
        .to_cartesian(&cfg.kepler, &cfg.gravity)
        .unwrap();

    // one orbit later, J2 has not yet pulled the models far apart
    let period = tle.elements(&cfg.gravity).unwrap().period(&cfg.gravity);
    let trajectory = propagate(state, 1_001, period / 1_000.0, &cfg.gravity).unwrap();
    let rk4 = trajectory.last().unwrap();

    let after = sgp4
        .propagate_minutes(trajectory.span() / 60.0)
        .unwrap()
        .to_meters();
    let err = (rk4.position - after.position).norm();
    assert!(err < 200.0E3, "rk4/sgp4 discrepancy {}m after one orbit", err);

    // two body motion closes the orbit
    let closure = (rk4.position - state.position).norm();
    assert!(closure < 1.0, "orbit closure {}m", closure);
}

#[test]
fn reference_scenario() {
    init_logger();
    let cfg = Config::default();
    let initial = StateVector::new(
        Vector3::new(-5529203.0, -2217254.0, 3399353.0),
        Vector3::new(3049.295, 2478.617, 6576.514),
    );
    let step_size = cfg.integrator.step_size(13.0 * 3600.0);
    assert_eq!(step_size, 4.68);

    let trajectory =
        propagate(initial, cfg.integrator.step_count, step_size, &cfg.gravity).unwrap();
    let last = trajectory.last().unwrap();

    let transfer =
        hohmann_from_speed(last.radius(), last.speed(), TARGET_RADIUS_M, cfg.gravity.mu());
    assert!((transfer.dv_total - 33.293897410915555).abs() < 1.0E-3, "{:?}", transfer);

    let burn = cfg.thruster.burn_duration(transfer.dv_total);
    assert!((burn.to_seconds() - 33_293.897).abs() < 1.0, "burn {}", burn);
}

#[test]
fn two_digit_year_policies() {
    let tle = Tle::from_str(AQUA).unwrap();
    // both policies agree on recent epochs
    assert_eq!(
        tle.epoch(TwoDigitYear::Offset2000).unwrap(),
        tle.epoch(TwoDigitYear::Norad).unwrap()
    );

    let vanguard = Tle::new(
        "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
    )
    .unwrap();
    assert_eq!(vanguard.epoch(TwoDigitYear::Norad).unwrap().year, 2000);

    let sputnik_era = Tle::new(
        "1 00005U 58002B   98179.78495062  .00000023  00000-0  28098-4 0  4753",
        "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
    )
    .unwrap();
    assert_eq!(sputnik_era.epoch(TwoDigitYear::Norad).unwrap().year, 1998);
    assert_eq!(sputnik_era.epoch(TwoDigitYear::Offset2000).unwrap().year, 2098);
}
