use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use log::info;

use satprop::prelude::*;

/// Archived Aqua element set
const AQUA_1: &str = "1 27424U 02022A   21033.23334491  .00000140  00000-0  10267-3 0  9998";
const AQUA_2: &str = "2 27424  98.2046 128.9474 0002851  97.9550 262.1850 14.57113657462354";

/// Reference spacecraft state [m], [m/s]
const R0: [f64; 3] = [-5529203.0, -2217254.0, 3399353.0];
const V0: [f64; 3] = [3049.295, 2478.617, 6576.514];

/// Reference propagation span [s]
const SPAN: f64 = 13.0 * 3600.0;
/// Cross validation span [s]
const ONE_DAY: f64 = 86_400.0;
/// High thrust engine [N]
const HIGH_THRUST_N: f64 = 500.0;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Satellite orbit propagation: RK4 two-body integrator against SGP4"
)]
struct Cli {
    /// JSON configuration file, missing fields take default values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Two or three line element set file, replacing the archived Aqua record
    #[arg(long)]
    tle: Option<PathBuf>,

    /// Download the current element set of this object from CelesTrak
    #[arg(long, conflicts_with = "tle")]
    fetch: Option<String>,

    /// Instant at which both element sets are evaluated with SGP4
    #[arg(long, default_value = "2023-02-01T16:23:05 UTC")]
    at: String,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let cfg = serde_json::from_str(&content)
                .with_context(|| format!("invalid configuration {}", path.display()))?;
            info!("configuration loaded from {}", path.display());
            Ok(cfg)
        },
        None => Ok(Config::default()),
    }
}

#[cfg(feature = "celestrak")]
fn fetch(name: &str) -> anyhow::Result<Tle> {
    Ok(satprop::celestrak::fetch(name)?)
}

#[cfg(not(feature = "celestrak"))]
fn fetch(_: &str) -> anyhow::Result<Tle> {
    bail!("--fetch requires the \"celestrak\" feature")
}

fn load_tle(cli: &Cli) -> anyhow::Result<Option<Tle>> {
    if let Some(path) = &cli.tle {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let tle = Tle::from_str(&content)
            .with_context(|| format!("invalid TLE {}", path.display()))?;
        return Ok(Some(tle));
    }
    match &cli.fetch {
        Some(name) => Ok(Some(fetch(name)?)),
        None => Ok(None),
    }
}

fn print_km(label: &str, state: &StateVectorKm) {
    let (r, v) = (state.position_km, state.velocity_km_s);
    println!("{} position: [{:.6}, {:.6}, {:.6}] km", label, r[0], r[1], r[2]);
    println!("{} velocity: [{:.9}, {:.9}, {:.9}] km/s", label, v[0], v[1], v[2]);
}

fn print_burn(thruster: &Thruster, dv: f64) {
    let (_, days, hours, minutes, seconds, ms, _, _) = thruster.burn_duration(dv).decompose();
    println!(
        "Burn duration (m={} kg, F={} N): {}d {}h {}m {}.{:03}s",
        thruster.mass_kg, thruster.force_n, days, hours, minutes, seconds, ms
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;

    let at = Epoch::from_str(&cli.at).map_err(|e| anyhow!("invalid --at \"{}\": {}", cli.at, e))?;

    let step_count = cfg.integrator.step_count;
    if step_count < 2 {
        bail!("integrator step count should be at least 2");
    }

    // reference spacecraft
    let initial = StateVector::new(Vector3::from(R0), Vector3::from(V0));
    let step_size = cfg.integrator.step_size(SPAN);
    let trajectory = propagate(initial, step_count, step_size, &cfg.gravity)?;
    let last = trajectory
        .last()
        .ok_or_else(|| anyhow!("empty trajectory"))?;

    println!("RK4: {} steps of {:.3} s over {} s", step_count, step_size, SPAN);
    print_km("RK4 final", &last.to_kilometers());
    println!("Final |r| = {:.6} m, |v| = {:.9} m/s", last.radius(), last.speed());

    let halving = step_halving_error(initial, step_count / 2, SPAN, &cfg.gravity)?;
    println!(
        "Step halving error (h={:.3} s vs h={:.3} s): {:.4} m",
        cfg.integrator.step_size(SPAN) * 2.0,
        step_size,
        halving
    );

    // maneuver plan
    let mu = cfg.gravity.mu();
    let transfer = hohmann_from_speed(last.radius(), last.speed(), TARGET_RADIUS_M, mu);
    let circular = hohmann(initial.radius(), TARGET_RADIUS_M, mu);
    println!(
        "Hohmann to {} m: dv1 = {:.6} m/s, dv2 = {:.6} m/s, total = {:.6} m/s, transfer {:.3} s",
        TARGET_RADIUS_M, transfer.dv1, transfer.dv2, transfer.dv_total, transfer.time_of_flight
    );
    println!(
        "Hohmann (circular, r1 = {:.3} m): total = {:.6} m/s",
        initial.radius(),
        circular.dv_total
    );
    print_burn(&cfg.thruster, transfer.dv_total);
    print_burn(&cfg.thruster.with_force(HIGH_THRUST_N), transfer.dv_total);

    // element sets
    let archived = Tle::new(AQUA_1, AQUA_2)?.with_name("AQUA");
    let current = load_tle(&cli)?;
    let tle = current.as_ref().unwrap_or(&archived);

    println!("SGP4 at {}", at);
    print_km("Archived TLE", &Sgp4Propagator::new(&archived)?.propagate_epoch(at)?);
    if let Some(current) = &current {
        print_km("Current TLE", &Sgp4Propagator::new(current)?.propagate_epoch(at)?);
    }

    let kepler = tle.elements(&cfg.gravity)?;
    println!(
        "Keplerian elements of {} (epoch {}):",
        tle.name.as_deref().unwrap_or("catalog object"),
        tle.epoch(cfg.year)?
    );
    println!("  a    = {:.6} m", kepler.a);
    println!("  e    = {:.7}", kepler.e);
    println!("  i    = {:.9} rad", kepler.i);
    println!("  raan = {:.9} rad", kepler.raan);
    println!("  argp = {:.9} rad", kepler.argp);
    println!("  M    = {:.9} rad", kepler.m);

    let state = kepler.to_cartesian(&cfg.kepler, &cfg.gravity)?;
    let (r, v) = (state.position, state.velocity);
    println!("Position: [{:.6}, {:.6}, {:.6}] m", r[0], r[1], r[2]);
    println!("Velocity: [{:.6}, {:.6}, {:.6}] m/s", v[0], v[1], v[2]);

    // one day cross validation
    let cv = CrossValidation::run(tle, ONE_DAY, step_count, &cfg)?;
    if let (Some(rk4), Some(sgp4)) = (cv.trajectory.last(), cv.reference.last()) {
        print_km("RK4 +1d", &rk4.to_kilometers());
        print_km("SGP4 +1d", &sgp4.to_kilometers());
    }
    println!(
        "RK4 vs SGP4 over one day: max {:.3} km, rms {:.3} km, final {:.3} km",
        cv.max_position_error() / 1.0E3,
        cv.rms_position_error() / 1.0E3,
        cv.final_position_error() / 1.0E3
    );

    // downlink
    let link = &cfg.link;
    println!("Free space loss: {:.2} dB", link.free_space_loss_db());
    println!("Atmospheric loss: {:.2} dB", link.atmospheric_loss_db);
    println!("C/N: {:.2} dB", link.carrier_to_noise_db());
    println!("BER (QPSK): {:.2e}", link.bit_error_rate());

    Ok(())
}
