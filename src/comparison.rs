//! RK4 against SGP4 cross validation
use itertools::izip;
use log::{debug, info};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    cfg::{Config, GravityModel, SECONDS_PER_DAY},
    propagator::{propagate, Sgp4Propagator, Trajectory},
    state::StateVector,
    tle::Tle,
    Error,
};

/// Difference between both propagators at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Discrepancy {
    /// Elapsed time since the TLE epoch [s]
    pub t: f64,
    /// Position difference [m]
    pub position_m: f64,
    /// Velocity difference [m/s]
    pub velocity_m_s: f64,
}

/// Both trajectories propagated from the same TLE, and their discrepancies.
#[derive(Debug, Clone)]
pub struct CrossValidation {
    /// Two-body RK4 trajectory, initialized with the TLE elements
    pub trajectory: Trajectory,
    /// SGP4 states, converted to [m] and [m/s], at the same instants
    pub reference: Vec<StateVector>,
    pub discrepancies: Vec<Discrepancy>,
}

impl CrossValidation {
    /// Propagates `tle` with both models over `duration_s`, using `step_count` samples.
    /// Any SGP4 failure aborts the comparison.
    pub fn run(tle: &Tle, duration_s: f64, step_count: usize, cfg: &Config) -> Result<Self, Error> {
        let kepler = tle.elements(&cfg.gravity)?;
        let initial = kepler.to_cartesian(&cfg.kepler, &cfg.gravity)?;

        let step_size = duration_s / step_count as f64;
        let trajectory = propagate(initial, step_count, step_size, &cfg.gravity)?;

        let sgp4 = Sgp4Propagator::new(tle)?;
        let epoch = sgp4.epoch();
        let dates = (0..trajectory.len())
            .map(|k| epoch.add_days(trajectory.time_of(k) / SECONDS_PER_DAY))
            .collect::<Vec<_>>();

        let reference = sgp4
            .propagate_batch(&dates)
            .into_iter()
            .map(|result| result.map(StateVector::from))
            .collect::<Result<Vec<_>, _>>()?;

        let discrepancies = izip!(0.., trajectory.states(), &reference)
            .map(|(k, rk4, sgp4)| Discrepancy {
                t: trajectory.time_of(k),
                position_m: (rk4.position - sgp4.position).norm(),
                velocity_m_s: (rk4.velocity - sgp4.velocity).norm(),
            })
            .collect::<Vec<_>>();

        let cv = Self {
            trajectory,
            reference,
            discrepancies,
        };
        info!(
            "cross validation: {} samples, max {:.3}m rms {:.3}m final {:.3}m",
            cv.discrepancies.len(),
            cv.max_position_error(),
            cv.rms_position_error(),
            cv.final_position_error()
        );
        Ok(cv)
    }
    /// Largest position difference [m]
    pub fn max_position_error(&self) -> f64 {
        self.discrepancies
            .iter()
            .map(|d| d.position_m)
            .fold(0.0, f64::max)
    }
    /// Root mean square of the position differences [m]
    pub fn rms_position_error(&self) -> f64 {
        if self.discrepancies.is_empty() {
            return 0.0;
        }
        let sum = self
            .discrepancies
            .iter()
            .map(|d| d.position_m.powi(2))
            .sum::<f64>();
        (sum / self.discrepancies.len() as f64).sqrt()
    }
    /// Position difference at the last sample [m]
    pub fn final_position_error(&self) -> f64 {
        self.discrepancies.last().map(|d| d.position_m).unwrap_or(0.0)
    }
}

/// Position difference [m] between runs of `step_count` and `2 * step_count`
/// samples over `duration_s`, evaluated at the last common instant.
pub fn step_halving_error(
    initial: StateVector,
    step_count: usize,
    duration_s: f64,
    gravity: &GravityModel,
) -> Result<f64, Error> {
    let coarse = propagate(initial, step_count, duration_s / step_count as f64, gravity)?;
    let fine = propagate(
        initial,
        2 * step_count,
        duration_s / (2 * step_count) as f64,
        gravity,
    )?;

    let k = coarse.len() - 1;
    let (a, b) = match (coarse.get(k), fine.get(2 * k)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(Error::InvalidStep("empty trajectory".to_string())),
    };
    let err = (a.position - b.position).norm();
    debug!("step halving: h={}s -> {}m", coarse.step_size, err);
    Ok(err)
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    const AQUA_1: &str = "1 27424U 02022A   21033.23334491  .00000140  00000-0  10267-3 0  9998";
    const AQUA_2: &str = "2 27424  98.2046 128.9474 0002851  97.9550 262.1850 14.57113657462354";

    #[test]
    fn step_halving() {
        let gravity = GravityModel::EARTH;
        let initial = StateVector::new(
            Vector3::new(-5529203.0, -2217254.0, 3399353.0),
            Vector3::new(3049.295, 2478.617, 6576.514),
        );
        let e1 = step_halving_error(initial, 5_000, 46_800.0, &gravity).unwrap();
        let e2 = step_halving_error(initial, 10_000, 46_800.0, &gravity).unwrap();
        assert!((e1 - 0.12389564176050867).abs() < 1.0E-2, "e1={}", e1);
        assert!((e2 - 0.006442238251860153).abs() < 1.0E-3, "e2={}", e2);
        assert!((10.0..30.0).contains(&(e1 / e2)), "ratio {}", e1 / e2);
    }

    #[test]
    fn aqua_one_day() {
        let tle = Tle::new(AQUA_1, AQUA_2).unwrap();
        let cv = CrossValidation::run(&tle, 86_400.0, 2_000, &Config::default()).unwrap();

        assert_eq!(cv.trajectory.len(), 2_000);
        assert_eq!(cv.reference.len(), 2_000);
        assert_eq!(cv.discrepancies.len(), 2_000);

        let first = cv.discrepancies[0];
        assert_eq!(first.t, 0.0);
        assert!(first.position_m < 50.0E3, "initial discrepancy {}m", first.position_m);

        let last = cv.discrepancies.last().unwrap();
        assert!((last.t - 1999.0 * 43.2).abs() < 1.0E-6);

        let (max, rms, fin) = (
            cv.max_position_error(),
            cv.rms_position_error(),
            cv.final_position_error(),
        );
        assert!(max.is_finite() && rms.is_finite());
        assert!(rms <= max);
        assert!(fin <= max);
        assert!(first.position_m <= max);
        // without J2, the two body orbit slowly drifts away from SGP4
        assert!(fin > first.position_m);
    }

    #[test]
    fn empty_summary() {
        let cv = CrossValidation {
            trajectory: Trajectory {
                step_size: 1.0,
                states: Vec::new(),
            },
            reference: Vec::new(),
            discrepancies: Vec::new(),
        };
        assert_eq!(cv.max_position_error(), 0.0);
        assert_eq!(cv.rms_position_error(), 0.0);
        assert_eq!(cv.final_position_error(), 0.0);
    }
}
