//! SGP4 propagation of two-line element sets
use hifitime::Epoch;
use log::{debug, error, warn};
use nalgebra::Vector3;

use crate::{
    cfg::TwoDigitYear,
    epoch::JulianDate,
    state::StateVectorKm,
    tle::{checksum, Tle, LINE_LEN},
    Error,
};

/// Returns the first [LINE_LEN] columns of `line`, with a valid checksum digit.
fn with_checksum(line: &str) -> Option<String> {
    let digit = checksum(line)?;
    let body = line.get(..LINE_LEN - 1)?;
    Some(format!("{}{}", body, digit))
}

/// SGP4/SDP4 analytical propagator, initialized from a [Tle].
/// Positions are expressed in [km] and velocities in [km/s], in the TEME frame.
pub struct Sgp4Propagator {
    constants: sgp4::Constants,
    /// TLE epoch
    epoch: JulianDate,
}

impl std::fmt::Debug for Sgp4Propagator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Sgp4Propagator")
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Sgp4Propagator {
    /// Initializes the model from the TLE line pair.
    pub fn new(tle: &Tle) -> Result<Self, Error> {
        let (line1, line2) = match (with_checksum(tle.line1()), with_checksum(tle.line2())) {
            (Some(line1), Some(line2)) => (line1, line2),
            _ => return Err(Error::Sgp4Init("truncated TLE line".to_string())),
        };
        if line1 != tle.line1() || line2 != tle.line2() {
            warn!("sgp4: catalog {}: checksum digits rewritten", tle.catalog_number);
        }

        let elements =
            sgp4::Elements::from_tle(tle.name.clone(), line1.as_bytes(), line2.as_bytes())
                .map_err(|e| Error::Sgp4Init(e.to_string()))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| Error::Sgp4Init(e.to_string()))?;

        // SGP4 itself follows the NORAD year convention
        let epoch = tle.epoch_julian(TwoDigitYear::Norad)?;

        debug!("sgp4: catalog {} initialized, epoch jd {:?}", tle.catalog_number, epoch);
        Ok(Self { constants, epoch })
    }
    /// Epoch of the element set
    pub fn epoch(&self) -> JulianDate {
        self.epoch
    }
    /// State at `minutes` elapsed since the TLE epoch (may be negative)
    pub fn propagate_minutes(&self, minutes: f64) -> Result<StateVectorKm, Error> {
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| {
                error!("sgp4: t{:+} min: {:?}", minutes, e);
                Error::PropagatorStatus {
                    minutes,
                    reason: e.to_string(),
                }
            })?;
        Ok(StateVectorKm {
            position_km: Vector3::from(prediction.position),
            velocity_km_s: Vector3::from(prediction.velocity),
        })
    }
    /// State at given julian date
    pub fn propagate(&self, date: JulianDate) -> Result<StateVectorKm, Error> {
        self.propagate_minutes(date.minutes_since(&self.epoch))
    }
    /// State at given [Epoch]
    pub fn propagate_epoch(&self, epoch: Epoch) -> Result<StateVectorKm, Error> {
        self.propagate(JulianDate::from_epoch(epoch))
    }
    /// Propagates every date independently: one result per query,
    /// a failure does not interrupt the batch.
    pub fn propagate_batch(&self, dates: &[JulianDate]) -> Vec<Result<StateVectorKm, Error>> {
        dates.iter().map(|date| self.propagate(*date)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{cfg::GravityModel, kepler::KeplerSolver};
    use std::str::FromStr;

    const AQUA_1: &str = "1 27424U 02022A   21033.23334491  .00000140  00000-0  10267-3 0  9998";
    const AQUA_2: &str = "2 27424  98.2046 128.9474 0002851  97.9550 262.1850 14.57113657462354";

    fn aqua() -> Tle {
        Tle::new(AQUA_1, AQUA_2).unwrap()
    }

    #[test]
    fn checksum_repair() {
        let repaired = with_checksum(AQUA_1).unwrap();
        assert_eq!(repaired.len(), LINE_LEN);
        assert!(repaired.ends_with('7'));
        assert!(with_checksum("1 27424U").is_none());
    }

    #[test]
    fn epoch() {
        let sgp4 = Sgp4Propagator::new(&aqua()).unwrap();
        let epoch = sgp4.epoch();
        assert_eq!(epoch.day, 2459247.5);
        assert!((epoch.fraction - 0.23334491).abs() < 1.0E-9, "{:?}", epoch);
    }

    #[test]
    fn state_at_epoch() {
        let sgp4 = Sgp4Propagator::new(&aqua()).unwrap();
        let state = sgp4.propagate_minutes(0.0).unwrap();
        let r = state.position_km.norm();
        let v = state.velocity_km_s.norm();
        assert!((r - 7080.0).abs() < 30.0, "|r|={}km", r);
        assert!((v - 7.5).abs() < 0.1, "|v|={}km/s", v);

        // two-body conversion of the same element set lands nearby
        let gravity = GravityModel::EARTH;
        let kepler = aqua().elements(&gravity).unwrap();
        let cartesian = kepler
            .to_cartesian(&KeplerSolver::default(), &gravity)
            .unwrap()
            .to_kilometers();
        let err = (cartesian.position_km - state.position_km).norm();
        assert!(err < 50.0, "position error {}km", err);
    }

    #[test]
    fn date_queries() {
        let sgp4 = Sgp4Propagator::new(&aqua()).unwrap();
        let at_epoch = sgp4.propagate(sgp4.epoch()).unwrap();
        let at_zero = sgp4.propagate_minutes(0.0).unwrap();
        assert!((at_epoch.position_km - at_zero.position_km).norm() < 1.0E-6);

        let later = sgp4.epoch().add_days(1.0);
        let a = sgp4.propagate(later).unwrap();
        let b = sgp4.propagate_minutes(1440.0).unwrap();
        assert!((a.position_km - b.position_km).norm() < 1.0E-3);

        let epoch = Epoch::from_str("2021-02-03T05:36:01 UTC").unwrap();
        let c = sgp4.propagate_epoch(epoch).unwrap();
        // epoch above is truncated to the second
        assert!((c.position_km - b.position_km).norm() < 10.0);
    }

    #[test]
    fn batch() {
        let sgp4 = Sgp4Propagator::new(&aqua()).unwrap();
        let dates = JulianDate::series(sgp4.epoch(), 0.0001, 100);
        let batch = sgp4.propagate_batch(&dates);
        assert_eq!(batch.len(), 100);
        for (date, result) in dates.iter().zip(batch.iter()) {
            let single = sgp4.propagate(*date).unwrap();
            assert_eq!(result.as_ref().unwrap(), &single);
        }
    }

    /// Aqua orbit with an extreme B* drag term (0.5 per earth radius)
    fn high_drag() -> Tle {
        Tle::new(
            "1 27424U 02022A   21033.23334491  .00000140  00000-0  50000-0 0  9998",
            "2 27424  98.2046 128.9474 0002851  97.9550 262.1850 14.57113657462354",
        )
        .unwrap()
    }

    #[test]
    fn decayed_orbit() {
        let sgp4 = Sgp4Propagator::new(&high_drag()).unwrap();
        let epoch = sgp4.epoch();
        // drag drives the eccentricity linearly out of [0, 1)
        let dates = [epoch, epoch.add_days(1.0E8), epoch.add_days(0.01)];
        let results = sgp4.propagate_batch(&dates);
        assert_eq!(results.len(), 3);

        assert!(results[0].is_ok());
        match &results[1] {
            Err(Error::PropagatorStatus { minutes, .. }) => {
                assert!((minutes / 1.44E11 - 1.0).abs() < 1.0E-9, "t={}min", minutes)
            },
            other => panic!("expecting propagator status, got {:?}", other),
        }

        // the failure does not interrupt the batch
        let after = sgp4.propagate(dates[2]).unwrap();
        assert_eq!(results[2].as_ref().unwrap(), &after);
    }
}
