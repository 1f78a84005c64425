#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod comparison;
mod epoch;
mod error;
mod kepler;
mod link;
mod maneuver;
mod orbit;
mod propagator;
mod state;
mod tle;

#[cfg(feature = "celestrak")]
#[cfg_attr(docrs, doc(cfg(feature = "celestrak")))]
pub mod celestrak;

// pub export
pub use error::Error;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{
        Config, GravityModel, IntegratorConfig, TwoDigitYear, EARTH_MASS_KG, G, MINUTES_PER_DAY,
        SECONDS_PER_DAY,
    };
    pub use crate::comparison::{step_halving_error, CrossValidation, Discrepancy};
    pub use crate::epoch::{CivilEpoch, JulianDate};
    pub use crate::kepler::{KeplerSolver, Keplerian};
    pub use crate::link::{LinkBudget, BOLTZMANN, SPEED_OF_LIGHT};
    pub use crate::maneuver::{
        hohmann, hohmann_from_speed, HohmannTransfer, Thruster, TARGET_RADIUS_M,
    };
    pub use crate::propagator::{propagate, Rk4Propagator, Sgp4Propagator, Trajectory};
    pub use crate::state::{StateVector, StateVectorKm};
    pub use crate::tle::{checksum, parse_elements, parse_epoch, Tle, LINE_LEN};
    pub use crate::Error;
    // re-export
    pub use hifitime::{Duration, Epoch, Unit};
    pub use nalgebra::Vector3;
}
