use thiserror::Error;

/// Errors raised while parsing element sets or propagating orbits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// TLE line does not match the fixed-column layout
    #[error("malformed TLE line {line}: {reason}")]
    MalformedRecord { line: u8, reason: String },
    /// Kepler's equation did not reach the requested tolerance
    #[error("kepler: no convergence in {iterations} iterations, M={mean_anomaly} e={eccentricity}")]
    NonConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
    },
    #[error("eccentricity {0} outside of bound orbit range [0, 1)")]
    InvalidEccentricity(f64),
    /// State vector energy is not negative
    #[error("state does not describe a bound orbit (specific energy {0} J/kg)")]
    UnboundOrbit(f64),
    #[error("invalid integration step: {0}")]
    InvalidStep(String),
    /// SGP4 refused the element set
    #[error("sgp4 initialization failed: {0}")]
    Sgp4Init(String),
    /// SGP4 returned a non-zero status for this instant
    #[error("sgp4 status at t{minutes:+} min: {reason}")]
    PropagatorStatus { minutes: f64, reason: String },
}
