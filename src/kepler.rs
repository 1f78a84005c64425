use log::{debug, error};

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::Error;

/// Keplerian element set describing a bound orbit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, Deserialize))]
pub struct Keplerian {
    /// Semi major axis (m)
    pub a: f64,
    /// Eccentricity (n.a), 0 <= e < 1
    pub e: f64,
    /// Inclination (rad)
    pub i: f64,
    /// Right ascension of the ascending node (rad)
    pub raan: f64,
    /// Argument of perigee (rad)
    pub argp: f64,
    /// Mean anomaly (rad)
    pub m: f64,
}

/// Newton iteration on Kepler's equation E - e.sin(E) = M.
///
/// Angles are not wrapped: any finite mean anomaly is accepted and
/// the returned eccentric anomaly lives in the same revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeplerSolver {
    /// Residual below which we stop iterating (rad)
    pub tolerance: f64,
    /// Iteration cap, reaching it is a [Error::NonConvergence]
    pub max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: 1.0E-6,
            max_iterations: 100,
        }
    }
}

impl KeplerSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
    /// Returns eccentric anomaly (rad) for given mean anomaly (rad) and eccentricity.
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, Error> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(Error::InvalidEccentricity(eccentricity));
        }
        let mut e_k = mean_anomaly;
        for iteration in 0..=self.max_iterations {
            let delta = e_k - eccentricity * e_k.sin() - mean_anomaly;
            if delta.abs() < self.tolerance {
                debug!(
                    "kepler(M={}, e={}): E={} after {} iterations",
                    mean_anomaly, eccentricity, e_k, iteration
                );
                return Ok(e_k);
            }
            e_k -= delta / (1.0 - eccentricity * e_k.cos());
        }
        error!(
            "kepler(M={}, e={}): no convergence after {} iterations",
            mean_anomaly, eccentricity, self.max_iterations
        );
        Err(Error::NonConvergence {
            mean_anomaly,
            eccentricity,
            iterations: self.max_iterations,
        })
    }
}
