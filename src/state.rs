use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Cartesian state in an Earth centered inertial frame,
/// expressed in [m] and [m/s].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StateVector {
    /// Position [m]
    pub position: Vector3<f64>,
    /// Velocity [m/s]
    pub velocity: Vector3<f64>,
}

/// Cartesian state expressed in [km] and [km/s], which is what SGP4 speaks.
/// Convert with [StateVectorKm::to_meters] before comparing against [StateVector]s.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StateVectorKm {
    /// Position [km]
    pub position_km: Vector3<f64>,
    /// Velocity [km/s]
    pub velocity_km_s: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }
    /// Distance to the central body [m]
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }
    /// Speed [m/s]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
    /// Specific orbital energy v²/2 - μ/r [J/kg]
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.norm_squared() - mu / self.radius()
    }
    /// Specific angular momentum r x v [m^2/s]
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }
    pub fn to_kilometers(&self) -> StateVectorKm {
        StateVectorKm {
            position_km: self.position / 1000.0,
            velocity_km_s: self.velocity / 1000.0,
        }
    }
}

impl StateVectorKm {
    pub fn new(position_km: Vector3<f64>, velocity_km_s: Vector3<f64>) -> Self {
        Self {
            position_km,
            velocity_km_s,
        }
    }
    pub fn to_meters(&self) -> StateVector {
        StateVector {
            position: self.position_km * 1000.0,
            velocity: self.velocity_km_s * 1000.0,
        }
    }
}

impl From<StateVectorKm> for StateVector {
    fn from(state: StateVectorKm) -> Self {
        state.to_meters()
    }
}

impl From<StateVector> for StateVectorKm {
    fn from(state: StateVector) -> Self {
        state.to_kilometers()
    }
}
