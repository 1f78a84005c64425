//! Impulsive coplanar orbit transfers and burn durations
use hifitime::Duration;
use log::debug;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default target orbit radius [m]
pub const TARGET_RADIUS_M: f64 = 6_950.0E3;

/// Two burn transfer between coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HohmannTransfer {
    /// First burn at r1 [m/s], negative when lowering the orbit
    pub dv1: f64,
    /// Circularization burn at r2 [m/s], negative when lowering the orbit
    pub dv2: f64,
    /// |dv1| + |dv2| [m/s]
    pub dv_total: f64,
    /// Half period of the transfer ellipse [s]
    pub time_of_flight: f64,
}

/// Hohmann transfer between circular orbits (radii in [m], μ in [m^3/s^2]).
/// Radii and μ must be positive.
pub fn hohmann(r1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    hohmann_from_speed(r1, (mu / r1).sqrt(), r2, mu)
}

/// Hohmann transfer where the first burn scales the measured speed `v1` [m/s] at r1,
/// instead of the circular speed. Matches [hohmann] when `v1` is the circular speed.
pub fn hohmann_from_speed(r1: f64, v1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    let v2 = (mu / r2).sqrt();
    let a_t = 0.5 * (r1 + r2);

    let dv1 = v1 * ((2.0 * r2 / (r1 + r2)).sqrt() - 1.0);
    let dv2 = v2 * (1.0 - (2.0 * r1 / (r1 + r2)).sqrt());
    let time_of_flight = PI * (a_t.powi(3) / mu).sqrt();

    debug!(
        "hohmann: r1={}m v1={}m/s -> r2={}m: dv1={} dv2={}",
        r1, v1, r2, dv1, dv2
    );

    HohmannTransfer {
        dv1,
        dv2,
        dv_total: dv1.abs() + dv2.abs(),
        time_of_flight,
    }
}

/// Constant thrust engine attached to a spacecraft of given mass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Thruster {
    /// Spacecraft mass [kg], propellant consumption is neglected
    pub mass_kg: f64,
    /// Thrust [N]
    pub force_n: f64,
}

impl Default for Thruster {
    /// 10 kg spacecraft, 10 mN electric thruster
    fn default() -> Self {
        Self {
            mass_kg: 10.0,
            force_n: 0.01,
        }
    }
}

impl Thruster {
    pub fn new(mass_kg: f64, force_n: f64) -> Self {
        Self { mass_kg, force_n }
    }
    /// Returns a copy of Self with given thrust [N]
    pub fn with_force(&self, force_n: f64) -> Self {
        Self {
            mass_kg: self.mass_kg,
            force_n,
        }
    }
    /// Time needed to deliver `dv` [m/s]: Δv.m/F
    pub fn burn_duration(&self, dv: f64) -> Duration {
        Duration::from_seconds(dv.abs() * self.mass_kg / self.force_n)
    }
}
