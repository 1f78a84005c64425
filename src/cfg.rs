//! Shared constants and runtime configuration
#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{kepler::KeplerSolver, link::LinkBudget, maneuver::Thruster};

/// Newtonian gravitational constant [m^3.kg^-1.s^-2]
pub const G: f64 = 6.67430E-11;
/// Earth mass [kg]
pub const EARTH_MASS_KG: f64 = 5.97219E24;
/// Seconds per (solar) day
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Minutes per (solar) day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Point mass gravity model, shared by every component that needs μ.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GravityModel {
    /// Gravitational constant [m^3.kg^-1.s^-2]
    pub g: f64,
    /// Central body mass [kg]
    pub mass_kg: f64,
}

impl Default for GravityModel {
    fn default() -> Self {
        Self::EARTH
    }
}

impl GravityModel {
    pub const EARTH: Self = Self {
        g: G,
        mass_kg: EARTH_MASS_KG,
    };
    /// Standard gravitational parameter μ = G.M [m^3/s^2]
    pub fn mu(&self) -> f64 {
        self.g * self.mass_kg
    }
}

/// Interpretation of the two-digit TLE epoch year.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum TwoDigitYear {
    /// YY is always 20YY. Epochs from 1957-1999 are misread.
    #[default]
    Offset2000,
    /// NORAD convention: 57-99 map to 19YY, 00-56 to 20YY.
    Norad,
}

impl TwoDigitYear {
    pub fn full_year(&self, yy: u8) -> i32 {
        match self {
            Self::Offset2000 => 2000 + yy as i32,
            Self::Norad => {
                if yy < 57 {
                    2000 + yy as i32
                } else {
                    1900 + yy as i32
                }
            },
        }
    }
}

/// Propagation settings
#[derive(Default, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Central body
    pub gravity: GravityModel,
    /// Kepler's equation solver settings
    pub kepler: KeplerSolver,
    /// Integrator settings
    pub integrator: IntegratorConfig,
    /// TLE epoch year policy
    pub year: TwoDigitYear,
    /// Spacecraft propulsion, for maneuver planning
    pub thruster: Thruster,
    /// Downlink parameters
    pub link: LinkBudget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntegratorConfig {
    /// Number of states per trajectory (initial state included)
    pub step_count: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self { step_count: 10_000 }
    }
}

impl IntegratorConfig {
    /// Step size [s] that spreads `step_count` samples over `duration_s`
    pub fn step_size(&self, duration_s: f64) -> f64 {
        duration_s / self.step_count as f64
    }
}
