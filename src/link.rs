//! Downlink budget for a QPSK X-band link
use log::debug;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Speed of light [m/s]
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Boltzmann's constant [J/K]
pub const BOLTZMANN: f64 = 1.380649E-23;

fn to_db(x: f64) -> f64 {
    10.0 * x.log10()
}

fn from_db(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Link parameters. Defaults describe an X-band downlink
/// received by a northern latitude ground station.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkBudget {
    /// Distance between both antennas [m]
    pub slant_range_m: f64,
    /// Carrier frequency [Hz]
    pub frequency_hz: f64,
    /// Equivalent isotropic radiated power [dBW]
    pub eirp_dbw: f64,
    /// Ground station figure of merit [dB/K]
    pub g_over_t_dbk: f64,
    /// Atmospheric attenuation [dB]
    pub atmospheric_loss_db: f64,
    /// Noise bandwidth [Hz]
    pub bandwidth_hz: f64,
}

impl Default for LinkBudget {
    fn default() -> Self {
        Self {
            // semi major axis + earth radius: worst case
            slant_range_m: 7_028.0E3 + 6_371.0E3,
            frequency_hz: 8.4E9,
            eirp_dbw: 3.0,
            g_over_t_dbk: 27.0,
            atmospheric_loss_db: 3.0,
            bandwidth_hz: 30.0E6,
        }
    }
}

impl LinkBudget {
    /// Free space loss [dB]
    pub fn free_space_loss_db(&self) -> f64 {
        20.0 * self.slant_range_m.log10()
            + 20.0 * self.frequency_hz.log10()
            + 20.0 * (4.0 * PI / SPEED_OF_LIGHT).log10()
    }
    /// Carrier to noise ratio [dB]
    pub fn carrier_to_noise_db(&self) -> f64 {
        self.eirp_dbw + self.g_over_t_dbk
            - self.free_space_loss_db()
            - self.atmospheric_loss_db
            - to_db(BOLTZMANN)
            - to_db(self.bandwidth_hz)
    }
    /// Energy per bit to noise density ratio (linear), QPSK carries 2 bits/s/Hz
    pub fn eb_n0(&self) -> f64 {
        from_db(self.carrier_to_noise_db()) / 2.0
    }
    /// QPSK bit error rate: erfc(√(Eb/N0)) / 2
    pub fn bit_error_rate(&self) -> f64 {
        let eb_n0 = self.eb_n0();
        let ber = 0.5 * libm::erfc(eb_n0.sqrt());
        debug!(
            "link: fsl={:.2}dB c/n={:.2}dB eb/n0={:.4} ber={:.3e}",
            self.free_space_loss_db(),
            self.carrier_to_noise_db(),
            eb_n0,
            ber
        );
        ber
    }
}
