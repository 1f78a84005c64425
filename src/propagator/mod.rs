//! Numerical (two-body RK4) and analytical (SGP4) orbit propagators
mod analytical;
mod numerical;

pub use analytical::Sgp4Propagator;
pub use numerical::{propagate, Rk4Propagator, Trajectory};
