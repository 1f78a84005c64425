//! Fixed step RK4 integration of the two-body problem
use hifitime::{Epoch, Unit};
use log::{debug, info};
use nalgebra::Vector3;

use crate::{cfg::GravityModel, state::StateVector, Error};

/// Sequence of [StateVector]s evenly spaced in time,
/// index 0 being the initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Integration step [s]
    pub step_size: f64,
    pub(crate) states: Vec<StateVector>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
    pub fn states(&self) -> &[StateVector] {
        &self.states
    }
    pub fn get(&self, index: usize) -> Option<&StateVector> {
        self.states.get(index)
    }
    pub fn first(&self) -> Option<&StateVector> {
        self.states.first()
    }
    pub fn last(&self) -> Option<&StateVector> {
        self.states.last()
    }
    /// Elapsed time [s] at given index
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 * self.step_size
    }
    /// Time span [s] covered by the trajectory
    pub fn span(&self) -> f64 {
        self.time_of(self.len().saturating_sub(1))
    }
    /// Iterates (epoch, state) pairs, given the epoch of the initial state
    pub fn epochs(&self, start: Epoch) -> impl Iterator<Item = (Epoch, &StateVector)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(move |(k, state)| (start + self.time_of(k) * Unit::Second, state))
    }
}

/// Classical 4th order Runge-Kutta integrator, point mass gravity only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rk4Propagator {
    gravity: GravityModel,
}

impl Rk4Propagator {
    pub fn new(gravity: GravityModel) -> Self {
        Self { gravity }
    }
    /// Two-body acceleration -μ.r/|r|³ [m/s^2].
    /// Singular at r = 0: a degenerate state yields non finite values.
    pub fn acceleration(&self, r: &Vector3<f64>) -> Vector3<f64> {
        let r_norm = r.norm();
        -self.gravity.mu() * r / r_norm.powi(3)
    }
    /// Advances the state by one step of `h` seconds
    pub fn step(&self, state: &StateVector, h: f64) -> StateVector {
        let (r, v) = (state.position, state.velocity);

        let k1_r = h * v;
        let k1_v = h * self.acceleration(&r);

        let k2_r = h * (v + 0.5 * k1_v);
        let k2_v = h * self.acceleration(&(r + 0.5 * k1_r));

        let k3_r = h * (v + 0.5 * k2_v);
        let k3_v = h * self.acceleration(&(r + 0.5 * k2_r));

        let k4_r = h * (v + k3_v);
        let k4_v = h * self.acceleration(&(r + k3_r));

        StateVector {
            position: r + (k1_r + 2.0 * k2_r + 2.0 * k3_r + k4_r) / 6.0,
            velocity: v + (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) / 6.0,
        }
    }
    /// Integrates `step_count` states (initial state included) spaced by `step_size` seconds.
    pub fn propagate(
        &self,
        initial: StateVector,
        step_count: usize,
        step_size: f64,
    ) -> Result<Trajectory, Error> {
        if step_count == 0 {
            return Err(Error::InvalidStep("step count should be positive".to_string()));
        }
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(Error::InvalidStep(format!(
                "step size should be positive and finite, got {}",
                step_size
            )));
        }

        let mut states = Vec::with_capacity(step_count);
        states.push(initial);

        let mut state = initial;
        for _ in 1..step_count {
            state = self.step(&state, step_size);
            states.push(state);
        }

        info!(
            "rk4: {} steps of {}s, |r|={:.3}m |v|={:.6}m/s",
            step_count,
            step_size,
            state.radius(),
            state.speed()
        );
        debug!("rk4: final state {:?}", state);

        Ok(Trajectory { step_size, states })
    }
}

/// Integrates the two-body problem with the classical RK4 scheme.
/// See [Rk4Propagator::propagate].
pub fn propagate(
    initial: StateVector,
    step_count: usize,
    step_size: f64,
    gravity: &GravityModel,
) -> Result<Trajectory, Error> {
    Rk4Propagator::new(*gravity).propagate(initial, step_count, step_size)
}
