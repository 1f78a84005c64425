//! Keplerian <=> Cartesian conversions
use log::debug;
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::TAU;

use crate::{
    cfg::GravityModel,
    kepler::{KeplerSolver, Keplerian},
    state::StateVector,
    Error,
};

/// Wraps an angle into [0, 2π)
fn wrap(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

impl Keplerian {
    /// Builds a new element set, angles in radians.
    pub fn new(a: f64, e: f64, i: f64, raan: f64, argp: f64, m: f64) -> Self {
        Self {
            a,
            e,
            i,
            raan,
            argp,
            m,
        }
    }
    /// Mean motion [rad/s]
    pub fn mean_motion(&self, gravity: &GravityModel) -> f64 {
        (gravity.mu() / self.a.powi(3)).sqrt()
    }
    /// Orbital period [s]
    pub fn period(&self, gravity: &GravityModel) -> f64 {
        TAU / self.mean_motion(gravity)
    }
    /// Perifocal to inertial rotation R_z(-Ω).R_x(-i).R_z(-ω)
    fn perifocal_to_inertial(&self) -> Matrix3<f64> {
        let (sin_argp, cos_argp) = self.argp.sin_cos();
        let (sin_i, cos_i) = self.i.sin_cos();
        let (sin_raan, cos_raan) = self.raan.sin_cos();
        Matrix3::new(
            cos_argp * cos_raan - sin_argp * cos_i * sin_raan,
            -(sin_argp * cos_raan + cos_argp * cos_i * sin_raan),
            0.0,
            cos_argp * sin_raan + sin_argp * cos_i * cos_raan,
            cos_argp * cos_i * cos_raan - sin_argp * sin_raan,
            0.0,
            sin_argp * sin_i,
            cos_argp * sin_i,
            0.0,
        )
    }
    /// Converts Self to an inertial [StateVector] in [m] and [m/s].
    pub fn to_cartesian(
        &self,
        solver: &KeplerSolver,
        gravity: &GravityModel,
    ) -> Result<StateVector, Error> {
        let mu = gravity.mu();
        let e = self.e;
        let e_k = solver.solve(self.m, e)?;

        let nu_k = 2.0
            * ((1.0 + e).sqrt() * (e_k / 2.0).sin()).atan2((1.0 - e).sqrt() * (e_k / 2.0).cos());
        let r_k = self.a * (1.0 - e * e_k.cos());

        let xp_k = r_k * nu_k.cos();
        let yp_k = r_k * nu_k.sin();

        // vis-viva consistent perifocal velocity
        let v_scale = (mu * self.a).sqrt() / r_k;
        let vxp_k = -v_scale * e_k.sin();
        let vyp_k = v_scale * (1.0 - e * e).sqrt() * e_k.cos();

        let rot = self.perifocal_to_inertial();
        let position = rot * Vector3::new(xp_k, yp_k, 0.0);
        let velocity = rot * Vector3::new(vxp_k, vyp_k, 0.0);

        debug!(
            "kepler(a={}, e={}, M={}) -> E={} nu={} r={}",
            self.a, e, self.m, e_k, nu_k, r_k
        );
        Ok(StateVector { position, velocity })
    }
    /// Recovers the element set from an inertial state.
    /// Angles are returned within [0, 2π). Circular or equatorial orbits
    /// leave argument of perigee (resp. RAAN) undefined and should not
    /// be expected to round trip.
    pub fn from_cartesian(state: &StateVector, gravity: &GravityModel) -> Result<Self, Error> {
        let mu = gravity.mu();
        let (r, v) = (state.position, state.velocity);
        let r_norm = r.norm();

        let energy = state.specific_energy(mu);
        if energy >= 0.0 || !energy.is_finite() {
            return Err(Error::UnboundOrbit(energy));
        }
        let a = -mu / (2.0 * energy);

        let h = r.cross(&v);
        let node = Vector3::z().cross(&h);
        let e_vec = ((v.norm_squared() - mu / r_norm) * r - r.dot(&v) * v) / mu;
        let e = e_vec.norm();

        let i = (h[2] / h.norm()).acos();
        let raan = wrap(node[1].atan2(node[0]));

        let mut argp = (node.dot(&e_vec) / (node.norm() * e)).clamp(-1.0, 1.0).acos();
        if e_vec[2] < 0.0 {
            argp = TAU - argp;
        }

        let mut nu = (e_vec.dot(&r) / (e * r_norm)).clamp(-1.0, 1.0).acos();
        if r.dot(&v) < 0.0 {
            nu = TAU - nu;
        }

        let half = nu / 2.0;
        let e_k = 2.0 * ((1.0 - e).sqrt() * half.sin()).atan2((1.0 + e).sqrt() * half.cos());
        let m = wrap(e_k - e * e_k.sin());

        Ok(Self {
            a,
            e,
            i,
            raan,
            argp: wrap(argp),
            m,
        })
    }
}
