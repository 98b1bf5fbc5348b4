// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Reference simulation context: holds positions of a `ParticleSystem`,
//! takes state snapshots and evaluates potential energy of the supported force terms.

use serde::{Deserialize, Serialize};

use crate::errors::ContextError;
use crate::structures::particle_system::ParticleSystem;
use crate::structures::positions::Positions;
use crate::structures::vector3d::Vector3D;
use crate::units::femtosecond;

/// Computational platform used by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    /// Single-threaded double-precision CPU implementation.
    #[default]
    Reference,
}

/// Velocity Verlet integrator. The context never steps it; it only records the step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerletIntegrator {
    /// Step size in ps.
    step_size: f64,
}

impl VerletIntegrator {
    /// Create a new integrator with the given step size (in ps).
    pub fn new(step_size: f64) -> Self {
        VerletIntegrator { step_size }
    }

    #[inline(always)]
    pub fn get_step_size(&self) -> f64 {
        self.step_size
    }
}

impl Default for VerletIntegrator {
    /// Integrator with a 1 fs time step.
    fn default() -> Self {
        VerletIntegrator::new(femtosecond(1.0))
    }
}

/// Snapshot of a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Simulation time in ps.
    time: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    positions: Option<Positions>,
    /// Potential energy in kJ/mol.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    potential_energy: Option<f64>,
}

impl State {
    #[inline(always)]
    pub fn get_time(&self) -> f64 {
        self.time
    }

    #[inline(always)]
    pub fn get_positions(&self) -> Option<&Positions> {
        self.positions.as_ref()
    }

    #[inline(always)]
    pub fn get_potential_energy(&self) -> Option<f64> {
        self.potential_energy
    }
}

/// Simulation context bound to a `ParticleSystem`.
///
/// The context borrows the system for its whole lifetime and is released when dropped.
///
/// ## Example
/// ```
/// # use testsys_rs::prelude::*;
/// #
/// let pair = LennardJonesPair::default();
/// let mut context = Context::new(pair.get_system(), VerletIntegrator::default(), Platform::Reference);
/// context.set_positions(pair.get_positions()).unwrap();
///
/// // particles sit in the minimum of the potential
/// let energy = context.get_potential_energy().unwrap();
/// assert!((energy + pair.get_parameters().get_epsilon()).abs() < 1e-8);
/// ```
#[derive(Debug)]
pub struct Context<'a> {
    system: &'a ParticleSystem,
    integrator: VerletIntegrator,
    platform: Platform,
    positions: Option<Positions>,
    time: f64,
}

impl<'a> Context<'a> {
    /// Create a new context for the given system.
    pub fn new(system: &'a ParticleSystem, integrator: VerletIntegrator, platform: Platform) -> Self {
        log::debug!(
            "Creating {:?} context for a system of {} particles and {} forces.",
            platform,
            system.get_n_particles(),
            system.get_n_forces()
        );

        Context {
            system,
            integrator,
            platform,
            positions: None,
            time: 0.0,
        }
    }

    #[inline(always)]
    pub fn get_system(&self) -> &ParticleSystem {
        self.system
    }

    #[inline(always)]
    pub fn get_integrator(&self) -> &VerletIntegrator {
        &self.integrator
    }

    #[inline(always)]
    pub fn get_platform(&self) -> Platform {
        self.platform
    }

    /// Set positions of all particles.
    ///
    /// ## Returns
    /// `ContextError::ParticleCountMismatch` if the number of positions does not match
    /// the number of particles in the system. In that case, the context is not changed.
    pub fn set_positions(&mut self, positions: &Positions) -> Result<(), ContextError> {
        self.check_count(positions.get_n_particles())?;
        self.positions = Some(positions.clone());
        Ok(())
    }

    /// Take a snapshot of the context, optionally including positions and potential energy.
    ///
    /// ## Returns
    /// `ContextError::NoPositions` if positions or energy are requested but positions were never set.
    pub fn get_state(&self, positions: bool, energy: bool) -> Result<State, ContextError> {
        let state_positions = if positions {
            Some(self.positions.clone().ok_or(ContextError::NoPositions)?)
        } else {
            None
        };

        let potential_energy = if energy {
            Some(self.get_potential_energy()?)
        } else {
            None
        };

        Ok(State {
            time: self.time,
            positions: state_positions,
            potential_energy,
        })
    }

    /// Calculate potential energy (kJ/mol) for the positions stored in the context.
    pub fn get_potential_energy(&self) -> Result<f64, ContextError> {
        let positions = self.positions.as_ref().ok_or(ContextError::NoPositions)?;
        self.evaluate(positions.as_slice())
    }

    /// Calculate potential energy (kJ/mol) for arbitrary positions without storing them in the context.
    pub fn get_potential_energy_of(&self, positions: &[Vector3D]) -> Result<f64, ContextError> {
        self.check_count(positions.len())?;
        self.evaluate(positions)
    }

    fn evaluate(&self, positions: &[Vector3D]) -> Result<f64, ContextError> {
        self.system
            .get_forces()
            .iter()
            .try_fold(0.0, |acc, force| Ok(acc + force.energy(positions)?))
    }

    fn check_count(&self, n_positions: usize) -> Result<(), ContextError> {
        let expected = self.system.get_n_particles();
        if n_positions != expected {
            return Err(ContextError::ParticleCountMismatch {
                expected,
                found: n_positions,
            });
        }

        Ok(())
    }
}

impl Drop for Context<'_> {
    fn drop(&mut self) {
        log::trace!("Releasing {:?} context.", self.platform);
    }
}
