// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the force terms that can be added to a `ParticleSystem`.

use serde::{Deserialize, Serialize};

use crate::errors::ContextError;
use crate::structures::vector3d::Vector3D;
use crate::units::ONE_4PI_EPS0;

/// Method used to treat nonbonded interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NonbondedMethod {
    #[default]
    NoCutoff,
    CutoffNonPeriodic,
    CutoffPeriodic,
    Ewald,
    PME,
}

/// Per-particle parameters of the nonbonded force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NonbondedParticle {
    /// Charge in e.
    pub charge: f64,
    /// Lennard-Jones sigma in nm.
    pub sigma: f64,
    /// Lennard-Jones epsilon in kJ/mol.
    pub epsilon: f64,
}

/// Lennard-Jones and Coulomb interactions between all pairs of particles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NonbondedForce {
    method: NonbondedMethod,
    particles: Vec<NonbondedParticle>,
}

impl NonbondedForce {
    /// Create a new nonbonded force with no particles.
    pub fn new(method: NonbondedMethod) -> Self {
        NonbondedForce {
            method,
            particles: Vec::new(),
        }
    }

    /// Add parameters for the next particle. Returns index of the particle in the force.
    pub fn add_particle(&mut self, charge: f64, sigma: f64, epsilon: f64) -> usize {
        self.particles.push(NonbondedParticle {
            charge,
            sigma,
            epsilon,
        });
        self.particles.len() - 1
    }

    #[inline(always)]
    pub fn get_method(&self) -> NonbondedMethod {
        self.method
    }

    #[inline(always)]
    pub fn get_n_particles(&self) -> usize {
        self.particles.len()
    }

    /// Get parameters of the particle with the given index.
    #[inline]
    pub fn get_particle(&self, index: usize) -> Option<&NonbondedParticle> {
        self.particles.get(index)
    }

    /// Calculate energy of all pairwise interactions.
    /// Lennard-Jones parameters of unlike particles are combined using Lorentz-Berthelot rules.
    fn energy(&self, positions: &[Vector3D]) -> Result<f64, ContextError> {
        if self.method != NonbondedMethod::NoCutoff {
            return Err(ContextError::UnsupportedNonbondedMethod(self.method));
        }

        if self.particles.len() > positions.len() {
            return Err(ContextError::InvalidParticleIndex(positions.len()));
        }

        let mut energy = 0.0;
        for (i, p1) in self.particles.iter().enumerate() {
            for (j, p2) in self.particles.iter().enumerate().skip(i + 1) {
                let r = positions[i].distance(&positions[j]);

                let sigma = 0.5 * (p1.sigma + p2.sigma);
                let epsilon = (p1.epsilon * p2.epsilon).sqrt();
                if epsilon != 0.0 {
                    let sr6 = (sigma / r).powi(6);
                    energy += 4.0 * epsilon * (sr6 * sr6 - sr6);
                }

                let qq = p1.charge * p2.charge;
                if qq != 0.0 {
                    energy += ONE_4PI_EPS0 * qq / r;
                }
            }
        }

        Ok(energy)
    }
}

/// Isotropic harmonic restraint pulling selected particles toward a fixed point.
/// U = ½k|r − c|² for each restrained particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicRestraintForce {
    /// Spring constant in kJ/(mol·nm²).
    k: f64,
    /// Position of the minimum in nm.
    center: Vector3D,
    /// Indices of restrained particles.
    particles: Vec<usize>,
}

impl HarmonicRestraintForce {
    /// Create a new restraint with no particles.
    pub fn new(k: f64, center: Vector3D) -> Self {
        HarmonicRestraintForce {
            k,
            center,
            particles: Vec::new(),
        }
    }

    /// Restrain particle with the given index.
    pub fn add_particle(&mut self, index: usize) {
        self.particles.push(index);
    }

    #[inline(always)]
    pub fn get_k(&self) -> f64 {
        self.k
    }

    #[inline(always)]
    pub fn get_center(&self) -> &Vector3D {
        &self.center
    }

    #[inline(always)]
    pub fn get_particles(&self) -> &[usize] {
        &self.particles
    }

    fn energy(&self, positions: &[Vector3D]) -> Result<f64, ContextError> {
        self.particles.iter().try_fold(0.0, |acc, &index| {
            let position = positions
                .get(index)
                .ok_or(ContextError::InvalidParticleIndex(index))?;
            let dr = *position - self.center;
            Ok(acc + 0.5 * self.k * dr.len_squared())
        })
    }
}

/// Per-particle parameters of the OBC generalized Born force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GBSAOBCParticle {
    /// Charge in e.
    pub charge: f64,
    /// Intrinsic Born radius in nm.
    pub radius: f64,
    /// Descreening scale factor.
    pub scale: f64,
}

/// Onufriev-Bashford-Case generalized Born implicit solvent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GBSAOBCForce {
    solvent_dielectric: f64,
    solute_dielectric: f64,
    particles: Vec<GBSAOBCParticle>,
}

impl Default for GBSAOBCForce {
    fn default() -> Self {
        GBSAOBCForce {
            solvent_dielectric: 78.5,
            solute_dielectric: 1.0,
            particles: Vec::new(),
        }
    }
}

impl GBSAOBCForce {
    /// Create a new OBC force with water-like solvent and no particles.
    pub fn new() -> Self {
        GBSAOBCForce::default()
    }

    /// Add parameters for the next particle. Returns index of the particle in the force.
    pub fn add_particle(&mut self, charge: f64, radius: f64, scale: f64) -> usize {
        self.particles.push(GBSAOBCParticle {
            charge,
            radius,
            scale,
        });
        self.particles.len() - 1
    }

    #[inline(always)]
    pub fn get_solvent_dielectric(&self) -> f64 {
        self.solvent_dielectric
    }

    #[inline(always)]
    pub fn get_solute_dielectric(&self) -> f64 {
        self.solute_dielectric
    }

    #[inline(always)]
    pub fn get_n_particles(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn get_particle(&self, index: usize) -> Option<&GBSAOBCParticle> {
        self.particles.get(index)
    }
}

/// Force term of a `ParticleSystem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Force {
    Nonbonded(NonbondedForce),
    HarmonicRestraint(HarmonicRestraintForce),
    GBSAOBC(GBSAOBCForce),
}

impl Force {
    /// Name of the force type.
    pub fn name(&self) -> &'static str {
        match self {
            Force::Nonbonded(_) => "Nonbonded",
            Force::HarmonicRestraint(_) => "HarmonicRestraint",
            Force::GBSAOBC(_) => "GBSAOBC",
        }
    }

    /// Evaluate the potential energy of this force term (kJ/mol) for the given positions.
    pub(crate) fn energy(&self, positions: &[Vector3D]) -> Result<f64, ContextError> {
        match self {
            Force::Nonbonded(force) => force.energy(positions),
            Force::HarmonicRestraint(force) => force.energy(positions),
            Force::GBSAOBC(_) => Err(ContextError::UnsupportedForce(self.name())),
        }
    }
}

impl From<NonbondedForce> for Force {
    fn from(force: NonbondedForce) -> Self {
        Force::Nonbonded(force)
    }
}

impl From<HarmonicRestraintForce> for Force {
    fn from(force: HarmonicRestraintForce) -> Self {
        Force::HarmonicRestraint(force)
    }
}

impl From<GBSAOBCForce> for Force {
    fn from(force: GBSAOBCForce) -> Self {
        Force::GBSAOBC(force)
    }
}
