// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the ParticleSystem structure: particle masses and force terms.

use serde::{Deserialize, Serialize};

use crate::structures::forces::Force;

/// Physical description of a system: masses of the particles and the forces acting on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystem {
    /// Masses of the particles in amu.
    masses: Vec<f64>,
    forces: Vec<Force>,
}

impl ParticleSystem {
    /// Create a new empty system with no particles and no forces.
    pub fn new() -> Self {
        ParticleSystem::default()
    }

    /// Add a particle with the given mass (in amu). Returns index of the particle.
    pub fn add_particle(&mut self, mass: f64) -> usize {
        self.masses.push(mass);
        self.masses.len() - 1
    }

    /// Add a force term. Returns index of the force.
    pub fn add_force(&mut self, force: impl Into<Force>) -> usize {
        self.forces.push(force.into());
        self.forces.len() - 1
    }

    /// Get the number of particles.
    #[inline(always)]
    pub fn get_n_particles(&self) -> usize {
        self.masses.len()
    }

    /// Get the number of force terms.
    #[inline(always)]
    pub fn get_n_forces(&self) -> usize {
        self.forces.len()
    }

    /// Get mass of the particle with the given index.
    #[inline]
    pub fn get_particle_mass(&self, index: usize) -> Option<f64> {
        self.masses.get(index).copied()
    }

    #[inline(always)]
    pub fn get_masses(&self) -> &[f64] {
        &self.masses
    }

    #[inline]
    pub fn get_force(&self, index: usize) -> Option<&Force> {
        self.forces.get(index)
    }

    #[inline(always)]
    pub fn get_forces(&self) -> &[Force] {
        &self.forces
    }

    /// Calculate total mass of the system in amu.
    pub fn get_total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Returns `true` if the system contains no particles and no forces.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty() && self.forces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::forces::{GBSAOBCForce, NonbondedForce, NonbondedMethod};
    use float_cmp::assert_approx_eq;

    #[test]
    fn empty() {
        let system = ParticleSystem::new();
        assert!(system.is_empty());
        assert_eq!(system.get_n_particles(), 0);
        assert_eq!(system.get_n_forces(), 0);
    }

    #[test]
    fn build() {
        let mut system = ParticleSystem::new();
        assert_eq!(system.add_particle(39.9), 0);
        assert_eq!(system.add_particle(12.01), 1);
        assert_eq!(system.add_force(NonbondedForce::new(NonbondedMethod::NoCutoff)), 0);
        assert_eq!(system.add_force(GBSAOBCForce::new()), 1);

        assert!(!system.is_empty());
        assert_eq!(system.get_n_particles(), 2);
        assert_eq!(system.get_n_forces(), 2);
        assert_approx_eq!(f64, system.get_particle_mass(1).unwrap(), 12.01);
        assert!(system.get_particle_mass(2).is_none());
        assert_approx_eq!(f64, system.get_total_mass(), 51.91);

        assert_eq!(system.get_force(0).unwrap().name(), "Nonbonded");
        assert_eq!(system.get_forces()[1].name(), "GBSAOBC");
    }

    #[test]
    fn serialize() {
        let mut system = ParticleSystem::new();
        system.add_particle(39.9);
        let mut force = NonbondedForce::new(NonbondedMethod::NoCutoff);
        force.add_particle(0.0, 0.335, 41.84);
        system.add_force(force);

        let yaml = serde_yaml::to_string(&system).unwrap();
        let parsed: ParticleSystem = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(system, parsed);
    }
}
