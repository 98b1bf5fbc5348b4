// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the three-dimensional harmonic oscillator test system.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ParseConfigError, TestSystemError};
use crate::io::yaml_io;
use crate::structures::element::Element;
use crate::structures::forces::HarmonicRestraintForce;
use crate::structures::particle_system::ParticleSystem;
use crate::structures::positions::Positions;
use crate::structures::thermodynamic_state::ThermodynamicState;
use crate::structures::topology::Topology;
use crate::structures::vector3d::Vector3D;
use crate::testsystems::{AnalyticalProperty, TestSystem, TestSystemBase};
use crate::units::kcal_per_mol_angstrom2;

/// Parameters of the harmonic oscillator.
///
/// Yaml files use the following fields (both optional):
/// ```yaml
/// k: 41840.0   # kJ/(mol·nm²)
/// mass: 39.948 # amu
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HarmonicOscillatorParameters {
    k: f64,
    mass: f64,
}

impl Default for HarmonicOscillatorParameters {
    /// Spring constant 100 kcal/(mol·Å²) and mass of argon.
    fn default() -> Self {
        HarmonicOscillatorParameters {
            k: kcal_per_mol_angstrom2(100.0),
            mass: 39.948,
        }
    }
}

impl HarmonicOscillatorParameters {
    /// Read parameters from a yaml file. Missing fields take their default values.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ParseConfigError> {
        let parameters: HarmonicOscillatorParameters = yaml_io::read_yaml(filename)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Check that all parameters are positive and finite.
    pub fn validate(&self) -> Result<(), ParseConfigError> {
        for (name, value) in [("k", self.k), ("mass", self.mass)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParseConfigError::InvalidParameter(name, value));
            }
        }

        Ok(())
    }

    /// Set spring constant (in kJ/(mol·nm²)).
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set particle mass (in amu).
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    #[inline(always)]
    pub fn get_k(&self) -> f64 {
        self.k
    }

    #[inline(always)]
    pub fn get_mass(&self) -> f64 {
        self.mass
    }
}

/// Single particle in an isotropic harmonic well `U = ½K|r|²` centered at the origin.
///
/// Potential energy of the particle follows a gamma distribution with shape 3/2
/// and scale kT, so its mean and standard deviation are known exactly.
///
/// ## Example
/// ```
/// # use testsys_rs::prelude::*;
/// #
/// let oscillator = HarmonicOscillator::default();
/// let state = ThermodynamicState::new(300.0).unwrap();
///
/// let mean = oscillator.get_potential_expectation(&state);
/// assert!((mean - 1.5 * state.get_kt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct HarmonicOscillator {
    base: TestSystemBase,
    parameters: HarmonicOscillatorParameters,
}

impl Default for HarmonicOscillator {
    fn default() -> Self {
        HarmonicOscillator::new(HarmonicOscillatorParameters::default())
            .expect("FATAL TESTSYS ERROR | HarmonicOscillator::default | Default parameters should be valid.")
    }
}

impl HarmonicOscillator {
    pub const NAME: &'static str = "HarmonicOscillator";
    pub const PROPERTIES: &'static [AnalyticalProperty] = &[
        AnalyticalProperty::PotentialExpectation,
        AnalyticalProperty::PotentialStandardDeviation,
    ];

    /// Construct a new harmonic oscillator with the given parameters.
    ///
    /// ## Returns
    /// `ParseConfigError::InvalidParameter` if the spring constant or the mass is not positive and finite.
    pub fn new(parameters: HarmonicOscillatorParameters) -> Result<Self, ParseConfigError> {
        parameters.validate()?;

        let mut system = ParticleSystem::new();
        let particle = system.add_particle(parameters.mass);

        let mut restraint = HarmonicRestraintForce::new(parameters.k, Vector3D::default());
        restraint.add_particle(particle);
        system.add_force(restraint);

        let argon = Element::by_symbol("Ar")
            .expect("FATAL TESTSYS ERROR | HarmonicOscillator::new | Argon is missing in the default element table.");
        let mut topology = Topology::new();
        let chain = topology.add_chain(Some("A"));
        let residue = topology
            .add_residue("OSC", chain, None)
            .expect("FATAL TESTSYS ERROR | HarmonicOscillator::new | Chain should exist.");
        topology
            .add_atom("Ar", Some(argon), residue)
            .expect("FATAL TESTSYS ERROR | HarmonicOscillator::new | Residue should exist.");

        let base = TestSystemBase::from_parts(system, Positions::zeros(1), topology)
            .expect("FATAL TESTSYS ERROR | HarmonicOscillator::new | Number of positions does not match number of particles.");

        Ok(HarmonicOscillator { base, parameters })
    }

    #[inline(always)]
    pub fn get_parameters(&self) -> &HarmonicOscillatorParameters {
        &self.parameters
    }

    /// Expected potential energy (kJ/mol) at the given thermodynamic state.
    pub fn get_potential_expectation(&self, state: &ThermodynamicState) -> f64 {
        1.5 * state.get_kt()
    }

    /// Standard deviation of the potential energy (kJ/mol) at the given thermodynamic state.
    pub fn get_potential_standard_deviation(&self, state: &ThermodynamicState) -> f64 {
        1.5f64.sqrt() * state.get_kt()
    }
}

impl TestSystem for HarmonicOscillator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &TestSystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TestSystemBase {
        &mut self.base
    }

    fn analytical_properties(&self) -> &'static [AnalyticalProperty] {
        Self::PROPERTIES
    }

    fn compute_property(
        &self,
        property: AnalyticalProperty,
        state: &ThermodynamicState,
    ) -> Result<f64, TestSystemError> {
        let value = match property {
            AnalyticalProperty::PotentialExpectation => self.get_potential_expectation(state),
            AnalyticalProperty::PotentialStandardDeviation => {
                self.get_potential_standard_deviation(state)
            }
            _ => return Err(self.property_not_available(property)),
        };

        log::info!(
            "{} of {} at {} K: {:.6} kJ/mol.",
            property,
            Self::NAME,
            state.get_temperature(),
            value
        );
        Ok(value)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, Platform, VerletIntegrator};
    use crate::structures::forces::Force;
    use crate::units::BOLTZMANN_CONSTANT;
    use float_cmp::assert_approx_eq;

    fn state(temperature: f64) -> ThermodynamicState {
        ThermodynamicState::new(temperature).unwrap()
    }

    #[test]
    fn default_oscillator() {
        let oscillator = HarmonicOscillator::default();

        assert_eq!(oscillator.name(), "HarmonicOscillator");
        assert_eq!(oscillator.get_system().get_n_particles(), 1);
        assert_approx_eq!(f64, oscillator.get_system().get_particle_mass(0).unwrap(), 39.948);
        assert!(oscillator.get_positions()[0].is_zero());

        match oscillator.get_system().get_force(0).unwrap() {
            Force::HarmonicRestraint(force) => {
                assert_approx_eq!(f64, force.get_k(), 41840.0, epsilon = 1e-8);
                assert!(force.get_center().is_zero());
                assert_eq!(force.get_particles(), &[0]);
            }
            other => panic!("Unexpected force `{:?}`.", other),
        }

        let view = oscillator.get_analysis_topology();
        assert_eq!(view.get_n_atoms(), 1);
        assert_eq!(view.select_residue_name("OSC"), vec![0]);
    }

    #[test]
    fn properties() {
        let oscillator = HarmonicOscillator::default();
        let state = state(300.0);
        let kt = BOLTZMANN_CONSTANT * 300.0;

        assert_approx_eq!(
            f64,
            oscillator
                .compute_property(AnalyticalProperty::PotentialExpectation, &state)
                .unwrap(),
            1.5 * kt,
            epsilon = 1e-12
        );
        assert_approx_eq!(
            f64,
            oscillator
                .compute_property(AnalyticalProperty::PotentialStandardDeviation, &state)
                .unwrap(),
            1.5f64.sqrt() * kt,
            epsilon = 1e-12
        );
        assert!(matches!(
            oscillator.compute_property(AnalyticalProperty::BindingFreeEnergy, &state),
            Err(TestSystemError::PropertyNotAvailable { .. })
        ));
    }

    #[test]
    fn reduced_potential_expectation() {
        let oscillator = HarmonicOscillator::default();

        for (from, evaluated_in) in [(300.0, 300.0), (300.0, 350.0), (450.0, 280.0)] {
            let reduced = oscillator
                .reduced_potential_expectation(&state(from), &state(evaluated_in))
                .unwrap();
            assert_approx_eq!(f64, reduced, 1.5 * from / evaluated_in, epsilon = 1e-12);
        }
    }

    #[test]
    fn energy_matches_restraint() {
        let oscillator = HarmonicOscillator::default();
        let context = Context::new(
            oscillator.get_system(),
            VerletIntegrator::default(),
            Platform::Reference,
        );

        let energy = context
            .get_potential_energy_of(&[Vector3D::new(0.01, -0.02, 0.0)])
            .unwrap();
        assert_approx_eq!(f64, energy, 0.5 * 41840.0 * 0.0005, epsilon = 1e-8);
    }

    #[test]
    fn parameters_from_file() {
        let parameters =
            HarmonicOscillatorParameters::from_file("test_files/oscillator_params.yaml").unwrap();
        assert_approx_eq!(f64, parameters.get_k(), 1000.0);
        assert_approx_eq!(f64, parameters.get_mass(), 12.01);

        let oscillator = HarmonicOscillator::new(parameters).unwrap();
        assert_approx_eq!(f64, oscillator.get_system().get_particle_mass(0).unwrap(), 12.01);
    }

    #[test]
    fn parameters_invalid() {
        let parameters = HarmonicOscillatorParameters::default().with_k(0.0);
        match parameters.validate() {
            Err(ParseConfigError::InvalidParameter(name, value)) => {
                assert_eq!(name, "k");
                assert_approx_eq!(f64, value, 0.0);
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        let default = HarmonicOscillatorParameters::default();
        let cases = [
            ("k", default.with_k(0.0), 0.0),
            ("k", default.with_k(-100.0), -100.0),
            ("mass", default.with_mass(0.0), 0.0),
            ("mass", default.with_mass(-12.0), -12.0),
            ("k", default.with_k(f64::INFINITY), f64::INFINITY),
        ];

        for (expected_name, parameters, expected_value) in cases {
            match HarmonicOscillator::new(parameters) {
                Err(ParseConfigError::InvalidParameter(name, value)) => {
                    assert_eq!(name, expected_name);
                    assert_eq!(value, expected_value);
                }
                other => panic!("Incorrect result `{:?}` was returned.", other),
            }
        }
    }
}
