// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the Lennard-Jones pair test system.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::f64::consts::PI;
use std::path::Path;

use crate::context::{Context, Platform, VerletIntegrator};
use crate::errors::{ContextError, ParseConfigError, QuadratureError, TestSystemError};
use crate::io::yaml_io;
use crate::quadrature::{self, QuadratureResult, QuadratureSettings};
use crate::structures::element::Element;
use crate::structures::forces::{NonbondedForce, NonbondedMethod};
use crate::structures::particle_system::ParticleSystem;
use crate::structures::positions::Positions;
use crate::structures::thermodynamic_state::ThermodynamicState;
use crate::structures::topology::Topology;
use crate::structures::vector3d::Vector3D;
use crate::testsystems::{AnalyticalProperty, TestSystem, TestSystemBase};
use crate::units::{angstrom, kcal_per_mol, standard_state_volume};

/// Lower bound of the binding integral in units of sigma.
const X_MIN: f64 = 0.15;
/// Upper bound of the binding integral in units of sigma.
const X_MAX: f64 = 6.0;

/// Parameters of the Lennard-Jones pair.
///
/// ## Example
/// Parameters can be built in code:
/// ```
/// # use testsys_rs::prelude::*;
/// # use testsys_rs::units::kcal_per_mol;
/// #
/// let parameters = LennardJonesParameters::default()
///     .with_epsilon(kcal_per_mol(5.0))
///     .with_mass(20.18);
/// let pair = LennardJonesPair::new(parameters).unwrap();
/// ```
///
/// or read from a yaml file (all fields are optional):
/// ```yaml
/// mass: 39.9      # amu
/// sigma: 0.335    # nm
/// epsilon: 41.84  # kJ/mol
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LennardJonesParameters {
    mass: f64,
    sigma: f64,
    epsilon: f64,
}

impl Default for LennardJonesParameters {
    /// Argon-like particles with a deep well: mass 39.9 amu, sigma 3.35 Å, epsilon 10 kcal/mol.
    fn default() -> Self {
        LennardJonesParameters {
            mass: 39.9,
            sigma: angstrom(3.350),
            epsilon: kcal_per_mol(10.0),
        }
    }
}

impl LennardJonesParameters {
    /// Read parameters from a yaml file. Missing fields take their default values.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ParseConfigError> {
        let parameters: LennardJonesParameters = yaml_io::read_yaml(filename)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Check that all parameters are positive and finite.
    pub fn validate(&self) -> Result<(), ParseConfigError> {
        for (name, value) in [
            ("mass", self.mass),
            ("sigma", self.sigma),
            ("epsilon", self.epsilon),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParseConfigError::InvalidParameter(name, value));
            }
        }

        Ok(())
    }

    /// Set particle mass (in amu).
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set Lennard-Jones sigma (in nm).
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set Lennard-Jones well depth (in kJ/mol).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    #[inline(always)]
    pub fn get_mass(&self) -> f64 {
        self.mass
    }

    #[inline(always)]
    pub fn get_sigma(&self) -> f64 {
        self.sigma
    }

    #[inline(always)]
    pub fn get_epsilon(&self) -> f64 {
        self.epsilon
    }
}

/// Pair of Lennard-Jones particles.
///
/// Particle 0 (the ligand) sits at the origin, particle 1 (the receptor) sits
/// in the minimum of the potential at `x = sigma * 2^(1/6)`.
/// The particles interact through a single nonbonded force without cutoff.
#[derive(Debug, Clone)]
pub struct LennardJonesPair {
    base: TestSystemBase,
    parameters: LennardJonesParameters,
}

impl Default for LennardJonesPair {
    fn default() -> Self {
        LennardJonesPair::new(LennardJonesParameters::default())
            .expect("FATAL TESTSYS ERROR | LennardJonesPair::default | Default parameters should be valid.")
    }
}

impl LennardJonesPair {
    pub const NAME: &'static str = "LennardJonesPair";
    pub const PROPERTIES: &'static [AnalyticalProperty] = &[AnalyticalProperty::BindingFreeEnergy];

    /// Construct a new Lennard-Jones pair with the given parameters.
    ///
    /// ## Returns
    /// `ParseConfigError::InvalidParameter` if any of the parameters is not positive and finite.
    pub fn new(parameters: LennardJonesParameters) -> Result<Self, ParseConfigError> {
        parameters.validate()?;

        let mut system = ParticleSystem::new();
        let mut force = NonbondedForce::new(NonbondedMethod::NoCutoff);
        for _ in 0..2 {
            system.add_particle(parameters.mass);
            force.add_particle(0.0, parameters.sigma, parameters.epsilon);
        }
        system.add_force(force);

        let positions = Positions::from(vec![
            Vector3D::default(),
            Vector3D::new(parameters.sigma * 2.0f64.powf(1.0 / 6.0), 0.0, 0.0),
        ]);

        let argon = Element::by_symbol("Ar")
            .expect("FATAL TESTSYS ERROR | LennardJonesPair::new | Argon is missing in the default element table.");
        let mut topology = Topology::new();
        let chain = topology.add_chain(Some("A"));
        for _ in 0..2 {
            let residue = topology
                .add_residue("Ar", chain, None)
                .expect("FATAL TESTSYS ERROR | LennardJonesPair::new | Chain should exist.");
            topology
                .add_atom("Ar", Some(argon.clone()), residue)
                .expect("FATAL TESTSYS ERROR | LennardJonesPair::new | Residue should exist.");
        }

        let base = TestSystemBase::from_parts(system, positions, topology)
            .expect("FATAL TESTSYS ERROR | LennardJonesPair::new | Number of positions does not match number of particles.");

        Ok(LennardJonesPair { base, parameters })
    }

    #[inline(always)]
    pub fn get_parameters(&self) -> &LennardJonesParameters {
        &self.parameters
    }

    /// Indices of the ligand particles.
    pub fn get_ligand_indices(&self) -> Vec<usize> {
        vec![0]
    }

    /// Indices of the receptor particles.
    pub fn get_receptor_indices(&self) -> Vec<usize> {
        vec![1]
    }

    /// Calculate the standard binding free energy (kJ/mol) of the pair at the given thermodynamic state.
    ///
    /// The configurational integral of the reduced potential `u(x) = 4ε(x⁻¹² - x⁻⁶)/kT`
    /// over `x = r/sigma ∈ [0.15, 6]` is evaluated numerically and converted to the standard state.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// #
    /// let pair = LennardJonesPair::default();
    /// let state = ThermodynamicState::new(300.0).unwrap();
    ///
    /// let dg = pair.get_binding_free_energy(&state).unwrap();
    /// assert!(dg.is_finite() && dg < 0.0);
    /// ```
    pub fn get_binding_free_energy(&self, state: &ThermodynamicState) -> Result<f64, TestSystemError> {
        let reduced_epsilon = self.parameters.epsilon / state.get_kt();

        // integrand is shifted by the well depth so that its maximum stays close to 1
        let integrand = move |x: f64| {
            let x6 = x.powi(-6);
            let u = 4.0 * reduced_epsilon * (x6 * x6 - x6);
            4.0 * PI * x * x * (-(u + reduced_epsilon)).exp()
        };

        let result = quadrature::integrate(integrand, X_MIN, X_MAX, &QuadratureSettings::default())?;
        let dg = self.free_energy_from_integral(&result, reduced_epsilon, state)?;

        log::info!(
            "Binding free energy of {} at {} K: {:.6} kJ/mol.",
            Self::NAME,
            state.get_temperature(),
            dg
        );
        Ok(dg)
    }

    /// Calculate the standard binding free energy (kJ/mol) using potential energies
    /// evaluated by a reference `Context` instead of the analytical potential.
    ///
    /// This is considerably slower than `get_binding_free_energy` and serves
    /// as a consistency check of the force description.
    pub fn get_binding_free_energy_from_context(
        &self,
        state: &ThermodynamicState,
    ) -> Result<f64, TestSystemError> {
        let kt = state.get_kt();
        let reduced_epsilon = self.parameters.epsilon / kt;
        let sigma = self.parameters.sigma;

        let context = Context::new(self.get_system(), VerletIntegrator::default(), Platform::Reference);
        let failure: Cell<Option<ContextError>> = Cell::new(None);

        let integrand = |x: f64| {
            let positions = [Vector3D::default(), Vector3D::new(x * sigma, 0.0, 0.0)];
            match context.get_potential_energy_of(&positions) {
                Ok(energy) => 4.0 * PI * x * x * (-(energy / kt + reduced_epsilon)).exp(),
                Err(e) => {
                    failure.set(Some(e));
                    0.0
                }
            }
        };

        let result = quadrature::integrate(integrand, X_MIN, X_MAX, &QuadratureSettings::default());

        if let Some(e) = failure.take() {
            return Err(e.into());
        }

        let dg = self.free_energy_from_integral(&result?, reduced_epsilon, state)?;
        log::info!(
            "Binding free energy of {} at {} K evaluated using context: {:.6} kJ/mol.",
            Self::NAME,
            state.get_temperature(),
            dg
        );
        Ok(dg)
    }

    /// Convert the shifted configurational integral to the standard binding free energy.
    fn free_energy_from_integral(
        &self,
        result: &QuadratureResult,
        reduced_epsilon: f64,
        state: &ThermodynamicState,
    ) -> Result<f64, TestSystemError> {
        let kt = state.get_kt();
        let sigma = self.parameters.sigma;

        log::debug!(
            "Binding integral: {:e} (error estimate {:e}, shift {}, {} panels).",
            result.integral,
            result.error_estimate,
            reduced_epsilon,
            result.iterations
        );

        let v0 = standard_state_volume();
        let v_int = 4.0 / 3.0 * PI * (X_MAX * sigma).powi(3);

        // ln of the integral multiplied by sigma³ and V0/Vint, with the shift restored
        let ln_integral =
            result.integral.ln() + reduced_epsilon + 3.0 * sigma.ln() + (v0 / v_int).ln();

        let dg = -kt * (ln_integral - v0.ln());
        if !dg.is_finite() {
            return Err(QuadratureError::NonFinite(dg).into());
        }

        Ok(dg)
    }
}

impl TestSystem for LennardJonesPair {
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
        match property {
            AnalyticalProperty::BindingFreeEnergy => self.get_binding_free_energy(state),
            _ => Err(self.property_not_available(property)),
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::forces::Force;
    use crate::test_utilities::utilities::argon_topology;
    use crate::units::{kj_to_kcal, BOLTZMANN_CONSTANT};
    use float_cmp::assert_approx_eq;
    use std::fs::File;
    use tempfile::NamedTempFile;

    fn state(temperature: f64) -> ThermodynamicState {
        ThermodynamicState::new(temperature).unwrap()
    }

    #[test]
    fn default_pair() {
        let pair = LennardJonesPair::default();

        assert_eq!(pair.name(), "LennardJonesPair");
        assert_eq!(pair.get_system().get_n_particles(), 2);
        assert_eq!(pair.get_positions().get_n_particles(), 2);
        assert_eq!(pair.get_ligand_indices(), vec![0]);
        assert_eq!(pair.get_receptor_indices(), vec![1]);

        for i in 0..2 {
            assert_approx_eq!(f64, pair.get_system().get_particle_mass(i).unwrap(), 39.9);
        }

        assert_approx_eq!(f64, pair.get_parameters().get_sigma(), 0.335, epsilon = 1e-12);
        assert_approx_eq!(f64, pair.get_parameters().get_epsilon(), 41.84, epsilon = 1e-12);
    }

    #[test]
    fn positions() {
        let pair = LennardJonesPair::default();
        let positions = pair.get_positions();

        assert!(positions[0].is_zero());

        let rmin = 0.335 * 2.0f64.powf(1.0 / 6.0);
        assert_approx_eq!(f64, positions[1].x, rmin, epsilon = 1e-12);
        assert_approx_eq!(f64, positions[1].y, 0.0);
        assert_approx_eq!(f64, positions[1].z, 0.0);
    }

    #[test]
    fn force() {
        let pair = LennardJonesPair::default();
        assert_eq!(pair.get_system().get_n_forces(), 1);

        match pair.get_system().get_force(0).unwrap() {
            Force::Nonbonded(force) => {
                assert_eq!(force.get_method(), NonbondedMethod::NoCutoff);
                assert_eq!(force.get_n_particles(), 2);
                for i in 0..2 {
                    let particle = force.get_particle(i).unwrap();
                    assert_approx_eq!(f64, particle.charge, 0.0);
                    assert_approx_eq!(f64, particle.sigma, 0.335, epsilon = 1e-12);
                    assert_approx_eq!(f64, particle.epsilon, 41.84, epsilon = 1e-12);
                }
            }
            other => panic!("Unexpected force `{:?}`.", other),
        }
    }

    #[test]
    fn topology() {
        let pair = LennardJonesPair::default();
        assert_eq!(pair.get_topology(), &argon_topology(2));

        let view = pair.get_analysis_topology();
        assert_eq!(view.get_n_atoms(), 2);
        assert_eq!(view.get_n_residues(), 2);
        assert_eq!(view.get_n_chains(), 1);
        assert_eq!(view.select_element("Ar"), vec![0, 1]);
    }

    #[test]
    fn properties() {
        let pair = LennardJonesPair::default();
        assert_eq!(
            pair.analytical_properties(),
            &[AnalyticalProperty::BindingFreeEnergy]
        );
        assert!(pair.has_property(AnalyticalProperty::BindingFreeEnergy));
        assert!(!pair.has_property(AnalyticalProperty::PotentialExpectation));
    }

    #[test]
    fn binding_free_energy_default() {
        let pair = LennardJonesPair::default();
        let dg = pair.get_binding_free_energy(&state(300.0)).unwrap();

        assert!(dg.is_finite());
        assert!(dg < 0.0);
        // the well is much deeper than kT, so the free energy is dominated by epsilon
        assert!(dg > -pair.get_parameters().get_epsilon());

        let via_dispatch = pair
            .compute_property(AnalyticalProperty::BindingFreeEnergy, &state(300.0))
            .unwrap();
        assert_approx_eq!(f64, dg, via_dispatch);
    }

    #[test]
    fn binding_free_energy_monotonic() {
        let state = state(300.0);
        let energies: Vec<f64> = [5.0, 10.0, 20.0]
            .into_iter()
            .map(|eps| {
                let parameters = LennardJonesParameters::default().with_epsilon(kcal_per_mol(eps));
                LennardJonesPair::new(parameters)
                    .unwrap()
                    .get_binding_free_energy(&state)
                    .unwrap()
            })
            .collect();

        assert!(energies.iter().all(|dg| dg.is_finite() && *dg < 0.0));
        assert!(energies[0] > energies[1]);
        assert!(energies[1] > energies[2]);
    }

    #[test]
    fn binding_free_energy_weak_limit() {
        // with vanishing interaction, the integral is the volume of the sphere minus the core
        let parameters = LennardJonesParameters::default().with_epsilon(1e-30);
        let pair = LennardJonesPair::new(parameters).unwrap();
        let state = state(300.0);

        let dg = pair.get_binding_free_energy(&state).unwrap();
        let sigma = parameters.get_sigma();
        let ratio = (X_MAX.powi(3) - X_MIN.powi(3)) * sigma.powi(3) / (X_MAX * sigma).powi(3);
        let expected = -BOLTZMANN_CONSTANT * 300.0 * ratio.ln();
        assert_approx_eq!(f64, dg, expected, epsilon = 1e-6);
    }

    #[test]
    fn binding_free_energy_from_context() {
        for eps in [5.0, 10.0] {
            let parameters = LennardJonesParameters::default().with_epsilon(kcal_per_mol(eps));
            let pair = LennardJonesPair::new(parameters).unwrap();

            for temperature in [250.0, 300.0] {
                let fast = pair.get_binding_free_energy(&state(temperature)).unwrap();
                let slow = pair
                    .get_binding_free_energy_from_context(&state(temperature))
                    .unwrap();
                assert_approx_eq!(f64, fast, slow, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn binding_free_energy_from_context_unsupported() {
        let mut pair = LennardJonesPair::default();
        let mut system = pair.get_system().clone();
        let mut force = NonbondedForce::new(NonbondedMethod::CutoffPeriodic);
        force.add_particle(0.0, 0.335, 41.84);
        force.add_particle(0.0, 0.335, 41.84);
        system.add_force(force);
        pair.set_system(system).unwrap();

        match pair.get_binding_free_energy_from_context(&state(300.0)) {
            Err(TestSystemError::Context(ContextError::UnsupportedNonbondedMethod(method))) => {
                assert_eq!(method, NonbondedMethod::CutoffPeriodic)
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn binding_free_energy_from_context_non_finite() {
        let mut pair = LennardJonesPair::default();
        let mut system = ParticleSystem::new();
        system.add_particle(39.9);
        system.add_particle(39.9);
        let mut force = NonbondedForce::new(NonbondedMethod::NoCutoff);
        force.add_particle(0.0, 0.335, 41.84);
        force.add_particle(0.0, 0.335, -41.84);
        system.add_force(force);
        pair.set_system(system).unwrap();

        assert!(matches!(
            pair.get_binding_free_energy_from_context(&state(300.0)),
            Err(TestSystemError::Quadrature(QuadratureError::NonFinite(_)))
        ));
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        let default = LennardJonesParameters::default();
        let cases = [
            ("mass", default.with_mass(0.0), 0.0),
            ("mass", default.with_mass(-5.0), -5.0),
            ("sigma", default.with_sigma(0.0), 0.0),
            ("sigma", default.with_sigma(-0.3), -0.3),
            ("epsilon", default.with_epsilon(0.0), 0.0),
            ("epsilon", default.with_epsilon(-1.0), -1.0),
            ("epsilon", default.with_epsilon(f64::NAN), f64::NAN),
        ];

        for (expected_name, parameters, expected_value) in cases {
            match LennardJonesPair::new(parameters) {
                Err(ParseConfigError::InvalidParameter(name, value)) => {
                    assert_eq!(name, expected_name);
                    assert!(
                        value == expected_value || (value.is_nan() && expected_value.is_nan())
                    );
                }
                other => panic!("Incorrect result `{:?}` was returned.", other),
            }
        }
    }

    #[test]
    fn reduced_potential_expectation_fails() {
        let pair = LennardJonesPair::default();
        match pair.reduced_potential_expectation(&state(300.0), &state(350.0)) {
            Err(TestSystemError::MissingPotentialExpectation(name)) => {
                assert_eq!(name, "LennardJonesPair")
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn unavailable_property() {
        let pair = LennardJonesPair::default();
        assert!(matches!(
            pair.compute_property(AnalyticalProperty::PotentialStandardDeviation, &state(300.0)),
            Err(TestSystemError::PropertyNotAvailable { .. })
        ));
    }

    #[test]
    fn serialize_idempotent() {
        let pair = LennardJonesPair::default();
        let first = pair.serialize().unwrap();
        let second = pair.serialize().unwrap();
        assert_eq!(first, second);

        let (system_yaml, state_yaml) = first;
        let parsed: ParticleSystem = serde_yaml::from_str(&system_yaml).unwrap();
        assert_eq!(&parsed, pair.get_system());

        let state: crate::context::State = serde_yaml::from_str(&state_yaml.unwrap()).unwrap();
        assert_eq!(state.get_positions().unwrap(), pair.get_positions());
    }

    #[test]
    fn serialize_cleared() {
        let mut pair = LennardJonesPair::default();
        pair.clear_positions();
        pair.clear_system();

        let (system_yaml, state_yaml) = pair.serialize().unwrap();
        assert!(state_yaml.is_none());
        let parsed: ParticleSystem = serde_yaml::from_str(&system_yaml).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn parameters_from_file() {
        let parameters = LennardJonesParameters::from_file("test_files/lj_params.yaml").unwrap();
        assert_approx_eq!(f64, parameters.get_mass(), 20.18);
        assert_approx_eq!(f64, parameters.get_sigma(), 0.2782);
        // epsilon is not specified in the file
        assert_approx_eq!(f64, kj_to_kcal(parameters.get_epsilon()), 10.0, epsilon = 1e-12);

        let pair = LennardJonesPair::new(parameters).unwrap();
        assert_approx_eq!(
            f64,
            pair.get_positions()[1].x,
            0.2782 * 2.0f64.powf(1.0 / 6.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn parameters_from_file_unknown_field() {
        match LennardJonesParameters::from_file("test_files/lj_params_unknown_field.yaml") {
            Err(ParseConfigError::CouldNotParseYaml(_)) => (),
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn parameters_from_file_invalid() {
        match LennardJonesParameters::from_file("test_files/lj_params_invalid.yaml") {
            Err(ParseConfigError::InvalidParameter(name, value)) => {
                assert_eq!(name, "sigma");
                assert_approx_eq!(f64, value, -0.3);
            }
            other => panic!("Incorrect result `{:?}` was returned.", other),
        }
    }

    #[test]
    fn write_pdb() {
        let pair = LennardJonesPair::default();

        let pdb_output = NamedTempFile::new().unwrap();
        let path_to_output = pdb_output.path();
        pair.write_pdb(path_to_output).unwrap();

        let mut result = File::open(path_to_output).unwrap();
        let mut expected = File::open("test_files/lennard_jones_pair.pdb").unwrap();

        assert!(file_diff::diff_files(&mut result, &mut expected));
    }

    #[test]
    fn export_yaml() {
        let pair = LennardJonesPair::default();
        let output = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        pair.export(output.path()).unwrap();

        let content = std::fs::read_to_string(output.path()).unwrap();
        let (system_yaml, state_yaml) = pair.serialize().unwrap();
        assert_eq!(content, format!("{}---\n{}", system_yaml, state_yaml.unwrap()));
    }
}
