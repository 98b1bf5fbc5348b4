// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Common interface of all test systems and the catalog of the available systems.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::context::{Context, Platform, VerletIntegrator};
use crate::errors::{ExportError, ParseNameError, TestSystemError, WritePdbError};
use crate::files::FileType;
use crate::io::{pdb_io, yaml_io};
use crate::structures::analysis_topology::AnalysisTopology;
use crate::structures::particle_system::ParticleSystem;
use crate::structures::positions::Positions;
use crate::structures::thermodynamic_state::ThermodynamicState;
use crate::structures::topology::Topology;

pub mod harmonic;
pub mod lennard_jones;
pub mod lysozyme;

use harmonic::HarmonicOscillator;
use lennard_jones::LennardJonesPair;
use lysozyme::LysozymeImplicit;

/// Reference property that a test system can calculate analytically or numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticalProperty {
    /// Standard binding free energy of the ligand to the receptor (kJ/mol).
    BindingFreeEnergy,
    /// Expectation of the potential energy (kJ/mol).
    PotentialExpectation,
    /// Standard deviation of the potential energy (kJ/mol).
    PotentialStandardDeviation,
}

impl AnalyticalProperty {
    /// All known analytical properties.
    pub const ALL: [AnalyticalProperty; 3] = [
        AnalyticalProperty::BindingFreeEnergy,
        AnalyticalProperty::PotentialExpectation,
        AnalyticalProperty::PotentialStandardDeviation,
    ];

    /// Name of the property in snake case.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticalProperty::BindingFreeEnergy => "binding_free_energy",
            AnalyticalProperty::PotentialExpectation => "potential_expectation",
            AnalyticalProperty::PotentialStandardDeviation => "potential_standard_deviation",
        }
    }
}

impl fmt::Display for AnalyticalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AnalyticalProperty {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalyticalProperty::ALL
            .into_iter()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| ParseNameError::UnknownProperty(s.to_owned()))
    }
}

/// State shared by all test systems: the particle system, positions of the particles,
/// and the topology.
///
/// ## Notes
/// - Positions must contain one entry per particle of the system. Setters reject
/// a mismatch unless the other component is empty, so a test system can be assembled step by step.
/// - The `AnalysisTopology` is constructed on first access and invalidated
/// whenever the topology is replaced or cleared.
#[derive(Debug, Clone, Default)]
pub struct TestSystemBase {
    system: ParticleSystem,
    positions: Positions,
    topology: Topology,
    analysis_topology: OnceCell<AnalysisTopology>,
}

impl TestSystemBase {
    /// Create an empty base: no particles, no forces, no positions, and empty topology.
    pub fn new() -> Self {
        TestSystemBase::default()
    }

    /// Create a base from all its components.
    pub fn from_parts(
        system: ParticleSystem,
        positions: Positions,
        topology: Topology,
    ) -> Result<Self, TestSystemError> {
        let mut base = TestSystemBase::new();
        base.set_system_and_positions(system, positions)?;
        base.set_topology(topology);
        Ok(base)
    }

    #[inline(always)]
    pub fn get_system(&self) -> &ParticleSystem {
        &self.system
    }

    #[inline(always)]
    pub fn get_positions(&self) -> &Positions {
        &self.positions
    }

    #[inline(always)]
    pub fn get_topology(&self) -> &Topology {
        &self.topology
    }

    /// Get the flattened view of the topology.
    pub fn get_analysis_topology(&self) -> &AnalysisTopology {
        self.analysis_topology.get_or_init(|| {
            log::debug!(
                "Building analysis topology for {} atoms.",
                self.topology.get_n_atoms()
            );
            AnalysisTopology::from_topology(&self.topology)
        })
    }

    /// Replace the particle system.
    ///
    /// ## Returns
    /// `TestSystemError::ParticleCountMismatch` if positions are set and their number
    /// does not match the number of particles in `system`. In that case, nothing is changed.
    pub fn set_system(&mut self, system: ParticleSystem) -> Result<(), TestSystemError> {
        if !self.positions.is_empty() {
            check_count(&system, &self.positions)?;
        }

        self.system = system;
        Ok(())
    }

    /// Replace the positions.
    ///
    /// ## Returns
    /// `TestSystemError::ParticleCountMismatch` if the system contains particles and their number
    /// does not match the number of `positions`. In that case, nothing is changed.
    pub fn set_positions(&mut self, positions: Positions) -> Result<(), TestSystemError> {
        if self.system.get_n_particles() != 0 {
            check_count(&self.system, &positions)?;
        }

        self.positions = positions;
        Ok(())
    }

    /// Replace both the particle system and the positions.
    /// The number of positions must match the number of particles.
    pub fn set_system_and_positions(
        &mut self,
        system: ParticleSystem,
        positions: Positions,
    ) -> Result<(), TestSystemError> {
        check_count(&system, &positions)?;

        self.system = system;
        self.positions = positions;
        Ok(())
    }

    /// Replace the topology. Invalidates the analysis topology.
    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = topology;
        self.analysis_topology = OnceCell::new();
    }

    /// Reset the particle system to an empty system.
    pub fn clear_system(&mut self) {
        self.system = ParticleSystem::default();
    }

    /// Remove all positions.
    pub fn clear_positions(&mut self) {
        self.positions = Positions::default();
    }

    /// Reset the topology to an empty topology. Invalidates the analysis topology.
    pub fn clear_topology(&mut self) {
        self.set_topology(Topology::default());
    }
}

fn check_count(system: &ParticleSystem, positions: &Positions) -> Result<(), TestSystemError> {
    if system.get_n_particles() != positions.get_n_particles() {
        return Err(TestSystemError::ParticleCountMismatch {
            system: system.get_n_particles(),
            positions: positions.get_n_particles(),
        });
    }

    Ok(())
}

/// Common interface of all test systems.
///
/// Implementors provide access to their `TestSystemBase`, declare which analytical
/// properties they can calculate, and calculate them in `compute_property`.
///
/// ## Example
/// ```
/// # use testsys_rs::prelude::*;
/// #
/// let pair = LennardJonesPair::default();
/// assert_eq!(pair.name(), "LennardJonesPair");
/// assert_eq!(pair.get_system().get_n_particles(), 2);
/// assert!(pair.has_property(AnalyticalProperty::BindingFreeEnergy));
///
/// let state = ThermodynamicState::new(300.0).unwrap();
/// let dg = pair
///     .compute_property(AnalyticalProperty::BindingFreeEnergy, &state)
///     .unwrap();
/// assert!(dg < 0.0);
/// ```
pub trait TestSystem {
    /// Identifier of the test system type.
    fn name(&self) -> &'static str;

    fn base(&self) -> &TestSystemBase;

    fn base_mut(&mut self) -> &mut TestSystemBase;

    /// Analytical properties this test system can calculate.
    fn analytical_properties(&self) -> &'static [AnalyticalProperty];

    /// Calculate the given analytical property at the given thermodynamic state.
    ///
    /// ## Returns
    /// `TestSystemError::PropertyNotAvailable` if the property is not declared by the test system.
    fn compute_property(
        &self,
        property: AnalyticalProperty,
        _state: &ThermodynamicState,
    ) -> Result<f64, TestSystemError> {
        Err(self.property_not_available(property))
    }

    /// Construct the error returned for properties the test system can not calculate.
    fn property_not_available(&self, property: AnalyticalProperty) -> TestSystemError {
        TestSystemError::PropertyNotAvailable {
            system: self.name().to_owned(),
            property,
        }
    }

    /// Returns `true` if the test system declares the given analytical property.
    fn has_property(&self, property: AnalyticalProperty) -> bool {
        self.analytical_properties().contains(&property)
    }

    fn get_system(&self) -> &ParticleSystem {
        self.base().get_system()
    }

    fn get_positions(&self) -> &Positions {
        self.base().get_positions()
    }

    fn get_topology(&self) -> &Topology {
        self.base().get_topology()
    }

    fn get_analysis_topology(&self) -> &AnalysisTopology {
        self.base().get_analysis_topology()
    }

    fn set_system(&mut self, system: ParticleSystem) -> Result<(), TestSystemError> {
        self.base_mut().set_system(system)
    }

    fn set_positions(&mut self, positions: Positions) -> Result<(), TestSystemError> {
        self.base_mut().set_positions(positions)
    }

    fn set_topology(&mut self, topology: Topology) {
        self.base_mut().set_topology(topology)
    }

    fn clear_system(&mut self) {
        self.base_mut().clear_system()
    }

    fn clear_positions(&mut self) {
        self.base_mut().clear_positions()
    }

    fn clear_topology(&mut self) {
        self.base_mut().clear_topology()
    }

    /// Calculate the expected potential energy at `state_sampled_from`
    /// in units of kT of `state_evaluated_in`.
    ///
    /// ## Returns
    /// `TestSystemError::MissingPotentialExpectation` if the test system
    /// does not provide the potential expectation.
    fn reduced_potential_expectation(
        &self,
        state_sampled_from: &ThermodynamicState,
        state_evaluated_in: &ThermodynamicState,
    ) -> Result<f64, TestSystemError> {
        if !self.has_property(AnalyticalProperty::PotentialExpectation) {
            return Err(TestSystemError::MissingPotentialExpectation(
                self.name().to_owned(),
            ));
        }

        let potential =
            self.compute_property(AnalyticalProperty::PotentialExpectation, state_sampled_from)?;
        Ok(potential * state_evaluated_in.get_beta())
    }

    /// Serialize the particle system and the current state (positions) into yaml.
    ///
    /// ## Returns
    /// Tuple of serialized particle system and serialized state.
    /// The state is `None` if the system contains no particles.
    fn serialize(&self) -> Result<(String, Option<String>), TestSystemError> {
        let system = self.get_system();
        let system_yaml = serde_yaml::to_string(system)?;

        if system.get_n_particles() == 0 {
            return Ok((system_yaml, None));
        }

        let mut context = Context::new(system, VerletIntegrator::default(), Platform::Reference);
        context.set_positions(self.get_positions())?;
        let state = context.get_state(true, false)?;
        drop(context);

        Ok((system_yaml, Some(serde_yaml::to_string(&state)?)))
    }

    /// Write topology and positions of the test system into a pdb file.
    fn write_pdb(&self, filename: &Path) -> Result<(), WritePdbError> {
        pdb_io::write_pdb(filename, self.name(), self.get_topology(), self.get_positions())
    }

    /// Write the test system into a file. The format is chosen based on the file extension:
    /// `pdb` writes the structure, `yaml`/`yml` writes the serialized system and state.
    fn export(&self, filename: &Path) -> Result<(), ExportError> {
        match FileType::from_name(filename) {
            FileType::PDB => self.write_pdb(filename)?,
            FileType::YAML => {
                let (system, state) = self.serialize()?;
                let mut documents = vec![system.as_str()];
                if let Some(state) = state.as_deref() {
                    documents.push(state);
                }
                yaml_io::write_yaml_documents(filename, &documents)?;
            }
            FileType::Unknown => return Err(ExportError::UnsupportedFileType(Box::from(filename))),
        }

        log::info!("Test system `{}` written into `{}`.", self.name(), filename.display());
        Ok(())
    }
}

/// Catalog of all available test systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestSystemKind {
    LennardJonesPair,
    HarmonicOscillator,
    LysozymeImplicit,
}

impl TestSystemKind {
    /// All available test systems.
    pub const ALL: [TestSystemKind; 3] = [
        TestSystemKind::LennardJonesPair,
        TestSystemKind::HarmonicOscillator,
        TestSystemKind::LysozymeImplicit,
    ];

    /// Identifier of the test system type.
    pub fn name(&self) -> &'static str {
        match self {
            TestSystemKind::LennardJonesPair => LennardJonesPair::NAME,
            TestSystemKind::HarmonicOscillator => HarmonicOscillator::NAME,
            TestSystemKind::LysozymeImplicit => LysozymeImplicit::NAME,
        }
    }

    /// Analytical properties declared by the test system type.
    pub fn analytical_properties(&self) -> &'static [AnalyticalProperty] {
        match self {
            TestSystemKind::LennardJonesPair => LennardJonesPair::PROPERTIES,
            TestSystemKind::HarmonicOscillator => HarmonicOscillator::PROPERTIES,
            TestSystemKind::LysozymeImplicit => LysozymeImplicit::PROPERTIES,
        }
    }

    /// Returns `true` if the test system is constructed from a structure file.
    pub fn requires_structure(&self) -> bool {
        matches!(self, TestSystemKind::LysozymeImplicit)
    }

    /// Returns `true` if the test system can be parameterized using a yaml file.
    pub fn accepts_config(&self) -> bool {
        matches!(
            self,
            TestSystemKind::LennardJonesPair | TestSystemKind::HarmonicOscillator
        )
    }

    /// Map of names of all test systems to their analytical properties.
    pub fn catalog() -> IndexMap<&'static str, &'static [AnalyticalProperty]> {
        TestSystemKind::ALL
            .iter()
            .map(|kind| (kind.name(), kind.analytical_properties()))
            .collect()
    }
}

impl fmt::Display for TestSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TestSystemKind {
    type Err = ParseNameError;

    /// Parse the name of a test system. Matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestSystemKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::UnknownTestSystem(s.to_owned()))
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
