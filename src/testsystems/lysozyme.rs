// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the lysozyme in implicit solvent test system.

use std::path::Path;

use crate::errors::TestSystemError;
use crate::io::pdb_io;
use crate::structures::element::{default_elements, Element, SupportedElements};
use crate::structures::forces::GBSAOBCForce;
use crate::structures::particle_system::ParticleSystem;
use crate::testsystems::{AnalyticalProperty, TestSystem, TestSystemBase};

/// Protein in OBC generalized Born implicit solvent, constructed from a pdb structure.
///
/// Particle masses, Born radii, and descreening scale factors are assigned from the element table.
/// Partial charges are set to zero.
#[derive(Debug, Clone)]
pub struct LysozymeImplicit {
    base: TestSystemBase,
    title: Option<String>,
}

impl LysozymeImplicit {
    pub const NAME: &'static str = "LysozymeImplicit";
    pub const PROPERTIES: &'static [AnalyticalProperty] = &[];

    /// Construct the test system from a pdb file using the default element table.
    ///
    /// ## Example
    /// ```no_run
    /// # use testsys_rs::prelude::*;
    /// #
    /// let lysozyme = LysozymeImplicit::from_file("lysozyme.pdb").unwrap();
    /// println!("{} atoms", lysozyme.get_system().get_n_particles());
    /// ```
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, TestSystemError> {
        LysozymeImplicit::from_file_with_elements(filename, default_elements())
    }

    /// Construct the test system from a pdb file using a custom element table.
    pub fn from_file_with_elements(
        filename: impl AsRef<Path>,
        elements: &SupportedElements,
    ) -> Result<Self, TestSystemError> {
        let pdb = pdb_io::read_pdb(filename, elements)?;

        let mut system = ParticleSystem::new();
        let mut gbsa = GBSAOBCForce::new();
        for atom in pdb.topology.atoms_iter() {
            // elements are always assigned by the pdb reader
            let element = atom.get_element().ok_or_else(|| TestSystemError::MissingElementParameter {
                element: atom.get_name().to_owned(),
                parameter: "symbol",
            })?;

            system.add_particle(element.get_mass());
            gbsa.add_particle(
                0.0,
                required(element, element.get_gb_radius(), "gb_radius")?,
                required(element, element.get_gb_scale(), "gb_scale")?,
            );
        }
        system.add_force(gbsa);

        let mut base = TestSystemBase::new();
        base.set_system_and_positions(system, pdb.positions)?;
        base.set_topology(pdb.topology);

        log::debug!(
            "Constructed {} with {} particles.",
            Self::NAME,
            base.get_system().get_n_particles()
        );

        Ok(LysozymeImplicit {
            base,
            title: pdb.title,
        })
    }

    /// Title of the pdb file the system was constructed from.
    #[inline(always)]
    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

fn required(
    element: &Element,
    value: Option<f64>,
    parameter: &'static str,
) -> Result<f64, TestSystemError> {
    value.ok_or_else(|| TestSystemError::MissingElementParameter {
        element: element.get_name().to_owned(),
        parameter,
    })
}

impl TestSystem for LysozymeImplicit {
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
}

/******************************/
/*         UNIT TESTS         */
/******************************/
