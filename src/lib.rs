// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! # testsys_rs: Molecular Test Systems for Rust
//!
//! Premade molecular test systems with analytically known properties,
//! intended for validating simulation engines and free energy methods.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add testsys_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use testsys_rs::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Binding free energy of a Lennard-Jones pair
//!
//! Construct the default argon-like pair and compute its standard-state binding free energy.
//!
//! ```
//! use testsys_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let pair = LennardJonesPair::default();
//!     let state = ThermodynamicState::new(300.0)?;
//!
//!     // free energy in kJ/mol
//!     let dg = pair.get_binding_free_energy(&state)?;
//!     assert!(dg < 0.0);
//!
//!     // the same quantity is available through the generic capability interface
//!     let generic = pair.compute_property(AnalyticalProperty::BindingFreeEnergy, &state)?;
//!     assert!((dg - generic).abs() < 1e-12);
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Reduced potential of a harmonic oscillator
//!
//! Potential energy sampled at one temperature and evaluated in reduced units of another.
//!
//! ```
//! use testsys_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let oscillator = HarmonicOscillator::default();
//!     let sampled = ThermodynamicState::new(300.0)?;
//!     let evaluated = ThermodynamicState::new(350.0)?;
//!
//!     let reduced = oscillator.reduced_potential_expectation(&sampled, &evaluated)?;
//!     assert!((reduced - 1.5 * 300.0 / 350.0).abs() < 1e-12);
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Evaluating energies through a context
//!
//! A `Context` binds a particle system to a set of positions and evaluates its potential energy.
//! The context borrows the system and is released when it goes out of scope.
//!
//! ```
//! use testsys_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let pair = LennardJonesPair::default();
//!
//!     let mut context = Context::new(
//!         pair.get_system(),
//!         VerletIntegrator::default(),
//!         Platform::Reference,
//!     );
//!     context.set_positions(pair.get_positions())?;
//!
//!     // particles sit in the minimum of the potential
//!     let energy = context.get_potential_energy()?;
//!     let epsilon = pair.get_parameters().get_epsilon();
//!     assert!((energy + epsilon).abs() < 1e-8);
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Writing test systems into files
//!
//! Any test system can be written as a pdb file or serialized into yaml.
//!
//! ```no_run
//! use testsys_rs::prelude::*;
//! use std::error::Error;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let lysozyme = LysozymeImplicit::from_file("lysozyme.pdb")?;
//!
//!     // file format is chosen based on the extension
//!     lysozyme.export(Path::new("lysozyme_out.pdb"))?;
//!     lysozyme.export(Path::new("lysozyme_out.yaml"))?;
//!
//!     // or obtain the serialized documents directly
//!     let (system, state) = lysozyme.serialize()?;
//!     println!("{}", system);
//!     if let Some(state) = state {
//!         println!("{}", state);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Units
//! All quantities use molecular dynamics units: nm, amu, kJ/mol, K, and ps.
//! Helper functions converting from Å and kcal/mol are provided in the [`units`] module.
//!
//! ## Error handling
//! Every fallible operation of `testsys_rs` returns a `Result`.
//! The individual error types are not exported into the `prelude` module.
//!
//! If you want to use a specific error type, include it explicitly from the `errors` module.
//! For instance, to work directly with errors that can occur when constructing test systems, use:
//! ```
//! use testsys_rs::errors::TestSystemError;
//! ```
//!
//! ## Logging
//! `testsys_rs` reports its progress through the `log` facade.
//! No output is produced unless a logger (e.g. `env_logger`) is initialized by the application.
//!
//! ## Features
//! - [x] Lennard-Jones pair with analytical binding free energy
//! - [x] harmonic oscillator with analytical potential energy moments
//! - [x] protein in generalized Born implicit solvent
//! - [x] reading and writing pdb files
//! - [x] yaml serialization of particle systems and states
//! - [x] reference energy evaluation
//! - [ ] periodic systems
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `testsys_rs` library.
pub const TESTSYS_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod context;
pub mod errors;
pub mod files;
pub mod io {
    pub mod pdb_io;
    pub mod yaml_io;
}
pub mod quadrature;
pub mod structures {
    pub mod analysis_topology;
    pub mod element;
    pub mod forces;
    pub mod particle_system;
    pub mod positions;
    pub mod thermodynamic_state;
    pub mod topology;
    pub mod vector3d;
}
mod test_utilities;
pub mod testsystems;
pub mod units;

/// Reexported basic `testsys_rs` structures, traits, and functions.
pub mod prelude {
    pub use crate::context::{Context, Platform, State, VerletIntegrator};
    pub use crate::files::FileType;
    pub use crate::io::pdb_io::{read_pdb, write_pdb, PdbStructure};
    pub use crate::structures::analysis_topology::{AnalysisAtom, AnalysisTopology};
    pub use crate::structures::element::{default_elements, Element, SupportedElements};
    pub use crate::structures::forces::{
        Force, GBSAOBCForce, HarmonicRestraintForce, NonbondedForce, NonbondedMethod,
    };
    pub use crate::structures::particle_system::ParticleSystem;
    pub use crate::structures::positions::Positions;
    pub use crate::structures::thermodynamic_state::ThermodynamicState;
    pub use crate::structures::topology::Topology;
    pub use crate::structures::vector3d::Vector3D;
    pub use crate::testsystems::harmonic::{HarmonicOscillator, HarmonicOscillatorParameters};
    pub use crate::testsystems::lennard_jones::{LennardJonesPair, LennardJonesParameters};
    pub use crate::testsystems::lysozyme::LysozymeImplicit;
    pub use crate::testsystems::{
        AnalyticalProperty, TestSystem, TestSystemBase, TestSystemKind,
    };
}
