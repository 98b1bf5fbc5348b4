// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Error types used by `testsys_rs`.

use std::path::Path;
use thiserror::Error;

use crate::structures::forces::NonbondedMethod;
use crate::testsystems::AnalyticalProperty;

/// Errors that can occur when reading and parsing the element table.
#[derive(Error, Debug)]
pub enum ParseElementError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read file `{0}`.")]
    CouldNotRead(Box<Path>),
    #[error("Could not parse yaml input as elements: {0}")]
    CouldNotParseYaml(serde_yaml::Error),
    #[error("Element `{0}` is missing required field `{1}`.")]
    MissingField(String, &'static str),
    #[error("Element `{0}` has a non-positive or non-finite `{1}` value `{2}`.")]
    InvalidValue(String, &'static str, f64),
    #[error("Symbol `{0}` is used by multiple elements (`{1}` and `{2}`).")]
    DuplicateSymbol(String, String, String),
}

/// Errors that can occur when looking up elements.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ElementError {
    #[error("Element with symbol `{0}` is not supported.")]
    UnknownSymbol(String),
}

/// Errors that can occur when building a topology.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Chain with index `{0}` does not exist.")]
    InvalidChain(usize),
    #[error("Residue with index `{0}` does not exist.")]
    InvalidResidue(usize),
}

/// Errors that can occur when constructing a thermodynamic state.
#[derive(Error, Debug, PartialEq)]
pub enum ThermodynamicStateError {
    #[error("Temperature must be positive and finite, got `{0}` K.")]
    InvalidTemperature(f64),
    #[error("Pressure must be positive and finite, got `{0}` bar.")]
    InvalidPressure(f64),
}

/// Errors that can occur when working with a simulation `Context`.
#[derive(Error, Debug, PartialEq)]
pub enum ContextError {
    #[error("Context expects positions for `{expected}` particles, got `{found}`.")]
    ParticleCountMismatch { expected: usize, found: usize },
    #[error("Positions have not been set for the context.")]
    NoPositions,
    #[error("Nonbonded method `{0:?}` is not supported by the reference platform.")]
    UnsupportedNonbondedMethod(NonbondedMethod),
    #[error("Energy of force `{0}` can not be evaluated by the reference platform.")]
    UnsupportedForce(&'static str),
    #[error("Force refers to particle `{0}` which does not exist in the system.")]
    InvalidParticleIndex(usize),
}

/// Errors that can occur during numerical integration.
#[derive(Error, Debug, PartialEq)]
pub enum QuadratureError {
    #[error("Integration bounds `[{0}, {1}]` are invalid.")]
    InvalidBounds(f64, f64),
    #[error("Integration produced a non-finite value `{0}`.")]
    NonFinite(f64),
    #[error("Integration did not converge within `{0}` iterations.")]
    NotConverged(u32),
}

/// Errors that can occur when parsing names of test systems and analytical properties.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseNameError {
    #[error("Unknown analytical property `{0}`.")]
    UnknownProperty(String),
    #[error("Unknown test system `{0}`.")]
    UnknownTestSystem(String),
}

/// Errors that can occur when working with test systems.
#[derive(Error, Debug)]
pub enum TestSystemError {
    #[error("Cannot return reduced potential energy because system `{0}` lacks get_potential_expectation.")]
    MissingPotentialExpectation(String),
    #[error("Test system `{system}` does not provide analytical property `{property}`.")]
    PropertyNotAvailable {
        system: String,
        property: AnalyticalProperty,
    },
    #[error("Particle system contains `{system}` particles, but `{positions}` positions were provided.")]
    ParticleCountMismatch { system: usize, positions: usize },
    #[error("{0}")]
    Context(#[from] ContextError),
    #[error("{0}")]
    Quadrature(#[from] QuadratureError),
    #[error("{0}")]
    Element(#[from] ElementError),
    #[error("{0}")]
    Topology(#[from] TopologyError),
    #[error("Element `{element}` has no `{parameter}` parameter.")]
    MissingElementParameter {
        element: String,
        parameter: &'static str,
    },
    #[error("{0}")]
    ReadStructure(#[from] ParsePdbError),
    #[error("Could not serialize test system: {0}")]
    CouldNotSerialize(#[from] serde_yaml::Error),
}

/// Errors that can occur when reading and parsing a pdb file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParsePdbError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("File `{0}` ended unexpectedly.")]
    LineNotFound(Box<Path>),
    #[error("Could not parse line `{0}` as atom.")]
    ParseAtomLineErr(String),
    #[error("Could not identify element of atom `{0}`.")]
    UnknownElement(String),
    #[error("File `{0}` contains no atoms.")]
    NoAtoms(Box<Path>),
}

/// Errors that can occur when writing a pdb file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WritePdbError {
    #[error("File `{0}` could not be created.")]
    CouldNotCreate(Box<Path>),
    #[error("Could not write line into file.")]
    CouldNotWrite,
    #[error("Topology contains `{topology}` atoms, but `{positions}` positions are available.")]
    AtomCountMismatch { topology: usize, positions: usize },
}

/// Errors that can occur when reading yaml parameter files or writing serialized output.
#[derive(Error, Debug)]
pub enum ParseConfigError {
    #[error("File `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read file `{0}`.")]
    CouldNotRead(Box<Path>),
    #[error("Could not parse yaml input: {0}")]
    CouldNotParseYaml(serde_yaml::Error),
    #[error("Parameter `{0}` must be positive and finite, got `{1}`.")]
    InvalidParameter(&'static str, f64),
}

/// Errors that can occur when writing output files of a test system.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("File `{0}` has unsupported extension; use `pdb` or `yaml`.")]
    UnsupportedFileType(Box<Path>),
    #[error("File `{0}` could not be created.")]
    CouldNotCreate(Box<Path>),
    #[error("Could not write into file `{0}`.")]
    CouldNotWrite(Box<Path>),
    #[error("{0}")]
    Pdb(#[from] WritePdbError),
    #[error("{0}")]
    TestSystem(#[from] TestSystemError),
}
