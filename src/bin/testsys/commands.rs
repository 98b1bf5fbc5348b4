// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

use std::path::Path;

use thiserror::Error;

use testsys_rs::errors::{ExportError, ParseConfigError, TestSystemError, ThermodynamicStateError};
use testsys_rs::io::yaml_io;
use testsys_rs::prelude::*;

use crate::cli::{Command, ComputeArgs, ExportArgs, SerializeArgs, SystemArgs};
use crate::display;

/// Errors that can occur when running a `testsys` command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Test system `{0}` is constructed from a structure; provide it using `--structure`.")]
    MissingStructure(&'static str),
    #[error("Test system `{0}` has no state to serialize.")]
    NoState(&'static str),
    #[error(transparent)]
    TestSystem(#[from] TestSystemError),
    #[error(transparent)]
    Config(#[from] ParseConfigError),
    #[error(transparent)]
    ThermodynamicState(#[from] ThermodynamicStateError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::List => {
            display::print_catalog(&TestSystemKind::catalog());
            Ok(())
        }
        Command::Info(args) => run_info(&args),
        Command::Compute(args) => run_compute(&args),
        Command::Serialize(args) => run_serialize(&args),
        Command::Export(args) => run_export(&args),
    }
}

/// Construct the selected test system.
fn build_system(args: &SystemArgs) -> Result<Box<dyn TestSystem>, CliError> {
    let kind = args.system;

    if args.structure.is_some() && !kind.requires_structure() {
        log::warn!("Test system `{}` does not use a structure; `--structure` is ignored.", kind);
    }

    if args.config.is_some() && !kind.accepts_config() {
        log::warn!("Test system `{}` takes no parameters; `--config` is ignored.", kind);
    }

    let system: Box<dyn TestSystem> = match kind {
        TestSystemKind::LennardJonesPair => {
            let parameters = match &args.config {
                Some(file) => LennardJonesParameters::from_file(file)?,
                None => LennardJonesParameters::default(),
            };
            Box::new(LennardJonesPair::new(parameters)?)
        }
        TestSystemKind::HarmonicOscillator => {
            let parameters = match &args.config {
                Some(file) => HarmonicOscillatorParameters::from_file(file)?,
                None => HarmonicOscillatorParameters::default(),
            };
            Box::new(HarmonicOscillator::new(parameters)?)
        }
        TestSystemKind::LysozymeImplicit => {
            let structure = args
                .structure
                .as_ref()
                .ok_or(CliError::MissingStructure(kind.name()))?;
            Box::new(LysozymeImplicit::from_file(structure)?)
        }
    };

    Ok(system)
}

fn run_info(args: &SystemArgs) -> Result<(), CliError> {
    let kind = args.system;

    // structure-based systems can still be described without a structure
    let system = if kind.requires_structure() && args.structure.is_none() {
        None
    } else {
        Some(build_system(args)?)
    };

    display::print_info(kind, system.as_deref());
    Ok(())
}

fn run_compute(args: &ComputeArgs) -> Result<(), CliError> {
    let system = build_system(&args.system)?;
    let state = ThermodynamicState::new(args.temperature)?;

    let value = system.compute_property(args.property, &state)?;
    display::print_property(system.name(), args.property, &state, value);

    if let Some(sampled) = args.sampled_temperature {
        let sampled = ThermodynamicState::new(sampled)?;
        let reduced = system.reduced_potential_expectation(&sampled, &state)?;
        display::print_reduced_potential(system.name(), &sampled, &state, reduced);
    }

    Ok(())
}

fn run_serialize(args: &SerializeArgs) -> Result<(), CliError> {
    let system = build_system(&args.system)?;
    let (system_yaml, state_yaml) = system.serialize()?;

    write_document(&args.system_output, &system_yaml)?;

    if let Some(file) = &args.state_output {
        let state_yaml = state_yaml.ok_or(CliError::NoState(system.name()))?;
        write_document(file, &state_yaml)?;
    }

    Ok(())
}

fn write_document(file: &Path, document: &str) -> Result<(), CliError> {
    yaml_io::write_yaml_documents(file, &[document])?;
    log::info!("Serialized document written into `{}`.", file.display());
    Ok(())
}

fn run_export(args: &ExportArgs) -> Result<(), CliError> {
    let system = build_system(&args.system)?;
    system.export(&args.output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn system_args(system: TestSystemKind) -> SystemArgs {
        SystemArgs {
            system,
            structure: None,
            config: None,
        }
    }

    #[test]
    fn build_default_systems() {
        let pair = build_system(&system_args(TestSystemKind::LennardJonesPair)).unwrap();
        assert_eq!(pair.name(), "LennardJonesPair");
        assert_eq!(pair.get_system().get_n_particles(), 2);

        let oscillator = build_system(&system_args(TestSystemKind::HarmonicOscillator)).unwrap();
        assert_eq!(oscillator.name(), "HarmonicOscillator");
        assert_eq!(oscillator.get_system().get_n_particles(), 1);
    }

    #[test]
    fn build_with_config() {
        let mut args = system_args(TestSystemKind::LennardJonesPair);
        args.config = Some(PathBuf::from("test_files/lj_params.yaml"));

        let pair = build_system(&args).unwrap();
        assert_approx_eq!(f64, pair.get_system().get_particle_mass(0).unwrap(), 20.18);
    }

    #[test]
    fn build_lysozyme_without_structure() {
        match build_system(&system_args(TestSystemKind::LysozymeImplicit)) {
            Err(CliError::MissingStructure(name)) => assert_eq!(name, "LysozymeImplicit"),
            Err(e) => panic!("Incorrect error `{}` was returned.", e),
            Ok(_) => panic!("Construction should have failed."),
        }
    }

    #[test]
    fn build_lysozyme() {
        let mut args = system_args(TestSystemKind::LysozymeImplicit);
        args.structure = Some(PathBuf::from("test_files/lysozyme_fragment.pdb"));

        let lysozyme = build_system(&args).unwrap();
        assert_eq!(lysozyme.get_system().get_n_particles(), 17);
    }

    #[test]
    fn compute_unavailable_property() {
        let args = ComputeArgs {
            system: system_args(TestSystemKind::HarmonicOscillator),
            property: AnalyticalProperty::BindingFreeEnergy,
            temperature: 300.0,
            sampled_temperature: None,
        };

        assert!(matches!(
            run_compute(&args),
            Err(CliError::TestSystem(TestSystemError::PropertyNotAvailable { .. }))
        ));
    }

    #[test]
    fn compute_invalid_temperature() {
        let args = ComputeArgs {
            system: system_args(TestSystemKind::LennardJonesPair),
            property: AnalyticalProperty::BindingFreeEnergy,
            temperature: -10.0,
            sampled_temperature: None,
        };

        assert!(matches!(
            run_compute(&args),
            Err(CliError::ThermodynamicState(
                ThermodynamicStateError::InvalidTemperature(_)
            ))
        ));
    }

    #[test]
    fn serialize_outputs() {
        let system_file = NamedTempFile::new().unwrap();
        let state_file = NamedTempFile::new().unwrap();

        let args = SerializeArgs {
            system: system_args(TestSystemKind::LennardJonesPair),
            system_output: system_file.path().to_path_buf(),
            state_output: Some(state_file.path().to_path_buf()),
        };
        run_serialize(&args).unwrap();

        let written: ParticleSystem =
            serde_yaml::from_str(&std::fs::read_to_string(system_file.path()).unwrap()).unwrap();
        assert_eq!(&written, LennardJonesPair::default().get_system());

        let state = std::fs::read_to_string(state_file.path()).unwrap();
        assert!(state.contains("positions"));
    }
}
