// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use testsys_rs::prelude::{AnalyticalProperty, TestSystemKind};

#[derive(Parser)]
#[command(
    name = "testsys",
    about = "Molecular test systems with analytical reference properties",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List available test systems and their analytical properties
    #[command(visible_alias = "ls")]
    List,

    /// Describe a test system
    Info(SystemArgs),

    /// Calculate an analytical property of a test system
    Compute(ComputeArgs),

    /// Serialize particle system and state of a test system into yaml
    Serialize(SerializeArgs),

    /// Write a test system into a pdb or yaml file
    Export(ExportArgs),
}

/// Options selecting and constructing a test system.
#[derive(Args)]
pub struct SystemArgs {
    /// Name of the test system (see `testsys list`)
    #[arg(value_name = "SYSTEM")]
    pub system: TestSystemKind,

    /// Pdb structure for systems constructed from a structure
    #[arg(long, value_name = "FILE")]
    pub structure: Option<PathBuf>,

    /// Yaml file with parameters for parameterized systems
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub system: SystemArgs,

    /// Property to calculate
    #[arg(value_name = "PROPERTY")]
    pub property: AnalyticalProperty,

    /// Temperature of the thermodynamic state (K)
    #[arg(short, long, value_name = "K")]
    pub temperature: f64,

    /// Temperature the potential energy was sampled at (K);
    /// also reports the reduced potential expectation evaluated at --temperature
    #[arg(long = "sampled-temperature", value_name = "K")]
    pub sampled_temperature: Option<f64>,
}

#[derive(Args)]
pub struct SerializeArgs {
    #[command(flatten)]
    pub system: SystemArgs,

    /// Output file for the serialized particle system
    #[arg(long = "system-output", value_name = "FILE")]
    pub system_output: PathBuf,

    /// Output file for the serialized state
    #[arg(long = "state-output", value_name = "FILE")]
    pub state_output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub system: SystemArgs,

    /// Output file (pdb or yaml)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}
