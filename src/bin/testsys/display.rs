// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

use std::error::Error;

use colored::Colorize;
use indexmap::IndexMap;
use testsys_rs::prelude::*;

use crate::commands::CliError;

pub fn print_catalog(catalog: &IndexMap<&'static str, &'static [AnalyticalProperty]>) {
    for (name, properties) in catalog {
        println!("{:<20} {}", name.bold(), format_properties(properties));
    }
}

pub fn print_info(kind: TestSystemKind, system: Option<&dyn TestSystem>) {
    println!("{}", kind.name().bold());
    println!(
        "  {:<22} {}",
        "Analytical properties",
        format_properties(kind.analytical_properties())
    );
    println!("  {:<22} {}", "Requires structure", kind.requires_structure());
    println!("  {:<22} {}", "Accepts config", kind.accepts_config());

    let Some(system) = system else {
        return;
    };

    let particles = system.get_system();
    let view = system.get_analysis_topology();
    let forces = particles
        .get_forces()
        .iter()
        .map(|force| force.name())
        .collect::<Vec<_>>()
        .join(", ");

    println!("  {:<22} {}", "Particles", particles.get_n_particles());
    println!("  {:<22} {:.3} amu", "Total mass", particles.get_total_mass());
    println!("  {:<22} {}", "Forces", forces);
    println!("  {:<22} {}", "Chains", view.get_n_chains());
    println!("  {:<22} {}", "Residues", view.get_n_residues());
}

pub fn print_property(
    system: &str,
    property: AnalyticalProperty,
    state: &ThermodynamicState,
    value: f64,
) {
    println!(
        "{} | {} at {} K: {} kJ/mol",
        system,
        property,
        state.get_temperature(),
        format!("{:.6}", value).green()
    );
}

pub fn print_reduced_potential(
    system: &str,
    sampled_from: &ThermodynamicState,
    evaluated_in: &ThermodynamicState,
    value: f64,
) {
    println!(
        "{} | reduced potential expectation sampled at {} K, evaluated at {} K: {} kT",
        system,
        sampled_from.get_temperature(),
        evaluated_in.get_temperature(),
        format!("{:.6}", value).green()
    );
}

pub fn print_error(err: &CliError) {
    let mut message = err.to_string();
    eprintln!("{} {}", "error:".red().bold(), message.red());

    // wrapping errors repeat the message of their source
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if cause_message != message {
            eprintln!("  {} {}", "caused by:".red(), cause_message);
            message = cause_message;
        }
        source = cause.source();
    }
}

fn format_properties(properties: &[AnalyticalProperty]) -> String {
    if properties.is_empty() {
        return "-".to_owned();
    }

    properties
        .iter()
        .map(|property| property.name())
        .collect::<Vec<_>>()
        .join(", ")
}
