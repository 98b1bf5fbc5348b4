// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Physical constants and unit conversions.
//!
//! All quantities inside `testsys_rs` use the following units:
//! - length: nm
//! - mass: amu (dalton)
//! - energy: kJ/mol
//! - temperature: K
//! - time: ps
//! - charge: elementary charge
//!
//! Use the conversion functions of this module when your input is in different units,
//! e.g. Lennard-Jones parameters tabulated in Å and kcal/mol.

/// Molar Boltzmann constant in kJ/(mol·K).
pub const BOLTZMANN_CONSTANT: f64 = 0.008_314_462_618;

/// Avogadro constant in 1/mol.
pub const AVOGADRO_CONSTANT: f64 = 6.022_140_76e23;

/// One liter expressed in nm³.
pub const LITER_IN_NM3: f64 = 1.0e24;

/// Coulomb prefactor 1/(4πε₀) in kJ·nm/(mol·e²).
pub const ONE_4PI_EPS0: f64 = 138.935_456;

/// Number of kJ in one kcal.
pub const KCAL_TO_KJ: f64 = 4.184;

/// Number of nm in one Å.
pub const ANGSTROM_TO_NM: f64 = 0.1;

/// Number of ps in one fs.
pub const FEMTOSECOND_TO_PS: f64 = 0.001;

/// Convert length in Å to nm.
#[inline(always)]
pub fn angstrom(value: f64) -> f64 {
    value * ANGSTROM_TO_NM
}

/// Convert length in nm to Å.
#[inline(always)]
pub fn nm_to_angstrom(value: f64) -> f64 {
    value / ANGSTROM_TO_NM
}

/// Convert energy in kcal/mol to kJ/mol.
#[inline(always)]
pub fn kcal_per_mol(value: f64) -> f64 {
    value * KCAL_TO_KJ
}

/// Convert energy in kJ/mol to kcal/mol.
#[inline(always)]
pub fn kj_to_kcal(value: f64) -> f64 {
    value / KCAL_TO_KJ
}

/// Convert force constant in kcal/(mol·Å²) to kJ/(mol·nm²).
#[inline(always)]
pub fn kcal_per_mol_angstrom2(value: f64) -> f64 {
    kcal_per_mol(value) / (ANGSTROM_TO_NM * ANGSTROM_TO_NM)
}

/// Convert time in fs to ps.
#[inline(always)]
pub fn femtosecond(value: f64) -> f64 {
    value * FEMTOSECOND_TO_PS
}

/// Standard-state volume (one molecule per 1/N_A liter, i.e. 1 M) in nm³.
#[inline(always)]
pub fn standard_state_volume() -> f64 {
    LITER_IN_NM3 / AVOGADRO_CONSTANT
}
