// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Implementation of the ThermodynamicState structure.

use serde::{Deserialize, Serialize};

use crate::errors::ThermodynamicStateError;
use crate::units::BOLTZMANN_CONSTANT;

/// Thermodynamic ensemble parameters: temperature and optionally pressure.
///
/// Deserialized states are validated the same way as states created using `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThermodynamicStateEntry")]
pub struct ThermodynamicState {
    /// Temperature in K.
    temperature: f64,
    /// Pressure in bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pressure: Option<f64>,
}

/// Unvalidated thermodynamic state as it appears in a yaml file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ThermodynamicStateEntry {
    temperature: f64,
    #[serde(default)]
    pressure: Option<f64>,
}

impl TryFrom<ThermodynamicStateEntry> for ThermodynamicState {
    type Error = ThermodynamicStateError;

    fn try_from(entry: ThermodynamicStateEntry) -> Result<Self, Self::Error> {
        let state = ThermodynamicState::new(entry.temperature)?;
        match entry.pressure {
            Some(pressure) => state.with_pressure(pressure),
            None => Ok(state),
        }
    }
}

impl ThermodynamicState {
    /// Create a new thermodynamic state at the given temperature (in K).
    ///
    /// ## Returns
    /// `ThermodynamicStateError::InvalidTemperature` if the temperature is not positive and finite.
    ///
    /// ## Example
    /// ```
    /// # use testsys_rs::prelude::*;
    /// #
    /// let state = ThermodynamicState::new(300.0).unwrap();
    /// assert!((state.get_kt() - 2.494338785).abs() < 1e-8);
    ///
    /// assert!(ThermodynamicState::new(-1.0).is_err());
    /// ```
    pub fn new(temperature: f64) -> Result<Self, ThermodynamicStateError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ThermodynamicStateError::InvalidTemperature(temperature));
        }

        Ok(ThermodynamicState {
            temperature,
            pressure: None,
        })
    }

    /// Set pressure of the state (in bar).
    pub fn with_pressure(mut self, pressure: f64) -> Result<Self, ThermodynamicStateError> {
        if !pressure.is_finite() || pressure <= 0.0 {
            return Err(ThermodynamicStateError::InvalidPressure(pressure));
        }

        self.pressure = Some(pressure);
        Ok(self)
    }

    #[inline(always)]
    pub fn get_temperature(&self) -> f64 {
        self.temperature
    }

    #[inline(always)]
    pub fn get_pressure(&self) -> Option<f64> {
        self.pressure
    }

    /// Thermal energy kT in kJ/mol.
    #[inline(always)]
    pub fn get_kt(&self) -> f64 {
        BOLTZMANN_CONSTANT * self.temperature
    }

    /// Inverse thermal energy 1/kT in mol/kJ.
    #[inline(always)]
    pub fn get_beta(&self) -> f64 {
        1.0 / self.get_kt()
    }
}
