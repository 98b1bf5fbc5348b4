// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! One-dimensional adaptive quadrature built on top of `peroxide`'s Gauss and Kronrod rules.

use peroxide::numerical::integral::{gauss_legendre_quadrature, kronrod_quadrature};
use std::cell::Cell;

use crate::errors::QuadratureError;

/// Relative error estimate above which a warning is logged.
const WARN_RELATIVE_ERROR: f64 = 1e-6;

/// Number of Gauss nodes of each panel.
const GAUSS_NODES: usize = 7;
/// Number of Kronrod nodes of each panel.
const KRONROD_NODES: usize = 15;

/// Parameters of the adaptive quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureSettings {
    /// Absolute tolerance of the whole integral. Halved with every subdivision.
    pub tolerance: f64,
    /// Maximal total number of panels that are evaluated.
    pub max_iterations: u32,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        QuadratureSettings {
            tolerance: 1.49e-8,
            max_iterations: 500,
        }
    }
}

/// Result of a numerical integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    pub integral: f64,
    /// Estimate of the absolute error of `integral`.
    pub error_estimate: f64,
    /// Number of panels evaluated.
    pub iterations: u32,
}

/// Integrate `f` over `[lower, upper]`.
///
/// Each panel is evaluated with the 7-point Gauss and the 15-point Kronrod rule.
/// A panel is accepted if the two rules agree within its share of the tolerance,
/// otherwise it is split in half. The error estimate is the sum of the differences
/// over the accepted panels.
///
/// ## Returns
/// `QuadratureError::InvalidBounds` if the bounds are not finite or `lower >= upper`.
/// `QuadratureError::NonFinite` as soon as the integrand returns a non-finite value.
/// `QuadratureError::NotConverged` if `max_iterations` panels were evaluated without convergence.
///
/// ## Example
/// ```
/// # use testsys_rs::quadrature::{integrate, QuadratureSettings};
/// #
/// let result = integrate(|x| x * x, 0.0, 3.0, &QuadratureSettings::default()).unwrap();
/// assert!((result.integral - 9.0).abs() < 1e-10);
/// ```
pub fn integrate<F>(
    f: F,
    lower: f64,
    upper: f64,
    settings: &QuadratureSettings,
) -> Result<QuadratureResult, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(QuadratureError::InvalidBounds(lower, upper));
    }

    // peroxide's rules can not fail, so the first non-finite sample is recorded here
    let invalid: Cell<Option<f64>> = Cell::new(None);
    let guarded = |x: f64| {
        let value = f(x);
        if !value.is_finite() && invalid.get().is_none() {
            invalid.set(Some(value));
        }
        value
    };

    let mut panels = vec![(lower, upper, settings.tolerance)];
    let mut integral = 0.0;
    let mut error_estimate = 0.0;
    let mut iterations = 0u32;

    while let Some((a, b, tolerance)) = panels.pop() {
        if iterations >= settings.max_iterations {
            return Err(QuadratureError::NotConverged(settings.max_iterations));
        }
        iterations += 1;

        let gauss = gauss_legendre_quadrature(&guarded, GAUSS_NODES, (a, b));
        let kronrod = kronrod_quadrature(&guarded, KRONROD_NODES, (a, b));

        if let Some(value) = invalid.get() {
            return Err(QuadratureError::NonFinite(value));
        }

        let difference = (kronrod - gauss).abs();
        if difference <= tolerance {
            integral += kronrod;
            error_estimate += difference;
        } else {
            let center = 0.5 * (a + b);
            panels.push((a, center, 0.5 * tolerance));
            panels.push((center, b, 0.5 * tolerance));
        }
    }

    if !integral.is_finite() {
        return Err(QuadratureError::NonFinite(integral));
    }

    if error_estimate > WARN_RELATIVE_ERROR * integral.abs() {
        log::warn!(
            "Quadrature over [{}, {}] has large error estimate: {:e} (integral {:e}).",
            lower,
            upper,
            error_estimate,
            integral
        );
    }

    log::trace!("Quadrature over [{}, {}] converged after {} panels.", lower, upper, iterations);

    Ok(QuadratureResult {
        integral,
        error_estimate,
        iterations,
    })
}
