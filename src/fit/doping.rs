//! Mott-Schottky doping estimate.
//!
//! For a depleted junction `1/C²` is linear in bias:
//!
//! ```text
//! 1/C² = k·V + b,    N = -2 / (k · q · ε · ε0)
//! ```
//!
//! With `C` in µF/cm² the slope is in cm⁴/(µF²·V), hence the `1e-12` factor.
//! A rising `1/C²` (falling capacitance) gives a negative `N` under this sign
//! convention.

use log::debug;

use crate::domain::{ELEMENTARY_CHARGE, EPS_INAS, FitResult, VACUUM_PERMITTIVITY};
use crate::error::AppError;
use crate::math::fit_line;

/// µF²/cm⁴ to F²/cm⁴.
const UNIT_SCALE: f64 = 1e-12;

/// Relative slope below which the fitted line is treated as flat.
const FLAT_SLOPE_TOL: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Lower voltage bound (inclusive). Defaults to the smallest voltage.
    pub vmin: Option<f64>,
    /// Upper voltage bound (inclusive). Defaults to the largest voltage.
    pub vmax: Option<f64>,
    /// Relative dielectric constant.
    pub eps: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            vmin: None,
            vmax: None,
            eps: EPS_INAS,
        }
    }
}

/// Doping (cm⁻³) for a fitted `1/C²` slope.
pub fn doping_from_slope(slope: f64, eps: f64) -> f64 {
    -2.0 / (slope * ELEMENTARY_CHARGE * eps * VACUUM_PERMITTIVITY) * UNIT_SCALE
}

/// Fit `1/C²` against voltage inside `[vmin, vmax]` and derive the doping.
///
/// `capacitance` is in µF/cm² and pairs index-wise with `voltage`.
pub fn fit_doping(capacitance: &[f64], voltage: &[f64], opts: &FitOptions) -> Result<FitResult, AppError> {
    if capacitance.len() != voltage.len() {
        return Err(AppError::usage(format!(
            "capacitance ({}) and voltage ({}) lengths differ.",
            capacitance.len(),
            voltage.len()
        )));
    }
    if !(opts.eps.is_finite() && opts.eps > 0.0) {
        return Err(AppError::usage(format!("dielectric constant must be positive, got {}.", opts.eps)));
    }
    if voltage.is_empty() {
        return Err(AppError::degenerate_fit("No samples to fit."));
    }

    let inv_c2: Vec<f64> = capacitance.iter().map(|c| 1.0 / (c * c)).collect();
    if let Some(idx) = inv_c2.iter().position(|v| !v.is_finite()) {
        return Err(AppError::degenerate_fit(format!(
            "1/C² is not finite at sample {idx} (C = {}).",
            capacitance[idx]
        )));
    }

    let vmin = opts.vmin.unwrap_or_else(|| voltage.iter().copied().fold(f64::INFINITY, f64::min));
    let vmax = opts.vmax.unwrap_or_else(|| voltage.iter().copied().fold(f64::NEG_INFINITY, f64::max));

    let (x, y): (Vec<f64>, Vec<f64>) = voltage
        .iter()
        .zip(&inv_c2)
        .filter(|(v, _)| **v >= vmin && **v <= vmax)
        .map(|(v, y)| (*v, *y))
        .unzip();

    if x.len() < 2 {
        return Err(AppError::degenerate_fit(format!(
            "Fit window [{vmin}, {vmax}] V holds {} samples; need at least 2.",
            x.len()
        )));
    }

    let line = fit_line(&x, &y).ok_or_else(|| {
        AppError::degenerate_fit(format!(
            "Cannot fit a line in [{vmin}, {vmax}] V: all samples share one voltage."
        ))
    })?;

    let x_span = x.iter().copied().fold(f64::NEG_INFINITY, f64::max) - x.iter().copied().fold(f64::INFINITY, f64::min);
    let y_scale = y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if line.slope == 0.0 || (line.slope * x_span).abs() <= FLAT_SLOPE_TOL * y_scale {
        return Err(AppError::degenerate_fit("Fitted 1/C² slope is zero; doping is undefined."));
    }

    let doping = doping_from_slope(line.slope, opts.eps);

    // Display points: x-intercept and a rounded-up 1/C² taken over all samples.
    let y_max = inv_c2.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let k_round = 10f64.powf(y_max.log10().round_ties_even());
    let upper = k_round * (y_max / k_round).ceil();
    let volt_fit = [-line.intercept / line.slope, (upper - line.intercept) / line.slope];
    let cap_fit = [line.eval(volt_fit[0]), line.eval(volt_fit[1])];

    debug!(
        "fit over {} samples in [{vmin}, {vmax}] V: slope={} intercept={} doping={doping:e}",
        x.len(),
        line.slope,
        line.intercept
    );

    Ok(FitResult {
        cap_fit,
        volt_fit,
        doping,
        slope: line.slope,
        intercept: line.intercept,
        n_points: x.len(),
    })
}
