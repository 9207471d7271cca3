//! Least squares via SVD.
//!
//! The only regression in this crate is a straight line through `1/C²` vs `V`,
//! but it goes through the same general solver so that rank problems (e.g. all
//! points at one voltage) surface as `None` instead of infinities.

use nalgebra::{DMatrix, DVector};

/// Solve `min ‖X·β − y‖²` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// First-degree polynomial `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares line through `(x, y)`.
///
/// Returns `None` for fewer than two points, mismatched lengths, or when all
/// `x` are equal.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len();
    let x_mean = x.iter().sum::<f64>() / n as f64;
    if x.iter().all(|&v| v == x[0]) {
        return None;
    }

    // Columns: [1, x - mean(x)].
    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { x[row] - x_mean });
    let rhs = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &rhs)?;

    let slope = beta[1];
    let intercept = beta[0] - slope * x_mean;
    (slope.is_finite() && intercept.is_finite()).then_some(LineFit { slope, intercept })
}
