//! Least squares solver.
//!
//! Solves small problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! We use SVD so that tall and rank-deficient design matrices (e.g. every
//! training month with the same case count) still produce a finite,
//! minimum-norm solution. Nalgebra's `QR::solve` is intended for square
//! systems and would panic for non-square matrices.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }

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

/// Root mean squared error between paired observations and predictions.
pub fn rmse(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != predicted.len() {
        return None;
    }
    let sse: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).powi(2))
        .sum();
    Some((sse / observed.len() as f64).sqrt())
}

/// Coefficient of determination. `None` when undefined (fewer than two
/// observations or zero variance).
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    if observed.len() < 2 || observed.len() != predicted.len() {
        return None;
    }
    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let ss_tot: f64 = observed.iter().map(|o| (o - mean).powi(2)).sum();
    if ss_tot <= 0.0 {
        return None;
    }
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).powi(2))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 3x + 2 with the bias column last, x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-10);
        assert!((beta[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn rank_deficient_system_is_still_finite() {
        let x = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 4.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 3.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        let fitted = 4.0 * beta[0] + beta[1];
        assert!((fitted - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_system_has_no_solution() {
        let x = DMatrix::<f64>::zeros(0, 2);
        let y = DVector::<f64>::zeros(0);
        assert!(solve_least_squares(&x, &y).is_none());
    }

    #[test]
    fn fit_metrics() {
        let obs = [1.0, 2.0, 3.0];
        assert_eq!(rmse(&obs, &obs), Some(0.0));
        assert_eq!(r_squared(&obs, &obs), Some(1.0));
        assert!(r_squared(&[2.0, 2.0], &[2.0, 2.0]).is_none());
        let e = rmse(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((e - 12.5_f64.sqrt()).abs() < 1e-12);
    }
}
