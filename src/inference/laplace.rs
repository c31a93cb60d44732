//! Deterministic Gaussian fit at the posterior mode.

use nalgebra::Cholesky;

use crate::config::InferenceConfig;
use crate::constants::PRIOR_BOUNDS;
use crate::error::Error;
use crate::inference::posterior::add_jitter;
use crate::inference::{
    coarse_scan, nelder_mead, prior_widths, GaussianPosterior, InferenceEngine, InferenceOutcome,
};
use crate::model::InversionProblem;
use crate::propagation::PropagationModel;
use crate::types::{Matrix3, Vector3};

/// Relative step, in units of each prior-box width, for the finite-difference
/// Hessian at the mode.
const HESSIAN_STEP: f64 = 1e-4;

/// Laplace approximation: locate the posterior mode with a Nelder-Mead
/// search seeded from a coarse scan of the prior box, then fit a Gaussian
/// whose covariance is the inverse negative Hessian of the log-density at
/// the mode (central finite differences).
///
/// Fully deterministic: no randomness enters the fit, so identical inputs
/// produce identical posteriors.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplaceInference;

impl LaplaceInference {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for LaplaceInference {
    fn fit<M: PropagationModel>(
        &self,
        problem: &InversionProblem<M>,
        config: &InferenceConfig,
    ) -> Result<InferenceOutcome, Error> {
        config.validate()?;

        let (scan_best, scan_density) = coarse_scan(problem, config.init_grid);
        if !scan_density.is_finite() {
            return Err(Error::SolverFailure(
                "no finite log-density anywhere in the prior box".to_string(),
            ));
        }

        let objective = |theta: &Vector3| problem.log_density(theta);
        let search = nelder_mead(
            &objective,
            scan_best,
            config.max_iterations,
            config.tolerance,
        );
        tracing::debug!(
            iterations = search.iterations,
            log_density = search.value,
            converged = search.converged,
            "mode search finished"
        );

        let hessian = central_hessian(&objective, &search.mode);
        let mut diagnostics = Vec::new();
        if !search.converged {
            diagnostics.push(format!(
                "mode search did not reach tolerance within {} iterations",
                config.max_iterations
            ));
        }

        let posterior = match Cholesky::new(add_jitter(-hessian)) {
            Some(chol) => GaussianPosterior::new(search.mode, chol.inverse()),
            None => None,
        };
        let posterior = match posterior {
            Some(p) => p,
            None => {
                // Curvature unusable; fall back to per-axis curvature only.
                diagnostics.push(
                    "Hessian at the mode is not negative definite; using diagonal covariance"
                        .to_string(),
                );
                let fallback = diagonal_fallback(&hessian);
                GaussianPosterior::new(search.mode, fallback).ok_or_else(|| {
                    Error::SolverFailure(
                        "could not form a usable posterior covariance".to_string(),
                    )
                })?
            }
        };

        if diagnostics.is_empty() {
            Ok(InferenceOutcome::Converged(posterior))
        } else {
            let diagnostic = diagnostics.join("; ");
            tracing::warn!(%diagnostic, "returning degraded Laplace posterior");
            Ok(InferenceOutcome::Degraded {
                posterior,
                diagnostic,
            })
        }
    }
}

/// Central-difference Hessian of the log-density at `x`.
///
/// Steps are proportional to the prior-box widths, shortened where needed so
/// every probe stays inside the box.
fn central_hessian<F: Fn(&Vector3) -> f64>(objective: &F, x: &Vector3) -> Matrix3 {
    let widths = prior_widths();
    let mut steps = Vector3::zeros();
    for axis in 0..3 {
        let (lo, hi) = PRIOR_BOUNDS[axis];
        let nominal = (widths[axis] * HESSIAN_STEP).max(1e-12);
        let room = (hi - x[axis]).min(x[axis] - lo).max(1e-12);
        steps[axis] = nominal.min(0.5 * room);
    }

    let f0 = objective(x);
    let mut hessian = Matrix3::zeros();
    for i in 0..3 {
        let mut forward = *x;
        let mut backward = *x;
        forward[i] += steps[i];
        backward[i] -= steps[i];
        hessian[(i, i)] =
            (objective(&forward) - 2.0 * f0 + objective(&backward)) / (steps[i] * steps[i]);
    }
    for i in 0..3 {
        for j in (i + 1)..3 {
            let mut pp = *x;
            let mut pm = *x;
            let mut mp = *x;
            let mut mm = *x;
            pp[i] += steps[i];
            pp[j] += steps[j];
            pm[i] += steps[i];
            pm[j] -= steps[j];
            mp[i] -= steps[i];
            mp[j] += steps[j];
            mm[i] -= steps[i];
            mm[j] -= steps[j];
            let mixed = (objective(&pp) - objective(&pm) - objective(&mp) + objective(&mm))
                / (4.0 * steps[i] * steps[j]);
            hessian[(i, j)] = mixed;
            hessian[(j, i)] = mixed;
        }
    }
    hessian
}

/// Diagonal covariance built from per-axis curvature magnitudes.
fn diagonal_fallback(hessian: &Matrix3) -> Matrix3 {
    let widths = prior_widths();
    let mut covariance = Matrix3::zeros();
    for i in 0..3 {
        let curvature = hessian[(i, i)].abs();
        covariance[(i, i)] = if curvature > 1e-300 {
            1.0 / curvature
        } else {
            // Flat axis: fall back to the prior-box scale.
            widths[i] * widths[i]
        };
    }
    covariance
}
