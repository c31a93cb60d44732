//! Posterior approximation engines.
//!
//! Engines consume an [`InversionProblem`](crate::InversionProblem)'s
//! log-density and return a queryable [`GaussianPosterior`]. Two engines are
//! provided: a deterministic Laplace fit at the posterior mode and a seeded
//! random-walk Metropolis sampler. Both are derivative-free; they only ever
//! evaluate the log-density.
//!
//! Nonconvergence is not a hard failure. When an engine produces a usable
//! posterior but its diagnostics are unhealthy, it returns
//! [`InferenceOutcome::Degraded`] carrying the best available result, and
//! logs a warning. An `Err` means no usable output at all.

mod laplace;
mod metropolis;
mod posterior;

pub use laplace::LaplaceInference;
pub use metropolis::MetropolisInference;
pub use posterior::GaussianPosterior;

use rand::Rng;

use crate::config::InferenceConfig;
use crate::constants::PRIOR_BOUNDS;
use crate::error::Error;
use crate::model::InversionProblem;
use crate::propagation::PropagationModel;
use crate::types::Vector3;

/// A posterior approximation engine.
pub trait InferenceEngine {
    /// Fit an approximate posterior to the problem's log-density.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a configuration that fails validation;
    /// `SolverFailure` when the engine finds no finite log-density to work
    /// with and therefore has no partial result to return.
    fn fit<M: PropagationModel>(
        &self,
        problem: &InversionProblem<M>,
        config: &InferenceConfig,
    ) -> Result<InferenceOutcome, Error>;
}

/// Result of an inference run.
#[derive(Debug, Clone)]
pub enum InferenceOutcome {
    /// The engine converged; the posterior is trustworthy within the
    /// approximation family.
    Converged(GaussianPosterior),

    /// The engine produced a usable posterior but a convergence diagnostic
    /// failed. The posterior is the best available partial result.
    Degraded {
        /// Best available posterior approximation.
        posterior: GaussianPosterior,
        /// What went wrong, for logs and reports.
        diagnostic: String,
    },
}

impl InferenceOutcome {
    /// The fitted posterior, converged or not.
    pub fn posterior(&self) -> &GaussianPosterior {
        match self {
            Self::Converged(posterior) => posterior,
            Self::Degraded { posterior, .. } => posterior,
        }
    }

    /// Consume the outcome, keeping only the posterior.
    pub fn into_posterior(self) -> GaussianPosterior {
        match self {
            Self::Converged(posterior) => posterior,
            Self::Degraded { posterior, .. } => posterior,
        }
    }

    /// Whether the engine reported clean convergence.
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// The degradation diagnostic, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Converged(_) => None,
            Self::Degraded { diagnostic, .. } => Some(diagnostic),
        }
    }
}

/// Sample from the standard normal using the Box-Muller transform.
pub(crate) fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Per-axis widths of the prior box.
pub(crate) fn prior_widths() -> Vector3 {
    Vector3::new(
        PRIOR_BOUNDS[0].1 - PRIOR_BOUNDS[0].0,
        PRIOR_BOUNDS[1].1 - PRIOR_BOUNDS[1].0,
        PRIOR_BOUNDS[2].1 - PRIOR_BOUNDS[2].0,
    )
}

/// Relative step, in units of each prior-box width, used to build the
/// initial simplex around the scan seed.
pub(crate) const SIMPLEX_STEP: f64 = 0.1;

/// Pick the best starting point from a coarse deterministic scan of the
/// prior box.
///
/// The transmission-loss interference pattern can carry side lobes; seeding
/// the mode search from the best cell center of an `resolution^3` grid keeps
/// local search from being trapped in one.
pub(crate) fn coarse_scan<M: PropagationModel>(
    problem: &InversionProblem<M>,
    resolution: usize,
) -> (Vector3, f64) {
    let mut best = Vector3::new(
        0.5 * (PRIOR_BOUNDS[0].0 + PRIOR_BOUNDS[0].1),
        0.5 * (PRIOR_BOUNDS[1].0 + PRIOR_BOUNDS[1].1),
        0.5 * (PRIOR_BOUNDS[2].0 + PRIOR_BOUNDS[2].1),
    );
    let mut best_density = problem.log_density(&best);

    let cell = |axis: usize, i: usize| {
        let (lo, hi) = PRIOR_BOUNDS[axis];
        lo + (i as f64 + 0.5) * (hi - lo) / resolution as f64
    };
    for i in 0..resolution {
        for j in 0..resolution {
            for k in 0..resolution {
                let theta = Vector3::new(cell(0, i), cell(1, j), cell(2, k));
                let density = problem.log_density(&theta);
                if density > best_density {
                    best = theta;
                    best_density = density;
                }
            }
        }
    }
    (best, best_density)
}

/// Result of a mode search.
pub(crate) struct ModeSearch {
    pub(crate) mode: Vector3,
    pub(crate) value: f64,
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
}

/// Derivative-free simplex maximization of the log-density.
///
/// Standard Nelder-Mead with reflection 1, expansion 2, contraction 0.5 and
/// shrink 0.5, run until the spread of vertex values falls below `tolerance`.
/// Vertices that leave the prior box score negative infinity and are culled
/// by the ordinary update rules. Both engines locate the posterior mode this
/// way: the Laplace fit is centered on it, and the Metropolis chain starts
/// from it so the proposal scale only has to cover the local posterior width,
/// not the distance from a scan cell to the mode.
pub(crate) fn nelder_mead<F: Fn(&Vector3) -> f64>(
    objective: &F,
    start: Vector3,
    max_iterations: usize,
    tolerance: f64,
) -> ModeSearch {
    let widths = prior_widths();
    let mut simplex: Vec<Vector3> = vec![start];
    for axis in 0..3 {
        let mut vertex = start;
        let step = SIMPLEX_STEP * widths[axis];
        // Step inward when the seed sits near the upper bound.
        if vertex[axis] + step <= PRIOR_BOUNDS[axis].1 {
            vertex[axis] += step;
        } else {
            vertex[axis] -= step;
        }
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < max_iterations {
        iterations += 1;

        // Best first.
        let mut order: Vec<usize> = (0..4).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        let simplex_sorted: Vec<Vector3> = order.iter().map(|&i| simplex[i]).collect();
        let values_sorted: Vec<f64> = order.iter().map(|&i| values[i]).collect();
        simplex = simplex_sorted;
        values = values_sorted;

        let spread = values[0] - values[3];
        if spread.is_finite() && spread.abs() <= tolerance {
            converged = true;
            break;
        }

        let centroid = (simplex[0] + simplex[1] + simplex[2]) / 3.0;
        let worst = simplex[3];

        let reflected = centroid + (centroid - worst);
        let reflected_value = objective(&reflected);

        if reflected_value > values[0] {
            let expanded = centroid + 2.0 * (centroid - worst);
            let expanded_value = objective(&expanded);
            if expanded_value > reflected_value {
                simplex[3] = expanded;
                values[3] = expanded_value;
            } else {
                simplex[3] = reflected;
                values[3] = reflected_value;
            }
        } else if reflected_value > values[2] {
            simplex[3] = reflected;
            values[3] = reflected_value;
        } else {
            let contracted = centroid + 0.5 * (worst - centroid);
            let contracted_value = objective(&contracted);
            if contracted_value > values[3] {
                simplex[3] = contracted;
                values[3] = contracted_value;
            } else {
                for i in 1..4 {
                    simplex[i] = simplex[0] + 0.5 * (simplex[i] - simplex[0]);
                    values[i] = objective(&simplex[i]);
                }
            }
        }
    }

    let mut best = 0;
    for i in 1..4 {
        if values[i] > values[best] {
            best = i;
        }
    }
    ModeSearch {
        mode: simplex[best],
        value: values[best],
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nelder_mead_finds_a_quadratic_peak() {
        let target = Vector3::new(1.6, 1.1, 0.002);
        let objective = |theta: &Vector3| {
            let d = theta - target;
            -(d[0] * d[0] + 4.0 * d[1] * d[1] + d[2] * d[2] / 1e-6)
        };
        let start = Vector3::new(2.0, 1.5, 0.0015);
        let search = nelder_mead(&objective, start, 2000, 1e-12);
        assert!(search.converged);
        assert!((search.mode[0] - 1.6).abs() < 1e-4);
        assert!((search.mode[1] - 1.1).abs() < 1e-4);
        assert!((search.mode[2] - 0.002).abs() < 1e-5);
    }
}
