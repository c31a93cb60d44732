//! Random-walk Metropolis sampler.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::InferenceConfig;
use crate::constants::DEFAULT_SEED;
use crate::error::Error;
use crate::inference::{
    coarse_scan, nelder_mead, prior_widths, sample_standard_normal, GaussianPosterior,
    InferenceEngine, InferenceOutcome,
};
use crate::model::InversionProblem;
use crate::propagation::PropagationModel;
use crate::types::{Matrix3, Vector3};

/// Acceptance rates outside this band flag a badly scaled proposal.
const HEALTHY_ACCEPTANCE: (f64, f64) = (0.05, 0.80);

/// Random-walk Metropolis: a seeded chain with independent per-axis Gaussian
/// proposals scaled to the prior box, started from the posterior mode (a
/// Nelder-Mead search seeded by a coarse box scan). Starting at the mode
/// means burn-in only has to equilibrate locally; the proposal scale never
/// has to carry the chain across the box. The retained draws are summarized
/// by their sample moments into a [`GaussianPosterior`].
///
/// Reproducible for a fixed seed; the default seed makes repeated runs on
/// the same data identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetropolisInference;

impl MetropolisInference {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }
}

/// Chain statistics tracked while sampling.
#[derive(Debug, Clone, Default)]
struct ChainStats {
    proposals: usize,
    accepted: usize,
}

impl ChainStats {
    fn acceptance_rate(&self) -> f64 {
        if self.proposals == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposals as f64
        }
    }
}

impl InferenceEngine for MetropolisInference {
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
        let search = nelder_mead(
            &|theta| problem.log_density(theta),
            scan_best,
            config.max_iterations,
            config.tolerance,
        );
        tracing::debug!(
            iterations = search.iterations,
            log_density = search.value,
            converged = search.converged,
            "chain start located"
        );

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
        let step = prior_widths() * config.proposal_scale;

        let mut current = search.mode;
        let mut current_density = search.value;
        let mut stats = ChainStats::default();
        let mut draws: Vec<Vector3> = Vec::with_capacity(config.mc_samples);

        let total = config.burn_in + config.mc_samples * config.thin;
        for i in 0..total {
            let proposal = Vector3::new(
                current[0] + step[0] * sample_standard_normal(&mut rng),
                current[1] + step[1] * sample_standard_normal(&mut rng),
                current[2] + step[2] * sample_standard_normal(&mut rng),
            );
            let proposal_density = problem.log_density(&proposal);
            stats.proposals += 1;
            // Out-of-box proposals score -inf and are always rejected here.
            let log_ratio = proposal_density - current_density;
            if log_ratio >= 0.0 || rng.random::<f64>().ln() < log_ratio {
                current = proposal;
                current_density = proposal_density;
                stats.accepted += 1;
            }
            if i >= config.burn_in && (i - config.burn_in) % config.thin == 0 {
                draws.push(current);
            }
        }

        let acceptance = stats.acceptance_rate();
        tracing::debug!(
            acceptance,
            draws = draws.len(),
            "metropolis chain finished"
        );

        let (mean, covariance) = sample_moments(&draws);
        let mut diagnostics = Vec::new();
        if acceptance < HEALTHY_ACCEPTANCE.0 || acceptance > HEALTHY_ACCEPTANCE.1 {
            diagnostics.push(format!(
                "acceptance rate {acceptance:.3} outside healthy range [{}, {}]; retune proposal_scale",
                HEALTHY_ACCEPTANCE.0, HEALTHY_ACCEPTANCE.1
            ));
        }

        let posterior = match GaussianPosterior::new(mean, covariance) {
            Some(p) => p,
            None => {
                // Chain barely moved; keep the location, inflate the scale.
                diagnostics.push(
                    "sample covariance is degenerate; using diagonal variances".to_string(),
                );
                let diagonal = degenerate_fallback(&covariance);
                GaussianPosterior::new(mean, diagonal).ok_or_else(|| {
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
            tracing::warn!(%diagnostic, "returning degraded Metropolis posterior");
            Ok(InferenceOutcome::Degraded {
                posterior,
                diagnostic,
            })
        }
    }
}

/// Sample mean and covariance of the retained draws.
fn sample_moments(draws: &[Vector3]) -> (Vector3, Matrix3) {
    let n = draws.len() as f64;
    let mean = draws.iter().fold(Vector3::zeros(), |acc, x| acc + x) / n;
    let mut covariance = Matrix3::zeros();
    for draw in draws {
        let centered = draw - mean;
        covariance += &centered * centered.transpose();
    }
    covariance /= (n - 1.0).max(1.0);
    (mean, covariance)
}

/// Replace a degenerate covariance by its diagonal, floored per axis.
fn degenerate_fallback(covariance: &Matrix3) -> Matrix3 {
    let widths = prior_widths();
    let mut diagonal = Matrix3::zeros();
    for i in 0..3 {
        let floor = (widths[i] * 1e-6).powi(2);
        diagonal[(i, i)] = covariance[(i, i)].max(floor);
    }
    diagonal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_of_a_constant_chain_are_degenerate() {
        let draws = vec![Vector3::new(1.5, 1.2, 0.001); 10];
        let (mean, covariance) = sample_moments(&draws);
        assert!((mean - Vector3::new(1.5, 1.2, 0.001)).norm() < 1e-12);
        assert!(covariance.norm() < 1e-24);
    }

    #[test]
    fn degenerate_fallback_is_positive_definite() {
        let diagonal = degenerate_fallback(&Matrix3::zeros());
        for i in 0..3 {
            assert!(diagonal[(i, i)] > 0.0);
        }
    }

    #[test]
    fn acceptance_rate_handles_empty_chain() {
        let stats = ChainStats::default();
        assert_eq!(stats.acceptance_rate(), 0.0);
    }
}
