//! Queryable Gaussian posterior approximation.

use nalgebra::{Cholesky, Const};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::constants::{DEFAULT_SEED, LOG_2PI};
use crate::inference::sample_standard_normal;
use crate::types::{Matrix3, Param, Vector3};

/// A 3-dimensional Gaussian over (rho, c, delta), the approximation family
/// shared by every provided inference engine.
///
/// This is an untruncated Gaussian fit: its density is not re-normalized to
/// the prior box, so a small amount of mass may fall outside it when the
/// posterior hugs a box edge.
#[derive(Debug, Clone)]
pub struct GaussianPosterior {
    mean: Vector3,
    covariance: Matrix3,
    chol: Cholesky<f64, Const<3>>,
}

impl GaussianPosterior {
    /// Build a posterior from a mean and covariance.
    ///
    /// Returns `None` when the covariance is not positive definite even
    /// after jitter regularization.
    pub fn new(mean: Vector3, covariance: Matrix3) -> Option<Self> {
        let chol = match Cholesky::new(covariance) {
            Some(c) => c,
            None => Cholesky::new(add_jitter(covariance))?,
        };
        Some(Self {
            mean,
            covariance,
            chol,
        })
    }

    /// Posterior mean vector (rho, c, delta).
    pub fn mean(&self) -> Vector3 {
        self.mean
    }

    /// Posterior covariance matrix.
    pub fn covariance(&self) -> Matrix3 {
        self.covariance
    }

    /// Marginal standard deviation along one parameter axis.
    pub fn std_dev(&self, param: Param) -> f64 {
        let i = param.index();
        self.covariance[(i, i)].max(0.0).sqrt()
    }

    /// Log-density at a parameter vector.
    pub fn log_density(&self, theta: &Vector3) -> f64 {
        let centered = theta - self.mean;
        let solved = self.chol.solve(&centered);
        let quadratic = centered.dot(&solved);
        let log_det: f64 = (0..3).map(|i| self.chol.l()[(i, i)].ln()).sum::<f64>() * 2.0;
        -0.5 * (3.0 * LOG_2PI + log_det + quadratic)
    }

    /// Density at (rho, c, delta).
    pub fn density(&self, density_ratio: f64, speed_ratio: f64, attenuation: f64) -> f64 {
        self.log_density(&Vector3::new(density_ratio, speed_ratio, attenuation))
            .exp()
    }

    /// Draw `n` samples, reproducibly for a given seed.
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Vec<Vector3> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or(DEFAULT_SEED));
        let l = self.chol.l();
        (0..n)
            .map(|_| {
                let z = Vector3::new(
                    sample_standard_normal(&mut rng),
                    sample_standard_normal(&mut rng),
                    sample_standard_normal(&mut rng),
                );
                self.mean + &l * z
            })
            .collect()
    }

    /// Conditional density profile along one axis, holding the other two
    /// parameters fixed.
    ///
    /// This is the numeric surface behind the usual marginal plots: evaluate
    /// the density at each grid value of `param` with the remaining two axes
    /// pinned to `fixed` (given in (rho, c, delta) order with `param`'s slot
    /// skipped).
    pub fn density_profile(&self, param: Param, grid: &[f64], fixed: (f64, f64)) -> Vec<f64> {
        grid.iter()
            .map(|&x| {
                let theta = match param {
                    Param::DensityRatio => Vector3::new(x, fixed.0, fixed.1),
                    Param::SpeedRatio => Vector3::new(fixed.0, x, fixed.1),
                    Param::Attenuation => Vector3::new(fixed.0, fixed.1, x),
                };
                self.log_density(&theta).exp()
            })
            .collect()
    }
}

/// Regularize a covariance matrix that is numerically on the edge of
/// positive definiteness.
pub(crate) fn add_jitter(mut covariance: Matrix3) -> Matrix3 {
    let trace: f64 = (0..3).map(|i| covariance[(i, i)]).sum();
    let mean_var = (trace / 3.0).max(0.0);
    let jitter = 1e-12 + mean_var * 1e-9;
    for i in 0..3 {
        covariance[(i, i)] += jitter;
    }
    covariance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_posterior() -> GaussianPosterior {
        let mean = Vector3::new(1.5, 1.2, 0.001);
        let covariance = Matrix3::from_diagonal(&Vector3::new(0.04, 0.01, 1e-8));
        GaussianPosterior::new(mean, covariance).unwrap()
    }

    #[test]
    fn density_peaks_at_the_mean() {
        let posterior = diagonal_posterior();
        let at_mean = posterior.density(1.5, 1.2, 0.001);
        assert!(at_mean > posterior.density(1.6, 1.2, 0.001));
        assert!(at_mean > posterior.density(1.5, 1.25, 0.001));
        assert!(at_mean > posterior.density(1.5, 1.2, 0.0012));
    }

    #[test]
    fn log_density_matches_diagonal_closed_form() {
        let posterior = diagonal_posterior();
        let theta = Vector3::new(1.6, 1.15, 0.0011);
        let variances: [f64; 3] = [0.04, 0.01, 1e-8];
        let means: [f64; 3] = [1.5, 1.2, 0.001];
        let mut expected = 0.0;
        for i in 0..3 {
            let z = (theta[i] - means[i]) / variances[i].sqrt();
            expected += -0.5 * (LOG_2PI + variances[i].ln() + z * z);
        }
        assert!((posterior.log_density(&theta) - expected).abs() < 1e-9);
    }

    #[test]
    fn sampling_is_reproducible_and_unbiased() {
        let posterior = diagonal_posterior();
        let a = posterior.sample(1000, Some(7));
        let b = posterior.sample(1000, Some(7));
        assert_eq!(a, b);

        let mean = a.iter().fold(Vector3::zeros(), |acc, x| acc + x) / 1000.0;
        assert!((mean[0] - 1.5).abs() < 0.03);
        assert!((mean[1] - 1.2).abs() < 0.02);
        assert!((mean[2] - 0.001).abs() < 2e-5);
    }

    #[test]
    fn rejects_indefinite_covariance() {
        let mut covariance = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, 1.0));
        covariance[(2, 2)] = -1.0;
        assert!(GaussianPosterior::new(Vector3::zeros(), covariance).is_none());
    }

    #[test]
    fn profile_follows_the_marginal_shape() {
        let posterior = diagonal_posterior();
        let grid = [1.3, 1.5, 1.7];
        let profile = posterior.density_profile(Param::DensityRatio, &grid, (1.2, 0.001));
        assert!(profile[1] > profile[0]);
        assert!(profile[1] > profile[2]);
    }
}
