//! The inversion problem: joint density over the seabed parameters.

use crate::constants::{LOG_2PI, NOISE_SIGMA, PRIOR_BOUNDS};
use crate::dataset::Dataset;
use crate::environment::Environment;
use crate::error::Error;
use crate::propagation::{PekerisRayModel, PropagationModel};
use crate::types::{Geometry, SeabedParams, Vector3};

/// Whether a parameter vector lies inside the uniform prior box.
pub fn in_prior_box(theta: &Vector3) -> bool {
    PRIOR_BOUNDS
        .iter()
        .enumerate()
        .all(|(i, &(lo, hi))| (lo..=hi).contains(&theta[i]))
}

/// Log of the uniform prior density; negative infinity outside the box.
pub fn log_prior(theta: &Vector3) -> f64 {
    if !in_prior_box(theta) {
        return f64::NEG_INFINITY;
    }
    -PRIOR_BOUNDS
        .iter()
        .map(|&(lo, hi)| (hi - lo).ln())
        .sum::<f64>()
}

/// Joint probability density over (rho, c, delta) given a transmission-loss
/// dataset.
///
/// The prior is uniform over the box rho in [1.0, 3.0], c in [0.5, 2.5],
/// delta in [0.0, 0.003]. The likelihood treats observations as independent
/// Gaussians centered on the forward-model predictions with a fixed noise
/// standard deviation.
///
/// The density is a pure function of the parameter vector: no interior
/// mutability, no retained state, so inference engines may evaluate it from
/// many contexts concurrently.
#[derive(Debug, Clone)]
pub struct InversionProblem<M = PekerisRayModel> {
    model: M,
    dataset: Dataset,
    noise_sigma: f64,
}

impl<M: PropagationModel> InversionProblem<M> {
    /// Create an inversion problem over a dataset.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` if the dataset holds no records.
    pub fn new(model: M, dataset: Dataset) -> Result<Self, Error> {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(Self {
            model,
            dataset,
            noise_sigma: NOISE_SIGMA,
        })
    }

    /// Create an inversion problem from parallel observation arrays.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the arrays differ in length, `EmptyDataset` if
    /// they are empty.
    pub fn from_arrays(
        model: M,
        range: f64,
        depths: &[f64],
        frequencies: &[f64],
        losses: &[f64],
    ) -> Result<Self, Error> {
        let dataset = Dataset::from_arrays(range, depths, frequencies, losses)?;
        Self::new(model, dataset)
    }

    /// Override the observation-noise standard deviation, in dB.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `sigma` is not a positive finite number.
    pub fn with_noise_sigma(mut self, sigma: f64) -> Result<Self, Error> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "noise sigma must be positive, got {sigma}"
            )));
        }
        self.noise_sigma = sigma;
        Ok(self)
    }

    /// The observation dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The observation-noise standard deviation, in dB.
    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma
    }

    /// Gaussian log-likelihood of the dataset under the forward model.
    ///
    /// Returns negative infinity when the forward model cannot be evaluated
    /// at `theta` (out-of-domain parameters, or a failure of a substituted
    /// solver), keeping the function total for the inference engines.
    pub fn log_likelihood(&self, theta: &Vector3) -> f64 {
        let seabed = match SeabedParams::from_vector(theta) {
            Ok(s) => s,
            Err(_) => return f64::NEG_INFINITY,
        };
        let env = Environment::reference(seabed);
        let mut quadratic = 0.0;
        for record in self.dataset.records() {
            let geometry =
                match Geometry::new(self.dataset.range(), record.depth, record.frequency) {
                    Ok(g) => g,
                    Err(_) => return f64::NEG_INFINITY,
                };
            let predicted = match self.model.transmission_loss(&env, &geometry) {
                Ok(v) => v,
                Err(_) => return f64::NEG_INFINITY,
            };
            let standardized = (record.transmission_loss - predicted) / self.noise_sigma;
            quadratic += standardized * standardized;
        }
        let n = self.dataset.len() as f64;
        -0.5 * quadratic - n * (self.noise_sigma.ln() + 0.5 * LOG_2PI)
    }

    /// Joint log-density: log-prior plus log-likelihood.
    ///
    /// Negative infinity wherever the prior density is zero.
    pub fn log_density(&self, theta: &Vector3) -> f64 {
        let prior = log_prior(theta);
        if prior == f64::NEG_INFINITY {
            return prior;
        }
        prior + self.log_likelihood(theta)
    }

    /// Forward-model predictions for every record in the dataset.
    ///
    /// # Errors
    ///
    /// Propagates any forward-model failure unchanged.
    pub fn predicted_losses(&self, seabed: &SeabedParams) -> Result<Vec<f64>, Error> {
        let env = Environment::reference(*seabed);
        self.dataset
            .records()
            .iter()
            .map(|record| {
                let geometry =
                    Geometry::new(self.dataset.range(), record.depth, record.frequency)?;
                self.model.transmission_loss(&env, &geometry)
            })
            .collect()
    }
}
