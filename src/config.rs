//! Configuration for the inference engines.

use crate::error::Error;

/// Tunables shared by the inference engines.
///
/// All values are opaque knobs, not part of the inversion contract: changing
/// them trades accuracy against compute but never changes what is being
/// estimated.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    // =========================================================================
    // Mode search (centers the Laplace fit, starts the Metropolis chain)
    // =========================================================================
    /// Maximum Nelder-Mead iterations for the mode search. Default: 2000.
    pub max_iterations: usize,

    /// Convergence tolerance on the spread of simplex log-density values.
    /// Default: 1e-10.
    pub tolerance: f64,

    // =========================================================================
    // Chain sampling (Metropolis engine)
    // =========================================================================
    /// Number of retained posterior draws. Default: 20,000.
    pub mc_samples: usize,

    /// Number of warmup steps discarded before retaining draws.
    /// Default: 2,000.
    pub burn_in: usize,

    /// Keep every `thin`-th draw after burn-in. Default: 1 (keep all).
    pub thin: usize,

    /// Proposal standard deviation per axis, as a fraction of that axis's
    /// prior-box width. Default: 0.02.
    pub proposal_scale: f64,

    // =========================================================================
    // Shared
    // =========================================================================
    /// Resolution per axis of the coarse prior-box scan that seeds the mode
    /// search and the chain. Default: 8.
    pub init_grid: usize,

    /// Random seed. `None` uses the crate's deterministic default seed.
    pub seed: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-10,
            mc_samples: 20_000,
            burn_in: 2_000,
            thin: 1,
            proposal_scale: 0.02,
            init_grid: 8,
            seed: None,
        }
    }
}

impl InferenceConfig {
    /// Create with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum mode-search iterations.
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Set the mode-search convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of retained posterior draws.
    pub fn mc_samples(mut self, n: usize) -> Self {
        self.mc_samples = n;
        self
    }

    /// Set the number of warmup steps.
    pub fn burn_in(mut self, n: usize) -> Self {
        self.burn_in = n;
        self
    }

    /// Set the thinning stride.
    pub fn thin(mut self, thin: usize) -> Self {
        self.thin = thin;
        self
    }

    /// Set the proposal scale as a fraction of the prior-box width.
    pub fn proposal_scale(mut self, scale: f64) -> Self {
        self.proposal_scale = scale;
        self
    }

    /// Set the coarse-scan grid resolution per axis.
    pub fn init_grid(mut self, resolution: usize) -> Self {
        self.init_grid = resolution;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` with the first violated rule.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidConfig(
                "tolerance must be a positive finite number".to_string(),
            ));
        }
        if self.mc_samples < 10 {
            return Err(Error::InvalidConfig(
                "mc_samples must be at least 10".to_string(),
            ));
        }
        if self.thin == 0 {
            return Err(Error::InvalidConfig("thin must be at least 1".to_string()));
        }
        if !self.proposal_scale.is_finite()
            || self.proposal_scale <= 0.0
            || self.proposal_scale > 1.0
        {
            return Err(Error::InvalidConfig(
                "proposal_scale must lie in (0, 1]".to_string(),
            ));
        }
        if self.init_grid == 0 {
            return Err(Error::InvalidConfig(
                "init_grid must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
