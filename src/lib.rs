//! # seabed-oracle
//!
//! Bayesian geoacoustic inversion: recover seabed material parameters from
//! acoustic transmission-loss measurements.
//!
//! This crate bundles the three pieces of a classic inversion experiment:
//! - a forward model ([`PekerisRayModel`]) computing coherent transmission
//!   loss in a fixed isovelocity channel whose seabed reflection is
//!   parametrized by a density ratio, a sound-speed ratio, and an
//!   attenuation coefficient;
//! - a probabilistic model ([`InversionProblem`]) with uniform priors over
//!   those three parameters and an independent Gaussian likelihood around
//!   the forward predictions;
//! - inference engines ([`LaplaceInference`], [`MetropolisInference`]) that
//!   turn the log-density into a queryable [`GaussianPosterior`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use seabed_oracle::{
//!     Dataset, InferenceConfig, InferenceEngine, InversionProblem,
//!     LaplaceInference, PekerisRayModel, SeabedParams,
//! };
//!
//! // Synthetic measurements over a depth x frequency grid.
//! let truth = SeabedParams::new(1.5, 1.2, 0.001)?;
//! let depths: Vec<f64> = (10..=19).map(f64::from).collect();
//! let frequencies: Vec<f64> = (0..=20).map(|i| 5000.0 + 100.0 * f64::from(i)).collect();
//! let model = PekerisRayModel::default();
//! let dataset = Dataset::synthesize(&model, 100.0, &depths, &frequencies, &truth)?;
//!
//! // Invert.
//! let problem = InversionProblem::new(model, dataset)?;
//! let outcome = LaplaceInference::new().fit(&problem, &InferenceConfig::default())?;
//! println!("posterior mean: {}", outcome.posterior().mean());
//! ```
//!
//! Both the forward model and the log-density are pure functions: no hidden
//! configuration, no retained state, so substituted inference engines may
//! evaluate them from vectorized batches or concurrent workers without
//! synchronization.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod environment;
mod error;
mod types;

// Functional modules
pub mod dataset;
pub mod inference;
pub mod model;
pub mod output;
pub mod propagation;

// Re-exports for public API
pub use config::InferenceConfig;
pub use constants::{
    DEFAULT_RAY_PATHS, DEFAULT_SEED, DELTA_BOUNDS, LOG_2PI, NOISE_SIGMA, PRIOR_BOUNDS, RHO_BOUNDS,
    SOURCE_DEPTH, SPEED_BOUNDS, WATER_DENSITY, WATER_DEPTH, WATER_SOUND_SPEED,
};
pub use dataset::{Dataset, Measurement};
pub use environment::Environment;
pub use error::Error;
pub use inference::{
    GaussianPosterior, InferenceEngine, InferenceOutcome, LaplaceInference, MetropolisInference,
};
pub use model::{in_prior_box, log_prior, InversionProblem};
pub use propagation::{transmission_loss, PekerisRayModel, PropagationModel};
pub use types::{Geometry, Matrix3, Param, SeabedParams, Vector3};
