//! Range-independent acoustic propagation modeling.
//!
//! The [`PropagationModel`] trait is the seam between the inversion machinery
//! and the forward solver: any range-independent transmission-loss model can
//! be substituted. The provided [`PekerisRayModel`] is a bounded-order
//! image-source summation for the isovelocity reference channel, with seabed
//! reflection described by the Rayleigh fluid-fluid coefficient.

mod pekeris;
mod reflection;

pub use pekeris::PekerisRayModel;
pub use reflection::rayleigh_reflection;

use crate::environment::Environment;
use crate::error::Error;
use crate::types::{Geometry, SeabedParams};

/// A range-independent transmission-loss solver.
///
/// Implementations must be pure: repeated calls with identical inputs return
/// identical results, with no retained state, so inference engines can
/// evaluate the model from many contexts concurrently.
pub trait PropagationModel {
    /// Coherent transmission loss in dB (positive convention = loss) at the
    /// given receiver position and frequency.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for out-of-domain inputs; `SolverFailure` when the
    /// solver produces no finite loss value.
    fn transmission_loss(&self, env: &Environment, geometry: &Geometry) -> Result<f64, Error>;
}

/// Convenience entry point: transmission loss in the reference channel with
/// the default ray model.
///
/// Equivalent to building a reference [`Environment`] from the seabed triple
/// and calling [`PekerisRayModel::default`].
///
/// # Errors
///
/// See [`PropagationModel::transmission_loss`].
pub fn transmission_loss(
    range: f64,
    receiver_depth: f64,
    frequency: f64,
    density_ratio: f64,
    speed_ratio: f64,
    attenuation: f64,
) -> Result<f64, Error> {
    let seabed = SeabedParams::new(density_ratio, speed_ratio, attenuation)?;
    let geometry = Geometry::new(range, receiver_depth, frequency)?;
    PekerisRayModel::default().transmission_loss(&Environment::reference(seabed), &geometry)
}
