//! Acoustic environment description.

use serde::{Deserialize, Serialize};

use crate::constants::{SOURCE_DEPTH, WATER_DENSITY, WATER_DEPTH, WATER_SOUND_SPEED};
use crate::error::Error;
use crate::types::SeabedParams;

/// Immutable description of an isovelocity underwater channel.
///
/// Built fresh for every forward-model evaluation from the seabed parameters
/// plus the fixed reference assumptions. Never mutated, never retained across
/// calls, so repeated evaluations with different parameters share no state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Water column depth, in meters.
    pub water_depth: f64,
    /// Source depth below the surface, in meters.
    pub source_depth: f64,
    /// Isovelocity sound speed of the column, in m/s.
    pub sound_speed: f64,
    /// Water density, in kg/m^3.
    pub water_density: f64,
    /// Seabed reflection parameters.
    pub seabed: SeabedParams,
}

impl Environment {
    /// The reference channel: 20 m deep, source at 5 m, isovelocity water.
    pub fn reference(seabed: SeabedParams) -> Self {
        Self {
            water_depth: WATER_DEPTH,
            source_depth: SOURCE_DEPTH,
            sound_speed: WATER_SOUND_SPEED,
            water_density: WATER_DENSITY,
            seabed,
        }
    }

    /// Check the channel dimensions and the seabed parameter domain.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.water_depth.is_finite() || self.water_depth <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "water depth must be positive, got {}",
                self.water_depth
            )));
        }
        if !self.source_depth.is_finite()
            || self.source_depth <= 0.0
            || self.source_depth >= self.water_depth
        {
            return Err(Error::InvalidParameter(format!(
                "source depth must lie strictly inside (0, {}) m, got {}",
                self.water_depth, self.source_depth
            )));
        }
        if !self.sound_speed.is_finite() || self.sound_speed <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "sound speed must be positive, got {}",
                self.sound_speed
            )));
        }
        self.seabed.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_environment_is_valid() {
        let seabed = SeabedParams::new(1.5, 1.2, 0.001).unwrap();
        let env = Environment::reference(seabed);
        assert!(env.validate().is_ok());
        assert_eq!(env.water_depth, 20.0);
        assert_eq!(env.source_depth, 5.0);
    }

    #[test]
    fn source_on_boundary_is_rejected() {
        let seabed = SeabedParams::new(1.5, 1.2, 0.001).unwrap();
        let mut env = Environment::reference(seabed);
        env.source_depth = 0.0;
        assert!(env.validate().is_err());
        env.source_depth = env.water_depth;
        assert!(env.validate().is_err());
    }
}
