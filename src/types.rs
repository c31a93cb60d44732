//! Type aliases and common types.

use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};

use crate::constants::WATER_DEPTH;
use crate::error::Error;

/// 3-dimensional vector over the seabed parameter space (rho, c, delta).
pub type Vector3 = SVector<f64, 3>;

/// 3x3 covariance matrix over the seabed parameter space.
pub type Matrix3 = SMatrix<f64, 3, 3>;

/// Axis identifier for the three inferred seabed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Param {
    /// Seabed/water density ratio (rho).
    DensityRatio,
    /// Seabed/water sound-speed ratio (c).
    SpeedRatio,
    /// Dimensionless seabed attenuation (delta).
    Attenuation,
}

impl Param {
    /// Position of this parameter in a (rho, c, delta) vector.
    pub fn index(self) -> usize {
        match self {
            Self::DensityRatio => 0,
            Self::SpeedRatio => 1,
            Self::Attenuation => 2,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::DensityRatio => "density ratio",
            Self::SpeedRatio => "speed ratio",
            Self::Attenuation => "attenuation",
        }
    }
}

/// Seabed reflection parameters: the quantities geoacoustic inversion
/// estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeabedParams {
    /// Seabed/water density ratio. Must be positive.
    pub density_ratio: f64,
    /// Seabed/water sound-speed ratio. Must be positive.
    pub speed_ratio: f64,
    /// Dimensionless attenuation loss coefficient. Must be non-negative.
    pub attenuation: f64,
}

impl SeabedParams {
    /// Create a validated parameter triple.
    pub fn new(density_ratio: f64, speed_ratio: f64, attenuation: f64) -> Result<Self, Error> {
        let params = Self {
            density_ratio,
            speed_ratio,
            attenuation,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the physical domain constraints.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.density_ratio.is_finite() || self.density_ratio <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "density ratio must be positive, got {}",
                self.density_ratio
            )));
        }
        if !self.speed_ratio.is_finite() || self.speed_ratio <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "speed ratio must be positive, got {}",
                self.speed_ratio
            )));
        }
        if !self.attenuation.is_finite() || self.attenuation < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "attenuation must be non-negative, got {}",
                self.attenuation
            )));
        }
        Ok(())
    }

    /// View as a (rho, c, delta) vector.
    pub fn as_vector(&self) -> Vector3 {
        Vector3::new(self.density_ratio, self.speed_ratio, self.attenuation)
    }

    /// Build from a (rho, c, delta) vector, validating the domain.
    pub fn from_vector(theta: &Vector3) -> Result<Self, Error> {
        Self::new(theta[0], theta[1], theta[2])
    }
}

/// Measurement geometry: where the receiver sits and what the source emits.
///
/// These are known exactly for every measurement; only the seabed parameters
/// are inferred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Horizontal source-receiver range, in meters. Must be positive.
    pub range: f64,
    /// Receiver depth, in meters. Must lie strictly inside the water column.
    pub receiver_depth: f64,
    /// Source frequency, in Hz. Must be positive.
    pub frequency: f64,
}

impl Geometry {
    /// Create a validated geometry for the reference channel.
    pub fn new(range: f64, receiver_depth: f64, frequency: f64) -> Result<Self, Error> {
        let geometry = Self {
            range,
            receiver_depth,
            frequency,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the geometry against the reference channel dimensions.
    ///
    /// Receiver depths of exactly 0 m (the pressure-release surface, where
    /// the coherent field vanishes) or exactly the water depth (the seabed)
    /// are rejected along with anything outside the column.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.range.is_finite() || self.range <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "range must be positive, got {}",
                self.range
            )));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        if !self.receiver_depth.is_finite()
            || self.receiver_depth <= 0.0
            || self.receiver_depth >= WATER_DEPTH
        {
            return Err(Error::InvalidParameter(format!(
                "receiver depth must lie strictly inside (0, {WATER_DEPTH}) m, got {}",
                self.receiver_depth
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seabed_params_accepts_valid_triple() {
        let params = SeabedParams::new(1.5, 1.2, 0.001).unwrap();
        assert_eq!(params.as_vector(), Vector3::new(1.5, 1.2, 0.001));
    }

    #[test]
    fn seabed_params_rejects_out_of_domain() {
        assert!(SeabedParams::new(0.0, 1.2, 0.001).is_err());
        assert!(SeabedParams::new(-1.0, 1.2, 0.001).is_err());
        assert!(SeabedParams::new(1.5, 0.0, 0.001).is_err());
        assert!(SeabedParams::new(1.5, 1.2, -1e-6).is_err());
        assert!(SeabedParams::new(f64::NAN, 1.2, 0.001).is_err());
    }

    #[test]
    fn geometry_rejects_boundary_depths() {
        assert!(Geometry::new(100.0, 0.0, 5000.0).is_err());
        assert!(Geometry::new(100.0, WATER_DEPTH, 5000.0).is_err());
        assert!(Geometry::new(100.0, -1.0, 5000.0).is_err());
        assert!(Geometry::new(100.0, WATER_DEPTH + 0.5, 5000.0).is_err());
        assert!(Geometry::new(100.0, 10.0, 5000.0).is_ok());
    }

    #[test]
    fn param_indices_match_vector_order() {
        assert_eq!(Param::DensityRatio.index(), 0);
        assert_eq!(Param::SpeedRatio.index(), 1);
        assert_eq!(Param::Attenuation.index(), 2);
    }
}
