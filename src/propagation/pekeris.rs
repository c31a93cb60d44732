//! Bounded-order image-source model for the isovelocity channel.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::constants::DEFAULT_RAY_PATHS;
use crate::environment::Environment;
use crate::error::Error;
use crate::propagation::reflection::rayleigh_reflection;
use crate::propagation::PropagationModel;
use crate::types::Geometry;

/// Coherent transmission-loss model for an isovelocity channel over a fluid
/// seabed, computed by summing a bounded number of image-source ray paths.
///
/// Paths are enumerated in order of increasing boundary interaction: the
/// direct path, then the surface- and bottom-reflected paths, then the
/// two-bounce paths, and so on. The surface reflects with coefficient -1
/// (pressure release); each bottom interaction applies the Rayleigh
/// coefficient at the path's grazing angle. Seven paths reproduce the
/// reference configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PekerisRayModel {
    max_paths: usize,
}

impl Default for PekerisRayModel {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_RAY_PATHS,
        }
    }
}

impl PekerisRayModel {
    /// Create a model summing the first `max_paths` image paths.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `max_paths` is zero.
    pub fn new(max_paths: usize) -> Result<Self, Error> {
        if max_paths == 0 {
            return Err(Error::InvalidParameter(
                "ray path count must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_paths })
    }

    /// Number of image paths included in the summation.
    pub fn max_paths(&self) -> usize {
        self.max_paths
    }

    /// Coherent complex pressure at the receiver, unit source at 1 m.
    fn coherent_pressure(&self, env: &Environment, geometry: &Geometry) -> Complex64 {
        let h = env.water_depth;
        let zs = env.source_depth;
        let zr = geometry.receiver_depth;
        let range = geometry.range;
        let wavenumber = TAU * geometry.frequency / env.sound_speed;

        let mut field = Complex64::new(0.0, 0.0);
        let mut emitted = 0usize;
        let mut order = 0usize;

        // Four image families per reflection order m:
        //   dz = 2mH + (zr - zs)        m surface, m bottom bounces
        //   dz = 2mH + (zr + zs)        m+1 surface, m bottom bounces
        //   dz = 2(m+1)H - zs - zr      m surface, m+1 bottom bounces
        //   dz = 2(m+1)H - zs + zr      m+1 surface, m+1 bottom bounces
        while emitted < self.max_paths {
            let m = order as f64;
            for family in 0..4usize {
                if emitted == self.max_paths {
                    break;
                }
                let (dz, surface_bounces, bottom_bounces) = match family {
                    0 => (2.0 * m * h + (zr - zs), order, order),
                    1 => (2.0 * m * h + (zr + zs), order + 1, order),
                    2 => (2.0 * (m + 1.0) * h - zs - zr, order, order + 1),
                    _ => (2.0 * (m + 1.0) * h - zs + zr, order + 1, order + 1),
                };
                let path_length = range.hypot(dz);
                let mut amplitude = if surface_bounces % 2 == 1 {
                    Complex64::new(-1.0, 0.0)
                } else {
                    Complex64::new(1.0, 0.0)
                };
                if bottom_bounces > 0 {
                    let grazing = dz.abs().atan2(range);
                    amplitude *=
                        rayleigh_reflection(grazing, &env.seabed).powu(bottom_bounces as u32);
                }
                field += amplitude
                    * Complex64::from_polar(1.0 / path_length, wavenumber * path_length);
                emitted += 1;
            }
            order += 1;
        }
        field
    }
}

impl PropagationModel for PekerisRayModel {
    fn transmission_loss(&self, env: &Environment, geometry: &Geometry) -> Result<f64, Error> {
        env.validate()?;
        geometry.validate()?;
        if geometry.receiver_depth >= env.water_depth {
            return Err(Error::InvalidParameter(format!(
                "receiver depth {} m exceeds water depth {} m",
                geometry.receiver_depth, env.water_depth
            )));
        }

        let magnitude = self.coherent_pressure(env, geometry).norm();
        if magnitude <= 0.0 {
            return Err(Error::SolverFailure(
                "coherent field vanished at the receiver".to_string(),
            ));
        }
        let xloss = -20.0 * magnitude.log10();
        if !xloss.is_finite() {
            return Err(Error::SolverFailure(format!(
                "non-finite transmission loss from field magnitude {magnitude}"
            )));
        }
        Ok(xloss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeabedParams;

    fn reference() -> Environment {
        Environment::reference(SeabedParams::new(1.5, 1.2, 0.001).unwrap())
    }

    #[test]
    fn rejects_zero_paths() {
        assert!(PekerisRayModel::new(0).is_err());
        assert_eq!(PekerisRayModel::default().max_paths(), 7);
    }

    #[test]
    fn loss_is_bounded_below_by_the_coherent_gain_limit() {
        // |p| <= sum of 1/L_j <= paths/L_direct, so the loss can never fall
        // below spherical spreading minus the full coherent gain.
        let model = PekerisRayModel::default();
        for &range in &[50.0, 100.0, 500.0, 5000.0] {
            let geometry = Geometry::new(range, 10.0, 5000.0).unwrap();
            let loss = model.transmission_loss(&reference(), &geometry).unwrap();
            let direct = (range * range + 25.0_f64).sqrt();
            let bound = 20.0 * (direct / 7.0).log10();
            assert!(
                loss >= bound - 1e-9,
                "loss {loss} below coherent limit {bound} at range {range}"
            );
        }
    }

    #[test]
    fn single_path_is_spherical_spreading() {
        // With only the direct path the loss is exactly 20*log10(L).
        let model = PekerisRayModel::new(1).unwrap();
        let geometry = Geometry::new(100.0, 10.0, 5000.0).unwrap();
        let loss = model.transmission_loss(&reference(), &geometry).unwrap();
        let direct = (100.0_f64.powi(2) + (10.0_f64 - 5.0).powi(2)).sqrt();
        assert!((loss - 20.0 * direct.log10()).abs() < 1e-9);
    }

    #[test]
    fn more_paths_change_the_field() {
        let geometry = Geometry::new(100.0, 10.0, 5000.0).unwrap();
        let one = PekerisRayModel::new(1)
            .unwrap()
            .transmission_loss(&reference(), &geometry)
            .unwrap();
        let seven = PekerisRayModel::default()
            .transmission_loss(&reference(), &geometry)
            .unwrap();
        assert!((one - seven).abs() > 1e-6);
    }
}
