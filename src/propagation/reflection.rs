//! Seabed reflection coefficient.

use num_complex::Complex64;

use crate::types::SeabedParams;

/// Rayleigh fluid-fluid reflection coefficient at the seabed.
///
/// `grazing` is the grazing angle in radians, measured from the horizontal.
/// Absorption enters through a complex index of refraction
/// `n = (1 + i*delta) / c`, so the returned coefficient is complex with
/// modulus at most 1 for any non-negative attenuation.
pub fn rayleigh_reflection(grazing: f64, seabed: &SeabedParams) -> Complex64 {
    let n = Complex64::new(1.0, seabed.attenuation) / seabed.speed_ratio;
    let t1 = Complex64::new(seabed.density_ratio * grazing.sin(), 0.0);
    let t2 = (n * n - Complex64::new(grazing.cos().powi(2), 0.0)).sqrt();
    (t1 - t2) / (t1 + t2)
}
