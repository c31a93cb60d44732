//! Physical and numerical constants used throughout the crate.

/// Water column depth of the reference channel, in meters.
pub const WATER_DEPTH: f64 = 20.0;

/// Source depth of the reference channel, in meters.
pub const SOURCE_DEPTH: f64 = 5.0;

/// Isovelocity sound speed of the water column, in m/s.
pub const WATER_SOUND_SPEED: f64 = 1540.0;

/// Water density of the reference channel, in kg/m^3.
///
/// Only ratios enter the reflection coefficient; this value documents the
/// denominator the seabed density ratio is taken against.
pub const WATER_DENSITY: f64 = 1023.0;

/// Number of ray paths summed by the reference propagation model.
pub const DEFAULT_RAY_PATHS: usize = 7;

/// Standard deviation of the observation noise, in dB.
pub const NOISE_SIGMA: f64 = 0.5;

/// Prior bounds for the seabed density ratio.
pub const RHO_BOUNDS: (f64, f64) = (1.0, 3.0);

/// Prior bounds for the seabed sound-speed ratio.
pub const SPEED_BOUNDS: (f64, f64) = (0.5, 2.5);

/// Prior bounds for the seabed attenuation coefficient.
pub const DELTA_BOUNDS: (f64, f64) = (0.0, 0.003);

/// Prior bounds for all three seabed parameters, in (rho, c, delta) order.
pub const PRIOR_BOUNDS: [(f64, f64); 3] = [RHO_BOUNDS, SPEED_BOUNDS, DELTA_BOUNDS];

/// Default deterministic seed for RNG operations.
///
/// This seed ensures reproducibility: same seed + same data = same result.
/// The value `0x736561626564` is "seabed" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x736561626564;

/// Natural log of 2*pi, used in Gaussian log-pdf computation.
pub const LOG_2PI: f64 = 1.8378770664093453;
