//! Measurement records and synthetic dataset generation.

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::Error;
use crate::propagation::PropagationModel;
use crate::types::{Geometry, SeabedParams};

/// One transmission-loss observation at a known receiver position and
/// frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Receiver depth, in meters.
    pub depth: f64,
    /// Source frequency, in Hz.
    pub frequency: f64,
    /// Measured transmission loss, in dB.
    pub transmission_loss: f64,
}

/// An ordered, immutable collection of measurements taken at a fixed
/// source-receiver range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    range: f64,
    records: Vec<Measurement>,
}

impl Dataset {
    /// Generate a noise-free synthetic dataset over a depth x frequency grid.
    ///
    /// One record per (depth, frequency) pair, each equal to the exact
    /// forward-model output for the given seabed parameters. Records are
    /// ordered frequency-major: depth varies fastest. Every record carries
    /// its own depth and frequency, so consumers never need to rely on the
    /// ordering.
    ///
    /// # Errors
    ///
    /// `EmptyDataset` if either grid is empty; otherwise any error the
    /// forward model reports for a grid point.
    pub fn synthesize<M: PropagationModel>(
        model: &M,
        range: f64,
        depths: &[f64],
        frequencies: &[f64],
        seabed: &SeabedParams,
    ) -> Result<Self, Error> {
        if depths.is_empty() || frequencies.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let env = Environment::reference(*seabed);
        let mut records = Vec::with_capacity(depths.len() * frequencies.len());
        for &frequency in frequencies {
            for &depth in depths {
                let geometry = Geometry::new(range, depth, frequency)?;
                let transmission_loss = model.transmission_loss(&env, &geometry)?;
                records.push(Measurement {
                    depth,
                    frequency,
                    transmission_loss,
                });
            }
        }
        Ok(Self { range, records })
    }

    /// Assemble a dataset from parallel observation arrays.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the three arrays differ in length, or
    /// `InvalidParameter` if the range is not positive.
    pub fn from_arrays(
        range: f64,
        depths: &[f64],
        frequencies: &[f64],
        losses: &[f64],
    ) -> Result<Self, Error> {
        if depths.len() != frequencies.len() || frequencies.len() != losses.len() {
            return Err(Error::ShapeMismatch {
                depths: depths.len(),
                frequencies: frequencies.len(),
                losses: losses.len(),
            });
        }
        if !range.is_finite() || range <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "range must be positive, got {range}"
            )));
        }
        let records = depths
            .iter()
            .zip(frequencies)
            .zip(losses)
            .map(|((&depth, &frequency), &transmission_loss)| Measurement {
                depth,
                frequency,
                transmission_loss,
            })
            .collect();
        Ok(Self { range, records })
    }

    /// The fixed source-receiver range all records share, in meters.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Number of measurement records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The measurement records, in generation order.
    pub fn records(&self) -> &[Measurement] {
        &self.records
    }

    /// Iterate over the measurement records.
    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
