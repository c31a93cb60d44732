//! Error types for forward modeling and inversion.

/// Error returned when forward modeling or inversion setup fails.
///
/// All variants indicate caller programming errors or solver breakdowns and
/// are reported immediately, without retry. Inference nonconvergence is not
/// an error: it is surfaced as a degraded outcome by the inference engines.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An out-of-domain physical parameter.
    ///
    /// Raised for non-positive density or speed ratios, negative attenuation,
    /// non-positive range or frequency, or a receiver depth outside the open
    /// interval (0, water depth). Receivers sitting exactly on the
    /// pressure-release surface or on the seabed are rejected: the coherent
    /// field degenerates there.
    InvalidParameter(String),

    /// Parallel observation arrays have mismatched lengths.
    ShapeMismatch {
        /// Length of the depth array.
        depths: usize,
        /// Length of the frequency array.
        frequencies: usize,
        /// Length of the transmission-loss array.
        losses: usize,
    },

    /// An inversion problem was constructed from zero observations.
    EmptyDataset,

    /// The propagation solver produced no usable output.
    ///
    /// Propagated unchanged to the caller; the forward model never retries.
    SolverFailure(String),

    /// An inference configuration failed validation.
    InvalidConfig(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::ShapeMismatch {
                depths,
                frequencies,
                losses,
            } => write!(
                f,
                "mismatched observation arrays: {depths} depths, {frequencies} frequencies, {losses} losses"
            ),
            Self::EmptyDataset => write!(f, "dataset contains no observations"),
            Self::SolverFailure(msg) => write!(f, "propagation solver failed: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid inference configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
