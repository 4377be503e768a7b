use thiserror::Error;

/// Error types for the k-medoids library
#[derive(Error, Debug)]
pub enum KMedoidsError {
    /// The run was misconfigured: k is zero, k is not smaller than the
    /// number of points, or a caller-supplied label/coordinate-name list
    /// has the wrong length. Raised at construction, before any computation.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A sample is too small to optimize: CLARA's sample size does not
    /// exceed k, or a swap search has no non-medoid candidates left.
    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    /// Two points with coordinate vectors of different lengths were
    /// compared. Raised at the point of comparison.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),
}
