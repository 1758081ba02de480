use thiserror::Error;

/// Error type for convolution kernel construction
///
/// Kernel shape problems are configuration errors and surface at
/// construction time, never in the middle of a whole-image pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// Radius-based center indexing requires odd extents in both axes
    #[error("Kernel dimensions must be odd, got {width}x{height}")]
    EvenDimensions { width: u32, height: u32 },

    /// A kernel with a zero extent has no center pixel
    #[error("Kernel must have non-zero dimensions")]
    Empty,

    /// The flat weight buffer does not cover width x height cells
    #[error("Kernel weight count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Two kernels of a pair must share dimensions
    #[error("Kernel dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Dimensions of the first kernel (width, height)
        expected: (u32, u32),
        /// Dimensions of the second kernel (width, height)
        actual: (u32, u32),
    },

    /// Gaussian weights degenerate for non-positive sigma
    #[error("Gaussian sigma must be positive, got {0}")]
    InvalidSigma(f32),
}

/// Error type for structuring element construction
///
/// Mirrors [`KernelError`] for the boolean masks used by the rank filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    /// Radius-based center indexing requires odd extents in both axes
    #[error("Structuring element dimensions must be odd, got {width}x{height}")]
    EvenDimensions { width: u32, height: u32 },

    /// A mask with a zero extent has no center pixel
    #[error("Structuring element must have non-zero dimensions")]
    Empty,

    /// The flat cell buffer does not cover width x height cells
    #[error("Structuring element cell count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Error type for the image decode boundary
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Error type for filter job submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// Only one whole-image pass may be in flight at a time
    #[error("A filter job is already running")]
    Busy,
}
