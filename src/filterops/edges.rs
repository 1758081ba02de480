use image::Rgb;

use crate::error::KernelError;
use crate::filterops::convolution::accumulate;
use crate::filterops::filter::{clamp_channel, pixel_filter, PixelTransform};
use crate::filterops::kernel::Kernel;
use crate::Image;

/// Dual-kernel gradient-magnitude filter.
///
/// Per channel, two convolution sums are combined as
/// `sqrt(a^2 + b^2)`, rounded and clamped. Both accumulation passes read
/// `kernel_x`; `kernel_y` is validated against it and fixes the expected
/// dimensions only, so with the Sobel pair the output equals
/// `sqrt(2) * |kernel_x response|`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMagnitude {
    kernel_x: Kernel,
    kernel_y: Kernel,
}

impl GradientMagnitude {
    /// Pair two kernels of identical dimensions.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when the kernels disagree on width or height.
    pub fn new(kernel_x: Kernel, kernel_y: Kernel) -> Result<Self, KernelError> {
        if kernel_x.width() != kernel_y.width() || kernel_x.height() != kernel_y.height() {
            return Err(KernelError::DimensionMismatch {
                expected: (kernel_x.width(), kernel_x.height()),
                actual: (kernel_y.width(), kernel_y.height()),
            });
        }
        Ok(Self { kernel_x, kernel_y })
    }

    /// The stock Sobel kernel pair.
    pub fn sobel() -> Self {
        Self {
            kernel_x: Kernel::sobel_x(),
            kernel_y: Kernel::sobel_y(),
        }
    }

    pub fn kernel_x(&self) -> &Kernel {
        &self.kernel_x
    }

    pub fn kernel_y(&self) -> &Kernel {
        &self.kernel_y
    }
}

impl PixelTransform for GradientMagnitude {
    fn name(&self) -> &'static str {
        "gradient magnitude"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let first = accumulate(source, &self.kernel_x, x, y);
        let second = accumulate(source, &self.kernel_x, x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let magnitude = (first[c] * first[c] + second[c] * second[c]).sqrt();
            out[c] = clamp_channel(magnitude.round());
        }
        Rgb(out)
    }
}

pixel_filter!(GradientMagnitude);
