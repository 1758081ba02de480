use image::Rgb;
use itertools::iproduct;

use crate::error::KernelError;
use crate::filterops::filter::{clamp_channel, clamp_coord, pixel_filter, PixelTransform};
use crate::filterops::kernel::Kernel;
use crate::Image;

/// Edge-clamped weighted sum of the kernel neighborhood at `(x, y)`, one
/// accumulator per channel.
pub(crate) fn accumulate(source: &Image<Rgb<u8>>, kernel: &Kernel, x: u32, y: u32) -> [f32; 3] {
    let (width, height) = source.dimensions();
    let rx = kernel.radius_x() as i32;
    let ry = kernel.radius_y() as i32;
    let mut sums = [0.0f32; 3];

    for (l, k) in iproduct!(-ry..=ry, -rx..=rx) {
        let sx = clamp_coord(i64::from(x) + i64::from(k), width);
        let sy = clamp_coord(i64::from(y) + i64::from(l), height);
        let neighbor = source.get_pixel(sx, sy);
        let weight = kernel.at(k, l);
        for c in 0..3 {
            sums[c] += f32::from(neighbor[c]) * weight;
        }
    }
    sums
}

/// Single-kernel convolution filter with edge-clamped borders.
#[derive(Debug, Clone)]
pub struct Convolution {
    kernel: Kernel,
    name: &'static str,
}

impl Convolution {
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            name: "convolution",
        }
    }

    /// 3x3 box blur, every weight 1/9.
    pub fn box_blur() -> Self {
        Self {
            kernel: Kernel::box3(),
            name: "box blur",
        }
    }

    /// Gaussian blur with the given radius and sigma.
    ///
    /// # Errors
    ///
    /// `InvalidSigma` when `sigma` is not strictly positive.
    pub fn gaussian(radius: u32, sigma: f32) -> Result<Self, KernelError> {
        Ok(Self {
            kernel: Kernel::gaussian(radius, sigma)?,
            name: "gaussian blur",
        })
    }

    /// 3x3 sharpening filter.
    pub fn sharpen() -> Self {
        Self {
            kernel: Kernel::sharpen3(),
            name: "sharpen",
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl Default for Convolution {
    /// Gaussian blur with radius 7 and sigma 2.
    fn default() -> Self {
        Self {
            kernel: Kernel::gaussian_default(),
            name: "gaussian blur",
        }
    }
}

impl PixelTransform for Convolution {
    fn name(&self) -> &'static str {
        self.name
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let sums = accumulate(source, &self.kernel, x, y);
        Rgb(sums.map(clamp_channel))
    }
}

pixel_filter!(Convolution);
