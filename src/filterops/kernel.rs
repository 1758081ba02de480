use itertools::iproduct;

use crate::error::{KernelError, MaskError};

/// Odd-sized grid of convolution weights, indexed around its center.
///
/// Weights are stored row-major; [`Kernel::at`] takes signed offsets from
/// the center, so a 3x3 kernel is addressed with offsets in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: u32,
    height: u32,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from a flat row-major weight buffer.
    ///
    /// # Errors
    ///
    /// * Zero or even dimensions
    /// * Weight count not matching `width * height`
    pub fn new(width: u32, height: u32, weights: Vec<f32>) -> Result<Self, KernelError> {
        if width == 0 || height == 0 {
            return Err(KernelError::Empty);
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(KernelError::EvenDimensions { width, height });
        }
        let expected = (width * height) as usize;
        if weights.len() != expected {
            return Err(KernelError::LengthMismatch {
                expected,
                actual: weights.len(),
            });
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Build a kernel from nested row arrays.
    pub fn from_rows<const W: usize, const H: usize>(
        rows: [[f32; W]; H],
    ) -> Result<Self, KernelError> {
        let weights = rows.iter().flatten().copied().collect();
        Self::new(W as u32, H as u32, weights)
    }

    /// 3x3 box kernel, every weight 1/9.
    pub fn box3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![1.0 / 9.0; 9],
        }
    }

    /// 3x3 sharpening kernel.
    pub fn sharpen3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
        }
    }

    /// Horizontal-derivative Sobel kernel.
    pub fn sobel_x() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Vertical-derivative Sobel kernel.
    pub fn sobel_y() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    /// Gaussian kernel of side `2 * radius + 1`, normalized to unit sum.
    ///
    /// Weight at offset `(i, j)` is `exp(-(i^2 + j^2) / sigma^2)` before
    /// normalization.
    ///
    /// # Errors
    ///
    /// `InvalidSigma` when `sigma` is not strictly positive.
    pub fn gaussian(radius: u32, sigma: f32) -> Result<Self, KernelError> {
        if sigma <= 0.0 {
            return Err(KernelError::InvalidSigma(sigma));
        }
        Ok(Self::gaussian_unchecked(radius, sigma))
    }

    /// Gaussian kernel with the stock radius 7 and sigma 2.
    pub fn gaussian_default() -> Self {
        Self::gaussian_unchecked(7, 2.0)
    }

    fn gaussian_unchecked(radius: u32, sigma: f32) -> Self {
        let side = 2 * radius + 1;
        let r = radius as i32;
        let mut weights = Vec::with_capacity((side * side) as usize);
        for (j, i) in iproduct!(-r..=r, -r..=r) {
            weights.push((-((i * i + j * j) as f32) / (sigma * sigma)).exp());
        }
        let norm: f32 = weights.iter().sum();
        for weight in &mut weights {
            *weight /= norm;
        }
        Self {
            width: side,
            height: side,
            weights,
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Half extent along x, rounded down.
    pub const fn radius_x(&self) -> u32 {
        self.width / 2
    }

    /// Half extent along y, rounded down.
    pub const fn radius_y(&self) -> u32 {
        self.height / 2
    }

    /// Weight at the signed offset `(kx, ky)` from the center.
    #[inline]
    pub fn at(&self, kx: i32, ky: i32) -> f32 {
        let col = (kx + self.radius_x() as i32) as u32;
        let row = (ky + self.radius_y() as i32) as u32;
        self.weights[(row * self.width + col) as usize]
    }

    /// Sum of all weights.
    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Odd-sized boolean mask marking which neighborhood offsets take part in
/// a morphological rank computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl StructuringElement {
    /// Build a mask from a flat row-major cell buffer.
    ///
    /// # Errors
    ///
    /// * Zero or even dimensions
    /// * Cell count not matching `width * height`
    pub fn new(width: u32, height: u32, cells: Vec<bool>) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::Empty);
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(MaskError::EvenDimensions { width, height });
        }
        let expected = (width * height) as usize;
        if cells.len() != expected {
            return Err(MaskError::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// All-active square mask of the given odd side.
    pub fn square(side: u32) -> Result<Self, MaskError> {
        Self::new(side, side, vec![true; (side * side) as usize])
    }

    /// Half extent along x, rounded down.
    pub const fn radius_x(&self) -> u32 {
        self.width / 2
    }

    /// Half extent along y, rounded down.
    pub const fn radius_y(&self) -> u32 {
        self.height / 2
    }

    /// Whether the cell at the signed offset `(kx, ky)` participates.
    #[inline]
    pub fn active(&self, kx: i32, ky: i32) -> bool {
        let col = (kx + self.radius_x() as i32) as u32;
        let row = (ky + self.radius_y() as i32) as u32;
        self.cells[(row * self.width + col) as usize]
    }
}

impl Default for StructuringElement {
    /// The conventional 5x5 full square.
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            cells: vec![true; 25],
        }
    }
}
