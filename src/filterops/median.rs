use image::Rgb;
use itertools::iproduct;

use crate::filterops::filter::{clamp_coord, pixel_filter, PixelTransform};
use crate::Image;

/// Windowed median: each channel takes the middle of the sorted values in
/// an edge-clamped square neighborhood.
///
/// A rank-order statistic, not a weighted sum; there is no kernel.
#[derive(Debug, Clone, Copy)]
pub struct Median {
    radius: u32,
}

impl Median {
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Side of the sampling window, `2 * radius + 1`.
    pub const fn window(&self) -> u32 {
        2 * self.radius + 1
    }
}

impl Default for Median {
    /// 7x7 window.
    fn default() -> Self {
        Self { radius: 3 }
    }
}

impl PixelTransform for Median {
    fn name(&self) -> &'static str {
        "median"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let (width, height) = source.dimensions();
        let r = self.radius as i32;
        let capacity = (self.window() * self.window()) as usize;

        let mut reds = Vec::with_capacity(capacity);
        let mut greens = Vec::with_capacity(capacity);
        let mut blues = Vec::with_capacity(capacity);

        for (l, k) in iproduct!(-r..=r, -r..=r) {
            let sx = clamp_coord(i64::from(x) + i64::from(k), width);
            let sy = clamp_coord(i64::from(y) + i64::from(l), height);
            let neighbor = source.get_pixel(sx, sy);
            reds.push(neighbor[0]);
            greens.push(neighbor[1]);
            blues.push(neighbor[2]);
        }

        reds.sort_unstable();
        greens.sort_unstable();
        blues.sort_unstable();

        let middle = capacity / 2;
        Rgb([reds[middle], greens[middle], blues[middle]])
    }
}

pixel_filter!(Median);
