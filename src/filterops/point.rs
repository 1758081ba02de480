use image::Rgb;

use crate::filterops::filter::{clamp_channel, pixel_filter, PixelTransform};
use crate::Image;

/// Weighted intensity shared by the grayscale-family filters, rounded to
/// the nearest integer.
///
/// The coefficients sum to 0.98 and weight blue above red, so this is not
/// a normalized luma average; the formula is part of the filter contract.
#[inline]
fn intensity(pixel: Rgb<u8>) -> f32 {
    (f32::from(pixel[0]) * 0.36 + f32::from(pixel[1]) * 0.11 + f32::from(pixel[2]) * 0.51).round()
}

/// Channel inversion: every channel becomes `255 - value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Invert;

impl PixelTransform for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let Rgb([r, g, b]) = *source.get_pixel(x, y);
        Rgb([255 - r, 255 - g, 255 - b])
    }
}

/// Desaturation via the weighted [`intensity`] applied to all channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Grayscale;

impl PixelTransform for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let level = clamp_channel(intensity(*source.get_pixel(x, y)));
        Rgb([level, level, level])
    }
}

/// Sepia toning: intensity shifted by `+2k` / `+0.5k` / `-k` per channel.
#[derive(Debug, Clone, Copy)]
pub struct Sepia {
    pub tone: f32,
}

impl Default for Sepia {
    fn default() -> Self {
        Self { tone: 50.0 }
    }
}

impl PixelTransform for Sepia {
    fn name(&self) -> &'static str {
        "sepia"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let base = intensity(*source.get_pixel(x, y));
        Rgb([
            clamp_channel(base + 2.0 * self.tone),
            clamp_channel(base + 0.5 * self.tone),
            clamp_channel(base - self.tone),
        ])
    }
}

/// Uniform brightness shift, clamped per channel.
#[derive(Debug, Clone, Copy)]
pub struct Brightness {
    pub shift: i32,
}

impl Default for Brightness {
    fn default() -> Self {
        Self { shift: 20 }
    }
}

impl PixelTransform for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let pixel = source.get_pixel(x, y);
        let shift = self.shift as f32;
        Rgb([
            clamp_channel(f32::from(pixel[0]) + shift),
            clamp_channel(f32::from(pixel[1]) + shift),
            clamp_channel(f32::from(pixel[2]) + shift),
        ])
    }
}

pixel_filter!(Invert, Grayscale, Sepia, Brightness);
