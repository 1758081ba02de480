use image::Rgb;
use tracing::debug;

use crate::filterops::filter::{
    clamp_channel, drive, Filter, FilterOutcome, PixelTransform, ProgressSink, ProgressSpan,
};
use crate::Image;

/// Per-channel aggregates over a full image, gathered in one scan.
///
/// Computed fresh at the start of a global filter's pass and scoped to
/// that single call; never cached on a filter instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: [f32; 3],
    pub min: [u8; 3],
    pub max: [u8; 3],
}

impl ChannelStats {
    /// Scan the whole image once, accumulating sum, min and max per
    /// channel.
    pub fn measure(image: &Image<Rgb<u8>>) -> Self {
        let mut sum = [0.0f64; 3];
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];

        for pixel in image.pixels() {
            for c in 0..3 {
                sum[c] += f64::from(pixel[c]);
                min[c] = min[c].min(pixel[c]);
                max[c] = max[c].max(pixel[c]);
            }
        }

        let count = f64::from(image.width()) * f64::from(image.height());
        let mean = if count > 0.0 {
            sum.map(|s| (s / count) as f32)
        } else {
            [0.0; 3]
        };
        Self { mean, min, max }
    }
}

/// White-balance filter that scales every channel toward the mean of the
/// channel means.
///
/// A channel whose mean is zero is passed through unchanged instead of
/// dividing by zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrayWorld;

struct GrayWorldPass {
    avg: f32,
    /// Channel means; `None` marks a zero-mean channel.
    mean: [Option<f32>; 3],
}

impl PixelTransform for GrayWorldPass {
    fn name(&self) -> &'static str {
        "gray world"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let pixel = source.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            out[c] = match self.mean[c] {
                Some(mean) => clamp_channel(f32::from(pixel[c]) * self.avg / mean),
                None => pixel[c],
            };
        }
        Rgb(out)
    }
}

impl Filter for GrayWorld {
    fn name(&self) -> &'static str {
        "gray world"
    }

    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome {
        // silent statistics pass, then the standard full-range driver
        let stats = ChannelStats::measure(source);
        let avg = (stats.mean[0] + stats.mean[1] + stats.mean[2]) / 3.0;
        debug!(filter = Filter::name(self), avg, "measured channel means");

        let mut mean = [None; 3];
        for c in 0..3 {
            if stats.mean[c] > 0.0 {
                mean[c] = Some(stats.mean[c]);
            }
        }
        drive(&GrayWorldPass { avg, mean }, source, sink, ProgressSpan::FULL)
    }
}

/// Linear contrast stretch mapping each channel's `[min, max]` onto
/// `[0, 255]`.
///
/// The statistics scan is billed as the first 66% of progress; the pixel
/// pass climbs through the remaining range. A channel with zero range is
/// passed through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoLevels;

/// Progress already consumed by the statistics scan when the pixel pass
/// starts.
const STATS_PROGRESS: u8 = 66;

struct AutoLevelsPass {
    min: [f32; 3],
    /// `max - min` per channel; `None` marks a flat channel.
    range: [Option<f32>; 3],
}

impl PixelTransform for AutoLevelsPass {
    fn name(&self) -> &'static str {
        "auto levels"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let pixel = source.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            out[c] = match self.range[c] {
                Some(range) => {
                    clamp_channel((f32::from(pixel[c]) - self.min[c]) * 255.0 / range)
                }
                None => pixel[c],
            };
        }
        Rgb(out)
    }
}

impl Filter for AutoLevels {
    fn name(&self) -> &'static str {
        "auto levels"
    }

    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome {
        let stats = ChannelStats::measure(source);

        let mut min = [0.0f32; 3];
        let mut range = [None; 3];
        for c in 0..3 {
            min[c] = f32::from(stats.min[c]);
            if stats.max[c] > stats.min[c] {
                range[c] = Some(f32::from(stats.max[c] - stats.min[c]));
            }
        }

        drive(
            &AutoLevelsPass { min, range },
            source,
            sink,
            ProgressSpan {
                start: STATS_PROGRESS,
                end: 100,
            },
        )
    }
}
