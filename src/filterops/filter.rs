use image::Rgb;
use imageproc::definitions::Clamp;
use tracing::debug;

use crate::Image;

/// Result of a whole-image pass.
///
/// Cancellation is a normal outcome, not an error: the partially written
/// output is discarded and never reaches the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The pass ran to completion and produced a full output image.
    Completed(Image<Rgb<u8>>),
    /// Cancellation was requested at a poll point; no image is produced.
    Cancelled,
}

impl FilterOutcome {
    /// Returns the output image, or `None` if the pass was cancelled.
    pub fn into_image(self) -> Option<Image<Rgb<u8>>> {
        match self {
            Self::Completed(image) => Some(image),
            Self::Cancelled => None,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Receives progress reports and answers cancellation polls during a pass.
///
/// Progress values are percentages in `[0, 100]` and non-decreasing within
/// a single pass. Composite filters run several passes through the same
/// sink; each pass restarts its own 0..=100 sequence.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);

    /// Polled once per column boundary; `true` aborts the pass.
    fn cancel_requested(&self) -> bool {
        false
    }
}

/// Sink that discards progress and never requests cancellation.
///
/// For direct library use where no caller is watching the pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _percent: u8) {}
}

/// Per-pixel core of a filter: a pure function of the source image and one
/// coordinate.
///
/// Implementors get the whole-image [`Filter`] behavior for free through
/// the shared column-outer driver. Filters that need a custom pass
/// structure (statistics pre-pass, sub-filter composition) implement
/// [`Filter`] directly instead.
pub trait PixelTransform: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Compute the output color at `(x, y)` from the source image.
    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8>;
}

/// A whole-image transform: consumes a source image and produces a new
/// image of identical dimensions, or a cancellation outcome.
pub trait Filter: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run one whole-image pass, reporting progress and polling `sink` for
    /// cancellation at every column boundary.
    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome;
}

/// Wires per-pixel transforms into the whole-image [`Filter`] contract
/// through the shared full-range driver.
macro_rules! pixel_filter {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::filterops::filter::Filter for $ty {
                fn name(&self) -> &'static str {
                    $crate::filterops::filter::PixelTransform::name(self)
                }

                fn process(
                    &self,
                    source: &$crate::Image<::image::Rgb<u8>>,
                    sink: &mut dyn $crate::filterops::filter::ProgressSink,
                ) -> $crate::filterops::filter::FilterOutcome {
                    $crate::filterops::filter::drive(
                        self,
                        source,
                        sink,
                        $crate::filterops::filter::ProgressSpan::FULL,
                    )
                }
            }
        )+
    };
}

pub(crate) use pixel_filter;

/// Portion of the progress range one driver pass reports into.
///
/// Filters with a statistics pre-pass bill part of the range up front and
/// let the pixel pass climb through the remainder.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProgressSpan {
    pub start: u8,
    pub end: u8,
}

impl ProgressSpan {
    pub const FULL: Self = Self { start: 0, end: 100 };

    /// Progress value at `fraction` of the span, truncated downward.
    fn at(self, fraction: f32) -> u8 {
        let range = f32::from(self.end - self.start);
        self.start + (fraction * range) as u8
    }
}

/// Column-outer, row-inner driver shared by every filter without a custom
/// pass structure.
///
/// Progress is reported at the top of each column, followed by one
/// cancellation poll. On cancellation the partial output is dropped.
pub(crate) fn drive<T>(
    transform: &T,
    source: &Image<Rgb<u8>>,
    sink: &mut dyn ProgressSink,
    span: ProgressSpan,
) -> FilterOutcome
where
    T: PixelTransform + ?Sized,
{
    let (width, height) = source.dimensions();
    let mut output: Image<Rgb<u8>> = Image::new(width, height);

    for x in 0..width {
        sink.report(span.at(x as f32 / width as f32));
        if sink.cancel_requested() {
            debug!(filter = transform.name(), column = x, "pass cancelled");
            return FilterOutcome::Cancelled;
        }
        for y in 0..height {
            output.put_pixel(x, y, transform.compute_pixel(source, x, y));
        }
    }

    FilterOutcome::Completed(output)
}

/// Clamp a signed sample coordinate into `[0, upper - 1]`.
///
/// This is the edge-clamp border policy shared by every neighborhood
/// filter: out-of-bounds lookups resolve to the nearest border pixel.
#[inline]
pub(crate) fn clamp_coord(value: i64, upper: u32) -> u32 {
    value.clamp(0, i64::from(upper) - 1) as u32
}

/// Clamp an accumulated channel value into the u8 range, truncating the
/// fractional part.
#[inline]
pub(crate) fn clamp_channel(value: f32) -> u8 {
    <u8 as Clamp<f32>>::clamp(value)
}
