use image::Rgb;
use itertools::iproduct;

use crate::filterops::filter::{
    clamp_coord, drive, pixel_filter, Filter, FilterOutcome, PixelTransform, ProgressSink,
    ProgressSpan,
};
use crate::filterops::kernel::StructuringElement;
use crate::Image;

/// Fold the masked, edge-clamped neighborhood of `(x, y)` channel by
/// channel.
fn rank_scan(
    source: &Image<Rgb<u8>>,
    mask: &StructuringElement,
    x: u32,
    y: u32,
    init: [u8; 3],
    pick: fn(u8, u8) -> u8,
) -> Rgb<u8> {
    let (width, height) = source.dimensions();
    let rx = mask.radius_x() as i32;
    let ry = mask.radius_y() as i32;
    let mut acc = init;

    for (l, k) in iproduct!(-ry..=ry, -rx..=rx) {
        if !mask.active(k, l) {
            continue;
        }
        let sx = clamp_coord(i64::from(x) + i64::from(k), width);
        let sy = clamp_coord(i64::from(y) + i64::from(l), height);
        let neighbor = source.get_pixel(sx, sy);
        for c in 0..3 {
            acc[c] = pick(acc[c], neighbor[c]);
        }
    }
    Rgb(acc)
}

/// Per-channel maximum over the structuring element.
///
/// Channels are ranked independently; the result need not equal any
/// single source pixel.
#[derive(Debug, Default, Clone)]
pub struct Dilation {
    mask: StructuringElement,
}

impl Dilation {
    pub fn new(mask: StructuringElement) -> Self {
        Self { mask }
    }
}

impl PixelTransform for Dilation {
    fn name(&self) -> &'static str {
        "dilation"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        rank_scan(source, &self.mask, x, y, [0; 3], u8::max)
    }
}

/// Per-channel minimum over the structuring element.
#[derive(Debug, Default, Clone)]
pub struct Erosion {
    mask: StructuringElement,
}

impl Erosion {
    pub fn new(mask: StructuringElement) -> Self {
        Self { mask }
    }
}

impl PixelTransform for Erosion {
    fn name(&self) -> &'static str {
        "erosion"
    }

    fn compute_pixel(&self, source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        rank_scan(source, &self.mask, x, y, [255; 3], u8::min)
    }
}

pixel_filter!(Dilation, Erosion);

/// Erosion followed by dilation over the eroded result.
///
/// Each sub-filter runs a full whole-image pass and reports its own
/// 0..=100 progress sequence through the shared sink.
#[derive(Debug, Default, Clone)]
pub struct Opening {
    erosion: Erosion,
    dilation: Dilation,
}

impl Opening {
    pub fn new(mask: StructuringElement) -> Self {
        Self {
            erosion: Erosion::new(mask.clone()),
            dilation: Dilation::new(mask),
        }
    }
}

impl Filter for Opening {
    fn name(&self) -> &'static str {
        "opening"
    }

    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome {
        let eroded = match self.erosion.process(source, sink) {
            FilterOutcome::Completed(image) => image,
            FilterOutcome::Cancelled => return FilterOutcome::Cancelled,
        };
        self.dilation.process(&eroded, sink)
    }
}

/// Dilation followed by erosion over the dilated result.
#[derive(Debug, Default, Clone)]
pub struct Closing {
    erosion: Erosion,
    dilation: Dilation,
}

impl Closing {
    pub fn new(mask: StructuringElement) -> Self {
        Self {
            erosion: Erosion::new(mask.clone()),
            dilation: Dilation::new(mask),
        }
    }
}

impl Filter for Closing {
    fn name(&self) -> &'static str {
        "closing"
    }

    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome {
        let dilated = match self.dilation.process(source, sink) {
            FilterOutcome::Completed(image) => image,
            FilterOutcome::Cancelled => return FilterOutcome::Cancelled,
        };
        self.erosion.process(&dilated, sink)
    }
}

/// Per-pixel difference between the dilated and eroded renditions of the
/// same source.
///
/// Runs three passes (erosion, dilation, combine), each with its own
/// progress sequence.
#[derive(Debug, Default, Clone)]
pub struct MorphologicalGradient {
    erosion: Erosion,
    dilation: Dilation,
}

impl MorphologicalGradient {
    pub fn new(mask: StructuringElement) -> Self {
        Self {
            erosion: Erosion::new(mask.clone()),
            dilation: Dilation::new(mask),
        }
    }
}

/// Combining pass over two held intermediates; the driver's source image
/// is only consulted for dimensions.
struct DifferencePass {
    dilated: Image<Rgb<u8>>,
    eroded: Image<Rgb<u8>>,
}

impl PixelTransform for DifferencePass {
    fn name(&self) -> &'static str {
        "morphological gradient"
    }

    fn compute_pixel(&self, _source: &Image<Rgb<u8>>, x: u32, y: u32) -> Rgb<u8> {
        let d = self.dilated.get_pixel(x, y);
        let e = self.eroded.get_pixel(x, y);
        Rgb([
            d[0].saturating_sub(e[0]),
            d[1].saturating_sub(e[1]),
            d[2].saturating_sub(e[2]),
        ])
    }
}

impl Filter for MorphologicalGradient {
    fn name(&self) -> &'static str {
        "morphological gradient"
    }

    fn process(&self, source: &Image<Rgb<u8>>, sink: &mut dyn ProgressSink) -> FilterOutcome {
        let eroded = match self.erosion.process(source, sink) {
            FilterOutcome::Completed(image) => image,
            FilterOutcome::Cancelled => return FilterOutcome::Cancelled,
        };
        let dilated = match self.dilation.process(source, sink) {
            FilterOutcome::Completed(image) => image,
            FilterOutcome::Cancelled => return FilterOutcome::Cancelled,
        };
        let combine = DifferencePass { dilated, eroded };
        drive(&combine, source, sink, ProgressSpan::FULL)
    }
}
