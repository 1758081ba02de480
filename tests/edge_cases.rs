//! Edge case and error condition tests
//!
//! Boundary values, configuration errors, cancellation behavior and
//! progress-reporting shape.

use filterops::{
    AutoLevels, Brightness, Convolution, Dilation, Erosion, Filter, FilterOutcome,
    GradientMagnitude, GrayWorld, Grayscale, Image, Invert, Kernel, KernelError, MaskError,
    Median, MorphologicalGradient, NullSink, Opening, ProgressSink, Sepia, StructuringElement,
};
use image::Rgb;

/// Sink that records every report and optionally cancels from the first
/// poll onward.
#[derive(Default)]
struct RecordingSink {
    reports: Vec<u8>,
    cancel: bool,
}

impl ProgressSink for RecordingSink {
    fn report(&mut self, percent: u8) {
        self.reports.push(percent);
    }

    fn cancel_requested(&self) -> bool {
        self.cancel
    }
}

/// Helper to create a 1x1 image
fn minimal_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(1, 1);
    image.put_pixel(0, 0, Rgb([128, 128, 128]));
    image
}

/// Helper to create a small gradient image
fn gradient_image(width: u32, height: u32) -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let v = ((x * 255) / width.max(1)) as u8;
        let w = ((y * 255) / height.max(1)) as u8;
        *pixel = Rgb([v, w, v / 2]);
    }
    image
}

#[test]
fn even_kernel_dimensions_fail_at_construction() {
    assert!(matches!(
        Kernel::new(4, 3, vec![0.0; 12]),
        Err(KernelError::EvenDimensions { width: 4, height: 3 })
    ));
    assert!(matches!(
        Kernel::new(3, 2, vec![0.0; 6]),
        Err(KernelError::EvenDimensions { width: 3, height: 2 })
    ));
}

#[test]
fn zero_sized_kernel_fails_at_construction() {
    assert!(matches!(
        Kernel::new(0, 0, Vec::new()),
        Err(KernelError::Empty)
    ));
}

#[test]
fn even_mask_dimensions_fail_at_construction() {
    assert!(matches!(
        StructuringElement::new(4, 5, vec![true; 20]),
        Err(MaskError::EvenDimensions { width: 4, height: 5 })
    ));
    assert!(matches!(StructuringElement::square(4), Err(_)));
}

#[test]
fn gaussian_sigma_must_be_positive() {
    assert!(matches!(
        Convolution::gaussian(7, 0.0),
        Err(KernelError::InvalidSigma(_))
    ));
}

#[test]
fn gaussian_and_box_kernels_sum_to_one() {
    let gaussian = Convolution::gaussian(7, 2.0).expect("positive sigma");
    assert!((gaussian.kernel().weight_sum() - 1.0).abs() < 1e-4);
    assert!((Convolution::box_blur().kernel().weight_sum() - 1.0).abs() < 1e-4);
}

#[test]
fn mismatched_gradient_kernels_are_rejected() {
    let small = Kernel::box3();
    let large = Kernel::gaussian(2, 1.0).expect("positive sigma");
    assert!(matches!(
        GradientMagnitude::new(small, large),
        Err(KernelError::DimensionMismatch { .. })
    ));
}

#[test]
fn single_pixel_image_through_every_filter() {
    let image = minimal_image();
    let filters: Vec<Box<dyn Filter>> = vec![
        Box::new(Invert),
        Box::new(Grayscale),
        Box::new(Sepia::default()),
        Box::new(Brightness::default()),
        Box::new(Convolution::box_blur()),
        Box::new(Convolution::gaussian(7, 2.0).expect("positive sigma")),
        Box::new(Convolution::sharpen()),
        Box::new(GradientMagnitude::sobel()),
        Box::new(GrayWorld),
        Box::new(AutoLevels),
        Box::new(Dilation::default()),
        Box::new(Erosion::default()),
        Box::new(Opening::default()),
        Box::new(filterops::Closing::default()),
        Box::new(MorphologicalGradient::default()),
        Box::new(Median::default()),
    ];
    for filter in &filters {
        let outcome = filter.process(&image, &mut NullSink);
        let output = outcome.into_image().expect("NullSink never cancels");
        assert_eq!(output.dimensions(), (1, 1), "filter {}", filter.name());
    }
}

#[test]
fn cancellation_before_the_first_column_produces_no_image() {
    let mut sink = RecordingSink {
        reports: Vec::new(),
        cancel: true,
    };
    let outcome = Invert.process(&gradient_image(8, 8), &mut sink);
    assert_eq!(outcome, FilterOutcome::Cancelled);
    assert!(outcome.into_image().is_none());
    // the poll at column 0 fires after a single report
    assert_eq!(sink.reports, vec![0]);
}

#[test]
fn composite_cancellation_aborts_the_whole_chain() {
    let mut sink = RecordingSink {
        reports: Vec::new(),
        cancel: true,
    };
    let outcome = Opening::default().process(&gradient_image(8, 8), &mut sink);
    assert!(outcome.is_cancelled());
    // the first sub-pass stops at its first poll; the second never starts
    assert_eq!(sink.reports, vec![0]);
}

#[test]
fn progress_is_non_decreasing_within_a_pass() {
    let mut sink = RecordingSink::default();
    let outcome = Invert.process(&gradient_image(32, 4), &mut sink);
    assert!(!outcome.is_cancelled());
    assert_eq!(sink.reports.len(), 32);
    assert!(sink.reports.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*sink.reports.first().expect("reports"), 0);
    assert!(*sink.reports.last().expect("reports") <= 100);
}

#[test]
fn composite_filters_report_one_sequence_per_pass() {
    let mut sink = RecordingSink::default();
    let outcome = MorphologicalGradient::default().process(&gradient_image(10, 3), &mut sink);
    assert!(!outcome.is_cancelled());
    // three passes of 10 columns each, every pass restarting at 0
    assert_eq!(sink.reports.len(), 30);
    let restarts = sink
        .reports
        .windows(2)
        .filter(|w| w[1] < w[0])
        .count();
    assert_eq!(restarts, 2);
    assert_eq!(sink.reports[0], 0);
    assert_eq!(sink.reports[10], 0);
    assert_eq!(sink.reports[20], 0);
}

#[test]
fn auto_levels_progress_starts_where_the_stats_scan_ends() {
    let mut sink = RecordingSink::default();
    let outcome = AutoLevels.process(&gradient_image(10, 3), &mut sink);
    assert!(!outcome.is_cancelled());
    assert_eq!(*sink.reports.first().expect("reports"), 66);
    assert!(sink.reports.iter().all(|&p| (66..=100).contains(&p)));
    assert!(sink.reports.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn gray_world_reports_the_full_range() {
    let mut sink = RecordingSink::default();
    let outcome = GrayWorld.process(&gradient_image(10, 3), &mut sink);
    assert!(!outcome.is_cancelled());
    assert_eq!(*sink.reports.first().expect("reports"), 0);
    assert!(sink.reports.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn uniform_image_is_a_gray_world_fixed_point() {
    let mut image: Image<Rgb<u8>> = Image::new(4, 4);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([70, 70, 70]);
    }
    let output = GrayWorld
        .process(&image, &mut NullSink)
        .into_image()
        .expect("not cancelled");
    for pixel in output.pixels() {
        assert_eq!(*pixel, Rgb([70, 70, 70]));
    }
}

#[test]
fn auto_levels_passes_flat_channels_through() {
    let mut image: Image<Rgb<u8>> = Image::new(4, 4);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([10, 200, 128]);
    }
    let output = AutoLevels
        .process(&image, &mut NullSink)
        .into_image()
        .expect("not cancelled");
    for pixel in output.pixels() {
        assert_eq!(*pixel, Rgb([10, 200, 128]));
    }
}

#[test]
fn gray_image_keeps_its_level_through_grayscale() {
    // weights sum to 0.98, so level v maps to round(0.98 * v)
    let mut image: Image<Rgb<u8>> = Image::new(3, 3);
    for pixel in image.pixels_mut() {
        *pixel = Rgb([200, 200, 200]);
    }
    let output = Grayscale
        .process(&image, &mut NullSink)
        .into_image()
        .expect("not cancelled");
    for pixel in output.pixels() {
        assert_eq!(*pixel, Rgb([196, 196, 196]));
    }
}

#[test]
fn sepia_default_tone_offsets() {
    let image = minimal_image();
    let output = Sepia::default()
        .process(&image, &mut NullSink)
        .into_image()
        .expect("not cancelled");
    // intensity(128, 128, 128) = round(125.44) = 125
    assert_eq!(*output.get_pixel(0, 0), Rgb([225, 150, 75]));
}

#[test]
fn brightness_shift_clamps_at_both_ends() {
    let mut image: Image<Rgb<u8>> = Image::new(2, 1);
    image.put_pixel(0, 0, Rgb([250, 5, 128]));
    image.put_pixel(1, 0, Rgb([0, 255, 30]));
    let output = Brightness { shift: 20 }
        .process(&image, &mut NullSink)
        .into_image()
        .expect("not cancelled");
    assert_eq!(*output.get_pixel(0, 0), Rgb([255, 25, 148]));
    assert_eq!(*output.get_pixel(1, 0), Rgb([20, 255, 50]));
}
