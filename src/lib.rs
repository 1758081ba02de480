mod error;
mod filterops;
mod io;
mod job;

use image::{ImageBuffer, Pixel};

pub use error::{JobError, KernelError, LoadError, MaskError};
pub use filterops::convolution::Convolution;
pub use filterops::edges::GradientMagnitude;
pub use filterops::filter::{Filter, FilterOutcome, NullSink, PixelTransform, ProgressSink};
pub use filterops::global_stats::{AutoLevels, ChannelStats, GrayWorld};
pub use filterops::kernel::{Kernel, StructuringElement};
pub use filterops::median::Median;
pub use filterops::morphology::{Closing, Dilation, Erosion, MorphologicalGradient, Opening};
pub use filterops::point::{Brightness, Grayscale, Invert, Sepia};
pub use io::load_rgb;
pub use job::{FilterJob, JobEvent, JobRunner};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
