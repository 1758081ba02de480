use std::path::Path;

use image::Rgb;
use tracing::debug;

use crate::error::LoadError;
use crate::Image;

/// Decode an image file into the in-memory 8-bit RGB representation.
///
/// Any alpha channel in the source file is dropped. Supported formats are
/// png, jpeg and bmp.
///
/// # Errors
///
/// `LoadError::Decode` when the file cannot be opened or decoded.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<Image<Rgb<u8>>, LoadError> {
    let decoded = image::open(path.as_ref())?;
    let rgb = decoded.into_rgb8();
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        "decoded source image"
    );
    Ok(rgb)
}
