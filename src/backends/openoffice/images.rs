use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::errors::ImageReadError;

/// What the writer needs to know about an image: its format and pixel dimensions.
/// Pixels are never decoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// Physical size in inches at 96 dpi, scaled by an optional percentage.
    pub fn physical_size(&self, scale: Option<i64>) -> (f64, f64) {
        let dpi = 96.0;
        let mut width = f64::from(self.width) / dpi;
        let mut height = f64::from(self.height) / dpi;
        if let Some(scale) = scale {
            let factor = scale as f64 / 100.0;
            width *= factor;
            height *= factor;
        }
        (width, height)
    }
}

/// The image-metadata collaborator. The writer only ever asks for format and size, so
/// tests can stand in a stub without touching the filesystem.
pub trait ImageInspector {
    fn inspect(&self, uri: &str) -> Result<ImageInfo, ImageReadError>;
}

/// Reads image headers from the filesystem. Format detection goes by content, not file
/// extension, matching what the packaging step will actually embed.
pub struct FsImageInspector;

impl ImageInspector for FsImageInspector {
    fn inspect(&self, uri: &str) -> Result<ImageInfo, ImageReadError> {
        let reader = ImageReader::open(Path::new(uri))?.with_guessed_format()?;
        let format = reader.format().ok_or(ImageReadError::UnknownFormat)?;
        let (width, height) = reader.into_dimensions()?;
        Ok(ImageInfo {
            format,
            width,
            height,
        })
    }
}
