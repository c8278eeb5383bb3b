//! JPEG re-encoding of arbitrary raster images.
//!
//! Decodes the source into a full-resolution pixel buffer, draws it onto an
//! opaque RGB surface and saves that surface as a baseline JPEG at the
//! requested quality. Dimensions are never changed.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::core::{EncodedImage, RawFile};
use crate::utils::{JPEG_MEDIA_TYPE, OptimizerError, OptimizerResult, validate_quality};

/// Turns source image bytes into encoded bytes at a quality level.
///
/// Implementations must be stateless: the batch executor calls them from
/// several blocking threads at once.
pub trait Encoder: Send + Sync {
    fn encode(&self, source: &RawFile, quality: u8) -> OptimizerResult<EncodedImage>;
}

/// Encoder backed by the `image` crate's decoders and JPEG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegReencoder;

impl JpegReencoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for JpegReencoder {
    fn encode(&self, source: &RawFile, quality: u8) -> OptimizerResult<EncodedImage> {
        let quality = validate_quality(quality as u32)?;

        let image = image::load_from_memory(source.bytes()).map_err(|e| {
            OptimizerError::decode(format!("Failed to load '{}': {e}", source.name()))
        })?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(OptimizerError::encode(format!(
                "'{}' has no drawable area ({width}×{height})",
                source.name()
            )));
        }

        debug!("Decoded '{}': {}×{}", source.name(), width, height);

        let surface = flatten(&image);
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode_image(&surface)
            .map_err(|e| OptimizerError::encode(format!("JPEG save failed for '{}': {e}", source.name())))?;

        if bytes.is_empty() {
            return Err(OptimizerError::encode(format!(
                "JPEG encoder produced no output for '{}'",
                source.name()
            )));
        }

        debug!("'{}' → {} bytes at quality {}", source.name(), bytes.len(), quality);
        Ok(EncodedImage::new(bytes, JPEG_MEDIA_TYPE, width, height))
    }
}

/// Composites the image onto black, dropping the alpha channel.
fn flatten(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}
