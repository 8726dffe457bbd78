use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use resizer_core::{ResizeError, ResizeResult};

/// JPEG encoder for derivatives
pub struct ImageCompressor;

impl ImageCompressor {
    /// Compress to baseline JPEG at `quality` (1-100).
    ///
    /// Single-channel images stay grayscale; everything else is written as RGB with
    /// any alpha channel dropped.
    pub fn compress_jpeg(img: &DynamicImage, quality: u8) -> ResizeResult<Bytes> {
        let (width, height) = img.dimensions();
        let mut buffer = Vec::with_capacity((width as usize) * (height as usize) / 4);
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));

        let result = match img {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        result.map_err(|e| ResizeError::Encode(e.to_string()))?;

        Ok(Bytes::from(buffer))
    }
}
