//! Image processor - header probing and decoding

use image::{DynamicImage, ImageFormat, ImageReader};
use resizer_core::{ResizeError, ResizeResult};
use std::io::Cursor;
use zune_core::colorspace::ColorSpace;
use zune_jpeg::JpegDecoder;

/// Color model of a source image, as declared by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Grayscale,
    /// Four-component JPEG, stored as CMYK or YCCK
    Cmyk,
    /// Anything that converts to RGBA without loss of meaning
    Generic,
}

impl ColorModel {
    fn from_colorspace(colorspace: ColorSpace) -> Self {
        match colorspace {
            ColorSpace::Luma | ColorSpace::LumaA => ColorModel::Grayscale,
            ColorSpace::CMYK | ColorSpace::YCCK => ColorModel::Cmyk,
            _ => ColorModel::Generic,
        }
    }
}

/// Result of reading an image header without decoding pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProbe {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
}

pub struct ImageProcessor;

impl ImageProcessor {
    /// Read dimensions and color model from the header. Only JPEG input is accepted.
    ///
    /// The color model is the one stored in the file (SOF components and the
    /// Adobe transform), not the one the decoder converts to.
    pub fn probe(data: &[u8]) -> ResizeResult<ImageProbe> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ResizeError::Format(format!("cannot read image header: {}", e)))?;

        match reader.format() {
            Some(ImageFormat::Jpeg) => {}
            Some(other) => {
                return Err(ResizeError::Format(format!(
                    "unsupported image format: {:?}",
                    other
                )))
            }
            None => return Err(ResizeError::Format("unrecognized image format".to_string())),
        }

        let mut decoder = JpegDecoder::new(data);
        decoder
            .decode_headers()
            .map_err(|e| ResizeError::Format(format!("invalid JPEG header: {}", e)))?;

        let (width, height) = decoder
            .dimensions()
            .ok_or_else(|| ResizeError::Format("JPEG header without dimensions".to_string()))?;
        let color_model = decoder
            .get_input_colorspace()
            .map(ColorModel::from_colorspace)
            .ok_or_else(|| ResizeError::Format("JPEG header without color space".to_string()))?;

        Ok(ImageProbe {
            width: width as u32,
            height: height as u32,
            color_model,
        })
    }

    /// Fully decode the image. Pixel data of CMYK sources is already converted to RGB.
    pub fn decode(data: &[u8]) -> ResizeResult<DynamicImage> {
        image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| ResizeError::Decode(e.to_string()))
    }
}
