use crate::image::processor::ColorModel;
use image::imageops::{self, FilterType};
use image::DynamicImage;

/// Bilinear resize with a code path chosen by the source color model.
///
/// The full source rectangle is scaled to the full destination rectangle, so the
/// output is exactly `width` x `height` with every pixel written. Aspect ratio is
/// not preserved.
pub struct ColorAwareResizer;

impl ColorAwareResizer {
    const FILTER: FilterType = FilterType::Triangle;

    /// Convert a decoded source into the pixel layout its color path scales in:
    /// single channel for grayscale, opaque RGB for CMYK and RGBA otherwise.
    ///
    /// Done once per source so concurrent resizes share one buffer. A source
    /// already in the right layout is moved, not copied.
    pub fn prepare(source: DynamicImage, color_model: ColorModel) -> DynamicImage {
        match color_model {
            ColorModel::Grayscale => DynamicImage::ImageLuma8(source.into_luma8()),
            // The decoder has already applied the CMYK to RGB conversion
            ColorModel::Cmyk => DynamicImage::ImageRgb8(source.into_rgb8()),
            ColorModel::Generic => DynamicImage::ImageRgba8(source.into_rgba8()),
        }
    }

    /// Scale `source` to `width` x `height`. A source not yet in the layout of its
    /// color path is converted first.
    pub fn resize(
        source: &DynamicImage,
        width: u32,
        height: u32,
        color_model: ColorModel,
    ) -> DynamicImage {
        match (color_model, source) {
            (ColorModel::Grayscale, DynamicImage::ImageLuma8(gray)) => {
                DynamicImage::ImageLuma8(imageops::resize(gray, width, height, Self::FILTER))
            }
            (ColorModel::Cmyk, DynamicImage::ImageRgb8(rgb)) => {
                DynamicImage::ImageRgb8(imageops::resize(rgb, width, height, Self::FILTER))
            }
            (ColorModel::Generic, DynamicImage::ImageRgba8(rgba)) => {
                DynamicImage::ImageRgba8(imageops::resize(rgba, width, height, Self::FILTER))
            }
            _ => {
                let prepared = Self::prepare(source.clone(), color_model);
                Self::resize(&prepared, width, height, color_model)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn sources() -> Vec<(DynamicImage, ColorModel)> {
        vec![
            (
                DynamicImage::ImageLuma8(GrayImage::from_pixel(1024, 768, Luma([90]))),
                ColorModel::Grayscale,
            ),
            (
                DynamicImage::ImageRgb8(RgbImage::from_pixel(1024, 768, Rgb([30, 60, 90]))),
                ColorModel::Cmyk,
            ),
            (
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(1024, 768, Rgba([30, 60, 90, 128]))),
                ColorModel::Generic,
            ),
        ]
    }

    #[test]
    fn test_output_has_exact_dimensions_on_every_path() {
        for (source, model) in sources() {
            for (w, h) in [(300, 200), (500, 400), (800, 600), (602, 405), (1, 1)] {
                let out = ColorAwareResizer::resize(&source, w, h, model);
                assert_eq!(out.dimensions(), (w, h), "{model:?} path at {w}x{h}");
            }
        }
    }

    #[test]
    fn test_upscale_and_aspect_change() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 50, Rgb([1, 2, 3])));
        let out = ColorAwareResizer::resize(&source, 602, 405, ColorModel::Generic);
        assert_eq!(out.dimensions(), (602, 405));
    }

    #[test]
    fn test_grayscale_stays_single_channel() {
        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 64, Luma([200])));
        let out = ColorAwareResizer::resize(&source, 32, 16, ColorModel::Grayscale);
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
        let value = out.to_luma8().get_pixel(10, 10)[0];
        assert!(value.abs_diff(200) <= 1, "unexpected luma {value}");
    }

    #[test]
    fn test_cmyk_output_is_opaque() {
        let source =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 0])));
        let out = ColorAwareResizer::resize(&source, 20, 20, ColorModel::Cmyk);
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
        assert!(out.to_rgba8().pixels().all(|p| p[3] == u8::MAX));
    }

    #[test]
    fn test_prepare_matches_each_color_path() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])));
        assert!(matches!(
            ColorAwareResizer::prepare(rgb.clone(), ColorModel::Grayscale),
            DynamicImage::ImageLuma8(_)
        ));
        assert!(matches!(
            ColorAwareResizer::prepare(rgb.clone(), ColorModel::Cmyk),
            DynamicImage::ImageRgb8(_)
        ));
        assert!(matches!(
            ColorAwareResizer::prepare(rgb, ColorModel::Generic),
            DynamicImage::ImageRgba8(_)
        ));
    }

    #[test]
    fn test_prepared_and_raw_sources_resize_alike() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_fn(40, 30, |x, y| {
            Rgb([(x * 6) as u8, (y * 8) as u8, 77])
        }));
        for model in [ColorModel::Grayscale, ColorModel::Cmyk, ColorModel::Generic] {
            let prepared = ColorAwareResizer::prepare(source.clone(), model);
            let from_prepared = ColorAwareResizer::resize(&prepared, 13, 7, model);
            let from_raw = ColorAwareResizer::resize(&source, 13, 7, model);
            assert_eq!(from_prepared, from_raw, "{model:?} path");
        }
    }

    #[test]
    fn test_generic_uses_rgba() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([10, 20, 30])));
        let out = ColorAwareResizer::resize(&source, 8, 8, ColorModel::Generic);
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));
        let pixel = *out.to_rgba8().get_pixel(4, 4);
        for (actual, expected) in pixel.0.iter().zip([10u8, 20, 30, 255]) {
            assert!(actual.abs_diff(expected) <= 1, "unexpected pixel {pixel:?}");
        }
    }
}
