use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;

/// Create a test JPEG with a simple gradient
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// Create a single-channel test JPEG
pub fn create_grayscale_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, _| Luma([(x % 256) as u8]));
    encode(&DynamicImage::ImageLuma8(img), ImageFormat::Jpeg)
}

/// Create a four-component CMYK JPEG filled with one ink mix
pub fn create_cmyk_jpeg(width: u16, height: u16, cmyk: [u8; 4]) -> Vec<u8> {
    let pixels = cmyk.repeat(usize::from(width) * usize::from(height));
    let mut buffer = Vec::new();
    jpeg_encoder::Encoder::new(&mut buffer, 90)
        .encode(&pixels, width, height, jpeg_encoder::ColorType::Cmyk)
        .expect("encode CMYK test image");
    buffer
}

/// Create a JPEG whose frame header claims `width` x `height` while the scan data
/// only covers a small image. The header reads fine, the pixels cannot be decoded.
pub fn create_jpeg_with_unbacked_dimensions(width: u16, height: u16) -> Vec<u8> {
    let mut data = create_test_jpeg(16, 16);
    let sof = data
        .windows(2)
        .position(|marker| marker == [0xFF, 0xC0])
        .expect("baseline frame header");
    // Marker (2), segment length (2), sample precision (1), then height and width
    data[sof + 5..sof + 7].copy_from_slice(&height.to_be_bytes());
    data[sof + 7..sof + 9].copy_from_slice(&width.to_be_bytes());
    data
}

/// Create a test PNG, which the pipeline must refuse
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([255, 0, 0]));
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode test image");
    buffer
}
