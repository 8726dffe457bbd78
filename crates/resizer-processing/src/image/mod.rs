//! Image processing module
//!
//! - Header probing and decoding (processor)
//! - Color-aware resizing (resize)

pub mod processor;
pub mod resize;

pub use processor::{ColorModel, ImageProbe, ImageProcessor};
pub use resize::ColorAwareResizer;
