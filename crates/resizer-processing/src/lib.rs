//! Resizer Processing Library
//!
//! Turns one stored source image into its set of derivatives: header probing,
//! decoding, color-aware resizing, JPEG encoding and the concurrent
//! resize-and-upload fan-out of [`EventPipeline`].

pub mod compression;
pub mod image;
pub mod pipeline;
pub mod validator;

pub use compression::ImageCompressor;
pub use self::image::{ColorAwareResizer, ColorModel, ImageProbe, ImageProcessor};
pub use pipeline::{EventPipeline, PipelineSettings};
pub use validator::SourceValidator;
