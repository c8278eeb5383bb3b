//! Image processing.
//!
//! - [`JpegReencoder`]: Decodes any supported raster image and re-encodes it as JPEG.
//! - [`BatchExecutor`]: Runs one encode per entry concurrently and collects every outcome.

mod encoder;
mod executor;

pub use encoder::{Encoder, JpegReencoder};
pub use executor::BatchExecutor;
