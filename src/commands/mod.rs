//! Command handlers for the host.
//!
//! This module exposes the operations a front end drives:
//! - [`add_images`]: Read files from disk and track the images among them
//! - [`optimize_images`]: Re-encode every tracked image
//! - [`remove_image`] / [`clear_images`]: Stop tracking images and release their previews
//! - [`download_image`] / [`download_all`]: Save optimized images

mod download;
mod image;

pub use download::*;
pub use image::*;
