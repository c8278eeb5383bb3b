//! Media type helpers for intake and output.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use lazy_static::lazy_static;

/// Media type of every optimized output.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Fallback for files whose type cannot be determined.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

lazy_static! {
    /// Extension → media type, the same set a browser file picker would tag as `image/*`.
    static ref EXTENSION_MEDIA_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("jfif", "image/jpeg");
        m.insert("png", "image/png");
        m.insert("webp", "image/webp");
        m.insert("gif", "image/gif");
        m.insert("bmp", "image/bmp");
        m.insert("tif", "image/tiff");
        m.insert("tiff", "image/tiff");
        m.insert("avif", "image/avif");
        m.insert("svg", "image/svg+xml");
        m.insert("ico", "image/x-icon");
        m
    };
}

/// Returns `true` when a declared media type belongs to the `image/` family.
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Derives a media type from the file extension, case-insensitively.
pub fn media_type_from_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .and_then(|ext| EXTENSION_MEDIA_TYPES.get(ext.as_str()).copied())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

/// Name under which an optimized entry is saved.
pub fn optimized_file_name(prefix: &str, original_name: &str) -> String {
    format!("{prefix}{original_name}")
}

/// Returns `name`, or `stem (n).ext` with the smallest `n` not yet in `taken`.
pub fn unique_file_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    (1..)
        .map(|n| match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
